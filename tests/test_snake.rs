use std::collections::{HashSet, VecDeque};

use retro_arcade::entities::*;
use retro_arcade::geometry::{Playfield, Point};
use retro_arcade::snake::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A playing snake on the default 400×300 field; food parked in a corner.
fn make_state(segments: &[(i32, i32)], direction: Direction) -> SnakeState {
    SnakeState {
        segments: segments.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        direction,
        pending_direction: None,
        food: Point::new(0, 0),
        score: 0,
        status: GameStatus::Playing,
        playfield: DEFAULT_PLAYFIELD,
        rules: SnakeRules::default(),
        frame: 0,
    }
}

fn with_rules(state: SnakeState, reversal: ReversalPolicy) -> SnakeState {
    SnakeState {
        rules: SnakeRules {
            reversal,
            ..state.rules
        },
        ..state
    }
}

fn is_aligned(p: Point) -> bool {
    p.x % STEP == 0 && p.y % STEP == 0
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_single_segment_at_grid_centre() {
    let s = init_state(DEFAULT_PLAYFIELD, SnakeRules::default(), &mut seeded_rng());
    assert_eq!(s.len(), 1);
    assert_eq!(s.head(), Point::new(200, 140));
    assert_eq!(s.direction, Direction::Right);
    assert_eq!(s.pending_direction, None);
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn init_state_food_is_grid_aligned_and_inside() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let s = init_state(DEFAULT_PLAYFIELD, SnakeRules::default(), &mut rng);
        assert!(is_aligned(s.food));
        assert!(s.playfield.contains(s.food));
    }
}

#[test]
fn grid_size_of_default_playfield() {
    assert_eq!(grid_size(&DEFAULT_PLAYFIELD), (20, 15));
}

// ── place_food ────────────────────────────────────────────────────────────────

#[test]
fn avoid_snake_picks_the_only_free_cell() {
    let field = Playfield::new(40, 20);
    let body = VecDeque::from([Point::new(0, 0)]);
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let food = place_food(&field, &body, FoodPolicy::AvoidSnake, &mut rng);
        assert_eq!(food, Point::new(20, 0));
    }
}

#[test]
fn avoid_snake_falls_back_when_board_is_full() {
    let field = Playfield::new(40, 20);
    let body = VecDeque::from([Point::new(0, 0), Point::new(20, 0)]);
    let food = place_food(&field, &body, FoodPolicy::AvoidSnake, &mut seeded_rng());
    assert!(body.contains(&food));
}

// ── turn ──────────────────────────────────────────────────────────────────────

#[test]
fn turn_is_buffered_until_next_tick() {
    let s = make_state(&[(200, 140)], Direction::Right);
    let s = turn(&s, Direction::Up);
    assert_eq!(s.direction, Direction::Right);
    assert_eq!(s.pending_direction, Some(Direction::Up));

    let s = tick(&s, &mut seeded_rng());
    assert_eq!(s.direction, Direction::Up);
    assert_eq!(s.pending_direction, None);
    assert_eq!(s.head(), Point::new(200, 120));
}

#[test]
fn latest_turn_in_a_frame_wins() {
    let s = make_state(&[(200, 140)], Direction::Right);
    let s = turn(&turn(&s, Direction::Up), Direction::Down);
    assert_eq!(s.pending_direction, Some(Direction::Down));
}

#[test]
fn reversal_rejected_by_default() {
    let s = make_state(&[(200, 140), (180, 140)], Direction::Right);
    let s = turn(&s, Direction::Left);
    assert_eq!(s.pending_direction, None);

    let s = tick(&s, &mut seeded_rng());
    assert_eq!(s.head(), Point::new(220, 140));
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn reversal_of_single_segment_is_a_plain_turn() {
    let s = make_state(&[(200, 140)], Direction::Right);
    let s = turn(&s, Direction::Left);
    assert_eq!(s.pending_direction, Some(Direction::Left));
    let s = tick(&s, &mut seeded_rng());
    assert_eq!(s.head(), Point::new(180, 140));
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn allowed_reversal_collides_with_own_body() {
    let s = with_rules(
        make_state(&[(200, 140), (180, 140)], Direction::Right),
        ReversalPolicy::Allow,
    );
    let s = tick(&turn(&s, Direction::Left), &mut seeded_rng());
    assert_eq!(
        s.status,
        GameStatus::Over(Terminal {
            reason: TerminalReason::SelfCollision,
            final_score: 0,
        })
    );
}

#[test]
fn turn_after_game_over_is_ignored() {
    let mut s = make_state(&[(380, 140)], Direction::Right);
    s = tick(&s, &mut seeded_rng());
    assert!(matches!(s.status, GameStatus::Over(_)));
    let turned = turn(&s, Direction::Up);
    assert_eq!(turned.pending_direction, None);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_moves_one_step_without_growing() {
    let s = make_state(&[(200, 140), (180, 140), (160, 140)], Direction::Right);
    let s = tick(&s, &mut seeded_rng());
    let expected: VecDeque<Point> =
        VecDeque::from([Point::new(220, 140), Point::new(200, 140), Point::new(180, 140)]);
    assert_eq!(s.segments, expected);
    assert_eq!(s.frame, 1);
}

#[test]
fn eating_three_times_grows_to_four() {
    let mut rng = seeded_rng();
    let mut s = make_state(&[(200, 140)], Direction::Right);
    for _ in 0..3 {
        s.food = s.head().offset(s.direction, STEP);
        s = tick(&s, &mut rng);
    }
    assert_eq!(s.len(), 4);
    assert_eq!(s.score, 3 * FOOD_REWARD);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.head(), Point::new(260, 140));
}

#[test]
fn food_is_replaced_after_eating() {
    let mut s = make_state(&[(200, 140)], Direction::Right);
    s.food = Point::new(220, 140);
    s.rules.food = FoodPolicy::AvoidSnake;
    let s = tick(&s, &mut seeded_rng());
    assert!(!s.segments.contains(&s.food));
    assert!(is_aligned(s.food));
}

#[test]
fn wall_collision_ends_without_moving() {
    let before = make_state(&[(380, 140), (360, 140)], Direction::Right);
    let after = tick(&before, &mut seeded_rng());
    assert_eq!(after.segments, before.segments);
    assert_eq!(
        after.status,
        GameStatus::Over(Terminal {
            reason: TerminalReason::WallCollision,
            final_score: 0,
        })
    );
}

#[test]
fn wall_collision_on_every_edge() {
    let cases = [
        ((0, 140), Direction::Left),
        ((380, 140), Direction::Right),
        ((200, 0), Direction::Up),
        ((200, 280), Direction::Down),
    ];
    for ((x, y), dir) in cases {
        let s = tick(&make_state(&[(x, y)], dir), &mut seeded_rng());
        assert!(
            matches!(
                s.status,
                GameStatus::Over(Terminal {
                    reason: TerminalReason::WallCollision,
                    ..
                })
            ),
            "heading {dir:?} from ({x},{y})"
        );
    }
}

#[test]
fn self_collision_keeps_score() {
    // Head at (100,100) moving down into (100,120).
    let mut s = make_state(
        &[(100, 100), (120, 100), (120, 120), (100, 120), (80, 120)],
        Direction::Down,
    );
    s.score = 40;
    let s = tick(&s, &mut seeded_rng());
    assert_eq!(
        s.status,
        GameStatus::Over(Terminal {
            reason: TerminalReason::SelfCollision,
            final_score: 40,
        })
    );
}

#[test]
fn tick_after_game_over_is_a_no_op() {
    let s = tick(&make_state(&[(380, 140)], Direction::Right), &mut seeded_rng());
    let again = tick(&s, &mut seeded_rng());
    assert_eq!(again.frame, s.frame);
    assert_eq!(again.segments, s.segments);
    assert_eq!(again.status, s.status);
}

#[test]
fn random_play_keeps_segments_aligned_and_unique() {
    let mut rng = StdRng::seed_from_u64(7);
    let dirs = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    for _ in 0..20 {
        let mut s = init_state(DEFAULT_PLAYFIELD, SnakeRules::default(), &mut rng);
        while s.status == GameStatus::Playing && s.frame < 500 {
            if rng.gen_bool(0.3) {
                s = turn(&s, dirs[rng.gen_range(0..dirs.len())]);
            }
            // Steer into food now and then so the body grows.
            if rng.gen_bool(0.2) {
                s.food = s.head().offset(s.pending_direction.unwrap_or(s.direction), STEP);
            }
            s = tick(&s, &mut rng);

            let unique: HashSet<Point> = s.segments.iter().copied().collect();
            assert_eq!(unique.len(), s.len());
            assert!(s.segments.iter().all(|&p| is_aligned(p)));
            assert!(s.segments.iter().all(|&p| s.playfield.contains(p)));
        }
    }
}
