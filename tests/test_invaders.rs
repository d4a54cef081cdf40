use retro_arcade::entities::*;
use retro_arcade::geometry::Rect;
use retro_arcade::input::Intent;
use retro_arcade::invaders::*;
use retro_arcade::session::{GameState, Session, StepOutcome};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> InvadersState {
    init_state(DEFAULT_PLAYFIELD)
}

fn projectile_at(x: i32, y: i32) -> Rect {
    Rect::new(x, y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
}

/// A projectile that will sit inside `enemy` after its next move.
fn projectile_hitting(enemy: &Rect) -> Rect {
    projectile_at(enemy.x + 5, enemy.y + 5 + PROJECTILE_SPEED)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_and_formation() {
    let s = make_state();
    assert_eq!(s.player, Rect::new(200, 270, PLAYER_WIDTH, PLAYER_HEIGHT));
    assert_eq!(s.enemies.len(), 24);
    assert!(s.projectiles.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn formation_is_column_major() {
    let enemies = enemy_formation();
    assert_eq!(enemies[0], Rect::new(50, 50, ENEMY_WIDTH, ENEMY_HEIGHT));
    assert_eq!(enemies[1], Rect::new(50, 80, ENEMY_WIDTH, ENEMY_HEIGHT));
    assert_eq!(enemies[3], Rect::new(90, 50, ENEMY_WIDTH, ENEMY_HEIGHT));
    assert_eq!(enemies[23], Rect::new(330, 110, ENEMY_WIDTH, ENEMY_HEIGHT));
}

// ── move_player_left / move_player_right ─────────────────────────────────────

#[test]
fn move_left_normal() {
    let s = move_player_left(&make_state());
    assert_eq!(s.player.x, 190);
}

#[test]
fn move_left_clamps_at_zero() {
    let mut s = make_state();
    s.player.x = 5;
    assert_eq!(move_player_left(&s).player.x, 0);
    s.player.x = 0;
    assert_eq!(move_player_left(&s).player.x, 0);
}

#[test]
fn move_right_clamps_at_edge() {
    let mut s = make_state();
    s.player.x = 365;
    assert_eq!(move_player_right(&s).player.x, 370);
    s.player.x = 370;
    assert_eq!(move_player_right(&s).player.x, 370);
}

#[test]
fn move_is_ignored_after_win() {
    let mut s = make_state();
    s.status = GameStatus::Over(Terminal {
        reason: TerminalReason::Win,
        final_score: 2400,
    });
    assert_eq!(move_player_left(&s).player, s.player);
    assert!(fire(&s).projectiles.is_empty());
}

// ── fire ──────────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_from_player_centre() {
    let s = fire(&make_state());
    assert_eq!(s.projectiles, vec![projectile_at(215, 270)]);
}

#[test]
fn fire_does_not_limit_projectiles() {
    let s = fire(&fire(&fire(&make_state())));
    assert_eq!(s.projectiles.len(), 3);
}

// ── find_hits ─────────────────────────────────────────────────────────────────

#[test]
fn find_hits_one_projectile_per_enemy() {
    let enemy = Rect::new(0, 0, 25, 20);
    let projectiles = vec![projectile_at(5, 5), projectile_at(10, 5)];
    assert_eq!(find_hits(&projectiles, &[enemy]), vec![(0, 0)]);
}

#[test]
fn find_hits_spent_projectile_cannot_hit_twice() {
    // The projectile overlaps both enemies; the lower index wins.
    let enemies = vec![Rect::new(0, 0, 25, 20), Rect::new(20, 0, 25, 20)];
    let projectiles = vec![projectile_at(21, 5)];
    assert_eq!(find_hits(&projectiles, &enemies), vec![(0, 0)]);
}

#[test]
fn find_hits_second_projectile_takes_second_enemy() {
    let enemies = vec![Rect::new(0, 0, 25, 20), Rect::new(20, 0, 25, 20)];
    let projectiles = vec![projectile_at(21, 5), projectile_at(22, 5)];
    assert_eq!(find_hits(&projectiles, &enemies), vec![(0, 0), (1, 1)]);
}

#[test]
fn find_hits_edge_touch_is_a_miss() {
    let enemy = Rect::new(0, 0, 25, 20);
    let projectiles = vec![projectile_at(25, 5), projectile_at(5, 20)];
    assert!(find_hits(&projectiles, &[enemy]).is_empty());
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_moves_projectiles_up() {
    let mut s = make_state();
    s.projectiles = vec![projectile_at(5, 200)];
    let s = tick(&s);
    assert_eq!(s.projectiles, vec![projectile_at(5, 195)]);
    assert_eq!(s.frame, 1);
}

#[test]
fn missed_projectile_is_dropped_at_top() {
    let mut s = make_state();
    s.projectiles = vec![projectile_at(5, 8)];
    let s = tick(&s);
    assert_eq!(s.projectiles, vec![projectile_at(5, 3)]);
    let s = tick(&s);
    assert!(s.projectiles.is_empty());
    assert_eq!(s.enemies.len(), 24);
}

#[test]
fn projectile_reaching_zero_is_dropped() {
    let mut s = make_state();
    s.projectiles = vec![projectile_at(5, PROJECTILE_SPEED)];
    assert!(tick(&s).projectiles.is_empty());
}

#[test]
fn hit_removes_both_and_scores() {
    let mut s = make_state();
    let target = s.enemies[4];
    s.projectiles = vec![projectile_hitting(&target)];
    let s = tick(&s);
    assert!(s.projectiles.is_empty());
    assert_eq!(s.enemies.len(), 23);
    assert!(!s.enemies.contains(&target));
    assert_eq!(s.score, ENEMY_REWARD);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn clearing_the_formation_wins() {
    let mut s = make_state();
    s.projectiles = s.enemies.iter().map(projectile_hitting).collect();
    let s = tick(&s);
    assert!(s.enemies.is_empty());
    assert!(s.projectiles.is_empty());
    assert_eq!(
        s.status,
        GameStatus::Over(Terminal {
            reason: TerminalReason::Win,
            final_score: 2400,
        })
    );
}

#[test]
fn win_is_signalled_once_through_session() {
    let mut s = make_state();
    s.projectiles = s.enemies.iter().map(projectile_hitting).collect();
    let mut session = Session::from_state(GameState::Invaders(s), "ace");
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(
        session.step(&mut rng),
        StepOutcome::Terminal(Terminal {
            reason: TerminalReason::Win,
            final_score: 2400,
        })
    );
    assert_eq!(session.step(&mut rng), StepOutcome::Inactive);
    assert_eq!(session.step(&mut rng), StepOutcome::Inactive);
    assert_eq!(session.score(), 2400);
    assert_eq!(session.frame(), 1);
}

fn invaders_of(session: &Session) -> &InvadersState {
    match session.state() {
        GameState::Invaders(s) => s,
        GameState::Snake(_) => panic!("not an invaders session"),
    }
}

#[test]
fn shot_through_a_column_gap_misses_every_enemy() {
    let mut session = Session::invaders(DEFAULT_PLAYFIELD, "ace");
    let mut rng = StdRng::seed_from_u64(1);

    // From x=190 the shot spans 205..208, between columns at 170..195 and 210..235.
    session.apply_input(Intent {
        direction: Some(Direction::Left),
        fire: false,
    });
    session.step(&mut rng);
    assert_eq!(invaders_of(&session).player.x, 190);

    session.apply_input(Intent {
        direction: None,
        fire: true,
    });
    session.step(&mut rng);
    assert_eq!(invaders_of(&session).projectiles.len(), 1);

    let mut frames = 0;
    while !invaders_of(&session).projectiles.is_empty() {
        assert_eq!(session.step(&mut rng), StepOutcome::Continue);
        frames += 1;
        assert!(frames < 100, "projectile never left the playfield");
    }

    assert_eq!(invaders_of(&session).enemies.len(), 24);
    assert_eq!(session.score(), 0);
    assert!(!session.is_over());
}

#[test]
fn destroying_one_per_frame_wins_on_the_last_hit() {
    let mut s = make_state();
    for n in 1..=24u32 {
        assert_eq!(s.status, GameStatus::Playing);
        let enemy = s.enemies[0];
        s.projectiles.push(projectile_hitting(&enemy));
        s = tick(&s);
        assert_eq!(s.score, n * ENEMY_REWARD);
    }
    assert_eq!(
        s.status,
        GameStatus::Over(Terminal {
            reason: TerminalReason::Win,
            final_score: 2400,
        })
    );
}
