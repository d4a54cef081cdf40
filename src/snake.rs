//! Snake stepping: pure functions.
//!
//! Every public function takes an immutable reference to the current
//! `SnakeState` (and, where needed, an RNG handle) and returns a brand-new
//! `SnakeState`.  Side effects are limited to the injected RNG.

use std::collections::VecDeque;

use rand::Rng;

use crate::entities::{
    Direction, FoodPolicy, GameStatus, ReversalPolicy, SnakeRules, SnakeState, Terminal,
    TerminalReason,
};
use crate::geometry::{Playfield, Point};

/// Grid step in pixels; also the size of one cell.
pub const STEP: i32 = 20;
/// Drawn size of a segment or the food inside its 20px cell.
pub const SEGMENT_SIZE: i32 = 18;
pub const FOOD_REWARD: u32 = 10;
pub const DEFAULT_PLAYFIELD: Playfield = Playfield::new(400, 300);

// ── Constructors ─────────────────────────────────────────────────────────────

/// One segment at the grid-aligned centre, heading right.
pub fn init_state(playfield: Playfield, rules: SnakeRules, rng: &mut impl Rng) -> SnakeState {
    let head = Point::new(
        (playfield.width / 2) / STEP * STEP,
        (playfield.height / 2) / STEP * STEP,
    );
    let segments = VecDeque::from([head]);
    let food = place_food(&playfield, &segments, rules.food, rng);
    SnakeState {
        segments,
        direction: Direction::Right,
        pending_direction: None,
        food,
        score: 0,
        status: GameStatus::Playing,
        playfield,
        rules,
        frame: 0,
    }
}

/// Number of grid cells along each axis.
pub fn grid_size(playfield: &Playfield) -> (i32, i32) {
    (playfield.width / STEP, playfield.height / STEP)
}

/// Pick a grid-aligned food cell.
///
/// `FoodPolicy::Uniform` ignores the body entirely.  `FoodPolicy::AvoidSnake`
/// draws from the free cells and falls back to uniform when the board is full.
pub fn place_food(
    playfield: &Playfield,
    segments: &VecDeque<Point>,
    policy: FoodPolicy,
    rng: &mut impl Rng,
) -> Point {
    let (cols, rows) = grid_size(playfield);
    let cols = cols.max(1);
    let rows = rows.max(1);

    if policy == FoodPolicy::AvoidSnake {
        let free: Vec<Point> = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Point::new(c * STEP, r * STEP)))
            .filter(|p| !segments.contains(p))
            .collect();
        if !free.is_empty() {
            return free[rng.gen_range(0..free.len())];
        }
    }

    Point::new(rng.gen_range(0..cols) * STEP, rng.gen_range(0..rows) * STEP)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Buffer a turn for the next step.  A later turn in the same frame replaces
/// this one.  Under `ReversalPolicy::Reject` a turn straight back into the
/// second segment is ignored.
pub fn turn(state: &SnakeState, direction: Direction) -> SnakeState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let reversal = state.len() > 1 && direction == state.direction.opposite();
    if reversal && state.rules.reversal == ReversalPolicy::Reject {
        return state.clone();
    }
    SnakeState {
        pending_direction: Some(direction),
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the snake by one cell.
pub fn tick(state: &SnakeState, rng: &mut impl Rng) -> SnakeState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let frame = state.frame + 1;
    let direction = state.pending_direction.unwrap_or(state.direction);
    let head = state.head().offset(direction, STEP);

    // ── 1. Lose conditions leave the body where it was ───────────────────────
    let crash = if !state.playfield.contains(head) {
        Some(TerminalReason::WallCollision)
    } else if state.segments.contains(&head) {
        Some(TerminalReason::SelfCollision)
    } else {
        None
    };
    if let Some(reason) = crash {
        return SnakeState {
            direction,
            pending_direction: None,
            status: GameStatus::Over(Terminal {
                reason,
                final_score: state.score,
            }),
            frame,
            ..state.clone()
        };
    }

    // ── 2. Move, growing by one when the head lands on food ──────────────────
    let mut segments = state.segments.clone();
    segments.push_front(head);

    let (score, food) = if head == state.food {
        let food = place_food(&state.playfield, &segments, state.rules.food, rng);
        (state.score + FOOD_REWARD, food)
    } else {
        segments.pop_back();
        (state.score, state.food)
    };

    SnakeState {
        segments,
        direction,
        pending_direction: None,
        food,
        score,
        frame,
        ..state.clone()
    }
}
