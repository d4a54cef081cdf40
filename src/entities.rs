//! All game entity types. Pure data, no simulation logic.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::geometry::{Playfield, Point, Rect};

// ── Shared ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cardinal unit vector, y grows downward.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    Snake,
    SpaceInvaders,
}

impl GameKind {
    /// Identifier used by the score API.
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::SpaceInvaders => "spaceinvaders",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Snake => "SNAKE",
            GameKind::SpaceInvaders => "SPACE INVADERS",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snake" => Ok(GameKind::Snake),
            "spaceinvaders" | "space-invaders" | "invaders" => Ok(GameKind::SpaceInvaders),
            other => Err(format!("unknown game `{other}` (expected snake or spaceinvaders)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalReason {
    WallCollision,
    SelfCollision,
    Win,
}

impl TerminalReason {
    pub fn headline(self) -> &'static str {
        match self {
            TerminalReason::WallCollision => "HIT THE WALL",
            TerminalReason::SelfCollision => "ATE YOURSELF",
            TerminalReason::Win => "YOU WIN!",
        }
    }
}

/// The event that ends a session, carrying the final score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terminal {
    pub reason: TerminalReason,
    pub final_score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Over(Terminal),
}

// ── Snake ─────────────────────────────────────────────────────────────────────

/// What happens to a turn straight back into the second segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReversalPolicy {
    /// Ignore the turn (arcade behaviour).
    #[default]
    Reject,
    /// Accept it; the next step ends in a self collision.
    Allow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPolicy {
    /// Uniform over the whole grid, may land on the body.
    #[default]
    Uniform,
    /// Draw only from cells off the body.
    AvoidSnake,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnakeRules {
    pub reversal: ReversalPolicy,
    pub food: FoodPolicy,
}

#[derive(Clone, Debug)]
pub struct SnakeState {
    /// Head first.
    pub segments: VecDeque<Point>,
    pub direction: Direction,
    /// Turn accepted since the last step, applied at the start of the next.
    pub pending_direction: Option<Direction>,
    pub food: Point,
    pub score: u32,
    pub status: GameStatus,
    pub playfield: Playfield,
    pub rules: SnakeRules,
    pub frame: u64,
}

impl SnakeState {
    pub fn head(&self) -> Point {
        // A snake is never empty: init_state seeds one segment and tick
        // only pops after pushing.
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// ── Space Invaders ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct InvadersState {
    pub player: Rect,
    pub projectiles: Vec<Rect>,
    pub enemies: Vec<Rect>,
    pub score: u32,
    pub status: GameStatus,
    pub playfield: Playfield,
    pub frame: u64,
}
