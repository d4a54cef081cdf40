//! One play-through of either game, from start to terminal signal or stop.

use rand::Rng;

use crate::entities::{
    Direction, GameKind, GameStatus, InvadersState, SnakeRules, SnakeState, Terminal,
};
use crate::geometry::Playfield;
use crate::input::Intent;
use crate::{invaders, snake};

#[derive(Clone, Debug)]
pub enum GameState {
    Snake(SnakeState),
    Invaders(InvadersState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still playing.
    Continue,
    /// The step that ended the session.  Emitted exactly once.
    Terminal(Terminal),
    /// The session already ended; nothing moved.
    Inactive,
}

#[derive(Clone, Debug)]
pub struct Session {
    state: GameState,
    player_name: String,
    ended: bool,
}

impl Session {
    pub fn snake(
        playfield: Playfield,
        rules: SnakeRules,
        player_name: impl Into<String>,
        rng: &mut impl Rng,
    ) -> Self {
        Self::from_state(
            GameState::Snake(snake::init_state(playfield, rules, rng)),
            player_name,
        )
    }

    pub fn invaders(playfield: Playfield, player_name: impl Into<String>) -> Self {
        Self::from_state(
            GameState::Invaders(invaders::init_state(playfield)),
            player_name,
        )
    }

    /// Wrap an existing state, e.g. a hand-built scenario.
    pub fn from_state(state: GameState, player_name: impl Into<String>) -> Self {
        Session {
            state,
            player_name: player_name.into(),
            ended: false,
        }
    }

    pub fn game(&self) -> GameKind {
        match self.state {
            GameState::Snake(_) => GameKind::Snake,
            GameState::Invaders(_) => GameKind::SpaceInvaders,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn score(&self) -> u32 {
        match &self.state {
            GameState::Snake(s) => s.score,
            GameState::Invaders(s) => s.score,
        }
    }

    /// Steps taken so far.
    pub fn frame(&self) -> u64 {
        match &self.state {
            GameState::Snake(s) => s.frame,
            GameState::Invaders(s) => s.frame,
        }
    }

    fn status(&self) -> GameStatus {
        match &self.state {
            GameState::Snake(s) => s.status,
            GameState::Invaders(s) => s.status,
        }
    }

    pub fn terminal(&self) -> Option<Terminal> {
        match self.status() {
            GameStatus::Over(terminal) => Some(terminal),
            GameStatus::Playing => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.terminal().is_some()
    }

    /// Fold one frame's intent into the game state.  Called once per frame,
    /// before `step`.
    pub fn apply_input(&mut self, intent: Intent) {
        match &mut self.state {
            GameState::Snake(state) => {
                if let Some(direction) = intent.direction {
                    *state = snake::turn(state, direction);
                }
            }
            GameState::Invaders(state) => {
                match intent.direction {
                    Some(Direction::Left) => *state = invaders::move_player_left(state),
                    Some(Direction::Right) => *state = invaders::move_player_right(state),
                    _ => {}
                }
                if intent.fire {
                    *state = invaders::fire(state);
                }
            }
        }
    }

    /// Advance one discrete step.
    pub fn step(&mut self, rng: &mut impl Rng) -> StepOutcome {
        if self.ended {
            return StepOutcome::Inactive;
        }

        match &mut self.state {
            GameState::Snake(state) => *state = snake::tick(state, rng),
            GameState::Invaders(state) => *state = invaders::tick(state),
        }

        match self.terminal() {
            Some(terminal) => {
                self.ended = true;
                tracing::info!(
                    game = %self.game(),
                    reason = ?terminal.reason,
                    score = terminal.final_score,
                    frame = self.frame(),
                    "session ended"
                );
                StepOutcome::Terminal(terminal)
            }
            None => StepOutcome::Continue,
        }
    }
}
