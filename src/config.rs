//! Arcade configuration: TOML file, then environment, then CLI flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::entities::{FoodPolicy, GameKind, ReversalPolicy, SnakeRules};
use crate::error::ArcadeError;
use crate::geometry::Playfield;
use crate::input::FireMode;
use crate::scores::DEFAULT_LIMIT;
use crate::{invaders, snake};

pub const ENV_PLAYER: &str = "ARCADE_PLAYER";
pub const ENV_SCORE_API: &str = "ARCADE_SCORE_API";
pub const ENV_LOG_FILE: &str = "ARCADE_LOG_FILE";

const DEFAULT_SNAKE_FRAME_MS: u64 = 120;
const DEFAULT_INVADERS_FRAME_MS: u64 = 33; // ≈30 FPS
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArcadeConfig {
    pub player_name: Option<String>,
    pub snake: SnakeConfig,
    pub invaders: InvadersConfig,
    pub scores: ScoresConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnakeConfig {
    pub width: i32,
    pub height: i32,
    pub frame_ms: u64,
    pub reversal: ReversalPolicy,
    pub food: FoodPolicy,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        SnakeConfig {
            width: snake::DEFAULT_PLAYFIELD.width,
            height: snake::DEFAULT_PLAYFIELD.height,
            frame_ms: DEFAULT_SNAKE_FRAME_MS,
            reversal: ReversalPolicy::default(),
            food: FoodPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvadersConfig {
    pub width: i32,
    pub height: i32,
    pub frame_ms: u64,
    pub fire_mode: FireMode,
}

impl Default for InvadersConfig {
    fn default() -> Self {
        InvadersConfig {
            width: invaders::DEFAULT_PLAYFIELD.width,
            height: invaders::DEFAULT_PLAYFIELD.height,
            frame_ms: DEFAULT_INVADERS_FRAME_MS,
            fire_mode: FireMode::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoresConfig {
    /// Base URL of the score API; scores stay in memory when unset.
    pub api_url: Option<String>,
    pub limit: usize,
}

impl Default for ScoresConfig {
    fn default() -> Self {
        ScoresConfig {
            api_url: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: None,
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    /// Configured file, or `$HOME/.retro_arcade.log`.
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".retro_arcade.log")
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ArcadeConfig {
    /// Read `path` if given; otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ArcadeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path).map_err(|source| ArcadeError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, ArcadeError> {
        let config: ArcadeConfig =
            toml::from_str(contents).map_err(|source| ArcadeError::ConfigParse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ARCADE_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| env::var(name).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup(ENV_PLAYER).and_then(non_empty) {
            self.player_name = Some(name);
        }
        if let Some(url) = lookup(ENV_SCORE_API).and_then(non_empty) {
            self.scores.api_url = Some(url);
        }
        if let Some(file) = lookup(ENV_LOG_FILE).and_then(non_empty) {
            self.log.file = Some(PathBuf::from(file));
        }
    }

    pub fn validate(&self) -> Result<(), ArcadeError> {
        let s = &self.snake;
        if s.width < snake::STEP || s.height < snake::STEP {
            return Err(ArcadeError::ConfigValue(format!(
                "snake playfield must be at least {0}x{0}",
                snake::STEP
            )));
        }
        if s.width % snake::STEP != 0 || s.height % snake::STEP != 0 {
            return Err(ArcadeError::ConfigValue(format!(
                "snake playfield {}x{} is not a multiple of the {}px grid",
                s.width,
                s.height,
                snake::STEP
            )));
        }

        let i = &self.invaders;
        if i.width < invaders::PLAYER_WIDTH || i.height <= invaders::PLAYER_BOTTOM_OFFSET {
            return Err(ArcadeError::ConfigValue(format!(
                "invaders playfield {}x{} cannot fit the player",
                i.width, i.height
            )));
        }

        if s.frame_ms == 0 || i.frame_ms == 0 {
            return Err(ArcadeError::ConfigValue(
                "frame_ms must be greater than zero".to_string(),
            ));
        }
        if self.scores.limit == 0 {
            return Err(ArcadeError::ConfigValue(
                "scores.limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn player_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or("")
    }

    pub fn snake_playfield(&self) -> Playfield {
        Playfield::new(self.snake.width, self.snake.height)
    }

    pub fn snake_rules(&self) -> SnakeRules {
        SnakeRules {
            reversal: self.snake.reversal,
            food: self.snake.food,
        }
    }

    pub fn invaders_playfield(&self) -> Playfield {
        Playfield::new(self.invaders.width, self.invaders.height)
    }

    pub fn frame_interval(&self, game: GameKind) -> Duration {
        let ms = match game {
            GameKind::Snake => self.snake.frame_ms,
            GameKind::SpaceInvaders => self.invaders.frame_ms,
        };
        Duration::from_millis(ms)
    }

    /// Only Space Invaders fires; Snake ignores the setting.
    pub fn fire_mode(&self) -> FireMode {
        self.invaders.fire_mode
    }
}
