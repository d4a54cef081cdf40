pub mod config;
pub mod display;
pub mod driver;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod invaders;
pub mod render;
pub mod scores;
pub mod server;
pub mod session;
pub mod snake;

pub use error::{ArcadeError, ScoreError};
