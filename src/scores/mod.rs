//! Score recording: the record type, the recorder seam and the end-of-session
//! handoff.  Simulations never persist anything themselves; they only decide
//! when to call a `ScoreRecorder`.

mod http;
mod memory;

pub use http::HttpScoreClient;
pub use memory::MemScoreStore;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{GameKind, Terminal};
use crate::error::ScoreError;

pub const DEFAULT_GAME: &str = "snake";
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// A persisted score as exchanged with the score API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    pub id: Uuid,
    pub player_name: String,
    pub game: String,
    pub score: u32,
    /// Unix milliseconds.
    pub created_at: u64,
}

/// Body of `POST /api/scores`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub player_name: String,
    pub score: u32,
    pub game: String,
}

pub trait ScoreRecorder {
    fn submit_score(
        &self,
        player_name: &str,
        score: u32,
        game: &str,
    ) -> Result<GameScore, ScoreError>;

    /// Highest first; equal scores keep submission order.
    fn list_top_scores(&self, game: &str, limit: usize) -> Result<Vec<GameScore>, ScoreError>;
}

pub(crate) fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}

/// Hand a finished session's score to the recorder.
///
/// Nothing is submitted, and the recorder is never called, when the score
/// is zero or the trimmed player name is empty; that is `Ok(None)`, not an
/// error.
pub fn record_final_score<R: ScoreRecorder + ?Sized>(
    recorder: &R,
    player_name: &str,
    game: GameKind,
    terminal: &Terminal,
) -> Result<Option<GameScore>, ScoreError> {
    let name = player_name.trim();
    if terminal.final_score == 0 || name.is_empty() {
        tracing::debug!(
            game = %game,
            score = terminal.final_score,
            "score discarded (zero score or no player name)"
        );
        return Ok(None);
    }

    let record = recorder.submit_score(name, terminal.final_score, game.as_str())?;
    tracing::info!(
        game = %game,
        player = %record.player_name,
        score = record.score,
        id = %record.id,
        "score recorded"
    );
    Ok(Some(record))
}
