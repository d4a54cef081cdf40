use std::sync::Mutex;

use uuid::Uuid;

use super::{now_unix_ms, GameScore, ScoreRecorder};
use crate::error::ScoreError;

/// Process-lifetime score table.  Backs the score server and the terminal
/// arcade when no score API is configured.
#[derive(Debug, Default)]
pub struct MemScoreStore {
    // Insertion order is submission order, which breaks score ties.
    scores: Mutex<Vec<GameScore>>,
}

impl MemScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, ScoreError> {
        Ok(self.scores.lock().map_err(|_| ScoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ScoreError> {
        Ok(self.len()? == 0)
    }
}

impl ScoreRecorder for MemScoreStore {
    fn submit_score(
        &self,
        player_name: &str,
        score: u32,
        game: &str,
    ) -> Result<GameScore, ScoreError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(ScoreError::EmptyPlayerName);
        }
        let game = game.trim();
        if game.is_empty() {
            return Err(ScoreError::EmptyGame);
        }

        let record = GameScore {
            id: Uuid::new_v4(),
            player_name: player_name.to_string(),
            game: game.to_string(),
            score,
            created_at: now_unix_ms(),
        };
        self.scores
            .lock()
            .map_err(|_| ScoreError::Poisoned)?
            .push(record.clone());
        Ok(record)
    }

    fn list_top_scores(&self, game: &str, limit: usize) -> Result<Vec<GameScore>, ScoreError> {
        let scores = self.scores.lock().map_err(|_| ScoreError::Poisoned)?;
        let mut matching: Vec<GameScore> =
            scores.iter().filter(|s| s.game == game).cloned().collect();
        // sort_by is stable, so ties stay in submission order.
        matching.sort_by(|a, b| b.score.cmp(&a.score));
        matching.truncate(limit);
        Ok(matching)
    }
}
