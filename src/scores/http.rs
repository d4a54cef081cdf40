use std::time::Duration;

use super::{GameScore, NewScore, ScoreRecorder};
use crate::error::ScoreError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// `ScoreRecorder` backed by the score API over HTTP/JSON.  No retries.
pub struct HttpScoreClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpScoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpScoreClient {
            base_url,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn map_error(err: ureq::Error) -> ScoreError {
    match err {
        ureq::Error::Status(status, response) => ScoreError::Rejected {
            status,
            message: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ScoreError::Transport(transport.to_string()),
    }
}

impl ScoreRecorder for HttpScoreClient {
    fn submit_score(
        &self,
        player_name: &str,
        score: u32,
        game: &str,
    ) -> Result<GameScore, ScoreError> {
        let body = NewScore {
            player_name: player_name.to_string(),
            score,
            game: game.to_string(),
        };
        let response = self
            .agent
            .post(&self.url("/api/scores"))
            .send_json(&body)
            .map_err(map_error)?;
        response
            .into_json::<GameScore>()
            .map_err(|e| ScoreError::Decode(e.to_string()))
    }

    fn list_top_scores(&self, game: &str, limit: usize) -> Result<Vec<GameScore>, ScoreError> {
        let response = self
            .agent
            .get(&self.url(&format!("/api/scores/{game}")))
            .query("limit", &limit.to_string())
            .call()
            .map_err(map_error)?;
        response
            .into_json::<Vec<GameScore>>()
            .map_err(|e| ScoreError::Decode(e.to_string()))
    }
}
