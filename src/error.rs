use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    ConfigValue(String),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("game must not be empty")]
    EmptyGame,

    #[error("score api unreachable: {0}")]
    Transport(String),

    #[error("score api rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("score api returned an unreadable body: {0}")]
    Decode(String),

    #[error("score store lock poisoned")]
    Poisoned,
}
