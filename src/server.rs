//! Score API: actix-web routes over a shared `MemScoreStore`.

use actix_web::{
    error::InternalError,
    http::StatusCode,
    web::{self, Data, Json, Path, Query},
    HttpResponse,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::scores::{
    MemScoreStore, NewScore, ScoreRecorder, DEFAULT_GAME, DEFAULT_LIMIT, MAX_LIMIT,
};

pub const SERVICE_NAME: &str = "retro-arcade-scores";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_JSON_LIMIT_BYTES: usize = 16 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// `directives` (normally `RUST_LOG`) when they parse, `info` otherwise.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateScoreRequest {
    player_name: String,
    // Signed so a negative score is a validation failure, not a parse failure.
    score: i64,
    #[serde(default)]
    game: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct TopScoresQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    stored_scores: usize,
}

pub(crate) fn json_error(
    status: StatusCode,
    message: impl Into<String>,
    details: Option<String>,
) -> HttpResponse {
    let mut body = serde_json::json!({ "error": message.into() });
    if let Some(details) = details {
        body["details"] = serde_json::Value::String(details);
    }
    HttpResponse::build(status).json(body)
}

/// Returns the normalised score or a message describing the first problem.
pub(crate) fn validate_new_score(request: CreateScoreRequest) -> Result<NewScore, String> {
    let player_name = request.player_name.trim().to_string();
    if player_name.is_empty() {
        return Err("playerName must not be empty".to_string());
    }
    let score = u32::try_from(request.score)
        .map_err(|_| format!("score must be between 0 and {}", u32::MAX))?;
    let game = request
        .game
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| DEFAULT_GAME.to_string());
    Ok(NewScore {
        player_name,
        score,
        game,
    })
}

pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let response = json_error(
                StatusCode::BAD_REQUEST,
                "Invalid score data",
                Some(err.to_string()),
            );
            InternalError::from_response(err, response).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = json_error(
            StatusCode::BAD_REQUEST,
            "Invalid query",
            Some(err.to_string()),
        );
        InternalError::from_response(err, response).into()
    })
}

/// Register the score routes.  The store is expected as `Data<MemScoreStore>`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/scores/{game}", web::get().to(top_scores))
        .route("/api/scores", web::post().to(create_score));
}

pub(crate) async fn health(store: Data<MemScoreStore>) -> HttpResponse {
    match store.len() {
        Ok(stored_scores) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            service: SERVICE_NAME,
            stored_scores,
        }),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "score store error", None)
        }
    }
}

pub(crate) async fn top_scores(
    store: Data<MemScoreStore>,
    path: Path<String>,
    query: Query<TopScoresQuery>,
) -> HttpResponse {
    let game = path.into_inner();
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    match store.list_top_scores(&game, limit) {
        Ok(scores) => HttpResponse::Ok().json(scores),
        Err(e) => {
            tracing::error!(game = %game, "list_top_scores failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch game scores",
                None,
            )
        }
    }
}

pub(crate) async fn create_score(
    store: Data<MemScoreStore>,
    body: Json<CreateScoreRequest>,
) -> HttpResponse {
    let new_score = match validate_new_score(body.into_inner()) {
        Ok(new_score) => new_score,
        Err(msg) => {
            return json_error(StatusCode::BAD_REQUEST, "Invalid score data", Some(msg));
        }
    };

    match store.submit_score(&new_score.player_name, new_score.score, &new_score.game) {
        Ok(record) => {
            tracing::info!(
                id = %record.id,
                game = %record.game,
                score = record.score,
                "score created"
            );
            HttpResponse::Created().json(record)
        }
        Err(e) => {
            tracing::error!("submit_score failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save score",
                None,
            )
        }
    }
}
