use std::env;

use actix_web::{middleware, web, App, HttpServer};

use retro_arcade::scores::MemScoreStore;
use retro_arcade::server::{
    json_config, log_filter, query_config, routes, DEFAULT_BIND_ADDR, DEFAULT_JSON_LIMIT_BYTES,
};

fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .init();

    let bind_addr =
        env::var("SCORE_API_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let json_limit = read_env_usize("SCORE_API_JSON_LIMIT_BYTES", DEFAULT_JSON_LIMIT_BYTES);

    tracing::info!(
        "starting score api: bind_addr={} json_limit={}",
        bind_addr,
        json_limit
    );

    let store = web::Data::new(MemScoreStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(json_config(json_limit))
            .app_data(query_config())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
