use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use arena_server::{
    arena::Arena, cache::AgentCatalog, config::settings, db::pg::PgStore, game::dice::ThreadDice,
    http, metrics,
};
use redis::Client as RedisClient;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::{env, sync::Arc};
use tokio_retry::{strategy::ExponentialBackoff, Retry};

/// Connect to Postgres, retrying with backoff while the database comes up.
async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let strategy = ExponentialBackoff::from_millis(100).max_delay(std::time::Duration::from_secs(5)).take(6);
    Retry::spawn(strategy, || async {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                log::warn!("postgres not ready: {e}");
                e
            })
    })
    .await
    .context("failed to create Postgres pool")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
    let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());
    let max_connections = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(5);
    if env::var("JWT_SECRET").is_err() {
        log::warn!("JWT_SECRET is not set; every authenticated request will be rejected");
    }
    let cfg = settings();
    log::info!("starting arena server with {cfg:?}");

    // Postgres pool
    let db_pool = connect(&database_url, max_connections).await?;

    // Redis client (leaderboard cache)
    let redis_client = RedisClient::open(redis_url.as_str()).context("invalid REDIS_URL")?;

    // Warm the agent catalogue
    let catalog = Arc::new(AgentCatalog::new());
    match catalog.warm(&db_pool).await {
        Ok(n) => log::info!("agent catalogue warmed with {n} templates"),
        Err(e) => log::warn!("agent catalogue warm-up failed: {e:?}"),
    }

    let store = Arc::new(PgStore::new(db_pool, catalog, cfg.store_timeout));
    let arena = Arena::new(store, Arc::new(ThreadDice), cfg);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(arena.clone()))
            .app_data(web::Data::new(redis_client.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {server_addr}"))?
    .run()
    .await
    .context("server error")
}
