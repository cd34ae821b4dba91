// src/http/leaderboard.rs

use actix_web::{get, web, HttpResponse};
use redis::{AsyncCommands, Client as RedisClient};
use serde::Deserialize;

use crate::arena::Arena;
use crate::config::LEADERBOARD_MAX;
use crate::error::MatchError;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

/// GET /api/users/ranks
///
/// Pages are cached in Redis for the arena's cache TTL. Ranked commits do not
/// invalidate `leaderboard:*`, so a page can lag the store by up to one TTL.
/// Any Redis failure falls through to the store.
#[get("/users/ranks")]
pub async fn leaderboard(
    arena: web::Data<Arena>,
    redis: Option<web::Data<RedisClient>>,
    web::Query(params): web::Query<LeaderboardParams>,
) -> Result<HttpResponse, MatchError> {
    let limit = params
        .limit
        .unwrap_or_else(|| arena.leaderboard_limit())
        .min(LEADERBOARD_MAX);
    let key = format!("leaderboard:{limit}");

    // 1) Try the cache
    let mut conn = match &redis {
        Some(client) => match client.get_multiplexed_async_connection().await {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("leaderboard cache unavailable: {e}");
                None
            }
        },
        None => None,
    };
    if let Some(c) = conn.as_mut() {
        if let Ok(Some(cached)) = c.get::<_, Option<String>>(&key).await {
            return Ok(HttpResponse::Ok()
                .content_type("application/json")
                .body(cached));
        }
    }

    // 2) Ask the store
    let entries = arena.leaderboard_top(limit).await?;

    // 3) Cache the serialized page
    if let Some(c) = conn.as_mut() {
        match serde_json::to_string(&entries) {
            Ok(body) => {
                let ttl = arena.leaderboard_cache_ttl();
                let written: redis::RedisResult<()> = c.set_ex(&key, &body, ttl).await;
                if let Err(e) = written {
                    log::warn!("leaderboard cache write failed: {e}");
                }
            }
            Err(e) => log::warn!("leaderboard serialization failed: {e}"),
        }
    }

    Ok(HttpResponse::Ok().json(entries))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(leaderboard);
}
