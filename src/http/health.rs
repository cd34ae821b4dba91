//! Liveness / readiness check and match metrics.

use actix_web::{get, web, HttpResponse, Responder};
use redis::{AsyncCommands, Client as RedisClient};

use crate::arena::Arena;
use crate::metrics;

#[get("/healthz")]
pub async fn healthz(
    arena: web::Data<Arena>,
    redis: Option<web::Data<RedisClient>>,
) -> impl Responder {
    // Check the store
    if let Err(e) = arena.store().ping().await {
        log::warn!("health: store check failed: {e}");
        return HttpResponse::ServiceUnavailable().body("db");
    }

    // Redis is only the leaderboard cache; an outage is reported, not fatal.
    if let Some(redis) = redis {
        let reachable = match redis.get_multiplexed_async_connection().await {
            Ok(mut conn) => conn.ping::<String>().await.is_ok(),
            Err(_) => false,
        };
        if !reachable {
            log::warn!("health: redis unreachable, leaderboard served uncached");
            return HttpResponse::Ok().body("ok (redis unavailable)");
        }
    }

    HttpResponse::Ok().body("ok")
}

/// GET /api/metrics/matches
#[get("/metrics/matches")]
pub async fn match_metrics() -> impl Responder {
    match metrics::render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("metrics encoding failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz).service(match_metrics);
}
