//! Casual and ranked match endpoints.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::arena::Arena;
use crate::error::MatchError;
use crate::http::auth::JwtAuth;

#[derive(Deserialize)]
pub struct CasualRequest {
    /// Opponent nickname, matched exactly.
    pub counterpart: String,
}

/// POST /api/users/select-match
#[post("/users/select-match")]
pub async fn casual_match(
    auth: JwtAuth,
    body: web::Json<CasualRequest>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, MatchError> {
    let summary = arena
        .casual_match(auth.player_id, &body.counterpart)
        .await?;
    Ok(HttpResponse::Created().json(summary))
}

/// POST /api/users/rank-match
#[post("/users/rank-match")]
pub async fn ranked_match(
    auth: JwtAuth,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, MatchError> {
    let summary = arena.ranked_match(auth.player_id).await?;
    Ok(HttpResponse::Created().json(summary))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(casual_match).service(ranked_match);
}
