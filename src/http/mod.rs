//! HTTP adapter over the match core.

pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod matches;
pub mod routes;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::error::{ErrorKind, MatchError};

impl ResponseError for MatchError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidScoreState => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Transaction | ErrorKind::Store => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
