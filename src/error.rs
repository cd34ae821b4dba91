//! Error types shared by the store, the match core and the HTTP layer.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by a [`Store`](crate::db::store::Store) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store call exceeded {0:?}")]
    Timeout(std::time::Duration),

    #[error("no {table} row for player {player}")]
    MissingRow { table: &'static str, player: Uuid },

    #[error("corrupt {table} row: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("transaction aborted: {0}")]
    Aborted(String),
}

/// Why a proposed lineup cannot become a squad.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormationError {
    #[error("a squad needs exactly 3 agents, got {0}")]
    WrongSize(usize),

    #[error("agent {agent_key} is not owned by this player")]
    NotOwned { agent_key: i32 },

    #[error("agent {agent_key} appears more than once")]
    Duplicate { agent_key: i32 },

    #[error("a squad needs at least one tanker")]
    NoTanker,
}

/// Coarse classification used for logging, metrics and HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidScoreState,
    Transaction,
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidScoreState => "invalid_score_state",
            ErrorKind::Transaction => "transaction",
            ErrorKind::Store => "store",
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("player {player} has no fully formed squad")]
    SquadIncomplete { player: Uuid },

    #[error("opponent `{nickname}` has no fully formed squad")]
    OpponentSquadIncomplete { nickname: String },

    #[error("cannot start a match against yourself (`{nickname}`)")]
    SelfMatch { nickname: String },

    #[error("requesting player {player} does not exist")]
    RequesterNotFound { player: Uuid },

    #[error("no player named `{nickname}`")]
    OpponentNotFound { nickname: String },

    #[error("no eligible opponent within {window} of mmr {mmr}")]
    NoOpponentAvailable { mmr: i32, window: i32 },

    #[error("missing {what} record `{key}`")]
    MissingRecord { what: &'static str, key: String },

    #[error("win probability undefined for scores {my_score} vs {opponent_score}")]
    InvalidScoreState { my_score: u64, opponent_score: u64 },

    #[error("reward transaction failed: {0}")]
    Transaction(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::SquadIncomplete { .. }
            | MatchError::OpponentSquadIncomplete { .. }
            | MatchError::SelfMatch { .. } => ErrorKind::Validation,
            MatchError::RequesterNotFound { .. }
            | MatchError::OpponentNotFound { .. }
            | MatchError::NoOpponentAvailable { .. }
            | MatchError::MissingRecord { .. } => ErrorKind::NotFound,
            MatchError::InvalidScoreState { .. } => ErrorKind::InvalidScoreState,
            MatchError::Transaction(_) => ErrorKind::Transaction,
            MatchError::Store(_) => ErrorKind::Store,
        }
    }

    pub(crate) fn missing(what: &'static str, key: impl ToString) -> Self {
        MatchError::MissingRecord {
            what,
            key: key.to_string(),
        }
    }
}
