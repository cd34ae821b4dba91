//! Persistence port used by the match core.
//!
//! Implementations: [`PgStore`](crate::db::pg::PgStore) for production and
//! [`MemoryStore`](crate::db::memory::MemoryStore) for tests and local runs.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::game::rewards::RewardTransaction;
use crate::game::types::{Agent, CurrencyAccount, OwnedAgent, Player, RankRecord};

pub type StoreResult<T> = Result<T, StoreError>;

/// A player inside a ranked mmr window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contender {
    pub player: Player,
    pub mmr: i32,
}

/// One leaderboard row as stored, before presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub nickname: String,
    pub favorite_agent: Option<String>,
    pub mmr: i32,
    pub win_count: i32,
    pub lose_count: i32,
    pub draw_count: i32,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_agent(&self, key: i32) -> StoreResult<Option<Agent>>;

    async fn find_owned_agent(&self, player: Uuid, key: i32) -> StoreResult<Option<OwnedAgent>>;

    async fn find_player(&self, id: Uuid) -> StoreResult<Option<Player>>;

    /// Exact, case-sensitive nickname lookup.
    async fn find_player_by_nickname(&self, nickname: &str) -> StoreResult<Option<Player>>;

    async fn find_rank(&self, player: Uuid) -> StoreResult<Option<RankRecord>>;

    async fn find_currency(&self, player: Uuid) -> StoreResult<Option<CurrencyAccount>>;

    /// Every player whose mmr lies in `lo..=hi`, unfiltered.
    async fn players_in_mmr_window(&self, lo: i32, hi: i32) -> StoreResult<Vec<Contender>>;

    /// Top `limit` rank rows by mmr descending, then losses ascending.
    async fn top_standings(&self, limit: usize) -> StoreResult<Vec<Standing>>;

    /// Apply every grant as field-level increments, all or nothing.
    async fn apply_rewards(&self, tx: &RewardTransaction) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}
