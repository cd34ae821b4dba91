//! Ranked-match reward table and the ledger that commits it.
//!
//! | outcome   | rank                  | currency                      |
//! |-----------|-----------------------|-------------------------------|
//! | winner    | win +1, mmr +50       | enhancer +10, cash +50 000    |
//! | loser     | loss +1, mmr -20      | enhancer +2,  cash +10 000    |
//! | draw/each | draw +1, mmr +5       | enhancer +5,  cash +30 000    |
//!
//! The loser's mmr is clamped by the store at the configured floor; the
//! delta itself is always the table value.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::db::store::Store;
use crate::error::{MatchError, StoreError};
use crate::game::types::Outcome;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankDelta {
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub mmr: i32,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurrencyDelta {
    pub cash: i64,
    pub enhancer: i64,
}

/// Increments for one player's rank and currency rows.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RewardGrant {
    pub player_id: Uuid,
    pub rank: RankDelta,
    pub currency: CurrencyDelta,
}

impl RewardGrant {
    pub fn win(player_id: Uuid) -> Self {
        RewardGrant {
            player_id,
            rank: RankDelta {
                wins: 1,
                mmr: 50,
                ..RankDelta::default()
            },
            currency: CurrencyDelta {
                cash: 50_000,
                enhancer: 10,
            },
        }
    }

    pub fn loss(player_id: Uuid) -> Self {
        RewardGrant {
            player_id,
            rank: RankDelta {
                losses: 1,
                mmr: -20,
                ..RankDelta::default()
            },
            currency: CurrencyDelta {
                cash: 10_000,
                enhancer: 2,
            },
        }
    }

    pub fn draw(player_id: Uuid) -> Self {
        RewardGrant {
            player_id,
            rank: RankDelta {
                draws: 1,
                mmr: 5,
                ..RankDelta::default()
            },
            currency: CurrencyDelta {
                cash: 30_000,
                enhancer: 5,
            },
        }
    }
}

/// Everything one ranked match writes, committed as a single unit.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RewardTransaction {
    /// Applied in order; a failure on either rolls back both.
    pub grants: [RewardGrant; 2],
    /// Lowest mmr any grant may leave behind.
    pub mmr_floor: Option<i32>,
}

impl RewardTransaction {
    /// The bundle for a match between `me` and `opponent`, seen from `me`.
    pub fn for_outcome(me: Uuid, opponent: Uuid, outcome: Outcome, mmr_floor: Option<i32>) -> Self {
        let grants = match outcome {
            Outcome::Win => [RewardGrant::win(me), RewardGrant::loss(opponent)],
            Outcome::Lose => [RewardGrant::win(opponent), RewardGrant::loss(me)],
            Outcome::Draw => [RewardGrant::draw(me), RewardGrant::draw(opponent)],
        };
        RewardTransaction { grants, mmr_floor }
    }

    pub fn players(&self) -> [Uuid; 2] {
        [self.grants[0].player_id, self.grants[1].player_id]
    }

    pub fn grant_for(&self, player: Uuid) -> Option<&RewardGrant> {
        self.grants.iter().find(|g| g.player_id == player)
    }

    /// Grants ordered by player id. Stores apply them in this order so two
    /// transactions over the same pair always lock rows in the same order.
    pub fn lock_order(&self) -> [&RewardGrant; 2] {
        let [a, b] = &self.grants;
        if a.player_id <= b.player_id {
            [a, b]
        } else {
            [b, a]
        }
    }
}

/// Applies ranked rewards through the store's atomic transaction.
#[derive(Clone)]
pub struct RewardLedger {
    store: Arc<dyn Store>,
    mmr_floor: Option<i32>,
}

impl RewardLedger {
    pub fn new(store: Arc<dyn Store>, mmr_floor: Option<i32>) -> Self {
        RewardLedger { store, mmr_floor }
    }

    /// Commit the rewards for `outcome` and return what was written.
    pub async fn settle(
        &self,
        me: Uuid,
        opponent: Uuid,
        outcome: Outcome,
    ) -> Result<RewardTransaction, MatchError> {
        if me == opponent {
            return Err(MatchError::Transaction(StoreError::Aborted(format!(
                "player {me} cannot be rewarded against themselves"
            ))));
        }

        let tx = RewardTransaction::for_outcome(me, opponent, outcome, self.mmr_floor);
        match self.store.apply_rewards(&tx).await {
            Ok(()) => {
                log::info!(
                    "rewards committed: {} {} vs {} (floor {:?})",
                    me,
                    outcome.label(),
                    opponent,
                    self.mmr_floor
                );
                Ok(tx)
            }
            Err(e) => {
                log::error!("reward transaction for {me} vs {opponent} rolled back: {e}");
                Err(MatchError::Transaction(e))
            }
        }
    }
}
