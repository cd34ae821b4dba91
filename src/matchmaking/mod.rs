//! Ranked opponent selection.
//!
//! The pool is every player whose mmr sits within `window` points of the
//! requester's, minus the requester and anyone without a full squad. One
//! opponent is drawn uniformly from what is left.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::store::{Contender, Store};
use crate::error::MatchError;
use crate::game::dice::Dice;

/// Drop the requester and unformed squads from a raw mmr window.
///
/// The result is ordered by (mmr, id) so a seeded or scripted pick lands on
/// the same player whatever order the store returned rows in.
pub fn eligible(requester: Uuid, window: Vec<Contender>) -> Vec<Contender> {
    let mut pool: Vec<Contender> = window
        .into_iter()
        .filter(|c| c.player.id != requester && c.player.squad_complete())
        .collect();
    pool.sort_by(|a, b| a.mmr.cmp(&b.mmr).then(a.player.id.cmp(&b.player.id)));
    pool
}

#[derive(Clone)]
pub struct MatchmakingPool {
    store: Arc<dyn Store>,
    dice: Arc<dyn Dice>,
    window: i32,
}

impl MatchmakingPool {
    pub fn new(store: Arc<dyn Store>, dice: Arc<dyn Dice>, window: i32) -> Self {
        MatchmakingPool {
            store,
            dice,
            window: window.max(0),
        }
    }

    pub fn window(&self) -> i32 {
        self.window
    }

    /// Inclusive mmr bounds searched for `mmr`.
    pub fn bounds(&self, mmr: i32) -> (i32, i32) {
        (mmr.saturating_sub(self.window), mmr.saturating_add(self.window))
    }

    /// Pick a ranked opponent for `requester` at `mmr`.
    pub async fn find_opponent(&self, requester: Uuid, mmr: i32) -> Result<Contender, MatchError> {
        let (lo, hi) = self.bounds(mmr);
        let raw = self.store.players_in_mmr_window(lo, hi).await?;
        let scanned = raw.len();

        let mut pool = eligible(requester, raw);
        if pool.is_empty() {
            log::debug!("no opponent for {requester}: {scanned} in [{lo}, {hi}], none eligible");
            return Err(MatchError::NoOpponentAvailable {
                mmr,
                window: self.window,
            });
        }

        let idx = self.dice.pick(pool.len()).min(pool.len() - 1);
        let opponent = pool.swap_remove(idx);
        log::debug!(
            "matched {requester} ({mmr}) with {} ({}) out of {} eligible",
            opponent.player.id,
            opponent.mmr,
            pool.len() + 1
        );
        Ok(opponent)
    }
}
