//! Casual and ranked match flows plus the read-only leaderboard.
//!
//! Both flows load the requester, check squads, score both sides and roll
//! the outcome. Only the ranked flow touches persisted state, through the
//! [`RewardLedger`].

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::{Settings, LEADERBOARD_MAX};
use crate::db::store::Store;
use crate::error::MatchError;
use crate::game::dice::Dice;
use crate::game::outcome;
use crate::game::rewards::{RewardGrant, RewardLedger};
use crate::game::scoring::{squad_score, SquadMember};
use crate::game::types::{MatchKind, Outcome, Player, Squad};
use crate::matchmaking::MatchmakingPool;
use crate::metrics;

/// What the requester gets back after a match.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MatchSummary {
    pub kind: MatchKind,
    pub opponent: String,
    pub my_score: u64,
    pub opponent_score: u64,
    pub win_prob: u32,
    pub outcome: Outcome,
    /// Requester's committed rewards; ranked matches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardGrant>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub nickname: String,
    pub favorite_agent: String,
    pub mmr: i32,
    /// Integer percent.
    pub win_rate: u32,
    /// `"wins / losses / draws"`.
    pub record: String,
}

/// Name shown when a player has not picked a favourite agent.
pub const UNSET_FAVORITE: &str = "unset";

/// `round(100 * wins / games)`, or 0 before the first game.
pub fn win_rate(wins: i32, losses: i32, draws: i32) -> u32 {
    let games = i64::from(wins) + i64::from(losses) + i64::from(draws);
    if games <= 0 || wins <= 0 {
        return 0;
    }
    (wins as f64 / games as f64 * 100.0).round().clamp(0.0, 100.0) as u32
}

#[derive(Clone)]
pub struct Arena {
    store: Arc<dyn Store>,
    dice: Arc<dyn Dice>,
    pool: MatchmakingPool,
    ledger: RewardLedger,
    leaderboard_limit: usize,
    leaderboard_cache_ttl: u64,
}

impl Arena {
    pub fn new(store: Arc<dyn Store>, dice: Arc<dyn Dice>, settings: &Settings) -> Self {
        Arena {
            pool: MatchmakingPool::new(store.clone(), dice.clone(), settings.mmr_window),
            ledger: RewardLedger::new(store.clone(), settings.mmr_floor),
            leaderboard_limit: settings.leaderboard_limit,
            leaderboard_cache_ttl: settings.leaderboard_cache_ttl,
            store,
            dice,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn leaderboard_limit(&self) -> usize {
        self.leaderboard_limit
    }

    /// Seconds a cached leaderboard page stays valid.
    pub fn leaderboard_cache_ttl(&self) -> u64 {
        self.leaderboard_cache_ttl
    }

    /// Friendly match against a named player. Never writes.
    pub async fn casual_match(
        &self,
        requester: Uuid,
        opponent_nickname: &str,
    ) -> Result<MatchSummary, MatchError> {
        let result = self.casual(requester, opponent_nickname).await;
        observe(MatchKind::Casual, &result);
        result
    }

    /// Ranked match against a random opponent near the requester's mmr.
    pub async fn ranked_match(&self, requester: Uuid) -> Result<MatchSummary, MatchError> {
        let result = self.ranked(requester).await;
        observe(MatchKind::Ranked, &result);
        result
    }

    /// Top `n` players (capped at [`LEADERBOARD_MAX`]).
    pub async fn leaderboard_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, MatchError> {
        let rows = self.store.top_standings(n.min(LEADERBOARD_MAX)).await?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, s)| LeaderboardEntry {
                rank: i + 1,
                nickname: s.nickname,
                favorite_agent: s
                    .favorite_agent
                    .unwrap_or_else(|| UNSET_FAVORITE.to_string()),
                mmr: s.mmr,
                win_rate: win_rate(s.win_count, s.lose_count, s.draw_count),
                record: format!("{} / {} / {}", s.win_count, s.lose_count, s.draw_count),
            })
            .collect())
    }

    async fn casual(&self, requester: Uuid, nickname: &str) -> Result<MatchSummary, MatchError> {
        let (me, my_squad) = self.requester(requester).await?;

        let opponent = self
            .store
            .find_player_by_nickname(nickname)
            .await?
            .ok_or_else(|| MatchError::OpponentNotFound {
                nickname: nickname.to_string(),
            })?;
        if opponent.id == me.id {
            return Err(MatchError::SelfMatch {
                nickname: nickname.to_string(),
            });
        }
        let their_squad = opponent
            .squad()
            .ok_or_else(|| MatchError::OpponentSquadIncomplete {
                nickname: opponent.nickname.clone(),
            })?;

        let my_score = self.power(me.id, &my_squad).await?;
        let opponent_score = self.power(opponent.id, &their_squad).await?;
        let verdict = outcome::resolve(my_score, opponent_score, self.dice.as_ref())?;

        log::debug!(
            "casual {} vs {}: {my_score} vs {opponent_score}, p={} roll={} -> {}",
            me.nickname,
            opponent.nickname,
            verdict.win_prob,
            verdict.roll,
            verdict.outcome.label()
        );

        Ok(MatchSummary {
            kind: MatchKind::Casual,
            opponent: opponent.nickname,
            my_score,
            opponent_score,
            win_prob: verdict.win_prob,
            outcome: verdict.outcome,
            rewards: None,
        })
    }

    async fn ranked(&self, requester: Uuid) -> Result<MatchSummary, MatchError> {
        let (me, my_squad) = self.requester(requester).await?;

        let rank = self
            .store
            .find_rank(me.id)
            .await?
            .ok_or_else(|| MatchError::missing("rank", me.id))?;
        self.store
            .find_currency(me.id)
            .await?
            .ok_or_else(|| MatchError::missing("currency", me.id))?;

        let contender = self.pool.find_opponent(me.id, rank.mmr).await?;
        let opponent = contender.player;
        // The pool only hands out complete squads.
        let their_squad = opponent
            .squad()
            .ok_or_else(|| MatchError::OpponentSquadIncomplete {
                nickname: opponent.nickname.clone(),
            })?;

        let my_score = self.power(me.id, &my_squad).await?;
        let opponent_score = self.power(opponent.id, &their_squad).await?;
        let verdict = outcome::resolve(my_score, opponent_score, self.dice.as_ref())?;

        log::debug!(
            "ranked {} ({}) vs {} ({}): {my_score} vs {opponent_score}, p={} roll={} -> {}",
            me.nickname,
            rank.mmr,
            opponent.nickname,
            contender.mmr,
            verdict.win_prob,
            verdict.roll,
            verdict.outcome.label()
        );

        let committed = self.ledger.settle(me.id, opponent.id, verdict.outcome).await?;

        Ok(MatchSummary {
            kind: MatchKind::Ranked,
            opponent: opponent.nickname,
            my_score,
            opponent_score,
            win_prob: verdict.win_prob,
            outcome: verdict.outcome,
            rewards: committed.grant_for(me.id).copied(),
        })
    }

    async fn requester(&self, id: Uuid) -> Result<(Player, Squad), MatchError> {
        let me = self
            .store
            .find_player(id)
            .await?
            .ok_or(MatchError::RequesterNotFound { player: id })?;
        let squad = me
            .squad()
            .ok_or(MatchError::SquadIncomplete { player: id })?;
        Ok((me, squad))
    }

    /// Resolve each squad slot to its template stats and upgrade tiers.
    async fn lineup(&self, player: Uuid, squad: &Squad) -> Result<Vec<SquadMember>, MatchError> {
        let mut members = Vec::with_capacity(squad.members.len());
        for key in squad.members {
            let agent = self
                .store
                .find_agent(key)
                .await?
                .ok_or_else(|| MatchError::missing("agent", key))?;
            let owned = self
                .store
                .find_owned_agent(player, key)
                .await?
                .ok_or_else(|| MatchError::missing("owned agent", format!("{player}/{key}")))?;
            members.push(SquadMember {
                role: agent.role,
                stats: agent.stats,
                enhancement_level: owned.enhancement_level,
                breakthrough_class: owned.breakthrough_class,
            });
        }
        Ok(members)
    }

    async fn power(&self, player: Uuid, squad: &Squad) -> Result<u64, MatchError> {
        let members = self.lineup(player, squad).await?;
        Ok(squad_score(&members, squad.has_synergy()))
    }
}

fn observe(kind: MatchKind, result: &Result<MatchSummary, MatchError>) {
    match result {
        Ok(summary) => metrics::record_match(kind, summary.outcome),
        Err(e) => {
            log::debug!("{} match rejected: {e}", kind.label());
            metrics::record_failure(kind, e.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_rate_rounds_and_handles_no_games() {
        assert_eq!(win_rate(0, 0, 0), 0);
        assert_eq!(win_rate(1, 1, 1), 33);
        assert_eq!(win_rate(2, 1, 0), 67);
        assert_eq!(win_rate(5, 0, 0), 100);
    }
}
