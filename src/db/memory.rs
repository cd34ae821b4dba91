//! In-process store for tests and local runs.
//!
//! All tables sit behind one mutex, so a reward transaction sees and writes
//! a consistent snapshot. Grants are staged on copies of the affected rows
//! and only swapped in once every grant has been applied.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::store::{Contender, Standing, Store, StoreResult};
use crate::error::StoreError;
use crate::game::rewards::{RewardGrant, RewardTransaction};
use crate::game::types::{Agent, CurrencyAccount, OwnedAgent, Player, RankRecord, Squad};

#[derive(Debug, Default)]
struct Tables {
    agents: HashMap<i32, Agent>,
    owned: HashMap<(Uuid, i32), OwnedAgent>,
    players: HashMap<Uuid, Player>,
    ranks: HashMap<Uuid, RankRecord>,
    currency: HashMap<Uuid, CurrencyAccount>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// One-shot fault: abort the next reward transaction after this many
    /// grants have been staged.
    fail_after: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Aborted("memory store poisoned".into()))
    }

    fn seed(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn insert_agent(&self, agent: Agent) {
        self.seed().agents.insert(agent.key, agent);
    }

    pub fn insert_owned(&self, owned: OwnedAgent) {
        self.seed()
            .owned
            .insert((owned.player_id, owned.agent_key), owned);
    }

    pub fn insert_player(&self, player: Player) {
        self.seed().players.insert(player.id, player);
    }

    pub fn insert_rank(&self, rank: RankRecord) {
        self.seed().ranks.insert(rank.player_id, rank);
    }

    pub fn insert_currency(&self, account: CurrencyAccount) {
        self.seed().currency.insert(account.player_id, account);
    }

    /// Overwrite a player's squad slots and synergy.
    pub fn set_squad(&self, player: Uuid, squad: &Squad) {
        if let Some(p) = self.seed().players.get_mut(&player) {
            p.slots = squad.members.map(Some);
            p.synergy = squad.synergy.clone();
        }
    }

    pub fn rank(&self, player: Uuid) -> Option<RankRecord> {
        self.seed().ranks.get(&player).cloned()
    }

    pub fn currency(&self, player: Uuid) -> Option<CurrencyAccount> {
        self.seed().currency.get(&player).cloned()
    }

    /// Make the next reward transaction fail once `grants` grants are staged.
    pub fn fail_next_commit_after(&self, grants: usize) {
        *self.fail_after.lock().unwrap_or_else(|p| p.into_inner()) = Some(grants);
    }

    fn take_fault(&self) -> Option<usize> {
        self.fail_after
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
    }
}

fn stage(
    ranks: &mut HashMap<Uuid, RankRecord>,
    currency: &mut HashMap<Uuid, CurrencyAccount>,
    grant: &RewardGrant,
    floor: Option<i32>,
) -> StoreResult<()> {
    let rank = ranks.get_mut(&grant.player_id).ok_or(StoreError::MissingRow {
        table: "ranks",
        player: grant.player_id,
    })?;
    rank.win_count += grant.rank.wins;
    rank.lose_count += grant.rank.losses;
    rank.draw_count += grant.rank.draws;
    let mmr = rank.mmr.saturating_add(grant.rank.mmr);
    rank.mmr = floor.map_or(mmr, |f| mmr.max(f));

    let account = currency
        .get_mut(&grant.player_id)
        .ok_or(StoreError::MissingRow {
            table: "assets",
            player: grant.player_id,
        })?;
    account.cash += grant.currency.cash;
    account.enhancer += grant.currency.enhancer;
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_agent(&self, key: i32) -> StoreResult<Option<Agent>> {
        Ok(self.tables()?.agents.get(&key).cloned())
    }

    async fn find_owned_agent(&self, player: Uuid, key: i32) -> StoreResult<Option<OwnedAgent>> {
        Ok(self.tables()?.owned.get(&(player, key)).cloned())
    }

    async fn find_player(&self, id: Uuid) -> StoreResult<Option<Player>> {
        Ok(self.tables()?.players.get(&id).cloned())
    }

    async fn find_player_by_nickname(&self, nickname: &str) -> StoreResult<Option<Player>> {
        Ok(self
            .tables()?
            .players
            .values()
            .find(|p| p.nickname == nickname)
            .cloned())
    }

    async fn find_rank(&self, player: Uuid) -> StoreResult<Option<RankRecord>> {
        Ok(self.tables()?.ranks.get(&player).cloned())
    }

    async fn find_currency(&self, player: Uuid) -> StoreResult<Option<CurrencyAccount>> {
        Ok(self.tables()?.currency.get(&player).cloned())
    }

    async fn players_in_mmr_window(&self, lo: i32, hi: i32) -> StoreResult<Vec<Contender>> {
        let t = self.tables()?;
        let window = t
            .ranks
            .values()
            .filter(|r| (lo..=hi).contains(&r.mmr))
            .filter_map(|r| {
                t.players.get(&r.player_id).map(|p| Contender {
                    player: p.clone(),
                    mmr: r.mmr,
                })
            })
            .collect();
        Ok(window)
    }

    async fn top_standings(&self, limit: usize) -> StoreResult<Vec<Standing>> {
        let t = self.tables()?;
        let mut rows: Vec<Standing> = t
            .ranks
            .values()
            .filter_map(|r| {
                let p = t.players.get(&r.player_id)?;
                Some(Standing {
                    nickname: p.nickname.clone(),
                    favorite_agent: p
                        .favorite_agent
                        .and_then(|k| t.agents.get(&k))
                        .map(|a| a.name.clone()),
                    mmr: r.mmr,
                    win_count: r.win_count,
                    lose_count: r.lose_count,
                    draw_count: r.draw_count,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.mmr
                .cmp(&a.mmr)
                .then(a.lose_count.cmp(&b.lose_count))
                .then_with(|| a.nickname.cmp(&b.nickname))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    async fn apply_rewards(&self, tx: &RewardTransaction) -> StoreResult<()> {
        let fault = self.take_fault();
        let mut t = self.tables()?;

        let mut ranks: HashMap<Uuid, RankRecord> = HashMap::new();
        let mut currency: HashMap<Uuid, CurrencyAccount> = HashMap::new();
        for player in tx.players() {
            if let Some(r) = t.ranks.get(&player) {
                ranks.insert(player, r.clone());
            }
            if let Some(c) = t.currency.get(&player) {
                currency.insert(player, c.clone());
            }
        }

        for (i, grant) in tx.lock_order().into_iter().enumerate() {
            stage(&mut ranks, &mut currency, grant, tx.mmr_floor)?;
            if fault == Some(i + 1) {
                return Err(StoreError::Aborted(format!(
                    "injected failure after {} grant(s)",
                    i + 1
                )));
            }
        }

        t.ranks.extend(ranks);
        t.currency.extend(currency);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.tables().map(|_| ())
    }
}
