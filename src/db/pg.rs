//! Postgres-backed [`Store`].
//!
//! Every call is bounded by the configured timeout. Reward grants run as
//! `col = col + $n` updates inside one READ COMMITTED transaction, in
//! player-id order so concurrent matches over one pair cannot deadlock. When the
//! timeout fires mid-transaction the future is dropped and sqlx rolls the
//! transaction back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::cache::AgentCatalog;
use crate::db::models::{
    AgentRow, AssetRow, ContenderRow, OwnedAgentRow, PlayerRow, RankRow, StandingRow,
};
use crate::db::store::{Contender, Standing, Store, StoreResult};
use crate::error::StoreError;
use crate::game::rewards::{RewardGrant, RewardTransaction};
use crate::game::types::{Agent, CurrencyAccount, OwnedAgent, Player, RankRecord};

const PLAYER_COLUMNS: &str =
    "p.id, p.nickname, p.squad_mem1, p.squad_mem2, p.squad_mem3, p.synergy, p.favorite_agent, p.created_at";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
    agents: Arc<AgentCatalog>,
    timeout: Duration,
}

impl PgStore {
    pub fn new(db: PgPool, agents: Arc<AgentCatalog>, timeout: Duration) -> Self {
        PgStore {
            db,
            agents,
            timeout,
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    async fn commit(&self, tx: &RewardTransaction) -> StoreResult<()> {
        let mut conn = self.db.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *conn)
            .await?;

        for grant in tx.lock_order() {
            apply_grant(&mut conn, grant, tx.mmr_floor).await?;
        }

        conn.commit().await?;
        Ok(())
    }
}

/// Increment one player's rank and asset rows. Both must exist.
async fn apply_grant(
    conn: &mut Transaction<'static, Postgres>,
    grant: &RewardGrant,
    floor: Option<i32>,
) -> StoreResult<()> {
    // GREATEST ignores a NULL floor, leaving mmr unbounded.
    let ranked = sqlx::query(
        r#"UPDATE ranks
              SET win_count  = win_count  + $2,
                  lose_count = lose_count + $3,
                  draw_count = draw_count + $4,
                  mmr        = GREATEST($6, mmr + $5)
            WHERE player_id = $1"#,
    )
    .bind(grant.player_id)
    .bind(grant.rank.wins)
    .bind(grant.rank.losses)
    .bind(grant.rank.draws)
    .bind(grant.rank.mmr)
    .bind(floor)
    .execute(&mut **conn)
    .await?
    .rows_affected();

    if ranked != 1 {
        return Err(StoreError::MissingRow {
            table: "ranks",
            player: grant.player_id,
        });
    }

    let credited = sqlx::query(
        r#"UPDATE assets
              SET cash     = cash     + $2,
                  enhancer = enhancer + $3
            WHERE player_id = $1"#,
    )
    .bind(grant.player_id)
    .bind(grant.currency.cash)
    .bind(grant.currency.enhancer)
    .execute(&mut **conn)
    .await?
    .rows_affected();

    if credited != 1 {
        return Err(StoreError::MissingRow {
            table: "assets",
            player: grant.player_id,
        });
    }
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn find_agent(&self, key: i32) -> StoreResult<Option<Agent>> {
        if let Some(agent) = self.agents.get(key) {
            return Ok(Some(agent));
        }

        let row = self
            .bounded(async {
                sqlx::query_as::<_, AgentRow>(
                    r#"SELECT agent_key, name, team, position, grade, ad, ap, hp, mp, def, crit
                         FROM agents
                        WHERE agent_key = $1"#,
                )
                .bind(key)
                .fetch_optional(&self.db)
                .await
                .map_err(StoreError::from)
            })
            .await?;

        match row {
            Some(r) => {
                let agent = Agent::try_from(r)?;
                self.agents.insert(agent.clone());
                Ok(Some(agent))
            }
            None => Ok(None),
        }
    }

    async fn find_owned_agent(&self, player: Uuid, key: i32) -> StoreResult<Option<OwnedAgent>> {
        let row = self
            .bounded(async {
                sqlx::query_as::<_, OwnedAgentRow>(
                    r#"SELECT player_id, agent_key, level, class
                         FROM owned_agents
                        WHERE player_id = $1 AND agent_key = $2"#,
                )
                .bind(player)
                .bind(key)
                .fetch_optional(&self.db)
                .await
                .map_err(StoreError::from)
            })
            .await?;
        row.map(OwnedAgent::try_from).transpose()
    }

    async fn find_player(&self, id: Uuid) -> StoreResult<Option<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.id = $1");
        let row = self
            .bounded(async {
                sqlx::query_as::<_, PlayerRow>(&sql)
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await
                    .map_err(StoreError::from)
            })
            .await?;
        Ok(row.map(Player::from))
    }

    async fn find_player_by_nickname(&self, nickname: &str) -> StoreResult<Option<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.nickname = $1");
        let row = self
            .bounded(async {
                sqlx::query_as::<_, PlayerRow>(&sql)
                    .bind(nickname)
                    .fetch_optional(&self.db)
                    .await
                    .map_err(StoreError::from)
            })
            .await?;
        Ok(row.map(Player::from))
    }

    async fn find_rank(&self, player: Uuid) -> StoreResult<Option<RankRecord>> {
        let row = self
            .bounded(async {
                sqlx::query_as::<_, RankRow>(
                    r#"SELECT player_id, mmr, win_count, lose_count, draw_count
                         FROM ranks
                        WHERE player_id = $1"#,
                )
                .bind(player)
                .fetch_optional(&self.db)
                .await
                .map_err(StoreError::from)
            })
            .await?;
        Ok(row.map(RankRecord::from))
    }

    async fn find_currency(&self, player: Uuid) -> StoreResult<Option<CurrencyAccount>> {
        let row = self
            .bounded(async {
                sqlx::query_as::<_, AssetRow>(
                    "SELECT player_id, cash, enhancer FROM assets WHERE player_id = $1",
                )
                .bind(player)
                .fetch_optional(&self.db)
                .await
                .map_err(StoreError::from)
            })
            .await?;
        Ok(row.map(CurrencyAccount::from))
    }

    async fn players_in_mmr_window(&self, lo: i32, hi: i32) -> StoreResult<Vec<Contender>> {
        let sql = format!(
            "SELECT {PLAYER_COLUMNS}, r.mmr
               FROM ranks r
               JOIN players p ON p.id = r.player_id
              WHERE r.mmr BETWEEN $1 AND $2"
        );
        let rows = self
            .bounded(async {
                sqlx::query_as::<_, ContenderRow>(&sql)
                    .bind(lo)
                    .bind(hi)
                    .fetch_all(&self.db)
                    .await
                    .map_err(StoreError::from)
            })
            .await?;
        Ok(rows.into_iter().map(Contender::from).collect())
    }

    async fn top_standings(&self, limit: usize) -> StoreResult<Vec<Standing>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .bounded(async {
                sqlx::query_as::<_, StandingRow>(
                    r#"SELECT p.nickname,
                              a.name AS favorite_agent,
                              r.mmr, r.win_count, r.lose_count, r.draw_count
                         FROM ranks r
                         JOIN players p     ON p.id = r.player_id
                    LEFT JOIN agents  a     ON a.agent_key = p.favorite_agent
                     ORDER BY r.mmr DESC, r.lose_count ASC, p.nickname ASC
                        LIMIT $1"#,
                )
                .bind(limit)
                .fetch_all(&self.db)
                .await
                .map_err(StoreError::from)
            })
            .await?;
        Ok(rows.into_iter().map(Standing::from).collect())
    }

    async fn apply_rewards(&self, tx: &RewardTransaction) -> StoreResult<()> {
        self.bounded(self.commit(tx)).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.bounded(async {
            sqlx::query("SELECT 1")
                .execute(&self.db)
                .await
                .map(|_| ())
                .map_err(StoreError::from)
        })
        .await
    }
}
