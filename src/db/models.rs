//! Raw Postgres rows and their conversion into domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::store::{Contender, Standing};
use crate::error::StoreError;
use crate::game::types::{
    Agent, CurrencyAccount, OwnedAgent, Player, RankRecord, Role, StatBlock,
};

fn non_negative(table: &'static str, field: &str, v: i32) -> Result<u32, StoreError> {
    u32::try_from(v).map_err(|_| StoreError::Corrupt {
        table,
        reason: format!("{field} = {v} is negative"),
    })
}

#[derive(Debug, FromRow)]
pub struct AgentRow {
    pub agent_key: i32,
    pub name: String,
    pub team: String,
    pub position: String,
    pub grade: String,
    pub ad: i32,
    pub ap: i32,
    pub hp: i32,
    pub mp: i32,
    pub def: i32,
    pub crit: i32,
}

impl TryFrom<AgentRow> for Agent {
    type Error = StoreError;

    fn try_from(r: AgentRow) -> Result<Self, Self::Error> {
        let role = r.position.parse::<Role>().map_err(|reason| StoreError::Corrupt {
            table: "agents",
            reason,
        })?;
        let stat = |field, v| non_negative("agents", field, v);
        Ok(Agent {
            key: r.agent_key,
            name: r.name,
            role,
            team: r.team,
            grade: r.grade,
            stats: StatBlock {
                attack: stat("ad", r.ad)?,
                ability_power: stat("ap", r.ap)?,
                health: stat("hp", r.hp)?,
                mana: stat("mp", r.mp)?,
                defense: stat("def", r.def)?,
                crit_chance: stat("crit", r.crit)?,
            },
        })
    }
}

#[derive(Debug, FromRow)]
pub struct OwnedAgentRow {
    pub player_id: Uuid,
    pub agent_key: i32,
    pub level: i32,
    pub class: i32,
}

impl TryFrom<OwnedAgentRow> for OwnedAgent {
    type Error = StoreError;

    fn try_from(r: OwnedAgentRow) -> Result<Self, Self::Error> {
        Ok(OwnedAgent {
            player_id: r.player_id,
            agent_key: r.agent_key,
            enhancement_level: non_negative("owned_agents", "level", r.level)?,
            breakthrough_class: non_negative("owned_agents", "class", r.class)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct PlayerRow {
    pub id: Uuid,
    pub nickname: String,
    pub squad_mem1: Option<i32>,
    pub squad_mem2: Option<i32>,
    pub squad_mem3: Option<i32>,
    pub synergy: String,
    pub favorite_agent: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<PlayerRow> for Player {
    fn from(r: PlayerRow) -> Self {
        Player {
            id: r.id,
            nickname: r.nickname,
            slots: [r.squad_mem1, r.squad_mem2, r.squad_mem3],
            synergy: r.synergy,
            favorite_agent: r.favorite_agent,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ContenderRow {
    #[sqlx(flatten)]
    pub player: PlayerRow,
    pub mmr: i32,
}

impl From<ContenderRow> for Contender {
    fn from(r: ContenderRow) -> Self {
        Contender {
            player: r.player.into(),
            mmr: r.mmr,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct RankRow {
    pub player_id: Uuid,
    pub mmr: i32,
    pub win_count: i32,
    pub lose_count: i32,
    pub draw_count: i32,
}

impl From<RankRow> for RankRecord {
    fn from(r: RankRow) -> Self {
        RankRecord {
            player_id: r.player_id,
            mmr: r.mmr,
            win_count: r.win_count,
            lose_count: r.lose_count,
            draw_count: r.draw_count,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct AssetRow {
    pub player_id: Uuid,
    pub cash: i64,
    pub enhancer: i64,
}

impl From<AssetRow> for CurrencyAccount {
    fn from(r: AssetRow) -> Self {
        CurrencyAccount {
            player_id: r.player_id,
            cash: r.cash,
            enhancer: r.enhancer,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct StandingRow {
    pub nickname: String,
    pub favorite_agent: Option<String>,
    pub mmr: i32,
    pub win_count: i32,
    pub lose_count: i32,
    pub draw_count: i32,
}

impl From<StandingRow> for Standing {
    fn from(r: StandingRow) -> Self {
        Standing {
            nickname: r.nickname,
            favorite_agent: r.favorite_agent,
            mmr: r.mmr,
            win_count: r.win_count,
            lose_count: r.lose_count,
            draw_count: r.draw_count,
        }
    }
}
