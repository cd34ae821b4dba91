//! In-memory warm cache for agent templates.
//!
//! Agents are immutable reference data, so the Postgres store keeps every
//! template it has seen and only goes to the database on a miss. Player,
//! rank and currency rows are never cached.

use dashmap::DashMap;
use sqlx::PgPool;

use crate::db::models::AgentRow;
use crate::game::types::Agent;

/// agent_key → Agent (read-mostly once warmed).
#[derive(Debug, Default)]
pub struct AgentCatalog {
    agents: DashMap<i32, Agent>,
}

impl AgentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the whole `agents` table. Idempotent; returns rows loaded.
    pub async fn warm(&self, db: &PgPool) -> anyhow::Result<usize> {
        let rows = sqlx::query_as::<_, AgentRow>(
            r#"SELECT agent_key, name, team, position, grade, ad, ap, hp, mp, def, crit
                 FROM agents"#,
        )
        .fetch_all(db)
        .await?;

        let mut loaded = 0;
        for row in rows {
            let key = row.agent_key;
            match Agent::try_from(row) {
                Ok(agent) => {
                    self.insert(agent);
                    loaded += 1;
                }
                Err(e) => log::warn!("skipping agent {key}: {e}"),
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, key: i32) -> Option<Agent> {
        self.agents.get(&key).map(|e| e.value().clone())
    }

    pub fn insert(&self, agent: Agent) {
        self.agents.insert(agent.key, agent);
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Role, StatBlock};

    #[test]
    fn get_missing_agent() {
        let catalog = AgentCatalog::new();
        assert!(catalog.get(-9999).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn insert_then_get() {
        let catalog = AgentCatalog::new();
        catalog.insert(Agent {
            key: 7,
            name: "Warden".into(),
            role: Role::Tanker,
            team: "iron".into(),
            grade: "s".into(),
            stats: StatBlock::default(),
        });
        assert_eq!(catalog.get(7).map(|a| a.name), Some("Warden".to_string()));
        assert_eq!(catalog.len(), 1);
    }
}
