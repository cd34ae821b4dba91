// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use arena_server::arena::Arena;
use arena_server::config::Settings;
use arena_server::db::memory::MemoryStore;
use arena_server::game::dice::Dice;
use arena_server::game::types::{
    Agent, CurrencyAccount, OwnedAgent, Player, RankRecord, Role, Squad, StatBlock, NO_SYNERGY,
};
use uuid::Uuid;

/// Agent whose only non-zero stat is attack, so its score is `attack`.
pub fn agent(key: i32, role: Role, team: &str, attack: u32) -> Agent {
    Agent {
        key,
        name: format!("agent-{key}"),
        role,
        team: team.to_string(),
        grade: "normal".to_string(),
        stats: StatBlock {
            attack,
            ..StatBlock::default()
        },
    }
}

/// Catalogue used across the integration tests.
///
/// Keys 1..=3 score 400 each, keys 4..=6 score 300, 300 and 200.
pub fn seed_agents(store: &MemoryStore) {
    store.insert_agent(agent(1, Role::Warrior, "red", 400));
    store.insert_agent(agent(2, Role::Tanker, "red", 400));
    store.insert_agent(agent(3, Role::Support, "blue", 400));
    store.insert_agent(agent(4, Role::Warrior, "green", 300));
    store.insert_agent(agent(5, Role::Tanker, "gold", 300));
    store.insert_agent(agent(6, Role::Support, "iron", 200));
}

/// Insert a player with rank and currency rows, and a squad when given.
pub fn seed_player(
    store: &MemoryStore,
    nickname: &str,
    mmr: i32,
    squad: Option<[i32; 3]>,
) -> Uuid {
    let id = Uuid::new_v4();
    let mut player = Player::new(id, nickname);
    if let Some(members) = squad {
        for key in members {
            store.insert_owned(OwnedAgent {
                player_id: id,
                agent_key: key,
                enhancement_level: 0,
                breakthrough_class: 0,
            });
        }
        player = player.with_squad(&Squad {
            members,
            synergy: NO_SYNERGY.to_string(),
        });
    }
    store.insert_player(player);
    store.insert_rank(RankRecord::starting(id, mmr));
    store.insert_currency(CurrencyAccount::empty(id));
    id
}

pub fn settings() -> Settings {
    Settings::default()
}

pub fn arena(store: Arc<MemoryStore>, dice: Arc<dyn Dice>) -> Arena {
    Arena::new(store, dice, &settings())
}
