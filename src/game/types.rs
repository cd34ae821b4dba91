use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel synergy tag for squads without a repeated team.
pub const NO_SYNERGY: &str = "none";

/// Three combat roles. Each one picks which stats a breakthrough boosts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Warrior,
    Tanker,
    Support,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Warrior => "warrior",
            Role::Tanker => "tanker",
            Role::Support => "support",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warrior" => Ok(Role::Warrior),
            "tanker" => Ok(Role::Tanker),
            "support" => Ok(Role::Support),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

/// Base stat bundle of an agent template.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatBlock {
    pub attack: u32,
    pub ability_power: u32,
    pub health: u32,
    pub mana: u32,
    pub defense: u32,
    pub crit_chance: u32,
}

/// Character template (immutable reference data).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Agent {
    pub key: i32,
    pub name: String,
    pub role: Role,
    pub team: String,
    pub grade: String,
    pub stats: StatBlock,
}

/// A player's copy of an agent with its upgrade tiers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OwnedAgent {
    pub player_id: Uuid,
    pub agent_key: i32,
    pub enhancement_level: u32,
    pub breakthrough_class: u32,
}

/// A fully formed three-agent lineup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Squad {
    pub members: [i32; 3],
    pub synergy: String,
}

impl Squad {
    pub fn has_synergy(&self) -> bool {
        self.synergy != NO_SYNERGY
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    pub nickname: String,
    /// Raw squad slots; any may be unset until formation completes.
    pub slots: [Option<i32>; 3],
    pub synergy: String,
    pub favorite_agent: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// A player with no squad, the state right after sign-up.
    pub fn new(id: Uuid, nickname: impl Into<String>) -> Self {
        Player {
            id,
            nickname: nickname.into(),
            slots: [None; 3],
            synergy: NO_SYNERGY.to_string(),
            favorite_agent: None,
            created_at: Utc::now(),
        }
    }

    /// The squad, if all three slots are filled.
    pub fn squad(&self) -> Option<Squad> {
        match self.slots {
            [Some(a), Some(b), Some(c)] => Some(Squad {
                members: [a, b, c],
                synergy: self.synergy.clone(),
            }),
            _ => None,
        }
    }

    pub fn squad_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn with_squad(mut self, squad: &Squad) -> Self {
        self.slots = squad.members.map(Some);
        self.synergy = squad.synergy.clone();
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RankRecord {
    pub player_id: Uuid,
    pub mmr: i32,
    pub win_count: i32,
    pub lose_count: i32,
    pub draw_count: i32,
}

impl RankRecord {
    pub fn starting(player_id: Uuid, mmr: i32) -> Self {
        RankRecord {
            player_id,
            mmr,
            win_count: 0,
            lose_count: 0,
            draw_count: 0,
        }
    }
}

/// Soft currency and enhancement material.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CurrencyAccount {
    pub player_id: Uuid,
    pub cash: i64,
    pub enhancer: i64,
}

impl CurrencyAccount {
    pub fn empty(player_id: Uuid) -> Self {
        CurrencyAccount {
            player_id,
            cash: 0,
            enhancer: 0,
        }
    }
}

/// Result of a match from the requester's point of view.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Draw => "draw",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Casual,
    Ranked,
}

impl MatchKind {
    pub fn label(self) -> &'static str {
        match self {
            MatchKind::Casual => "casual",
            MatchKind::Ranked => "ranked",
        }
    }
}
