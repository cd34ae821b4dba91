//! Squad power score.
//!
//! Breakthrough class boosts the two stats of a member's role by 10% per
//! tier, enhancement level then boosts every stat by 2% per level, and a
//! squad with synergy gets a flat 10% on top of the summed member scores.

use crate::game::types::{Role, StatBlock};
use serde::{Deserialize, Serialize};

const BREAKTHROUGH_STEP: f64 = 0.1;
const ENHANCEMENT_STEP: f64 = 0.02;
const SYNERGY_BONUS: f64 = 1.1;

/// Everything the calculator needs about one squad slot.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SquadMember {
    pub role: Role,
    pub stats: StatBlock,
    pub enhancement_level: u32,
    pub breakthrough_class: u32,
}

/// Member score before the synergy multiplier.
pub fn member_score(member: &SquadMember) -> f64 {
    let s = member.stats;
    let mut stats = [
        s.attack as f64,
        s.ability_power as f64,
        s.health as f64,
        s.mana as f64,
        s.defense as f64,
        s.crit_chance as f64,
    ];

    let boost = 1.0 + member.breakthrough_class as f64 * BREAKTHROUGH_STEP;
    let (a, b) = match member.role {
        Role::Warrior => (0, 5), // attack, crit
        Role::Tanker => (2, 4),  // health, defense
        Role::Support => (1, 3), // ability power, mana
    };
    stats[a] *= boost;
    stats[b] *= boost;

    let enhance = 1.0 + member.enhancement_level as f64 * ENHANCEMENT_STEP;
    stats.iter().fold(0.0, |acc, v| acc + v * enhance)
}

/// Sum of the member scores, before synergy and truncation.
pub fn raw_score(members: &[SquadMember]) -> f64 {
    members.iter().map(member_score).sum()
}

/// Final integer power of a squad.
pub fn squad_score(members: &[SquadMember], has_synergy: bool) -> u64 {
    let mut score = raw_score(members);
    if has_synergy {
        score *= SYNERGY_BONUS;
    }
    // Inputs are unsigned, so `score` is never negative; `as` truncates.
    score.trunc() as u64
}
