//! Squad formation rules: which lineups are legal and what synergy they get.

use crate::error::FormationError;
use crate::game::types::{Agent, OwnedAgent, Role, Squad, NO_SYNERGY};
use uuid::Uuid;

/// Concatenation of the team tags that appear at least twice, each tag once,
/// in the order they first repeat. `"none"` when nothing repeats.
pub fn derive_synergy<'a>(teams: impl IntoIterator<Item = &'a str>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut repeated: Vec<&str> = Vec::new();
    for team in teams {
        if seen.contains(&team) {
            if !repeated.contains(&team) {
                repeated.push(team);
            }
        } else {
            seen.push(team);
        }
    }

    if repeated.is_empty() {
        NO_SYNERGY.to_string()
    } else {
        repeated.concat()
    }
}

/// Validate a lineup of `(owned copy, template)` pairs for `player` and build
/// the squad it forms.
pub fn assemble(player: Uuid, picks: &[(OwnedAgent, Agent)]) -> Result<Squad, FormationError> {
    let mut members: Vec<i32> = Vec::with_capacity(3);
    for (owned, agent) in picks {
        if owned.player_id != player || owned.agent_key != agent.key {
            return Err(FormationError::NotOwned {
                agent_key: agent.key,
            });
        }
        if members.contains(&agent.key) {
            return Err(FormationError::Duplicate {
                agent_key: agent.key,
            });
        }
        members.push(agent.key);
    }

    let members: [i32; 3] = members
        .try_into()
        .map_err(|v: Vec<i32>| FormationError::WrongSize(v.len()))?;

    if !picks.iter().any(|(_, a)| a.role == Role::Tanker) {
        return Err(FormationError::NoTanker);
    }

    let synergy = derive_synergy(picks.iter().map(|(_, a)| a.team.as_str()));
    Ok(Squad { members, synergy })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synergy_lists_repeated_teams_once() {
        assert_eq!(derive_synergy(["red", "blue", "green"]), "none");
        assert_eq!(derive_synergy(["red", "blue", "red"]), "red");
        assert_eq!(derive_synergy(["red", "red", "red"]), "red");
        assert_eq!(derive_synergy(["a", "b", "b", "a"]), "ba");
    }
}
