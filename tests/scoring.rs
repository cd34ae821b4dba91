use arena_server::game::scoring::{member_score, raw_score, squad_score, SquadMember};
use arena_server::game::types::{Role, StatBlock};

fn member(role: Role, enhancement_level: u32, breakthrough_class: u32) -> SquadMember {
    SquadMember {
        role,
        stats: StatBlock {
            attack: 120,
            ability_power: 80,
            health: 900,
            mana: 300,
            defense: 150,
            crit_chance: 15,
        },
        enhancement_level,
        breakthrough_class,
    }
}

#[test]
fn higher_enhancement_never_lowers_the_score() {
    for role in [Role::Warrior, Role::Tanker, Role::Support] {
        let mut last = 0.0;
        for level in 0..=30 {
            let s = member_score(&member(role, level, 2));
            assert!(s >= last, "{role:?} level {level}: {s} < {last}");
            last = s;
        }
    }
}

#[test]
fn higher_breakthrough_never_lowers_the_score() {
    for role in [Role::Warrior, Role::Tanker, Role::Support] {
        let mut last = 0.0;
        for class in 0..=10 {
            let s = member_score(&member(role, 5, class));
            assert!(s >= last, "{role:?} class {class}: {s} < {last}");
            last = s;
        }
    }
}

#[test]
fn breakthrough_boosts_role_stats() {
    // warrior: attack + crit, tanker: health + defense, support: ap + mana
    let base = 120.0 + 80.0 + 900.0 + 300.0 + 150.0 + 15.0;
    assert!((member_score(&member(Role::Warrior, 0, 1)) - (base + 13.5)).abs() < 1e-9);
    assert!((member_score(&member(Role::Tanker, 0, 1)) - (base + 105.0)).abs() < 1e-9);
    assert!((member_score(&member(Role::Support, 0, 1)) - (base + 38.0)).abs() < 1e-9);
}

#[test]
fn synergy_adds_ten_percent_then_truncates() {
    let squad = [
        member(Role::Warrior, 3, 1),
        member(Role::Tanker, 0, 0),
        member(Role::Support, 7, 2),
    ];
    let raw = raw_score(&squad);
    assert_eq!(squad_score(&squad, false), raw.trunc() as u64);
    assert_eq!(squad_score(&squad, true), (raw * 1.1).trunc() as u64);
    assert!(squad_score(&squad, true) >= squad_score(&squad, false));
}

#[test]
fn zero_stats_score_zero() {
    let blank = SquadMember {
        role: Role::Tanker,
        stats: StatBlock::default(),
        enhancement_level: 40,
        breakthrough_class: 9,
    };
    assert_eq!(squad_score(&[blank, blank, blank], true), 0);
}
