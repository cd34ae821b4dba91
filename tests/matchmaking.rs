mod common;

use std::sync::Arc;

use arena_server::db::memory::MemoryStore;
use arena_server::db::store::{Contender, Store};
use arena_server::error::MatchError;
use arena_server::game::dice::ScriptedDice;
use arena_server::game::types::Player;
use arena_server::matchmaking::{eligible, MatchmakingPool};
use uuid::Uuid;

fn pool(store: Arc<MemoryStore>, picks: Vec<usize>, window: i32) -> MatchmakingPool {
    let store: Arc<dyn Store> = store;
    MatchmakingPool::new(store, Arc::new(ScriptedDice::new(picks, [])), window)
}

#[test]
fn eligible_drops_requester_and_unformed_squads() {
    let me = Uuid::new_v4();
    let formed = Player::new(Uuid::new_v4(), "formed").with_squad(&arena_server::game::types::Squad {
        members: [1, 2, 3],
        synergy: "none".into(),
    });
    let raw = vec![
        Contender {
            player: Player::new(me, "me").with_squad(&formed.squad().unwrap()),
            mmr: 1000,
        },
        Contender {
            player: Player::new(Uuid::new_v4(), "empty"),
            mmr: 1000,
        },
        Contender {
            player: formed.clone(),
            mmr: 1100,
        },
    ];
    let pool = eligible(me, raw);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].player.id, formed.id);
}

#[test]
fn eligible_is_ordered_by_mmr() {
    let squad = arena_server::game::types::Squad {
        members: [1, 2, 3],
        synergy: "none".into(),
    };
    let raw: Vec<Contender> = [1300, 900, 1100]
        .into_iter()
        .map(|mmr| Contender {
            player: Player::new(Uuid::new_v4(), format!("p{mmr}")).with_squad(&squad),
            mmr,
        })
        .collect();
    let mmrs: Vec<i32> = eligible(Uuid::new_v4(), raw).iter().map(|c| c.mmr).collect();
    assert_eq!(mmrs, vec![900, 1100, 1300]);
}

#[tokio::test]
async fn picks_only_inside_the_window() {
    let store = Arc::new(MemoryStore::new());
    common::seed_agents(&store);
    let me = common::seed_player(&store, "me", 1000, Some([1, 2, 3]));
    common::seed_player(&store, "far-low", -1, Some([4, 5, 6]));
    common::seed_player(&store, "edge-low", 0, Some([4, 5, 6]));
    common::seed_player(&store, "edge-high", 2000, Some([4, 5, 6]));
    common::seed_player(&store, "far-high", 2001, Some([4, 5, 6]));

    let mm = pool(store, vec![0, 1, 2], 1000);
    assert_eq!(mm.bounds(1000), (0, 2000));

    let mut seen = Vec::new();
    for _ in 0..3 {
        let c = mm.find_opponent(me, 1000).await.unwrap();
        assert!((0..=2000).contains(&c.mmr));
        assert_ne!(c.player.id, me);
        seen.push(c.player.nickname);
    }
    // Picks wrap modulo the pool size.
    assert_eq!(seen, vec!["edge-low", "edge-high", "edge-low"]);
}

#[tokio::test]
async fn empty_after_filtering_reports_no_opponent() {
    let store = Arc::new(MemoryStore::new());
    common::seed_agents(&store);
    let me = common::seed_player(&store, "me", 1500, Some([1, 2, 3]));
    common::seed_player(&store, "unformed", 1500, None);

    let mm = pool(store, vec![], 200);
    let err = mm.find_opponent(me, 1500).await.unwrap_err();
    assert!(matches!(
        err,
        MatchError::NoOpponentAvailable {
            mmr: 1500,
            window: 200
        }
    ));
}

#[tokio::test]
async fn negative_window_is_treated_as_zero() {
    let store = Arc::new(MemoryStore::new());
    common::seed_agents(&store);
    let me = common::seed_player(&store, "me", 1000, Some([1, 2, 3]));
    common::seed_player(&store, "twin", 1000, Some([4, 5, 6]));
    common::seed_player(&store, "near", 1001, Some([4, 5, 6]));

    let mm = pool(store, vec![], -50);
    assert_eq!(mm.window(), 0);
    let c = mm.find_opponent(me, 1000).await.unwrap();
    assert_eq!(c.player.nickname, "twin");
}
