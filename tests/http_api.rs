mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use arena_server::db::memory::MemoryStore;
use arena_server::game::dice::ScriptedDice;
use arena_server::http::{auth::Claims, routes::init_routes};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use uuid::Uuid;

const SECRET: &str = "arena-test-secret";

fn token(player: Uuid) -> String {
    std::env::set_var("JWT_SECRET", SECRET);
    let claims = Claims {
        sub: player.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn seeded(rolls: Vec<u32>) -> (Arc<MemoryStore>, Uuid, web::Data<arena_server::arena::Arena>) {
    let store = Arc::new(MemoryStore::new());
    common::seed_agents(&store);
    let me = common::seed_player(&store, "me", 1000, Some([1, 2, 3]));
    common::seed_player(&store, "rival", 1000, Some([4, 5, 6]));
    let arena = common::arena(store.clone(), Arc::new(ScriptedDice::rolls(rolls)));
    (store, me, web::Data::new(arena))
}

#[actix_rt::test]
async fn casual_match_requires_a_token() {
    let (_, _, arena) = seeded(vec![]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/users/select-match")
        .set_json(serde_json::json!({ "counterpart": "rival" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn casual_match_returns_the_summary() {
    let (_, me, arena) = seeded(vec![59]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/users/select-match")
        .insert_header(("Authorization", format!("Bearer {}", token(me))))
        .set_json(serde_json::json!({ "counterpart": "rival" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "casual");
    assert_eq!(body["outcome"], "win");
    assert_eq!(body["win_prob"], 60);
    assert_eq!(body["my_score"], 1200);
    assert!(body.get("rewards").is_none());
}

#[actix_rt::test]
async fn unknown_counterpart_maps_to_not_found() {
    let (_, me, arena) = seeded(vec![]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/users/select-match")
        .insert_header(("Authorization", format!("Bearer {}", token(me))))
        .set_json(serde_json::json!({ "counterpart": "ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[actix_rt::test]
async fn ranked_match_commits_rewards() {
    let (store, me, arena) = seeded(vec![60]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/users/rank-match")
        .insert_header(("Authorization", format!("Bearer {}", token(me))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["outcome"], "draw");
    assert_eq!(body["rewards"]["currency"]["cash"], 30_000);
    assert_eq!(store.rank(me).unwrap().draw_count, 1);
}

#[actix_rt::test]
async fn self_match_is_a_bad_request() {
    let (_, me, arena) = seeded(vec![]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/users/select-match")
        .insert_header(("Authorization", format!("Bearer {}", token(me))))
        .set_json(serde_json::json!({ "counterpart": "me" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn leaderboard_works_without_redis() {
    let (_, _, arena) = seeded(vec![]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/users/ranks?limit=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["record"], "0 / 0 / 0");
}

#[actix_rt::test]
async fn healthz_reports_ok_on_memory_store() {
    let (_, _, arena) = seeded(vec![]);
    let app = test::init_service(App::new().app_data(arena).configure(init_routes)).await;

    let req = test::TestRequest::get().uri("/api/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

fn unreachable_redis() -> web::Data<redis::Client> {
    // Nothing listens on port 1, so every connection attempt is refused.
    web::Data::new(redis::Client::open("redis://127.0.0.1:1/").unwrap())
}

#[actix_rt::test]
async fn healthz_stays_up_when_redis_is_down() {
    let (_, _, arena) = seeded(vec![]);
    let app = test::init_service(
        App::new()
            .app_data(arena)
            .app_data(unreachable_redis())
            .configure(init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"ok (redis unavailable)");
}

#[actix_rt::test]
async fn leaderboard_falls_back_when_redis_is_down() {
    let (_, _, arena) = seeded(vec![]);
    let app = test::init_service(
        App::new()
            .app_data(arena)
            .app_data(unreachable_redis())
            .configure(init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/users/ranks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}
