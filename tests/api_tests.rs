use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use singmeasong_api::api::{create_router, AppState};
use singmeasong_api::db::{MemoryRecommendationStore, RecommendationStore};
use singmeasong_api::models::{NewRecommendation, Recommendation};

const NAME: &str = "Falamansa - Xote dos Milagres";
const LINK: &str = "https://www.youtube.com/watch?v=chwyjJbcs1Y";

fn create_test_server(store: &MemoryRecommendationStore) -> TestServer {
    let state = AppState::with_store(Arc::new(store.clone())).with_test_routes(true);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

async fn seed_one(store: &MemoryRecommendationStore) -> Recommendation {
    store.create(&NewRecommendation::new(NAME, LINK)).await.unwrap()
}

async fn seed_many(store: &MemoryRecommendationStore, scores: &[i32]) {
    for (i, score) in scores.iter().enumerate() {
        store
            .insert_with_score(
                &NewRecommendation::new(format!("Artist {i} - Song {i}"), format!("https://youtu.be/{i}")),
                *score,
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(&MemoryRecommendationStore::new());
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_create_recommendation_persists() {
    let store = MemoryRecommendationStore::new();
    let server = create_test_server(&store);

    let response = server
        .post("/recommendations")
        .json(&json!({ "name": NAME, "youtubeLink": LINK }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["name"], NAME);
    assert_eq!(created["score"], 0);

    let persisted = store.find_by_name(NAME).await.unwrap().unwrap();
    assert_eq!(persisted.youtube_link, LINK);
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() {
    let store = MemoryRecommendationStore::new();
    let server = create_test_server(&store);

    let bodies = [
        json!({ "name": "", "youtubeLink": LINK }),
        json!({ "name": NAME, "youtubeLink": "" }),
        json!({ "name": true, "youtubeLink": 2 }),
        json!({ "youtubeLink": LINK }),
    ];

    for body in bodies {
        let response = server.post("/recommendations").json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let response = server.post("/recommendations").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_create_duplicate_name_conflicts() {
    let store = MemoryRecommendationStore::new();
    seed_one(&store).await;
    let server = create_test_server(&store);

    let response = server
        .post("/recommendations")
        .json(&json!({ "name": NAME, "youtubeLink": "https://youtu.be/other" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Recommendations names must be unique");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_upvote_increments_score() {
    let store = MemoryRecommendationStore::new();
    let recommendation = seed_one(&store).await;
    let server = create_test_server(&store);

    let response = server
        .post(&format!("/recommendations/{}/upvote", recommendation.id))
        .await;

    response.assert_status_ok();
    let updated = store.find_by_id(recommendation.id).await.unwrap().unwrap();
    assert_eq!(updated.score, 1);
}

#[tokio::test]
async fn test_downvote_decrements_score() {
    let store = MemoryRecommendationStore::new();
    let recommendation = seed_one(&store).await;
    let server = create_test_server(&store);

    let response = server
        .post(&format!("/recommendations/{}/downvote", recommendation.id))
        .await;

    response.assert_status_ok();
    let updated = store.find_by_id(recommendation.id).await.unwrap().unwrap();
    assert_eq!(updated.score, -1);
}

#[tokio::test]
async fn test_downvote_past_threshold_removes_silently() {
    let store = MemoryRecommendationStore::new();
    let recommendation = seed_one(&store).await;
    let server = create_test_server(&store);

    for _ in 0..6 {
        server
            .post(&format!("/recommendations/{}/downvote", recommendation.id))
            .await
            .assert_status_ok();
    }

    let response = server
        .get(&format!("/recommendations/{}", recommendation.id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_votes_on_unknown_id_are_not_found() {
    let server = create_test_server(&MemoryRecommendationStore::new());

    server
        .post("/recommendations/123/upvote")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/recommendations/123/downvote")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_recommendations_lists_all() {
    let store = MemoryRecommendationStore::new();
    seed_many(&store, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]).await;
    let server = create_test_server(&store);

    let response = server.get("/recommendations").await;

    response.assert_status_ok();
    let recommendations: Vec<Recommendation> = response.json();
    assert_eq!(recommendations.len(), 15);
}

#[tokio::test]
async fn test_get_recommendation_by_id() {
    let store = MemoryRecommendationStore::new();
    let recommendation = seed_one(&store).await;
    let server = create_test_server(&store);

    let response = server
        .get(&format!("/recommendations/{}", recommendation.id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], recommendation.id);
    assert_eq!(body["name"], NAME);
    assert_eq!(body["youtubeLink"], LINK);
}

#[tokio::test]
async fn test_get_recommendation_rejects_non_numeric_id() {
    let server = create_test_server(&MemoryRecommendationStore::new());

    let response = server.get("/recommendations/abc").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_random_returns_a_stored_recommendation() {
    let store = MemoryRecommendationStore::new();
    seed_many(&store, &[-3, 0, 4, 11, 25, 70]).await;
    let server = create_test_server(&store);
    let all = store.find_all().await.unwrap();

    let response = server.get("/recommendations/random").await;

    response.assert_status_ok();
    let picked: Recommendation = response.json();
    assert!(all.contains(&picked));
}

#[tokio::test]
async fn test_get_random_on_empty_store_is_not_found() {
    let server = create_test_server(&MemoryRecommendationStore::new());

    let response = server.get("/recommendations/random").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_top_returns_ranked_list() {
    let store = MemoryRecommendationStore::new();
    seed_many(&store, &[8, -5, 31, 2, 17, 0, 9, 44, 3, 3, 12, -1, 6, 25, 1]).await;
    let server = create_test_server(&store);

    let response = server.get("/recommendations/top/5").await;

    response.assert_status_ok();
    let top: Vec<Recommendation> = response.json();
    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert_eq!(top[0].score, 44);
}

#[tokio::test]
async fn test_get_top_rejects_invalid_amounts() {
    let server = create_test_server(&MemoryRecommendationStore::new());

    for amount in ["0", "-2", "ten"] {
        let response = server.get(&format!("/recommendations/top/{}", amount)).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(&MemoryRecommendationStore::new());
    let header = HeaderName::from_static("x-request-id");
    let id = "6f1c2e7a-3b4d-4c5e-8f90-a1b2c3d4e5f6";

    let response = server
        .get("/health")
        .add_header(header.clone(), HeaderValue::from_static(id))
        .await;

    assert_eq!(response.header(header), id);
}

#[tokio::test]
async fn test_reset_route_empties_store() {
    let store = MemoryRecommendationStore::new();
    seed_many(&store, &[1, 2, 3]).await;
    let server = create_test_server(&store);

    server.post("/testing/reset").await.assert_status_ok();

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_reset_route_absent_by_default() {
    let state = AppState::in_memory();
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.post("/testing/reset").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
