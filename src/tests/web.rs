//! Router tests with a seeded App; no upstream access.

use crate::app::App;
use crate::config::Config;
use crate::engine::RecipeVector;
use crate::recipedb::Recipe;
use crate::taste::TasteVector;
use crate::web;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

fn seeded_app() -> App {
    // `App::new` constructs blocking reqwest clients, which panic when built
    // on a tokio runtime thread; build the fixture on a plain thread instead.
    std::thread::spawn(build_seeded_app).join().unwrap()
}

fn build_seeded_app() -> App {
    let mut app = App::new(Config::for_tests());

    let recipe = Recipe {
        title: "Miso Soup".to_string(),
        region: Some("Japanese".to_string()),
        calories: Some(84.0),
        ingredients: vec!["miso paste".to_string(), "tofu".to_string()],
    };
    let mut vector = TasteVector::zero();
    vector.0[3] = 1.0; // umami
    let entry = RecipeVector::new(recipe.clone(), vector).unwrap();

    app.seed(vec![recipe], vec![entry]);
    app
}

async fn send(router: axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_root_liveness() {
    let router = web::router(Arc::new(RwLock::new(seeded_app())));
    let (status, body) = send(router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "flavororbit backend running");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cache_status_reports_seeded_index() {
    let router = web::router(Arc::new(RwLock::new(seeded_app())));
    let (status, body) = send(router, Method::GET, "/cache/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], true);
    assert_eq!(body["recipe_count"], 1);
    assert_eq!(body["vectors_computed"], true);
    assert_eq!(body["vector_count"], 1);
    assert_eq!(body["sample_recipes"][0], "Miso Soup");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_debug_recipes_sample() {
    let router = web::router(Arc::new(RwLock::new(seeded_app())));
    let (status, body) = send(router, Method::GET, "/debug/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_recipes"], 1);
    assert_eq!(body["sample"][0]["title"], "Miso Soup");
    assert_eq!(body["sample"][0]["ingredient_count"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cache_clear_resets_status() {
    let state = Arc::new(RwLock::new(seeded_app()));

    let (status, body) = send(
        web::router(state.clone()),
        Method::POST,
        "/cache/clear",
        Some(serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cache cleared");

    let (_, body) = send(web::router(state), Method::GET, "/cache/status", None).await;
    assert_eq!(body["cached"], false);
    assert_eq!(body["vector_count"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_recommend_without_profile_returns_body_level_error() {
    // no flavor base url configured: every taste lookup degrades to empty,
    // so no input vector survives
    let router = web::router(Arc::new(RwLock::new(seeded_app())));
    let (status, body) = send(
        router,
        Method::POST,
        "/recommend",
        Some(serde_json::json!({
            "mode": "single",
            "taste_inputs": ["umami"],
            "exclude": [],
            "budget": ""
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "No flavor profile found.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_recommend_accepts_missing_fields() {
    let router = web::router(Arc::new(RwLock::new(seeded_app())));
    let (status, body) = send(
        router,
        Method::POST,
        "/recommend",
        Some(serde_json::json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "No flavor profile found.");
}
