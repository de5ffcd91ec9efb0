use crate::app::App;
use crate::engine::RecommendRequest;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{signal, sync::RwLock};

#[derive(Clone)]
struct SharedState {
    app: Arc<RwLock<App>>,
}

pub(crate) fn router(app: Arc<RwLock<App>>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/", get(root))
        .route("/cache/status", get(cache_status))
        .route("/debug/recipes", get(debug_recipes))
        .route("/cache/clear", post(cache_clear))
        .route("/recommend", post(recommend))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(app: App, bind_addr: &str) {
    let app = Arc::new(RwLock::new(app));

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    let router = router(app);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("failed to bind listen address");
    log::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

pub fn start_daemon(app: App, bind_addr: &str) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async { start_app(app, bind_addr).await });
}

async fn root() -> Json<Value> {
    Json(json!({"message": "flavororbit backend running"}))
}

async fn cache_status(State(state): State<Arc<SharedState>>) -> Json<Value> {
    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        let app = app.blocking_read();
        Json(serde_json::to_value(app.cache_status()).unwrap_or_default())
    })
}

async fn debug_recipes(State(state): State<Arc<SharedState>>) -> Json<Value> {
    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        let app = app.blocking_read();
        Json(serde_json::to_value(app.debug_recipes()).unwrap_or_default())
    })
}

async fn cache_clear(State(state): State<Arc<SharedState>>) -> Json<Value> {
    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        let mut app = app.blocking_write();
        app.clear_caches();
        Json(json!({"message": "Cache cleared"}))
    })
}

async fn recommend(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<RecommendRequest>,
) -> Json<Value> {
    log::debug!("payload: {payload:?}");

    let app = state.app.clone();

    // Errors on this path are body-level ({"error": ...}), never HTTP
    // status codes; callers check for the error key.
    tokio::task::block_in_place(move || {
        let mut app = app.blocking_write();
        Json(app.recommend(payload).into_body())
    })
}
