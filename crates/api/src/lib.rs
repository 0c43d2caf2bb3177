pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use ohcr_config::Settings;
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Upper bound for an uploaded recording plus transcript.
pub const UPLOAD_BODY_LIMIT: usize = 200 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_routes = Router::new()
        .route("/upload", post(routes::session::upload))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    let api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/results/{session_id}", get(routes::session::results))
        .merge(upload_routes);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Builds the configured transcription backend and serves the API until the
/// process is stopped.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let transcriber = ohcr_transcription::build_transcriber(&settings.transcription)?;
    let addr = settings.server.bind_addr();
    let state = AppState::new(settings, transcriber);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, results_dir = %state.store.root().display(), "OHCR API listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use ohcr_transcription::{SidecarTranscriber, TranscriptFormat};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn app(results_dir: &std::path::Path) -> Router {
        let mut settings = Settings::default();
        settings.storage.results_dir = results_dir.to_path_buf();
        build_router(AppState::new(
            settings,
            Arc::new(SidecarTranscriber::new(TranscriptFormat::Srt)),
        ))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get_json(app(tmp.path()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn malformed_session_id_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get_json(app(tmp.path()), "/api/results/not-an-id").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get_json(app(tmp.path()), "/api/results/0badcafe").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }
}
