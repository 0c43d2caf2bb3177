use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/health").send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = TestApp::spawn().await;

    let resp = app
        .get("/api/health")
        .header("Origin", "http://example.org")
        .send()
        .await
        .unwrap();

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
