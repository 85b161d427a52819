use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use mmcartbox::server::app;

fn suggest_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/suggest")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Router with no oracle configured: every suggestion resolves locally.
fn local_app() -> axum::Router {
    app(Arc::new(None))
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = local_app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_prompt_is_plain_text_400() {
    let response = local_app()
        .oneshot(suggest_request(r#"{"rows":[{"a":1}]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response.into_body()).await, "Missing prompt");
}

#[tokio::test]
async fn test_missing_rows_is_plain_text_400() {
    let response = local_app()
        .oneshot(suggest_request(r#"{"prompt":"line chart"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "Missing rows (dataset)"
    );
}

#[tokio::test]
async fn test_local_suggestion_shape() {
    let body = r#"{
        "prompt": "compare sales by region",
        "rows": [
            {"Date": "2024-01-01", "Sales": 120, "Region": "North"},
            {"Date": "2024-01-02", "Sales": 150, "Region": "South"}
        ],
        "datasetName": "upload"
    }"#;
    let response = local_app().oneshot(suggest_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(value["type"], "bar");
    assert_eq!(value["x"], "Sales");
    assert_eq!(value["y"][0], "Region");
    assert!(!value["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_rows_returns_no_data_spec() {
    let body = r#"{"prompt": "line chart of sales", "rows": []}"#;
    let response = local_app().oneshot(suggest_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert!(value["type"].is_null());
    assert!(value["x"].is_null());
    assert_eq!(value["y"].as_array().unwrap().len(), 0);
    assert!(!value["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_prompt_rejected() {
    let body = r#"{"prompt": "", "rows": [{"a": 1}]}"#;
    let response = local_app().oneshot(suggest_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
