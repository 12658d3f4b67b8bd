mod common;

use axum::body::{ to_bytes, Body };
use axum::http::{ Request, StatusCode };
use common::TestContext;
use serde_json::{ json, Value };
use stars_and_shelves::server::{ create_router, AppState };
use tower::ServiceExt;

async fn router() -> axum::Router {
    let ctx = TestContext::seeded().await.expect("Failed to create test context");
    create_router(AppState::new(ctx.schema.clone(), ctx.db_pool.clone()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

#[tokio::test]
async fn test_graphql_post_executes_query() {
    let app = router().await;

    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json")
        .body(
            Body::from(
                json!({
                "query": "query Books($fiction: Boolean) { books(fiction: $fiction) { id } }",
                "variables": { "fiction": false },
            }).to_string()
            )
        )
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["books"], json!([{ "id": "2" }, { "id": "4" }]));
}

#[tokio::test]
async fn test_graphql_errors_are_reported_in_body() {
    let app = router().await;

    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "{ shelves { id } }" }).to_string()))
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["errors"].as_array().is_some_and(|errors| !errors.is_empty()));
}

#[tokio::test]
async fn test_graphiql_page_served() {
    let app = router().await;

    let request = Request::builder()
        .uri("/graphql")
        .body(Body::empty())
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body");
    let page = String::from_utf8_lossy(&bytes);
    assert!(page.to_lowercase().contains("graphiql"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = router().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["checks"]["database"]["status"], json!("healthy"));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/livez").body(Body::empty()).expect("request"))
        .await
        .expect("Request failed");
    assert_eq!(body_json(response).await, json!({ "status": "alive" }));

    let response = app
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).expect("request"))
        .await
        .expect("Request failed");
    assert_eq!(body_json(response).await, json!({ "ready": true }));
}
