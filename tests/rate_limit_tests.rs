//! Rate limiting as wired by the server: per client IP, `rps` sustained, `burst` banked

mod common;

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use common::{create_app, create_test_config};
use mandarin_gateway::routes::with_rate_limit;

fn health_from(client_ip: &str) -> Request<Body> {
    Request::builder()
        .uri("/")
        .header("x-forwarded-for", client_ip)
        .body(Body::empty())
        .unwrap()
}

async fn limited_app(rps: u32, burst: u32) -> Router {
    let app = create_app(create_test_config("http://127.0.0.1:9")).await;
    with_rate_limit(app, rps, burst).unwrap()
}

#[tokio::test]
async fn test_steady_traffic_below_rate_is_never_throttled() {
    let app = limited_app(60, 10).await;

    let mut statuses = Vec::new();
    for _ in 0..15 {
        let response = app.clone().oneshot(health_from("1.2.3.4")).await.unwrap();
        statuses.push(response.status());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(statuses, vec![StatusCode::OK; 15]);
}

#[tokio::test]
async fn test_burst_beyond_quota_is_throttled_per_client() {
    let app = limited_app(1, 2).await;

    for _ in 0..2 {
        let response = app.clone().oneshot(health_from("5.6.7.8")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(health_from("5.6.7.8")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another client has its own quota
    let response = app.clone().oneshot(health_from("9.9.9.9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_very_high_rate_disables_limiting() {
    let app = limited_app(100_000, 1).await;

    for _ in 0..5 {
        let response = app.clone().oneshot(health_from("1.2.3.4")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
