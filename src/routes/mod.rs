pub mod api;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tracing::info;

use crate::handlers::api::health_check;
use crate::state::AppState;

/// Rates at or above this many requests per second switch rate limiting off.
pub const RATE_LIMIT_DISABLED_AT: u32 = 100_000;

/// Public health check plus the `/api` routes, bound to `state`.
///
/// CORS and security headers are added in main.rs.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .nest("/api", api::create_api_router())
        .with_state(state)
}

/// Interval after which one request of a client's quota is replenished.
pub fn rate_limit_period(requests_per_second: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(requests_per_second.max(1)))
}

/// Limit each client IP to `requests_per_second`, allowing bursts of `burst_size`.
///
/// Returns `None` when the quota is empty (zero burst).
pub fn with_rate_limit(
    router: Router,
    requests_per_second: u32,
    burst_size: u32,
) -> Option<Router> {
    if requests_per_second >= RATE_LIMIT_DISABLED_AT {
        info!("Rate limiting disabled (rate >= {}/s)", RATE_LIMIT_DISABLED_AT);
        return Some(router);
    }

    let config = GovernorConfigBuilder::default()
        .period(rate_limit_period(requests_per_second))
        .burst_size(burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .finish()?;

    Some(router.layer(GovernorLayer::new(config)))
}
