use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{chat, tts, voices};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router, nested under `/api` in main.rs
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tts", post(tts::tts_handler))
        .route("/chat", post(chat::chat_handler))
        .route("/voices", get(voices::list_voices))
        .layer(TraceLayer::new_for_http())
}
