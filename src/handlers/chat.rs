use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt, stream::BoxStream};
use tracing::{debug, error};

use crate::core::chat::{ChatRequest, ChatResult, ChatStreamEvent};
use crate::errors::app_error::INVALID_MESSAGES;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Turn upstream deltas into relayed events.
///
/// Every delta becomes a `token` event. An upstream failure becomes one
/// `error` event and stops reading. `done` is always last.
fn relay_events(
    mut tokens: BoxStream<'static, ChatResult<String>>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    async_stream::stream! {
        while let Some(item) = tokens.next().await {
            match item {
                Ok(content) => {
                    yield Event::default().json_data(ChatStreamEvent::Token { content });
                }
                Err(e) => {
                    error!("Chat stream failed: {}", e);
                    yield Event::default().json_data(ChatStreamEvent::Error { error: e.to_string() });
                    break;
                }
            }
        }
        yield Event::default().json_data(ChatStreamEvent::Done);
    }
}

/// Relay a tutor reply as server-sent events.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejecting chat request: {}", e);
        AppError::InvalidInput(INVALID_MESSAGES.to_string())
    })?;

    let client = state.chat_client()?;
    let tokens = client.stream_completion(&request.messages).await?;

    Ok(Sse::new(relay_events(tokens)).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::ChatError;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use futures::stream;
    use serde_json::{Value, json};

    async fn relayed(items: Vec<ChatResult<String>>) -> Vec<Value> {
        let response = Sse::new(relay_events(stream::iter(items).boxed())).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec())
            .unwrap()
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| serde_json::from_str(data.trim()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_mid_stream_failure_emits_error_then_done() {
        let events = relayed(vec![
            Ok("你好".to_string()),
            Err(ChatError::StreamError("connection reset".to_string())),
            Ok("never relayed".to_string()),
        ])
        .await;

        assert_eq!(
            events,
            vec![
                json!({"type": "token", "content": "你好"}),
                json!({"type": "error", "error": "Stream error: connection reset"}),
                json!({"type": "done"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_upstream_still_emits_done() {
        assert_eq!(relayed(Vec::new()).await, vec![json!({"type": "done"})]);
    }
}
