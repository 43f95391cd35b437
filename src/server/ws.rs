use crate::dashboard::{LiveInputs, ManualInputs};
use crate::state::{AppState, Counters};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

/// One input-change event from the front-end.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    Manual(ManualInputs),
    Live(LiveInputs),
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Turns one text frame into one reply frame. Unparseable events get an
/// error reply instead of closing the socket.
pub(crate) async fn handle_event(state: &AppState, text: &str) -> serde_json::Value {
    match serde_json::from_str::<InputEvent>(text) {
        Ok(InputEvent::Manual(inputs)) => super::evaluate_manual(state, &inputs).1,
        Ok(InputEvent::Live(inputs)) => super::evaluate_live(state, &inputs).await.1,
        Err(e) => {
            Counters::bump(&state.counters.invalid_inputs);
            serde_json::json!({ "error": format!("bad input event: {e}") })
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!("dashboard client connected");

    // Events are handled in arrival order; each reply is a full frame, so a
    // newer event simply supersedes whatever the client drew last.
    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            _ => continue,
        };

        let reply = handle_event(&state, text.as_str()).await;
        match serde_json::to_string(&reply) {
            Ok(json) => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
                Counters::bump(&state.counters.ws_messages_sent);
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode frame"),
        }
    }

    tracing::debug!("dashboard client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn state() -> Arc<AppState> {
        AppState::new(AppConfig {
            quote_base_url: "http://127.0.0.1:9".into(),
            quote_timeout_secs: 2,
            ..AppConfig::default()
        })
    }

    #[tokio::test]
    async fn test_manual_event_returns_frame() {
        let state = state();
        let reply = handle_event(
            &state,
            r#"{"type":"manual","option_type":"put","underlying_price":100,"strike_price":105,"premium":3,"contracts":2}"#,
        )
        .await;
        assert_eq!(reply["summary"]["breakeven"], 102.0);
        assert_eq!(reply["metrics"]["max_loss"], 600.0);
        assert_eq!(state.counters.snapshot().manual_renders, 1);
    }

    #[tokio::test]
    async fn test_malformed_event_gets_error_reply() {
        let state = state();
        let reply = handle_event(&state, r#"{"type":"unknown"}"#).await;
        assert!(reply["error"].as_str().is_some_and(|e| e.starts_with("bad input event")));
        assert_eq!(state.counters.snapshot().invalid_inputs, 1);
    }

    #[tokio::test]
    async fn test_live_event_failure_reply() {
        let state = state();
        let reply = handle_event(&state, r#"{"type":"live","ticker":"qqq","option_type":"put"}"#).await;
        assert_eq!(reply["status"], "failed");
        assert_eq!(state.counters.snapshot().live_failures, 1);
    }
}
