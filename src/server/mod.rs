pub mod routes;
pub mod ws;

use crate::dashboard::{self, LiveInputs, LiveOutcome, ManualInputs};
use crate::market;
use crate::state::{AppState, Counters};
use axum::http::StatusCode;
use std::sync::Arc;

/// Full axum app: JSON API, WebSocket, and the static front-end as fallback.
pub fn router(state: Arc<AppState>) -> axum::Router {
    let dashboard_dir = state.config.dashboard_dir.clone();

    axum::Router::new()
        .route("/api/payoff", axum::routing::get(routes::get_payoff))
        .route("/api/live", axum::routing::get(routes::get_live))
        .route("/api/expirations", axum::routing::get(routes::get_expirations))
        .route("/api/counters", axum::routing::get(routes::get_counters))
        .route("/ws", axum::routing::get(ws::ws_handler))
        .fallback_service(
            tower_http::services::ServeDir::new(&dashboard_dir)
                .fallback(tower_http::services::ServeFile::new(dashboard_dir.join("index.html"))),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}

/// 400 reply for inputs that never reach a computation.
pub(crate) fn bad_request(state: &AppState, message: String) -> (StatusCode, serde_json::Value) {
    Counters::bump(&state.counters.invalid_inputs);
    (StatusCode::BAD_REQUEST, serde_json::json!({ "error": message }))
}

/// One manual recompute. Shared by the REST route and the WebSocket.
pub(crate) fn evaluate_manual(
    state: &AppState,
    inputs: &ManualInputs,
) -> (StatusCode, serde_json::Value) {
    match dashboard::render(inputs, state.config.grid_points) {
        Ok(model) => {
            Counters::bump(&state.counters.manual_renders);
            (StatusCode::OK, serde_json::json!(model))
        }
        Err(e) => bad_request(state, e.to_string()),
    }
}

/// One live recompute against the configured quote provider.
pub(crate) async fn evaluate_live(
    state: &AppState,
    inputs: &LiveInputs,
) -> (StatusCode, serde_json::Value) {
    tracing::info!(
        ticker = %inputs.ticker,
        expiration = ?inputs.expiration,
        strike = ?inputs.strike,
        option_type = %inputs.option_type,
        "live evaluation"
    );

    // A malformed ticker is the caller's fault, not the provider's.
    if let Err(e) = market::normalize_ticker(&inputs.ticker) {
        Counters::bump(&state.counters.invalid_inputs);
        let outcome = LiveOutcome::failed(inputs.ticker.trim().to_string(), &e);
        return (StatusCode::BAD_REQUEST, serde_json::json!(outcome));
    }

    let outcome = dashboard::render_live(
        &state.quotes,
        inputs,
        state.config.strike_band,
        state.config.grid_points,
    )
    .await;

    Counters::bump(&state.counters.live_renders);
    let status = match &outcome {
        LiveOutcome::Ready { .. } => StatusCode::OK,
        LiveOutcome::Failed { .. } => {
            Counters::bump(&state.counters.live_failures);
            StatusCode::BAD_GATEWAY
        }
    };
    (status, serde_json::json!(outcome))
}
