use crate::dashboard::{LiveInputs, ManualInputs};
use crate::market::{self, QuoteSource};
use crate::state::{AppState, CounterSnapshot};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct ExpirationsQuery {
    pub ticker: String,
}

/// Unparseable query strings get the same JSON 400 as failed validation.
fn rejected(state: &AppState, rejection: QueryRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "rejected query string");
    let (status, body) = super::bad_request(state, rejection.body_text());
    (status, Json(body)).into_response()
}

/// GET /api/payoff -- manual frame from sidebar inputs
pub async fn get_payoff(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ManualInputs>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejected(&state, rejection),
    };
    let (status, body) = super::evaluate_manual(&state, &params);
    (status, Json(body)).into_response()
}

/// GET /api/live -- live frame; 502 carries the error panel
pub async fn get_live(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LiveInputs>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejected(&state, rejection),
    };
    let (status, body) = super::evaluate_live(&state, &params).await;
    (status, Json(body)).into_response()
}

/// GET /api/expirations -- spot and expiration list for the date selector
pub async fn get_expirations(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ExpirationsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejected(&state, rejection),
    };
    let ticker = match market::normalize_ticker(&params.ticker) {
        Ok(t) => t,
        Err(e) => {
            let (status, body) = super::bad_request(&state, e.to_string());
            return (status, Json(body)).into_response();
        }
    };

    let result = async {
        let spot = state.quotes.spot_price(&ticker).await?;
        let expirations = state.quotes.expirations(&ticker).await?;
        Ok::<_, crate::errors::AppError>((spot, expirations))
    }
    .await;

    match result {
        Ok((spot, expirations)) => Json(serde_json::json!({
            "ticker": ticker,
            "spot": spot,
            "expirations": expirations,
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(ticker = %ticker, error = %e, "expiration lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": format!("Error fetching data for {ticker}: {e}"),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<CounterSnapshot> {
    Json(state.counters.snapshot())
}
