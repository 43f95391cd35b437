//! Local HTTP stand-in for the quote provider, serving captured payloads.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 2023-11-17 and 2023-11-24, midnight UTC.
pub const NEAR_EXPIRY: i64 = 1700179200;
pub const FAR_EXPIRY: i64 = 1700784000;

/// Listed ticker whose options endpoint always answers with `FAR_EXPIRY`.
pub const MISLABELLED: &str = "SKEW";

pub const SPOT: f64 = 189.7;

/// Request targets (path and query) in arrival order.
#[derive(Clone, Default)]
pub struct Requests(Arc<Mutex<Vec<String>>>);

impl Requests {
    pub fn seen(&self) -> Vec<String> {
        self.0.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn record(&self, uri: &Uri) {
        if let Ok(mut v) = self.0.lock() {
            v.push(uri.to_string());
        }
    }
}

fn listed(ticker: &str) -> bool {
    ticker == "AAPL" || ticker == MISLABELLED
}

fn not_found(envelope: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            envelope: {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })),
    )
        .into_response()
}

async fn chart(State(requests): State<Requests>, Path(ticker): Path<String>, uri: Uri) -> Response {
    requests.record(&uri);
    if !listed(&ticker) {
        return not_found("chart");
    }
    Json(serde_json::json!({
        "chart": {
            "result": [{
                "meta": { "regularMarketPrice": 190.1 },
                "indicators": { "quote": [{ "close": [187.5, SPOT, null] }] }
            }],
            "error": null
        }
    }))
    .into_response()
}

fn rows(kind: char) -> Vec<serde_json::Value> {
    (0..17)
        .map(|i| {
            let strike = 150.0 + 5.0 * i as f64;
            serde_json::json!({
                "contractSymbol": format!("AAPL231117{kind}{:08}", (strike * 1000.0) as i64),
                "strike": strike,
                "bid": 2.0,
                "ask": 2.4,
                "lastPrice": 2.2,
                "volume": 100,
                "openInterest": 1000,
                "impliedVolatility": 0.22,
                "inTheMoney": false
            })
        })
        .collect()
}

async fn options(
    State(requests): State<Requests>,
    Path(ticker): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
) -> Response {
    requests.record(&uri);
    if !listed(&ticker) {
        return not_found("optionChain");
    }

    let served = if ticker == MISLABELLED {
        FAR_EXPIRY
    } else {
        params
            .get("date")
            .and_then(|d| d.parse::<i64>().ok())
            .unwrap_or(NEAR_EXPIRY)
    };

    Json(serde_json::json!({
        "optionChain": {
            "result": [{
                // Unsorted with a duplicate, as the provider sometimes sends
                "expirationDates": [FAR_EXPIRY, NEAR_EXPIRY, FAR_EXPIRY],
                "options": [{
                    "expirationDate": served,
                    "calls": rows('C'),
                    "puts": rows('P')
                }]
            }],
            "error": null
        }
    }))
    .into_response()
}

/// Starts the stub on an ephemeral port; returns its base URL.
pub async fn spawn() -> (String, Requests) {
    let requests = Requests::default();
    let app = axum::Router::new()
        .route("/v8/finance/chart/{ticker}", get(chart))
        .route("/v7/finance/options/{ticker}", get(options))
        .with_state(requests.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), requests)
}
