use serde::Deserialize;

// ── Chart endpoint (/v8/finance/chart/{ticker}) ──

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: Option<ChartMeta>,
    pub indicators: Option<ChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    pub quote: Option<Vec<ChartQuote>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    pub close: Option<Vec<Option<f64>>>,
}

impl ChartResult {
    /// Last non-null daily close, falling back to the regular market price.
    pub fn latest_close(&self) -> Option<f64> {
        self.indicators
            .as_ref()
            .and_then(|ind| ind.quote.as_ref())
            .and_then(|q| q.first())
            .and_then(|q| q.close.as_ref())
            .and_then(|closes| closes.iter().rev().find_map(|c| *c))
            .or_else(|| self.meta.as_ref().and_then(|m| m.regular_market_price))
    }
}

// ── Options endpoint (/v7/finance/options/{ticker}) ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub option_chain: OptionsEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionsEnvelope {
    pub result: Option<Vec<OptionsResult>>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResult {
    /// Unix seconds, midnight UTC of each expiration day.
    pub expiration_dates: Option<Vec<i64>>,
    pub options: Option<Vec<OptionsForExpiry>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsForExpiry {
    pub expiration_date: Option<i64>,
    pub calls: Option<Vec<ContractRow>>,
    pub puts: Option<Vec<ContractRow>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRow {
    pub contract_symbol: Option<String>,
    pub strike: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub last_price: Option<f64>,
    pub volume: Option<i64>,
    pub open_interest: Option<i64>,
    pub implied_volatility: Option<f64>,
    pub in_the_money: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.code.as_deref().unwrap_or("error"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "AAPL", "regularMarketPrice": 189.91 },
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": { "quote": [{ "close": [187.5, 189.7, null] }] }
            }],
            "error": null
        }
    }"#;

    const OPTIONS_SAMPLE: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "AAPL",
                "expirationDates": [1700179200, 1700784000],
                "strikes": [180.0, 190.0],
                "quote": { "regularMarketPrice": 189.91 },
                "options": [{
                    "expirationDate": 1700179200,
                    "calls": [{
                        "contractSymbol": "AAPL231117C00190000",
                        "strike": 190.0,
                        "bid": 1.9,
                        "ask": 2.1,
                        "lastPrice": 2.0,
                        "volume": 5012,
                        "openInterest": 23011,
                        "impliedVolatility": 0.21,
                        "inTheMoney": false
                    }],
                    "puts": [{ "contractSymbol": "AAPL231117P00180000", "strike": 180.0 }]
                }]
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_latest_close_skips_null() {
        let resp: ChartResponse = serde_json::from_str(CHART_SAMPLE).unwrap();
        let results = resp.chart.result.unwrap();
        assert_eq!(results[0].latest_close(), Some(189.7));
    }

    #[test]
    fn test_chart_falls_back_to_meta_price() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":42.5}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(resp.chart.result.unwrap()[0].latest_close(), Some(42.5));
    }

    #[test]
    fn test_parse_options_sample() {
        let resp: OptionsResponse = serde_json::from_str(OPTIONS_SAMPLE).unwrap();
        let results = resp.option_chain.result.unwrap();
        let result = &results[0];
        assert_eq!(result.expiration_dates.as_deref(), Some(&[1700179200, 1700784000][..]));

        let expiry = &result.options.as_ref().unwrap()[0];
        let call = &expiry.calls.as_ref().unwrap()[0];
        assert_eq!(call.strike, Some(190.0));
        assert_eq!(call.in_the_money, Some(false));

        // Sparse rows still parse
        let put = &expiry.puts.as_ref().unwrap()[0];
        assert_eq!(put.bid, None);
    }

    #[test]
    fn test_parse_api_error() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        let err = resp.chart.error.unwrap();
        assert_eq!(err.to_string(), "Not Found: No data found, symbol may be delisted");
    }
}
