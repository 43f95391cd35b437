use super::types::*;
use super::{OptionChain, OptionRow, QuoteSource};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, Url};

/// Yahoo-Finance style quote client. All methods return Result, never panic.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.quote_timeout_secs))
                .user_agent(config.quote_user_agent.clone())
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_default(),
            base_url: config.quote_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL plus path segments, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("QUOTE_BASE_URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("QUOTE_BASE_URL: {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn public_get<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let path = url.path().to_string();
        let resp = self.client.get(url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::QuoteApi {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().await.map_err(|e| AppError::Parse(format!("GET {path}: {e}")))
    }

    async fn get_options(&self, ticker: &str, date: Option<i64>) -> AppResult<OptionsResult> {
        let url = self.endpoint(&["v7", "finance", "options", ticker])?;
        let query: Vec<(&str, String)> = date.map(|d| ("date", d.to_string())).into_iter().collect();

        let resp: OptionsResponse = self.public_get(url, &query).await?;
        first_result(resp.option_chain.result, resp.option_chain.error, ticker)
    }
}

fn first_result<T>(
    result: Option<Vec<T>>,
    error: Option<ApiErrorBody>,
    ticker: &str,
) -> AppResult<T> {
    if let Some(err) = error {
        return Err(AppError::NoData(format!("{ticker}: {err}")));
    }
    result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::NoData(format!("{ticker}: empty response")))
}

fn unix_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

fn date_to_unix(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

fn to_row(raw: ContractRow) -> Option<OptionRow> {
    let strike = raw.strike.filter(|k| k.is_finite())?;
    Some(OptionRow {
        contract_symbol: raw.contract_symbol.unwrap_or_default(),
        strike,
        bid: raw.bid.unwrap_or(0.0),
        ask: raw.ask.unwrap_or(0.0),
        last_price: raw.last_price.unwrap_or(0.0),
        volume: raw.volume,
        open_interest: raw.open_interest,
        implied_volatility: raw.implied_volatility,
        in_the_money: raw.in_the_money.unwrap_or(false),
    })
}

fn to_chain(result: OptionsResult, expiration: NaiveDate) -> AppResult<OptionChain> {
    let expiry = result
        .options
        .and_then(|o| o.into_iter().next());

    let (calls, puts) = match expiry {
        Some(e) => {
            // The provider answers an unknown date with its nearest expiry.
            if let Some(served) = e.expiration_date.and_then(unix_to_date) {
                if served != expiration {
                    return Err(AppError::NoData(format!(
                        "chain for {expiration} requested, provider returned {served}"
                    )));
                }
            }
            (
                e.calls.unwrap_or_default().into_iter().filter_map(to_row).collect(),
                e.puts.unwrap_or_default().into_iter().filter_map(to_row).collect(),
            )
        }
        None => (Vec::new(), Vec::new()),
    };

    Ok(OptionChain { expiration, calls, puts })
}

impl QuoteSource for YahooClient {
    async fn spot_price(&self, ticker: &str) -> AppResult<f64> {
        let url = self.endpoint(&["v8", "finance", "chart", ticker])?;
        let resp: ChartResponse = self
            .public_get(url, &[("range", "5d".into()), ("interval", "1d".into())])
            .await?;
        let result = first_result(resp.chart.result, resp.chart.error, ticker)?;
        result
            .latest_close()
            .ok_or_else(|| AppError::NoData(format!("{ticker}: no closing price")))
    }

    async fn expirations(&self, ticker: &str) -> AppResult<Vec<NaiveDate>> {
        let result = self.get_options(ticker, None).await?;
        let mut dates: Vec<NaiveDate> = result
            .expiration_dates
            .unwrap_or_default()
            .into_iter()
            .filter_map(unix_to_date)
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    async fn option_chain(&self, ticker: &str, expiration: NaiveDate) -> AppResult<OptionChain> {
        tracing::info!(ticker = %ticker, expiration = %expiration, "fetching option chain");
        let result = self.get_options(ticker, Some(date_to_unix(expiration))).await?;
        to_chain(result, expiration)
    }
}
