pub mod client;
#[cfg(test)]
pub(crate) mod stub;
pub mod types;

use crate::errors::{AppError, AppResult};
use crate::payoff::OptionType;
use chrono::NaiveDate;
use std::future::Future;

/// Strikes closer than this are treated as the same listing.
const STRIKE_EPSILON: f64 = 1e-6;

const MAX_TICKER_LEN: usize = 16;

/// Anything that can answer the three questions the live dashboard asks.
/// Implementations return errors as values and never retry.
pub trait QuoteSource: Send + Sync {
    fn spot_price(&self, ticker: &str) -> impl Future<Output = AppResult<f64>> + Send;

    /// Available expirations, nearest first.
    fn expirations(&self, ticker: &str) -> impl Future<Output = AppResult<Vec<NaiveDate>>> + Send;

    fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> impl Future<Output = AppResult<OptionChain>> + Send;
}

/// One row of a chain table, as the provider reports it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OptionRow {
    pub contract_symbol: String,
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
    pub last_price: f64,
    pub volume: Option<i64>,
    pub open_interest: Option<i64>,
    pub implied_volatility: Option<f64>,
    pub in_the_money: bool,
}

impl OptionRow {
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OptionChain {
    pub expiration: NaiveDate,
    pub calls: Vec<OptionRow>,
    pub puts: Vec<OptionRow>,
}

impl OptionChain {
    pub fn rows(&self, option_type: OptionType) -> &[OptionRow] {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }
}

/// The live premium and strike for one position. Lives for one refresh.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OptionQuote {
    pub ticker: String,
    pub spot: f64,
    pub option_type: OptionType,
    pub expiration: NaiveDate,
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
    /// Midpoint of bid and ask.
    pub premium: f64,
}

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub ticker: String,
    /// `None` selects the nearest listed expiration.
    pub expiration: Option<NaiveDate>,
    /// `None` selects the in-band strike nearest to spot.
    pub strike: Option<f64>,
    pub option_type: OptionType,
}

/// Everything gathered while resolving a quote. The dashboard shows all of
/// it; `fetch_quote` keeps only the quote.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub quote: OptionQuote,
    pub expirations: Vec<NaiveDate>,
    pub selectable_strikes: Vec<f64>,
    pub chain: OptionChain,
}

/// Strikes within ±`band` of `spot`, ascending, duplicates removed.
pub fn strikes_within_band(strikes: impl IntoIterator<Item = f64>, spot: f64, band: f64) -> Vec<f64> {
    let lo = spot * (1.0 - band);
    let hi = spot * (1.0 + band);
    let mut out: Vec<f64> = strikes
        .into_iter()
        .filter(|k| k.is_finite() && *k >= lo && *k <= hi)
        .collect();
    out.sort_by(f64::total_cmp);
    out.dedup_by(|a, b| (*a - *b).abs() < STRIKE_EPSILON);
    out
}

/// Trimmed, upper-cased ticker limited to `[A-Z0-9.^=-]{1,16}`.
/// Covers share classes (`BRK.B`), indices (`^SPX`) and FX (`EURUSD=X`).
pub fn normalize_ticker(raw: &str) -> AppResult<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::InvalidInput("ticker is empty".into()));
    }
    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(AppError::InvalidInput(format!(
            "ticker longer than {MAX_TICKER_LEN} characters"
        )));
    }
    if let Some(bad) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
    {
        return Err(AppError::InvalidInput(format!(
            "ticker contains invalid character {bad:?}"
        )));
    }
    Ok(ticker)
}

fn nearest_to(values: &[f64], target: f64) -> Option<f64> {
    values
        .iter()
        .copied()
        .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
}

/// Resolves spot, expiration, chain and the selected row in one pass.
/// Any failure abandons the whole resolution.
pub async fn resolve<S: QuoteSource>(
    source: &S,
    request: &QuoteRequest,
    band: f64,
) -> AppResult<MarketSnapshot> {
    let ticker = normalize_ticker(&request.ticker)?;

    let spot = source.spot_price(&ticker).await?;
    if !spot.is_finite() || spot <= 0.0 {
        return Err(AppError::NoData(format!("invalid spot price {spot} for {ticker}")));
    }

    let expirations = source.expirations(&ticker).await?;
    let expiration = match request.expiration {
        Some(wanted) if expirations.contains(&wanted) => wanted,
        Some(wanted) => {
            return Err(AppError::NoData(format!("{ticker} has no expiration on {wanted}")));
        }
        None => *expirations
            .first()
            .ok_or_else(|| AppError::NoData(format!("no option expirations listed for {ticker}")))?,
    };

    let chain = source.option_chain(&ticker, expiration).await?;
    let rows = chain.rows(request.option_type);
    if rows.is_empty() {
        return Err(AppError::NoData(format!(
            "no {} contracts for {ticker} expiring {expiration}",
            request.option_type
        )));
    }

    let mut selectable_strikes = strikes_within_band(rows.iter().map(|r| r.strike), spot, band);
    if selectable_strikes.is_empty() {
        // Nothing near the money; offer the whole chain instead of nothing.
        selectable_strikes = strikes_within_band(rows.iter().map(|r| r.strike), spot, f64::INFINITY);
    }

    let strike = match request.strike {
        Some(k) => k,
        None => nearest_to(&selectable_strikes, spot)
            .ok_or_else(|| AppError::NoData(format!("no usable strikes for {ticker}")))?,
    };

    let row = rows
        .iter()
        .find(|r| (r.strike - strike).abs() < STRIKE_EPSILON)
        .ok_or_else(|| {
            AppError::NoData(format!(
                "no {} at strike {strike} for {ticker} expiring {expiration}",
                request.option_type
            ))
        })?;

    tracing::debug!(
        ticker = %ticker,
        expiration = %expiration,
        strike = strike,
        bid = row.bid,
        ask = row.ask,
        "quote resolved"
    );

    let quote = OptionQuote {
        ticker,
        spot,
        option_type: request.option_type,
        expiration,
        strike: row.strike,
        bid: row.bid,
        ask: row.ask,
        premium: row.mid(),
    };

    Ok(MarketSnapshot {
        quote,
        expirations,
        selectable_strikes,
        chain,
    })
}

pub async fn fetch_quote<S: QuoteSource>(
    source: &S,
    request: &QuoteRequest,
    band: f64,
) -> AppResult<OptionQuote> {
    resolve(source, request, band).await.map(|snap| snap.quote)
}
