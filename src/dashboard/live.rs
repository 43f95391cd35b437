use super::{render, RenderModel};
use crate::errors::AppError;
use crate::market::{self, OptionChain, OptionQuote, QuoteRequest, QuoteSource};
use crate::payoff::{OptionParameters, OptionType};
use chrono::NaiveDate;

/// Sidebar inputs of the live variant.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LiveInputs {
    pub ticker: String,
    #[serde(default)]
    pub expiration: Option<NaiveDate>,
    #[serde(default)]
    pub strike: Option<f64>,
    pub option_type: OptionType,
    #[serde(default = "default_contracts")]
    pub contracts: u32,
}

fn default_contracts() -> u32 {
    1
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LiveOutcome {
    Ready {
        quote: OptionQuote,
        available_expirations: Vec<NaiveDate>,
        selectable_strikes: Vec<f64>,
        /// Raw call/put tables for the collapsible panel.
        chain: OptionChain,
        model: RenderModel,
    },
    /// Single error panel. No chart is drawn.
    Failed { ticker: String, message: String },
}

impl LiveOutcome {
    /// Error panel naming the ticker the user typed.
    pub fn failed(ticker: String, err: &AppError) -> Self {
        LiveOutcome::Failed {
            message: format!("Error fetching data for {ticker}: {err}"),
            ticker,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, LiveOutcome::Ready { .. })
    }
}

/// Fetches live data and renders a frame around the live spot price.
/// Every failure, from the network or from the inputs, becomes `Failed`.
pub async fn render_live<S: QuoteSource>(
    source: &S,
    inputs: &LiveInputs,
    band: f64,
    grid_points: usize,
) -> LiveOutcome {
    let ticker = inputs.ticker.trim().to_uppercase();
    let request = QuoteRequest {
        ticker: ticker.clone(),
        expiration: inputs.expiration,
        strike: inputs.strike,
        option_type: inputs.option_type,
    };

    let rendered = match market::resolve(source, &request, band).await {
        Ok(snap) => {
            let params = OptionParameters {
                option_type: snap.quote.option_type,
                underlying_price: snap.quote.spot,
                strike_price: snap.quote.strike,
                premium: snap.quote.premium,
                contracts: inputs.contracts,
            };
            render(&params, grid_points).map(|model| (snap, model))
        }
        Err(e) => Err(e),
    };

    match rendered {
        Ok((snap, model)) => LiveOutcome::Ready {
            quote: snap.quote,
            available_expirations: snap.expirations,
            selectable_strikes: snap.selectable_strikes,
            chain: snap.chain,
            model,
        },
        Err(e) => {
            tracing::warn!(ticker = %ticker, error = %e, "live evaluation failed");
            LiveOutcome::failed(ticker, &e)
        }
    }
}
