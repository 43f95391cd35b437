//! Render models for one dashboard frame.
//!
//! Every input event is turned into a complete frame by a pure function.
//! Nothing is carried over from the previous frame; the front-end just
//! draws what it is given.

pub mod live;

pub use live::{render_live, LiveInputs, LiveOutcome};

use crate::errors::AppResult;
use crate::payoff::{self, MaxProfit, OptionParameters, OptionType, PayoffCurve};

pub const CHART_TITLE: &str = "Options P&L at Expiration";
pub const X_LABEL: &str = "Stock Price at Expiration ($)";
pub const Y_LABEL: &str = "Profit / Loss ($)";

/// Sidebar inputs of the manual variant.
pub type ManualInputs = OptionParameters;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TradeSummary {
    pub option_type: OptionType,
    pub strike: f64,
    pub premium: f64,
    /// "Paid" for a positive premium, otherwise "Received".
    pub premium_label: &'static str,
    pub breakeven: f64,
}

impl TradeSummary {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Option Type: {}", self.option_type),
            format!("Strike Price: {}", dollars(self.strike)),
            format!("Premium {}: {}", self.premium_label, dollars(self.premium)),
            format!("Breakeven Price: {}", dollars(self.breakeven)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartSpec {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Horizontal reference line.
    pub zero_line: f64,
    /// Vertical marker at the current underlying price.
    pub current_price: f64,
    pub series: PayoffCurve,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Metrics {
    pub max_profit: MaxProfit,
    pub max_loss: f64,
    pub max_profit_display: String,
    pub max_loss_display: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RenderModel {
    pub summary: TradeSummary,
    pub summary_lines: Vec<String>,
    pub chart: ChartSpec,
    pub metrics: Metrics,
}

/// `$x.xx`, with the sign ahead of the dollar sign for negatives.
pub fn dollars(value: f64) -> String {
    // Round first so amounts under half a cent never print as "-$0.00";
    // adding 0.0 turns -0.0 into 0.0.
    let value = (value * 100.0).round() / 100.0 + 0.0;
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

/// Builds a frame for `params`, charted around `params.underlying_price`.
/// Parameters are validated first; the calculator never sees bad input.
pub fn render(params: &ManualInputs, grid_points: usize) -> AppResult<RenderModel> {
    params.validate()?;

    let stats = payoff::summarize(params);
    let summary = TradeSummary {
        option_type: params.option_type,
        strike: params.strike_price,
        premium: params.premium,
        premium_label: if params.premium > 0.0 { "Paid" } else { "Received" },
        breakeven: stats.breakeven,
    };

    let chart = ChartSpec {
        title: CHART_TITLE,
        x_label: X_LABEL,
        y_label: Y_LABEL,
        zero_line: 0.0,
        current_price: params.underlying_price,
        series: payoff::compute_with_points(params, params.underlying_price, grid_points),
    };

    let metrics = Metrics {
        max_profit: stats.max_profit,
        max_loss: stats.max_loss,
        max_profit_display: match stats.max_profit {
            MaxProfit::Unlimited => "Unlimited".to_string(),
            MaxProfit::Bounded(v) => dollars(v),
        },
        max_loss_display: dollars(stats.max_loss),
    };

    tracing::debug!(
        option_type = %params.option_type,
        strike = params.strike_price,
        premium = params.premium,
        contracts = params.contracts,
        "frame rendered"
    );

    Ok(RenderModel {
        summary_lines: summary.lines(),
        summary,
        chart,
        metrics,
    })
}
