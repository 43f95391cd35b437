pub mod curve;
pub mod summary;

pub use curve::{compute, compute_with_points, price_grid, PayoffCurve, PayoffPoint};
pub use summary::{breakeven, max_loss, max_profit, summarize, MaxProfit, PayoffSummary};

use crate::errors::{AppError, AppResult};

/// Shares controlled by one equity option contract. Not configurable.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Samples across the expiration price grid.
pub const DEFAULT_GRID_POINTS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff per share if exercised at `price`, ignoring the premium.
    #[inline]
    pub fn intrinsic(self, strike: f64, price: f64) -> f64 {
        match self {
            Self::Call => (price - strike).max(0.0),
            Self::Put => (strike - price).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "Call"),
            Self::Put => write!(f, "Put"),
        }
    }
}

/// One long option position, as entered for a single evaluation.
///
/// `premium` is per share. A negative premium is accepted and flows through
/// the same formulas; the position is still treated as long.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptionParameters {
    pub option_type: OptionType,
    pub underlying_price: f64,
    pub strike_price: f64,
    pub premium: f64,
    pub contracts: u32,
}

impl OptionParameters {
    /// Rejects inputs the dashboard should never chart.
    /// The calculator itself does not call this.
    pub fn validate(&self) -> AppResult<()> {
        if !self.underlying_price.is_finite() || self.underlying_price <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "underlying price must be positive, got {}",
                self.underlying_price
            )));
        }
        if !self.strike_price.is_finite() || self.strike_price <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "strike price must be positive, got {}",
                self.strike_price
            )));
        }
        if !self.premium.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "premium must be finite, got {}",
                self.premium
            )));
        }
        if self.contracts == 0 {
            return Err(AppError::InvalidInput("contracts must be at least 1".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn profit_per_share(&self, price: f64) -> f64 {
        self.option_type.intrinsic(self.strike_price, price) - self.premium
    }

    #[inline]
    pub fn total_profit(&self, price: f64) -> f64 {
        self.profit_per_share(price) * self.position_shares()
    }

    /// contracts × multiplier
    #[inline]
    pub fn position_shares(&self) -> f64 {
        self.contracts as f64 * CONTRACT_MULTIPLIER
    }
}

#[cfg(test)]
pub(crate) fn sample(option_type: OptionType) -> OptionParameters {
    OptionParameters {
        option_type,
        underlying_price: 100.0,
        strike_price: 105.0,
        premium: 3.0,
        contracts: 1,
    }
}
