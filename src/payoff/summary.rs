//! Closed-form summary metrics for a long single-leg position.
//! All functions are pure and independent of the price grid.

use super::{OptionParameters, OptionType};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MaxProfit {
    /// No ceiling (long call).
    Unlimited,
    Bounded(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PayoffSummary {
    pub breakeven: f64,
    pub max_profit: MaxProfit,
    pub max_loss: f64,
}

/// Underlying price at expiration where P/L is zero.
#[inline]
pub fn breakeven(params: &OptionParameters) -> f64 {
    match params.option_type {
        OptionType::Call => params.strike_price + params.premium,
        OptionType::Put => params.strike_price - params.premium,
    }
}

/// Premium paid for the whole position. Same for calls and puts.
#[inline]
pub fn max_loss(params: &OptionParameters) -> f64 {
    params.premium * params.position_shares()
}

/// Long put profit is capped by the underlying going to zero.
#[inline]
pub fn max_profit(params: &OptionParameters) -> MaxProfit {
    match params.option_type {
        OptionType::Call => MaxProfit::Unlimited,
        OptionType::Put => {
            MaxProfit::Bounded((params.strike_price - params.premium) * params.position_shares())
        }
    }
}

pub fn summarize(params: &OptionParameters) -> PayoffSummary {
    PayoffSummary {
        breakeven: breakeven(params),
        max_profit: max_profit(params),
        max_loss: max_loss(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::{compute, sample};

    #[test]
    fn test_breakeven() {
        assert!((breakeven(&sample(OptionType::Call)) - 108.0).abs() < 1e-12);
        assert!((breakeven(&sample(OptionType::Put)) - 102.0).abs() < 1e-12);
    }

    #[test]
    fn test_breakeven_is_zero_pnl() {
        for t in [OptionType::Call, OptionType::Put] {
            let p = sample(t);
            let pnl = p.total_profit(breakeven(&p));
            assert!(pnl.abs() < 1e-9, "{t} P/L at breakeven = {pnl}");
        }
    }

    #[test]
    fn test_max_loss_same_for_both_types() {
        for t in [OptionType::Call, OptionType::Put] {
            for c in [1u32, 3, 10] {
                let p = OptionParameters { contracts: c, ..sample(t) };
                assert!((max_loss(&p) - 300.0 * c as f64).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_max_loss_matches_curve_floor() {
        for t in [OptionType::Call, OptionType::Put] {
            let p = sample(t);
            let floor = compute(&p, 100.0)
                .points
                .iter()
                .map(|pt| pt.profit_loss)
                .fold(f64::INFINITY, f64::min);
            assert!((floor + max_loss(&p)).abs() < 1e-9, "{t}: floor={floor}");
        }
    }

    #[test]
    fn test_max_profit() {
        assert_eq!(max_profit(&sample(OptionType::Call)), MaxProfit::Unlimited);
        assert_eq!(
            max_profit(&sample(OptionType::Put)),
            MaxProfit::Bounded((105.0 - 3.0) * 100.0)
        );
    }

    #[test]
    fn test_max_profit_serialises_as_sentinel() {
        let json = serde_json::to_value(MaxProfit::Unlimited).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "unlimited" }));
        let json = serde_json::to_value(MaxProfit::Bounded(10200.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "bounded", "value": 10200.0 }));
    }
}
