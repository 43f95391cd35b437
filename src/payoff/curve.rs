use super::{OptionParameters, DEFAULT_GRID_POINTS};

/// Lower and upper grid bounds as multiples of the reference price.
const GRID_LOW: f64 = 0.5;
const GRID_HIGH: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PayoffPoint {
    pub price: f64,
    pub profit_loss: f64,
}

/// P/L at expiration over an ascending price grid. Derived, never mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PayoffCurve {
    pub points: Vec<PayoffPoint>,
}

impl PayoffCurve {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PayoffPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PayoffPoint> {
        self.points.last()
    }

    /// P/L at the grid sample closest to `price`.
    pub fn profit_at_nearest(&self, price: f64) -> Option<f64> {
        self.points
            .iter()
            .min_by(|a, b| {
                (a.price - price)
                    .abs()
                    .total_cmp(&(b.price - price).abs())
            })
            .map(|p| p.profit_loss)
    }

    /// Prices where the curve crosses zero, linearly interpolated between
    /// adjacent samples. A sample sitting exactly on zero counts once.
    pub fn crossings(&self) -> Vec<f64> {
        let mut out = Vec::new();
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.profit_loss == 0.0 {
                out.push(a.price);
            } else if a.profit_loss.signum() != b.profit_loss.signum() && b.profit_loss != 0.0 {
                let t = a.profit_loss / (a.profit_loss - b.profit_loss);
                out.push(a.price + t * (b.price - a.price));
            }
        }
        if let Some(last) = self.points.last() {
            if last.profit_loss == 0.0 {
                out.push(last.price);
            }
        }
        out
    }
}

/// `points` evenly spaced prices over [0.5·ref, 1.5·ref], endpoints exact.
/// Fewer than two points is treated as two.
pub fn price_grid(reference_price: f64, points: usize) -> Vec<f64> {
    let n = points.max(2);
    let lo = reference_price * GRID_LOW;
    let hi = reference_price * GRID_HIGH;
    let step = (hi - lo) / (n - 1) as f64;

    let mut grid: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
    // Pin the top end so rounding in `step` never shifts it.
    grid[n - 1] = hi;
    grid
}

pub fn compute(params: &OptionParameters, reference_price: f64) -> PayoffCurve {
    compute_with_points(params, reference_price, DEFAULT_GRID_POINTS)
}

pub fn compute_with_points(
    params: &OptionParameters,
    reference_price: f64,
    points: usize,
) -> PayoffCurve {
    let points = price_grid(reference_price, points)
        .into_iter()
        .map(|price| PayoffPoint {
            price,
            profit_loss: params.total_profit(price),
        })
        .collect();
    PayoffCurve { points }
}
