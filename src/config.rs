use crate::errors::{AppError, AppResult};
use crate::payoff::DEFAULT_GRID_POINTS;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub quote_base_url: String,
    pub quote_user_agent: String,
    pub quote_timeout_secs: u64,
    /// Fraction of spot on either side within which strikes are offered.
    pub strike_band: f64,
    pub grid_points: usize,
    pub dashboard_dir: PathBuf,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quote_base_url: "https://query2.finance.yahoo.com".into(),
            quote_user_agent: "Mozilla/5.0 (compatible; payoff_dash/0.1)".into(),
            quote_timeout_secs: 10,
            strike_band: 0.20,
            grid_points: DEFAULT_GRID_POINTS,
            dashboard_dir: PathBuf::from("dashboard/dist"),
            server_port: 3001,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be
    /// exercised without touching the process environment.
    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var_or = |key: &str, default: String| lookup(key).unwrap_or(default);

        let quote_timeout_secs = var_or("QUOTE_TIMEOUT_SECS", defaults.quote_timeout_secs.to_string())
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("QUOTE_TIMEOUT_SECS: {e}")))?;

        let strike_band = var_or("STRIKE_BAND", defaults.strike_band.to_string())
            .parse::<f64>()
            .map_err(|e| AppError::Config(format!("STRIKE_BAND: {e}")))?;
        if !(strike_band > 0.0 && strike_band <= 1.0) {
            return Err(AppError::Config(format!(
                "STRIKE_BAND: {strike_band} must be in (0, 1]"
            )));
        }

        let grid_points = var_or("GRID_POINTS", defaults.grid_points.to_string())
            .parse::<usize>()
            .map_err(|e| AppError::Config(format!("GRID_POINTS: {e}")))?;
        if grid_points < 2 {
            return Err(AppError::Config(format!("GRID_POINTS: {grid_points} must be >= 2")));
        }

        let server_port = var_or("SERVER_PORT", defaults.server_port.to_string())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("SERVER_PORT: {e}")))?;

        Ok(Self {
            quote_base_url: var_or("QUOTE_BASE_URL", defaults.quote_base_url),
            quote_user_agent: var_or("QUOTE_USER_AGENT", defaults.quote_user_agent),
            quote_timeout_secs,
            strike_band,
            grid_points,
            dashboard_dir: lookup("DASHBOARD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dashboard_dir),
            server_port,
        })
    }
}
