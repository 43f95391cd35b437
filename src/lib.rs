//! Profit/loss at expiration for a single long option position, served as
//! a headless dashboard backend with an optional live option-chain feed.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod market;
pub mod payoff;
pub mod server;
pub mod state;
