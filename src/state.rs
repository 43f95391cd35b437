use crate::config::AppConfig;
use crate::market::client::YahooClient;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Performance Counters (lock-free, read by /api/counters) ──

#[derive(Debug, Default)]
pub struct Counters {
    pub manual_renders: AtomicU64,
    pub live_renders: AtomicU64,
    pub live_failures: AtomicU64,
    pub invalid_inputs: AtomicU64,
    pub ws_messages_sent: AtomicU64,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CounterSnapshot {
    pub manual_renders: u64,
    pub live_renders: u64,
    pub live_failures: u64,
    pub invalid_inputs: u64,
    pub ws_messages_sent: u64,
}

impl Counters {
    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            manual_renders: self.manual_renders.load(Ordering::Relaxed),
            live_renders: self.live_renders.load(Ordering::Relaxed),
            live_failures: self.live_failures.load(Ordering::Relaxed),
            invalid_inputs: self.invalid_inputs.load(Ordering::Relaxed),
            ws_messages_sent: self.ws_messages_sent.load(Ordering::Relaxed),
        }
    }
}

// ── Shared app state ──
// Immutable config plus the quote client. Counters are the only thing that
// changes, and nothing reads them back into a computation.

pub struct AppState {
    pub config: AppConfig,
    pub quotes: YahooClient,
    pub counters: Counters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let quotes = YahooClient::new(&config);
        Arc::new(Self {
            config,
            quotes,
            counters: Counters::default(),
        })
    }
}
