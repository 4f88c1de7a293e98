use crate::models::Stats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// In-process request counters.
pub struct Analytics {
    abi_parsed: AtomicU64,
    estimates_total: AtomicU64,
    estimates_failed: AtomicU64,
    estimates_superseded: AtomicU64,
    simulations_total: AtomicU64,
    fee_windows_total: AtomicU64,
    start_time: Instant,
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}

impl Analytics {
    pub fn new() -> Self {
        Self {
            abi_parsed: AtomicU64::new(0),
            estimates_total: AtomicU64::new(0),
            estimates_failed: AtomicU64::new(0),
            estimates_superseded: AtomicU64::new(0),
            simulations_total: AtomicU64::new(0),
            fee_windows_total: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_abi_parsed(&self) {
        self.abi_parsed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_estimate(&self, succeeded: bool) {
        self.estimates_total.fetch_add(1, Ordering::SeqCst);
        if !succeeded {
            self.estimates_failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn record_superseded(&self) {
        self.estimates_superseded.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_simulation(&self) {
        self.simulations_total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_fee_window(&self) {
        self.fee_windows_total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_stats(&self) -> Stats {
        Stats {
            abi_parsed: self.abi_parsed.load(Ordering::SeqCst),
            estimates_total: self.estimates_total.load(Ordering::SeqCst),
            estimates_failed: self.estimates_failed.load(Ordering::SeqCst),
            estimates_superseded: self.estimates_superseded.load(Ordering::SeqCst),
            simulations_total: self.simulations_total.load(Ordering::SeqCst),
            fee_windows_total: self.fee_windows_total.load(Ordering::SeqCst),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_estimates_and_failures() {
        let analytics = Analytics::new();
        analytics.record_estimate(true);
        analytics.record_estimate(false);
        analytics.record_superseded();
        analytics.record_abi_parsed();

        let stats = analytics.get_stats();
        assert_eq!(stats.estimates_total, 2);
        assert_eq!(stats.estimates_failed, 1);
        assert_eq!(stats.estimates_superseded, 1);
        assert_eq!(stats.abi_parsed, 1);
        assert_eq!(stats.simulations_total, 0);
    }
}
