// src/scrape/mod.rs
pub mod orchestrator;
pub mod session;
pub mod strategies;
pub mod strategy;

pub use orchestrator::{Orchestrator, RunReport};
pub use session::{create_session_pool, FetchSession};
pub use strategy::{ExtractionStrategy, StrategyRegistry};

use std::time::Duration;

/// A randomized pause length drawn uniformly from the band
/// `[0.75 * base, 1.25 * base]`.
pub fn jitter_ms(base_ms: u64) -> u64 {
    let min = base_ms * 3 / 4;
    let max = base_ms * 5 / 4;
    fastrand::u64(min..=max)
}

/// Sleep for a jittered interval around the configured base delay. Applied
/// between sources and between a strategy's own fetches.
pub async fn pace(base_ms: u64) {
    tokio::time::sleep(Duration::from_millis(jitter_ms(base_ms))).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_inside_the_band() {
        let mut sum: u64 = 0;
        for _ in 0..1000 {
            let delay = jitter_ms(2000);
            assert!((1500..=2500).contains(&delay), "out of band: {delay}");
            sum += delay;
        }
        let mean = sum / 1000;
        assert!((1900..=2100).contains(&mean), "mean drifted: {mean}");
    }

    #[test]
    fn zero_base_never_panics() {
        assert_eq!(jitter_ms(0), 0);
    }
}
