//! Response-time aggregation for one endpoint's result window.

use super::status::HealthResult;

/// Min/max/average latency over a result window, in whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTimeStats {
    pub min_ms: u64,
    pub max_ms: u64,
    pub average_ms: u64,
}

impl ResponseTimeStats {
    /// Aggregate a snapshot's results.
    ///
    /// Each sample's nanosecond duration is truncated to whole
    /// milliseconds first; min and max are taken over those truncated
    /// values, and the average is the mean of the truncated values
    /// rounded to the nearest integer. The truncate-then-aggregate order
    /// matters: aggregating raw nanoseconds would disagree with the
    /// per-sample values shown elsewhere in the UI.
    pub fn from_results(results: &[HealthResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let mut min_ms = u64::MAX;
        let mut max_ms = 0u64;
        let mut total_ms = 0u64;
        for result in results {
            let ms = result.duration / 1_000_000;
            min_ms = min_ms.min(ms);
            max_ms = max_ms.max(ms);
            total_ms += ms;
        }
        let average_ms = (total_ms as f64 / results.len() as f64).round() as u64;

        Some(Self {
            min_ms,
            max_ms,
            average_ms,
        })
    }
}
