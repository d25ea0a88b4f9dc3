//! Shared test helpers.

use chrono::{Duration, TimeZone, Utc};
use gannscope::domain::entities::candle::{Candle, Series};
use gannscope::infrastructure::feeds::fixed::FixedFeed;
use gannscope::GannScope;
use std::sync::Arc;

pub fn scope(feed: FixedFeed) -> GannScope {
    GannScope::with_feed(Arc::new(feed))
}

/// Daily candles walked along the given closes, highs and lows hugging
/// each close at half a percent.
pub fn series_from_closes(closes: &[f64]) -> Series {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let candles: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            time: start + Duration::days(i as i64),
            open: close * 0.998,
            high: close * 1.005,
            low: close * 0.995,
            close,
        })
        .collect();
    Series::new(candles, None).unwrap()
}

/// Forty rising closes, 100 through 139. Classifies as a bull campaign
/// near the top of its range on any frame.
pub fn bull_closes() -> Vec<f64> {
    (0..40).map(|i| 100.0 + i as f64).collect()
}

/// Forty falling closes, 140 through 101.
pub fn bear_closes() -> Vec<f64> {
    (0..40).map(|i| 140.0 - i as f64).collect()
}
