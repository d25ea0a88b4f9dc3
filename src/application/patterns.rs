use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::patterns::{self, PatternRead, PATTERN_LOOKBACK};
use crate::domain::values::timeframe::Timeframe;

#[derive(Debug, Serialize)]
pub struct PatternReport {
    pub asset: String,
    pub timeframe: Timeframe,
    pub generated_at: DateTime<Utc>,
    pub patterns: PatternRead,
}

pub struct RecognizePatterns {
    feed: Arc<dyn MarketDataPort>,
}

impl RecognizePatterns {
    pub fn new(feed: Arc<dyn MarketDataPort>) -> Self {
        Self { feed }
    }

    pub async fn execute(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<PatternReport, DomainError> {
        let series = self.feed.load_series(asset, timeframe).await?;
        let patterns = patterns::recognize_patterns(&series.closes(), PATTERN_LOOKBACK);

        Ok(PatternReport {
            asset: asset.to_string(),
            timeframe,
            generated_at: Utc::now(),
            patterns,
        })
    }
}
