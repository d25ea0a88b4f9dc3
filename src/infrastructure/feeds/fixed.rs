use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::candle::Series;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::timeframe::Timeframe;

/// In-memory candle feed with a fixed set of series. Used in tests and
/// anywhere behavior should not depend on the filesystem.
#[derive(Default)]
pub struct FixedFeed {
    series: HashMap<(String, Timeframe), Series>,
}

impl FixedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, asset: &str, timeframe: Timeframe, series: Series) -> Self {
        self.series.insert((asset.to_string(), timeframe), series);
        self
    }
}

#[async_trait]
impl MarketDataPort for FixedFeed {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn load_series(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<Series, DomainError> {
        self.series
            .get(&(asset.to_string(), timeframe))
            .cloned()
            .ok_or_else(|| {
                DomainError::Feed(format!("no series for {} on {}", asset, timeframe))
            })
    }
}
