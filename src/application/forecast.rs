use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::cycles::{
    self, CycleForecast, DEFAULT_CYCLE_LENGTHS, DEFAULT_CYCLE_LOOKBACK,
};
use crate::domain::values::timeframe::Timeframe;

#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub asset: String,
    pub timeframe: Timeframe,
    pub generated_at: DateTime<Utc>,
    pub forecast: CycleForecast,
}

pub struct ForecastCycles {
    feed: Arc<dyn MarketDataPort>,
}

impl ForecastCycles {
    pub fn new(feed: Arc<dyn MarketDataPort>) -> Self {
        Self { feed }
    }

    pub async fn execute(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<CycleReport, DomainError> {
        let series = self.feed.load_series(asset, timeframe).await?;
        let forecast = cycles::forecast_cycles(
            &series.closes(),
            &DEFAULT_CYCLE_LENGTHS,
            DEFAULT_CYCLE_LOOKBACK,
        );

        Ok(CycleReport {
            asset: asset.to_string(),
            timeframe,
            generated_at: Utc::now(),
            forecast,
        })
    }
}
