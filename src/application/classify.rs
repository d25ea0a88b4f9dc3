use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::structure::CampaignClassification;
use crate::domain::values::timeframe::Timeframe;

/// One asset's classification inside a multi-asset scan.
#[derive(Debug, Serialize)]
pub struct AssetStructure {
    pub asset: String,
    pub classification: CampaignClassification,
}

/// Result of classifying several assets on one frame.
#[derive(Debug, Serialize)]
pub struct StructureScan {
    pub scanned_at: DateTime<Utc>,
    pub timeframe: Timeframe,
    pub results: Vec<AssetStructure>,
    pub errors: Vec<String>,
}

pub struct ClassifyStructure {
    feed: Arc<dyn MarketDataPort>,
}

impl ClassifyStructure {
    pub fn new(feed: Arc<dyn MarketDataPort>) -> Self {
        Self { feed }
    }

    /// Classify one asset's campaign position on one frame.
    pub async fn execute(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<CampaignClassification, DomainError> {
        let series = self.feed.load_series(asset, timeframe).await?;
        series.classify(timeframe)
    }

    /// Classify several assets, keeping going past individual failures.
    /// Results keep the request order.
    pub async fn scan(&self, assets: &[String], timeframe: Timeframe) -> StructureScan {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for asset in assets {
            match self.execute(asset, timeframe).await {
                Ok(classification) => results.push(AssetStructure {
                    asset: asset.clone(),
                    classification,
                }),
                Err(e) => errors.push(format!("{}: {}", asset, e)),
            }
        }

        StructureScan {
            scanned_at: Utc::now(),
            timeframe,
            results,
            errors,
        }
    }
}
