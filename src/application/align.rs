use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::alignment::{self, AlignmentRead};
use crate::domain::values::structure::CampaignClassification;
use crate::domain::values::timeframe::Timeframe;
use std::collections::HashMap;

/// One frame's row inside an alignment report.
#[derive(Debug, Serialize)]
pub struct FrameStructure {
    pub timeframe: Timeframe,
    pub weight: u8,
    pub classification: CampaignClassification,
}

#[derive(Debug, Serialize)]
pub struct AlignmentReport {
    pub asset: String,
    pub generated_at: DateTime<Utc>,
    /// Frames that classified, heaviest first.
    pub frames: Vec<FrameStructure>,
    pub alignment: AlignmentRead,
    /// Frames skipped because their data failed to load or classify.
    pub errors: Vec<String>,
}

pub struct AlignTimeframes {
    feed: Arc<dyn MarketDataPort>,
}

impl AlignTimeframes {
    pub fn new(feed: Arc<dyn MarketDataPort>) -> Self {
        Self { feed }
    }

    /// Classify all eight frames and weigh them together. Frames whose
    /// data is missing are skipped; the read covers whatever remains.
    pub async fn execute(&self, asset: &str) -> Result<AlignmentReport, DomainError> {
        let mut frames = Vec::new();
        let mut classified: HashMap<Timeframe, CampaignClassification> = HashMap::new();
        let mut errors = Vec::new();

        for timeframe in Timeframe::ALL {
            let classification = match self.feed.load_series(asset, timeframe).await {
                Ok(series) => series.classify(timeframe),
                Err(e) => Err(e),
            };
            match classification {
                Ok(classification) => {
                    frames.push(FrameStructure {
                        timeframe,
                        weight: timeframe.weight(),
                        classification: classification.clone(),
                    });
                    classified.insert(timeframe, classification);
                }
                Err(e) => errors.push(format!("{}: {}", timeframe, e)),
            }
        }

        let alignment = alignment::align(&classified)?;

        Ok(AlignmentReport {
            asset: asset.to_string(),
            generated_at: Utc::now(),
            frames,
            alignment,
            errors,
        })
    }
}
