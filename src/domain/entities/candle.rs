use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::values::structure::{self, CampaignClassification};
use crate::domain::values::timeframe::Timeframe;

/// A single OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p > 0.0) && self.high >= self.low
    }
}

/// An ordered candle series, oldest first, with optional volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub candles: Vec<Candle>,
    /// Volume per candle, same length as `candles` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Vec<f64>>,
}

impl Series {
    /// Build a series, rejecting malformed candles and misaligned volume.
    pub fn new(candles: Vec<Candle>, volume: Option<Vec<f64>>) -> Result<Self, DomainError> {
        for (i, candle) in candles.iter().enumerate() {
            if !candle.is_well_formed() {
                return Err(DomainError::InvalidInput(format!(
                    "candle {} has non-positive or inverted prices",
                    i
                )));
            }
        }

        if let Some(vol) = &volume {
            if vol.len() != candles.len() {
                return Err(DomainError::InvalidInput(format!(
                    "volume length {} does not match candle count {}",
                    vol.len(),
                    candles.len()
                )));
            }
            if vol.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(DomainError::InvalidInput(
                    "volume entries must be finite and non-negative".into(),
                ));
            }
        }

        Ok(Self { candles, volume })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Volume column, empty when the feed supplied none.
    pub fn volume_slice(&self) -> &[f64] {
        self.volume.as_deref().unwrap_or(&[])
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// Classify this series into a campaign read for `timeframe`.
    pub fn classify(&self, timeframe: Timeframe) -> Result<CampaignClassification, DomainError> {
        structure::classify_campaign(
            &self.highs(),
            &self.lows(),
            &self.closes(),
            self.volume_slice(),
            timeframe,
        )
    }
}
