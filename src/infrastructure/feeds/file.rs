use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::entities::candle::{Candle, Series};
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::timeframe::Timeframe;

/// Candle feed over a local data directory.
///
/// Series live at `<dir>/<asset>/<timeframe>.json`, e.g.
/// `data/BTC/daily.json`.
pub struct FileFeed {
    dir: PathBuf,
}

impl FileFeed {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn series_path(&self, asset: &str, timeframe: Timeframe) -> PathBuf {
        self.dir.join(asset).join(format!("{}.json", timeframe))
    }
}

#[derive(Debug, serde::Deserialize)]
struct SeriesFile {
    candles: Vec<Candle>,
    #[serde(default)]
    volume: Option<Vec<f64>>,
}

#[async_trait]
impl MarketDataPort for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    async fn load_series(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<Series, DomainError> {
        let path = self.series_path(asset, timeframe);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DomainError::Feed(format!("{}: {}", path.display(), e)))?;

        let file: SeriesFile = serde_json::from_str(&raw)
            .map_err(|e| DomainError::Parse(format!("{}: {}", path.display(), e)))?;

        // Files go through Series::new, never straight into a Series.
        Series::new(file.candles, file.volume)
    }
}
