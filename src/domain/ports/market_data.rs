use crate::domain::entities::candle::Series;
use crate::domain::error::DomainError;
use crate::domain::values::timeframe::Timeframe;
use async_trait::async_trait;

/// Pluggable source of candle history.
/// Implementations can read a local data directory, an exchange API, etc.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Name of this feed (e.g., "file", "fixed")
    fn name(&self) -> &str;

    /// Load the candle series for an asset on one timeframe.
    async fn load_series(&self, asset: &str, timeframe: Timeframe)
        -> Result<Series, DomainError>;
}
