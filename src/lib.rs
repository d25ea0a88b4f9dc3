pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::align::{AlignTimeframes, AlignmentReport};
use crate::application::batch::{BatchAnalysis, BatchReport};
use crate::application::classify::{ClassifyStructure, StructureScan};
use crate::application::forecast::{CycleReport, ForecastCycles};
use crate::application::opportunities::{
    GenerateOpportunities, OpportunityRequest, OpportunityScan,
};
use crate::application::patterns::{PatternReport, RecognizePatterns};
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::projection::{self, CycleTable, TimeframeCycles};
use crate::domain::values::retracement::{self, LevelLadder, RetracementAnalysis};
use crate::domain::values::risk::{self, PositionSize};
use crate::domain::values::structure::CampaignClassification;
use crate::domain::values::timeframe::Timeframe;
use crate::infrastructure::feeds::file::FileFeed;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

pub struct GannScope {
    classify_uc: ClassifyStructure,
    align_uc: AlignTimeframes,
    batch_uc: BatchAnalysis,
    forecast_uc: ForecastCycles,
    patterns_uc: RecognizePatterns,
    opportunities_uc: GenerateOpportunities,
}

impl GannScope {
    pub fn new() -> Self {
        let data_dir = std::env::var("GANNSCOPE_DATA").unwrap_or_else(|_| "./data".into());
        Self::with_feed(Arc::new(FileFeed::new(data_dir)))
    }

    pub fn with_feed(feed: Arc<dyn MarketDataPort>) -> Self {
        Self {
            classify_uc: ClassifyStructure::new(feed.clone()),
            align_uc: AlignTimeframes::new(feed.clone()),
            batch_uc: BatchAnalysis::new(feed.clone()),
            forecast_uc: ForecastCycles::new(feed.clone()),
            patterns_uc: RecognizePatterns::new(feed),
            opportunities_uc: GenerateOpportunities::new(),
        }
    }

    // Delegating methods
    pub fn levels(&self, high: f64, low: f64, extended: bool) -> Result<LevelLadder, DomainError> {
        retracement::calculate_levels(high, low, extended)
    }

    pub fn analyze_levels(
        &self,
        high: f64,
        low: f64,
        price: f64,
        timeframe: Timeframe,
    ) -> Result<RetracementAnalysis, DomainError> {
        retracement::analyze_retracements(high, low, price, timeframe)
    }

    pub async fn classify(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<CampaignClassification, DomainError> {
        self.classify_uc.execute(asset, timeframe).await
    }

    pub async fn structure_scan(&self, assets: &[String], timeframe: Timeframe) -> StructureScan {
        self.classify_uc.scan(assets, timeframe).await
    }

    pub fn opportunities(
        &self,
        request: &OpportunityRequest,
    ) -> Result<OpportunityScan, DomainError> {
        self.opportunities_uc.execute(request)
    }

    pub async fn align(&self, asset: &str) -> Result<AlignmentReport, DomainError> {
        self.align_uc.execute(asset).await
    }

    pub fn project_cycles(&self, start: DateTime<Utc>) -> CycleTable {
        projection::project_cycles(start)
    }

    pub fn project_timeframe_cycles(
        &self,
        start: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> TimeframeCycles {
        projection::project_timeframe_cycles(start, timeframe)
    }

    pub async fn forecast(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<CycleReport, DomainError> {
        self.forecast_uc.execute(asset, timeframe).await
    }

    pub async fn patterns(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<PatternReport, DomainError> {
        self.patterns_uc.execute(asset, timeframe).await
    }

    pub async fn batch(
        &self,
        asset: &str,
        timeframes: &[Timeframe],
        trade_amount: Option<f64>,
        evaluated_on: Option<NaiveDate>,
    ) -> Result<BatchReport, DomainError> {
        self.batch_uc
            .execute(asset, timeframes, trade_amount, evaluated_on)
            .await
    }

    pub fn position_size(
        &self,
        account_size: f64,
        risk_percentage: f64,
        entry: f64,
        stop: f64,
    ) -> Result<PositionSize, DomainError> {
        risk::position_size(account_size, risk_percentage, entry, stop)
    }
}

impl Default for GannScope {
    fn default() -> Self {
        Self::new()
    }
}
