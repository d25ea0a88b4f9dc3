use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::application::opportunities::{
    GenerateOpportunities, OpportunityRequest, OpportunityScan,
};
use crate::domain::entities::candle::Series;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataPort;
use crate::domain::values::hierarchy::MarketOutlook;
use crate::domain::values::priority::ConfidenceLevel;
use crate::domain::values::structure::CampaignClassification;
use crate::domain::values::timeframe::{TradeClass, Timeframe};

/// One frame's slice of a batch report.
#[derive(Debug, Serialize)]
pub struct FrameOpportunities {
    pub timeframe: Timeframe,
    pub trade_class: TradeClass,
    pub duration: &'static str,
    pub confidence: ConfidenceLevel,
    /// Entry tolerance band around levels, fraction of price.
    pub tolerance: f64,
    pub playbook: [&'static str; 2],
    /// The frame's own campaign read, absent when it failed to classify.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<CampaignClassification>,
    pub scan: OpportunityScan,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub asset: String,
    pub generated_at: DateTime<Utc>,
    /// Higher-frame structure every frame generated under.
    pub outlook: MarketOutlook,
    /// Analyzed frames, in request order.
    pub frames: Vec<FrameOpportunities>,
    pub errors: Vec<String>,
}

pub struct BatchAnalysis {
    feed: Arc<dyn MarketDataPort>,
}

impl BatchAnalysis {
    pub fn new(feed: Arc<dyn MarketDataPort>) -> Self {
        Self { feed }
    }

    /// Analyze the requested frames for one asset. Frames run
    /// concurrently; a frame that fails lands in `errors` without
    /// stopping the rest.
    pub async fn execute(
        &self,
        asset: &str,
        timeframes: &[Timeframe],
        trade_amount: Option<f64>,
        evaluated_on: Option<NaiveDate>,
    ) -> Result<BatchReport, DomainError> {
        if timeframes.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one timeframe is required".into(),
            ));
        }

        let mut errors = Vec::new();

        // The monthly and weekly reads steer every lower frame, so they
        // are classified up front. A missing top frame just leaves the
        // outlook neutral there.
        let mut outlook = MarketOutlook::new();
        for timeframe in [Timeframe::Monthly, Timeframe::Weekly] {
            match self.classify_frame(asset, timeframe).await {
                Ok(classification) => {
                    outlook = outlook.with_section(
                        timeframe,
                        classification.structural_bias,
                        classification.section,
                    );
                }
                Err(e) => errors.push(format!("{}: {}", timeframe, e)),
            }
        }

        let mut handles = Vec::new();
        for &timeframe in timeframes {
            let feed = Arc::clone(&self.feed);
            let asset = asset.to_string();
            let outlook = outlook.clone();
            handles.push((
                timeframe,
                tokio::spawn(async move {
                    analyze_frame(feed, &asset, timeframe, outlook, trade_amount, evaluated_on)
                        .await
                }),
            ));
        }

        let mut frames = Vec::new();
        for (timeframe, handle) in handles {
            match handle.await {
                Ok(Ok((frame, frame_errors))) => {
                    frames.push(frame);
                    errors.extend(frame_errors);
                }
                Ok(Err(e)) => errors.push(format!("{}: {}", timeframe, e)),
                Err(e) => errors.push(format!("{}: task failed: {}", timeframe, e)),
            }
        }

        Ok(BatchReport {
            asset: asset.to_string(),
            generated_at: Utc::now(),
            outlook,
            frames,
            errors,
        })
    }

    async fn classify_frame(
        &self,
        asset: &str,
        timeframe: Timeframe,
    ) -> Result<CampaignClassification, DomainError> {
        let series = self.feed.load_series(asset, timeframe).await?;
        series.classify(timeframe)
    }
}

async fn analyze_frame(
    feed: Arc<dyn MarketDataPort>,
    asset: &str,
    timeframe: Timeframe,
    outlook: MarketOutlook,
    trade_amount: Option<f64>,
    evaluated_on: Option<NaiveDate>,
) -> Result<(FrameOpportunities, Vec<String>), DomainError> {
    let series: Series = feed.load_series(asset, timeframe).await?;
    let current_price = series
        .latest_close()
        .ok_or(DomainError::InsufficientData {
            required: 1,
            got: 0,
        })?;

    // The frame's own section feeds back into its outlook so section
    // setups see it; a frame too short to classify still generates.
    let mut frame_errors = Vec::new();
    let (outlook, classification) = match series.classify(timeframe) {
        Ok(classification) => (
            outlook.with_section(
                timeframe,
                classification.structural_bias,
                classification.section,
            ),
            Some(classification),
        ),
        Err(e) => {
            frame_errors.push(format!("{}: {}", timeframe, e));
            (outlook, None)
        }
    };

    let request = OpportunityRequest {
        timeframe,
        current_price,
        campaign_high: None,
        campaign_low: None,
        trade_amount,
        evaluated_on,
        outlook,
    };
    let scan = GenerateOpportunities::new().execute(&request)?;

    Ok((
        FrameOpportunities {
            timeframe,
            trade_class: timeframe.trade_class(),
            duration: timeframe.duration_label(),
            confidence: timeframe.confidence(),
            tolerance: timeframe.tolerance(),
            playbook: timeframe.playbook(),
            classification,
            scan,
        },
        frame_errors,
    ))
}
