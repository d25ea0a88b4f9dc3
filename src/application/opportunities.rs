//! Opportunity generation use case — runs all registered strategies over
//! a prepared frame context, annotates the results with volume
//! confirmation, and returns them ranked by proximity to price.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::application::strategies::campaign_section::CampaignSectionStrategy;
use crate::application::strategies::cycle_reversal::CycleReversalStrategy;
use crate::application::strategies::retracement::RetracementStrategy;
use crate::application::strategies::volume_signal::VolumeSignalStrategy;
use crate::domain::entities::opportunity::{Opportunity, OpportunityKind, VolumeAnnotation};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy::{GenerationContext, OpportunityStrategy};
use crate::domain::values::hierarchy::{self, MarketOutlook};
use crate::domain::values::priority::{ConfidenceLevel, ProximityPriority};
use crate::domain::values::retracement::{self, GannLevel};
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::volume::{self, VolumeExpectation, VolumeStrength};

/// Inputs for one frame's opportunity scan.
#[derive(Debug, Clone)]
pub struct OpportunityRequest {
    pub timeframe: Timeframe,
    pub current_price: f64,
    /// Campaign extreme; derived from the frame's generation range when absent.
    pub campaign_high: Option<f64>,
    pub campaign_low: Option<f64>,
    /// Capital allocated per trade, defaults to 1000.
    pub trade_amount: Option<f64>,
    /// Defaults to today.
    pub evaluated_on: Option<NaiveDate>,
    /// Higher-frame structure the hierarchy resolves against.
    pub outlook: MarketOutlook,
}

/// Result of running all strategies for one frame.
#[derive(Debug, Serialize)]
pub struct OpportunityScan {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub timeframe: Timeframe,
    pub current_price: f64,
    pub campaign_high: f64,
    pub campaign_low: f64,
    pub strategies_run: usize,
    pub strategies_failed: usize,
    pub total_opportunities: usize,
    pub opportunities: Vec<Opportunity>,
}

pub struct GenerateOpportunities {
    strategies: Vec<Box<dyn OpportunityStrategy>>,
}

impl Default for GenerateOpportunities {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerateOpportunities {
    /// Use case with the full built-in strategy set.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(RetracementStrategy),
            Box::new(CycleReversalStrategy),
            Box::new(CampaignSectionStrategy),
            Box::new(VolumeSignalStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn OpportunityStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run all strategies and return volume-annotated, proximity-ranked
    /// opportunities.
    pub fn execute(&self, request: &OpportunityRequest) -> Result<OpportunityScan, DomainError> {
        let now = Utc::now();
        let price = request.current_price;
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "current price must be a positive number, got {}",
                price
            )));
        }

        let trade_amount = request.trade_amount.unwrap_or(1000.0);
        if !trade_amount.is_finite() || trade_amount <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "trade amount must be a positive number, got {}",
                trade_amount
            )));
        }

        let (high_mult, low_mult) = request.timeframe.generation_range();
        let campaign_high = request.campaign_high.unwrap_or(price * high_mult);
        let campaign_low = request.campaign_low.unwrap_or(price * low_mult);
        if !campaign_high.is_finite() || !campaign_low.is_finite() || campaign_low <= 0.0 {
            return Err(DomainError::InvalidInput(
                "campaign range must be finite and positive".into(),
            ));
        }
        if campaign_high <= campaign_low {
            return Err(DomainError::InvalidInput(format!(
                "campaign high {} must sit above campaign low {}",
                campaign_high, campaign_low
            )));
        }

        let ctx = GenerationContext {
            timeframe: request.timeframe,
            current_price: price,
            campaign_high,
            campaign_low,
            trade_amount,
            evaluated_on: request
                .evaluated_on
                .unwrap_or_else(|| Utc::now().date_naive()),
            influence: hierarchy::resolve_influence(request.timeframe, &request.outlook),
            outlook: request.outlook.clone(),
            levels: retracement::calculate_levels(campaign_high, campaign_low, false)?,
        };

        let mut all_opportunities = Vec::new();
        let mut strategies_succeeded = 0usize;

        for strategy in &self.strategies {
            match strategy.generate(&ctx) {
                Ok(mut opps) => {
                    strategies_succeeded += 1;
                    all_opportunities.append(&mut opps);
                }
                Err(e) => {
                    eprintln!("WARNING: Strategy '{}' failed: {}", strategy.name(), e);
                }
            }
        }

        for opp in &mut all_opportunities {
            annotate_volume(opp);
            rank_proximity(opp, price);
        }

        // Nearest entries first; at equal distance the higher priority wins.
        all_opportunities.sort_by(|a, b| {
            let da = a.pct_distance.unwrap_or(f64::MAX);
            let db = b.pct_distance.unwrap_or(f64::MAX);
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        });

        Ok(OpportunityScan {
            generated_at: now,
            timeframe: request.timeframe,
            current_price: price,
            campaign_high,
            campaign_low,
            strategies_run: strategies_succeeded,
            strategies_failed: self.strategies.len() - strategies_succeeded,
            total_opportunities: all_opportunities.len(),
            opportunities: all_opportunities,
        })
    }
}

/// Attach a volume confirmation to every opportunity that does not carry
/// its own. Unconfirmed volume caps confidence at Low.
fn annotate_volume(opp: &mut Opportunity) {
    if opp.volume.is_none() {
        let annotation = if opp.kind == OpportunityKind::CampaignSection {
            let rule = volume::section_expectation(opp.section);
            VolumeAnnotation {
                confirmed: rule.strength != VolumeStrength::VeryWeak,
                strength: rule.strength,
                expected: rule.expected,
                description: rule.description,
            }
        } else if opp.entry_level == Some(GannLevel::Half) {
            VolumeAnnotation {
                confirmed: true,
                strength: VolumeStrength::Strong,
                expected: VolumeExpectation::High,
                description: "50% level - Most important with strong volume confirmation",
            }
        } else if matches!(
            opp.entry_level,
            Some(GannLevel::ThreeEighths) | Some(GannLevel::FiveEighths)
        ) {
            VolumeAnnotation {
                confirmed: true,
                strength: VolumeStrength::Medium,
                expected: VolumeExpectation::Medium,
                description: "Secondary Gann level with medium volume confirmation",
            }
        } else {
            VolumeAnnotation {
                confirmed: true,
                strength: VolumeStrength::Medium,
                expected: VolumeExpectation::Neutral,
                description: "Standard volume confirmation",
            }
        };
        opp.volume = Some(annotation);
    }

    if opp.volume.map_or(false, |v| !v.confirmed) {
        opp.confidence = ConfidenceLevel::Low;
    }
}

fn rank_proximity(opp: &mut Opportunity, current_price: f64) {
    let pct = opp.distance_from(current_price);
    let proximity = ProximityPriority::from_distance(pct);
    opp.pct_distance = Some(pct);
    opp.proximity = Some(proximity);
    opp.priority = proximity.combine(opp.priority);
}
