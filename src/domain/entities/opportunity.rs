use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::values::breaks::BreakConfirmation;
use crate::domain::values::campaign::SectionTag;
use crate::domain::values::hierarchy::InfluenceSource;
use crate::domain::values::priority::{ConfidenceLevel, Priority, ProximityPriority};
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::risk;
use crate::domain::values::stops::StopSchedule;
use crate::domain::values::targets::TargetLadder;
use crate::domain::values::timeframe::{TradeClass, Timeframe};
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::transitions::TransitionAssessment;
use crate::domain::values::validation::TradeValidation;
use crate::domain::values::volume::{VolumeExpectation, VolumeRulePack, VolumeStrength};

/// What kind of setup a strategy flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityKind {
    RetracementLong,
    RetracementShort,
    TimeCycleReversal,
    CampaignSection,
    VolumeBreakout,
    VolumeDivergence,
}

/// Volume read attached to an opportunity by the enhancement pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeAnnotation {
    pub confirmed: bool,
    pub strength: VolumeStrength,
    pub expected: VolumeExpectation,
    pub description: &'static str,
}

/// An actionable trade setup detected by a generation strategy.
///
/// Strategies construct the core via [`Opportunity::new`]; the pipeline
/// then layers on validation, volume annotations, management schedules
/// and proximity ranking before the scan is returned.
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Which strategy produced this opportunity.
    pub strategy: String,
    pub kind: OpportunityKind,
    pub direction: TradeDirection,
    pub timeframe: Timeframe,
    pub trade_class: TradeClass,
    /// Expected holding period for this frame, e.g. "1-7 days".
    pub duration: &'static str,
    pub description: String,
    /// The Gann principle this setup trades on.
    pub gann_rule: String,
    /// What price is expected to do if the setup plays out.
    pub expected: String,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub target_price: f64,
    /// Units bought or sold at entry for the configured trade amount.
    pub position_size: f64,
    /// Reward-to-risk of the actual entry/stop/target triple.
    pub risk_reward: f64,
    pub priority: Priority,
    pub confidence: ConfidenceLevel,
    /// The ladder level the entry sits on, when the setup is level-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_level: Option<GannLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionTag>,
    /// Which frame's structure was steering when this was generated.
    pub influence: InfluenceSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_timeframe: Option<Timeframe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_confirmation: Option<BreakConfirmation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<TradeValidation>,
    /// Section volume profile the setup is expected to trade within.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_profile: Option<VolumeRulePack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeAnnotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_schedule: Option<StopSchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_ladder: Option<TargetLadder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionAssessment>,
    /// Percent distance from current price to entry, set during ranking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<ProximityPriority>,
    pub detected_at: DateTime<Utc>,
}

impl Opportunity {
    /// Create an opportunity with the core trade parameters.
    ///
    /// Priority starts at Medium and confidence at the frame's default;
    /// strategies and enhancement passes adjust both afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        strategy: impl Into<String>,
        kind: OpportunityKind,
        direction: TradeDirection,
        timeframe: Timeframe,
        entry_price: f64,
        stop_loss: f64,
        target_price: f64,
        position_size: f64,
        description: impl Into<String>,
        gann_rule: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            strategy: strategy.into(),
            kind,
            direction,
            timeframe,
            trade_class: timeframe.trade_class(),
            duration: timeframe.duration_label(),
            description: description.into(),
            gann_rule: gann_rule.into(),
            expected: expected.into(),
            entry_price,
            stop_loss,
            target_price,
            position_size,
            risk_reward: risk::actual_risk_reward(entry_price, stop_loss, target_price),
            priority: Priority::Medium,
            confidence: timeframe.confidence(),
            entry_level: None,
            section: None,
            influence: InfluenceSource::Local,
            dominant_timeframe: None,
            override_reason: None,
            break_confirmation: None,
            validation_reason: None,
            validation: None,
            volume_profile: None,
            volume: None,
            stop_schedule: None,
            target_ladder: None,
            transition: None,
            pct_distance: None,
            proximity: None,
            detected_at: Utc::now(),
        }
    }

    /// Percent distance between the current price and this entry.
    pub fn distance_from(&self, current_price: f64) -> f64 {
        (current_price - self.entry_price).abs() / current_price * 100.0
    }

    pub fn is_long(&self) -> bool {
        self.direction.is_long()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity() -> Opportunity {
        Opportunity::new(
            "retracement",
            OpportunityKind::RetracementLong,
            TradeDirection::Long,
            Timeframe::Daily,
            100.0,
            95.0,
            115.0,
            10.0,
            "50% Gann retracement support test",
            "Gann Rule: 50% retracement acts as primary support",
            "Bounce from 50% level targeting higher prices",
        )
    }

    #[test]
    fn test_new_fills_frame_defaults() {
        let opp = opportunity();
        assert_eq!(opp.priority, Priority::Medium);
        assert_eq!(opp.confidence, Timeframe::Daily.confidence());
        assert_eq!(opp.trade_class, Timeframe::Daily.trade_class());
        assert_eq!(opp.duration, Timeframe::Daily.duration_label());
        assert_eq!(opp.influence, InfluenceSource::Local);
        assert!(opp.validation.is_none());
        assert!(!opp.id.is_empty());
    }

    #[test]
    fn test_risk_reward_reflects_actual_prices() {
        let opp = opportunity();
        // Risk 5, reward 15.
        assert!((opp.risk_reward - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_percent_of_current_price() {
        let opp = opportunity();
        let dist = opp.distance_from(104.0);
        assert!((dist - (4.0 / 104.0 * 100.0)).abs() < 1e-9);
    }
}
