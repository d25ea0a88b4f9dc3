//! Volume signal strategy.
//!
//! Scalping frames live and die on volume, so 15m, 5m and 1m always
//! carry the two volume plays: the section-2 markup breakout and the
//! divergence warning for price running ahead of volume.

use crate::domain::entities::opportunity::{Opportunity, OpportunityKind, VolumeAnnotation};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy::{GenerationContext, OpportunityStrategy};
use crate::domain::values::campaign::SectionTag;
use crate::domain::values::priority::{ConfidenceLevel, Priority};
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::risk;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::volume::{VolumeExpectation, VolumeStrength};

/// Emits the scalping-frame volume setups.
pub struct VolumeSignalStrategy;

impl OpportunityStrategy for VolumeSignalStrategy {
    fn name(&self) -> &'static str {
        "volume_signal"
    }

    fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Opportunity>, DomainError> {
        if !matches!(
            ctx.timeframe,
            Timeframe::FifteenMin | Timeframe::FiveMin | Timeframe::OneMin
        ) {
            return Ok(Vec::new());
        }

        let price_at = |level: GannLevel| {
            ctx.levels.price_of(level).ok_or_else(|| {
                DomainError::InvalidInput(format!("ladder is missing the {} level", level))
            })
        };

        let half = price_at(GannLevel::Half)?;
        let three_eighths = price_at(GannLevel::ThreeEighths)?;
        let five_eighths = price_at(GannLevel::FiveEighths)?;
        let three_quarters = price_at(GannLevel::ThreeQuarters)?;

        let mut breakout = Opportunity::new(
            "volume_signal",
            OpportunityKind::VolumeBreakout,
            TradeDirection::Long,
            ctx.timeframe,
            half,
            three_eighths,
            three_quarters,
            risk::position_units(ctx.trade_amount, half),
            "Section 2 markup volume breakout - MOST RELIABLE setup",
            "Gann Rule: Section 2 has strongest volume - most reliable trades",
            "Strong volume breakout targeting next major resistance",
        );
        breakout.priority = Priority::High;
        breakout.confidence = ConfidenceLevel::High;
        breakout.entry_level = Some(GannLevel::Half);
        breakout.section = Some(SectionTag::Bull2);
        breakout.influence = ctx.influence.influence;
        breakout.dominant_timeframe = ctx.influence.dominant_timeframe;
        breakout.override_reason = ctx.influence.override_reason;
        breakout.volume = Some(VolumeAnnotation {
            confirmed: true,
            strength: VolumeStrength::Strong,
            expected: VolumeExpectation::High,
            description: "Section 2 markup phase - strongest volume confirmation",
        });

        let mut divergence = Opportunity::new(
            "volume_signal",
            OpportunityKind::VolumeDivergence,
            TradeDirection::Short,
            ctx.timeframe,
            three_quarters,
            five_eighths,
            half,
            risk::position_units(ctx.trade_amount, three_quarters),
            "Price advance without volume support - Distribution signal",
            "Gann Rule: Price without volume = weak move, expect reversal",
            "Weak move likely to reverse - avoid or take profits",
        );
        divergence.priority = Priority::Medium;
        divergence.confidence = ConfidenceLevel::Low;
        divergence.entry_level = Some(GannLevel::ThreeQuarters);
        divergence.influence = ctx.influence.influence;
        divergence.dominant_timeframe = ctx.influence.dominant_timeframe;
        divergence.override_reason = ctx.influence.override_reason;
        divergence.volume = Some(VolumeAnnotation {
            confirmed: false,
            strength: VolumeStrength::Weak,
            expected: VolumeExpectation::Decreasing,
            description: "Volume divergence - price up, volume down",
        });

        Ok(vec![breakout, divergence])
    }
}
