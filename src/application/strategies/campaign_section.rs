//! Campaign section strategy.
//!
//! Emits one phase-aligned setup per sub-daily frame based on where the
//! frame sits inside its bull or bear campaign. Monthly and weekly are
//! skipped, their sections are context for the lower frames rather than
//! setups of their own.

use crate::domain::entities::opportunity::{Opportunity, OpportunityKind};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy::{GenerationContext, OpportunityStrategy};
use crate::domain::values::breaks;
use crate::domain::values::campaign::{CampaignType, SectionTag};
use crate::domain::values::hierarchy::InfluenceSource;
use crate::domain::values::priority::{ConfidenceLevel, Priority};
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::risk;
use crate::domain::values::stops;
use crate::domain::values::targets;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::transitions::{self, TransitionEvidence};
use crate::domain::values::validation::{self, Grade, Recommendation, TradeSetup};
use crate::domain::values::volume;

/// Emits a setup for the campaign section the frame is trading in.
pub struct CampaignSectionStrategy;

impl OpportunityStrategy for CampaignSectionStrategy {
    fn name(&self) -> &'static str {
        "campaign_section"
    }

    fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Opportunity>, DomainError> {
        // Top frames are too broad for section setups.
        if matches!(ctx.timeframe, Timeframe::Monthly | Timeframe::Weekly) {
            return Ok(Vec::new());
        }

        let section = ctx.influence.section;

        // Conflicting trades are filtered rather than generated and
        // discarded later.
        let campaign = section.map(|s| s.campaign_type());
        let allowed = match ctx.influence.influence {
            InfluenceSource::MonthlyBear => campaign == Some(CampaignType::Bear),
            InfluenceSource::WeeklyBear => campaign != Some(CampaignType::Bull),
            InfluenceSource::SelfDriven | InfluenceSource::Local => true,
        };
        if !allowed {
            return Ok(Vec::new());
        }

        build_section_candidate(ctx, section).map(|opp| vec![opp])
    }
}

fn build_section_candidate(
    ctx: &GenerationContext,
    section: Option<SectionTag>,
) -> Result<Opportunity, DomainError> {
    let campaign = section.map(|s| s.campaign_type());

    // Bulls buy support and bears sell resistance; an unclassified
    // frame watches the midpoint.
    let (direction, level, action) = match campaign {
        Some(CampaignType::Bull) => (TradeDirection::Long, GannLevel::ThreeEighths, "Accumulate"),
        Some(CampaignType::Bear) => (TradeDirection::Short, GannLevel::FiveEighths, "Short"),
        None => (TradeDirection::Long, GannLevel::Half, "Monitor"),
    };
    let entry = ctx.levels.price_of(level).ok_or_else(|| {
        DomainError::InvalidInput(format!("ladder is missing the {} level", level))
    })?;

    let params = risk::risk_params(ctx.timeframe);
    let stop = params.stop_price(entry, direction);
    let target = params.target_price(entry, direction);
    let position_size = risk::position_units(ctx.trade_amount, entry);

    let (type_label, section_label, phase_name, confidence) = match section {
        Some(s) => (
            match s.campaign_type() {
                CampaignType::Bull => "BULL",
                CampaignType::Bear => "BEAR",
            },
            s.label(),
            s.name(),
            s.confidence(),
        ),
        None => ("NEUTRAL", "-", "Consolidation", ConfidenceLevel::Medium),
    };

    let mut opp = Opportunity::new(
        "campaign_section",
        OpportunityKind::CampaignSection,
        direction,
        ctx.timeframe,
        entry,
        stop,
        target,
        position_size,
        format!(
            "{} campaign Section {}: {} phase. {} positions.",
            type_label, section_label, phase_name, action
        ),
        format!(
            "Gann Rule: Section {} represents {} phase",
            section_label, phase_name
        ),
        format!("{} behavior expected in this section", phase_name),
    );
    opp.entry_level = Some(level);
    opp.section = section;
    opp.confidence = confidence;
    opp.influence = ctx.influence.influence;
    opp.dominant_timeframe = ctx.influence.dominant_timeframe;
    opp.override_reason = ctx.influence.override_reason;

    let break_confirmation =
        breaks::validate_break(entry, ctx.current_price, ctx.timeframe, None)?;
    opp.validation_reason = Some(if break_confirmation.confirmed {
        format!(
            "Confirmed {:?} break of {} level ({:.2}%)",
            break_confirmation.strength, level, break_confirmation.move_percent
        )
    } else {
        format!(
            "Insufficient break confirmation: {:.2}% vs required {:.2}%",
            break_confirmation.move_percent, break_confirmation.required_percent
        )
    });

    opp.stop_schedule = Some(stops::stop_schedule(entry, stop, ctx.timeframe, direction));
    opp.target_ladder = Some(targets::target_ladder(
        entry,
        ctx.campaign_high,
        ctx.campaign_low,
        direction,
        position_size,
    ));

    let profile_section = section.unwrap_or(SectionTag::Bull1);
    let rules = volume::volume_rules(profile_section, ctx.timeframe);
    let volume_strength = rules.reliability.as_strength();
    opp.volume_profile = Some(rules);

    // A section setup implies the handoff that produced it.
    if let Some(current) = section {
        if let Some(prior) = current.previous() {
            let evidence = TransitionEvidence {
                current_price: Some(ctx.current_price),
                ..Default::default()
            };
            opp.transition = Some(transitions::validate_transition(
                prior,
                current,
                &evidence,
                ctx.timeframe,
            ));
        }
    }

    let setup = TradeSetup {
        direction,
        timeframe: ctx.timeframe,
        influence: ctx.influence.influence,
        entry_level: Some(level),
        break_confirmation: Some(&break_confirmation),
        volume_strength: Some(volume_strength),
        section,
        confidence: opp.confidence,
        risk_reward: opp.risk_reward,
        evaluated_on: ctx.evaluated_on,
    };
    let validation = validation::validate_trade(&setup);

    opp.priority = if validation.grade == Grade::A {
        Priority::High
    } else if validation.grade == Grade::F
        || validation.recommendation == Recommendation::AvoidTrade
    {
        Priority::Low
    } else if validation.final_score >= 0.75 {
        Priority::High
    } else {
        Priority::Medium
    };

    opp.validation = Some(validation);
    opp.break_confirmation = Some(break_confirmation);

    Ok(opp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::campaign::StructuralBias;
    use crate::domain::values::hierarchy::{resolve_influence, MarketOutlook};
    use crate::domain::values::retracement;
    use chrono::NaiveDate;

    fn context(timeframe: Timeframe, outlook: MarketOutlook) -> GenerationContext {
        let high = 120.0;
        let low = 80.0;
        GenerationContext {
            timeframe,
            current_price: 100.0,
            campaign_high: high,
            campaign_low: low,
            trade_amount: 1000.0,
            evaluated_on: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            influence: resolve_influence(timeframe, &outlook),
            outlook,
            levels: retracement::calculate_levels(high, low, false).unwrap(),
        }
    }

    #[test]
    fn test_top_frames_emit_nothing() {
        for tf in [Timeframe::Monthly, Timeframe::Weekly] {
            let ctx = context(tf, MarketOutlook::new());
            assert!(CampaignSectionStrategy.generate(&ctx).unwrap().is_empty());
        }
    }

    #[test]
    fn test_bull_section_buys_three_eighths_support() {
        let outlook = MarketOutlook::new().with_section(
            Timeframe::Daily,
            StructuralBias::Bull,
            SectionTag::Bull2,
        );
        let ctx = context(Timeframe::Daily, outlook);
        let opps = CampaignSectionStrategy.generate(&ctx).unwrap();

        assert_eq!(opps.len(), 1);
        assert!(opps[0].is_long());
        assert_eq!(opps[0].entry_level, Some(GannLevel::ThreeEighths));
        assert_eq!(opps[0].section, Some(SectionTag::Bull2));
        assert!(opps[0].description.contains("Markup phase"));
        assert!(opps[0].transition.is_some());
    }

    #[test]
    fn test_bear_section_shorts_five_eighths_resistance() {
        let outlook = MarketOutlook::new().with_section(
            Timeframe::OneHour,
            StructuralBias::Bear,
            SectionTag::BearB,
        );
        let ctx = context(Timeframe::OneHour, outlook);
        let opps = CampaignSectionStrategy.generate(&ctx).unwrap();

        assert_eq!(opps.len(), 1);
        assert!(!opps[0].is_long());
        assert_eq!(opps[0].entry_level, Some(GannLevel::FiveEighths));
        assert_eq!(opps[0].confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_unclassified_frame_monitors_midpoint() {
        let ctx = context(Timeframe::Daily, MarketOutlook::new());
        let opps = CampaignSectionStrategy.generate(&ctx).unwrap();

        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].entry_level, Some(GannLevel::Half));
        assert!(opps[0].section.is_none());
        assert!(opps[0].description.contains("Monitor positions"));
        assert!(opps[0].transition.is_none());
    }

    #[test]
    fn test_monthly_bear_filters_bull_sections() {
        let outlook = MarketOutlook::new()
            .with(Timeframe::Monthly, StructuralBias::Bear)
            .with_section(Timeframe::Daily, StructuralBias::Bull, SectionTag::Bull2);
        let ctx = context(Timeframe::Daily, outlook);
        assert!(CampaignSectionStrategy.generate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_bull1_has_no_transition_to_validate() {
        let outlook = MarketOutlook::new().with_section(
            Timeframe::Daily,
            StructuralBias::Bull,
            SectionTag::Bull1,
        );
        let ctx = context(Timeframe::Daily, outlook);
        let opps = CampaignSectionStrategy.generate(&ctx).unwrap();
        assert!(opps[0].transition.is_none());
    }
}
