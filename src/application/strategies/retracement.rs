//! Retracement ladder strategy.
//!
//! Walks the five trading levels of the frame's ladder and emits a
//! support candidate and a resistance candidate per level, gated by the
//! hierarchical influence and validated against break confirmation.

use crate::domain::entities::opportunity::{Opportunity, OpportunityKind};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy::{GenerationContext, OpportunityStrategy};
use crate::domain::values::breaks::{self, BreakConfirmation, BreakStrength};
use crate::domain::values::campaign::SectionTag;
use crate::domain::values::priority::{ConfidenceLevel, Priority};
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::risk;
use crate::domain::values::stops;
use crate::domain::values::targets;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::transitions::{self, TransitionEvidence};
use crate::domain::values::validation::{self, TradeSetup};
use crate::domain::values::volume;

/// Emits level-test setups for every tradeable rung of the ladder.
pub struct RetracementStrategy;

impl OpportunityStrategy for RetracementStrategy {
    fn name(&self) -> &'static str {
        "retracement"
    }

    fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Opportunity>, DomainError> {
        let mut opportunities = Vec::new();

        for level in GannLevel::TRADING {
            let price = match ctx.levels.price_of(level) {
                Some(price) => price,
                None => continue,
            };

            if ctx.influence.allows_long_at(level) {
                opportunities.push(build_candidate(ctx, level, price, TradeDirection::Long)?);
            }
            if ctx.influence.allows_short_at(level) {
                opportunities.push(build_candidate(ctx, level, price, TradeDirection::Short)?);
            }
        }

        Ok(opportunities)
    }
}

fn build_candidate(
    ctx: &GenerationContext,
    level: GannLevel,
    entry: f64,
    direction: TradeDirection,
) -> Result<Opportunity, DomainError> {
    let params = risk::risk_params(ctx.timeframe);
    let stop = params.stop_price(entry, direction);
    let target = params.target_price(entry, direction);
    let position_size = risk::position_units(ctx.trade_amount, entry);

    let break_confirmation =
        breaks::validate_break(entry, ctx.current_price, ctx.timeframe, None)?;

    let (description, gann_rule, expected) =
        candidate_text(level, entry, direction, &break_confirmation);

    let mut opp = Opportunity::new(
        "retracement",
        if direction.is_long() {
            OpportunityKind::RetracementLong
        } else {
            OpportunityKind::RetracementShort
        },
        direction,
        ctx.timeframe,
        entry,
        stop,
        target,
        position_size,
        description,
        gann_rule,
        expected,
    );

    opp.entry_level = Some(level);
    opp.section = ctx.influence.section;
    opp.influence = ctx.influence.influence;
    opp.dominant_timeframe = ctx.influence.dominant_timeframe;
    opp.override_reason = ctx.influence.override_reason;

    // The 50% level starts out high priority on strong frames; the 75%
    // resistance gets the same head start for shorts.
    let config_confidence = ctx.timeframe.confidence();
    let favored = if direction.is_long() {
        level == GannLevel::Half
    } else {
        level == GannLevel::ThreeQuarters
    };
    let mut priority = if favored && config_confidence == ConfidenceLevel::High {
        Priority::High
    } else {
        Priority::Medium
    };

    if !break_confirmation.confirmed {
        priority = Priority::Low;
        opp.validation_reason = Some(format!(
            "Insufficient break confirmation: {:.2}% vs required {}%",
            break_confirmation.move_percent, break_confirmation.required_percent
        ));
    } else {
        if break_confirmation.strength == BreakStrength::Strong {
            priority = Priority::High;
        }
        opp.validation_reason = Some(format!(
            "Confirmed {:?} break of {} {} ({:.2}%)",
            break_confirmation.strength,
            level,
            if direction.is_long() { "level" } else { "resistance" },
            break_confirmation.move_percent
        ));
    }
    opp.priority = priority;

    if direction.is_long() && level == GannLevel::Half {
        opp.confidence = ConfidenceLevel::High;
    }

    // Management and context attachments.
    opp.stop_schedule = Some(stops::stop_schedule(entry, stop, ctx.timeframe, direction));
    opp.target_ladder = Some(targets::target_ladder(
        entry,
        ctx.campaign_high,
        ctx.campaign_low,
        direction,
        position_size,
    ));

    let profile_section = ctx.influence.section.unwrap_or(if direction.is_long() {
        SectionTag::Bull1
    } else {
        SectionTag::BearA
    });
    let rules = volume::volume_rules(profile_section, ctx.timeframe);
    let volume_strength = rules.reliability.as_strength();
    opp.volume_profile = Some(rules);

    let setup = TradeSetup {
        direction,
        timeframe: ctx.timeframe,
        influence: ctx.influence.influence,
        entry_level: Some(level),
        break_confirmation: Some(&break_confirmation),
        volume_strength: Some(volume_strength),
        section: ctx.influence.section,
        confidence: opp.confidence,
        risk_reward: opp.risk_reward,
        evaluated_on: ctx.evaluated_on,
    };
    opp.validation = Some(validation::validate_trade(&setup));
    opp.break_confirmation = Some(break_confirmation);

    // Every level test implies the opening handoff of its campaign side.
    let evidence = TransitionEvidence {
        current_price: Some(ctx.current_price),
        ..Default::default()
    };
    let (from, to) = if direction.is_long() {
        (SectionTag::Bull1, SectionTag::Bull2)
    } else {
        (SectionTag::BearA, SectionTag::BearSecondaryRally)
    };
    opp.transition = Some(transitions::validate_transition(
        from,
        to,
        &evidence,
        ctx.timeframe,
    ));

    Ok(opp)
}

fn candidate_text(
    level: GannLevel,
    price: f64,
    direction: TradeDirection,
    break_confirmation: &BreakConfirmation,
) -> (String, String, String) {
    if direction.is_long() {
        let importance = if level == GannLevel::Half {
            "Most important Gann level!"
        } else {
            "Key Gann level."
        };
        (
            format!(
                "{} Gann retracement support test at ${:.2}. {} Break: {:?}",
                level, price, importance, break_confirmation.strength
            ),
            format!(
                "Gann Rule: {} retracement acts as {} support",
                level,
                if level == GannLevel::Half {
                    "primary"
                } else {
                    "secondary"
                }
            ),
            format!("Bounce from {} level targeting higher prices", level),
        )
    } else {
        (
            format!(
                "{} Gann retracement resistance test at ${:.2}. Strong selling zone. Break: {:?}",
                level, price, break_confirmation.strength
            ),
            format!("Gann Rule: {} retracement acts as resistance", level),
            format!("Rejection from {} level targeting lower prices", level),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::hierarchy::{resolve_influence, MarketOutlook};
    use crate::domain::values::retracement;
    use crate::domain::values::timeframe::Timeframe;
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
    fn test_emits_both_sides_per_eligible_level() {
        let ctx = context(Timeframe::Daily, MarketOutlook::new());
        let opps = RetracementStrategy.generate(&ctx).unwrap();

        let longs = opps.iter().filter(|o| o.is_long()).count();
        let shorts = opps.iter().filter(|o| !o.is_long()).count();
        // Neutral outlook: longs on all five levels, shorts only on the upper half.
        assert_eq!(longs, 5);
        assert_eq!(shorts, 3);
    }

    #[test]
    fn test_monthly_bear_blocks_all_longs() {
        let outlook = MarketOutlook::new().with(
            Timeframe::Monthly,
            crate::domain::values::campaign::StructuralBias::Bear,
        );
        let ctx = context(Timeframe::Daily, outlook);
        let opps = RetracementStrategy.generate(&ctx).unwrap();

        assert!(opps.iter().all(|o| !o.is_long()));
        assert_eq!(opps.len(), 5);
    }

    #[test]
    fn test_weekly_bear_leaves_only_half_level_longs() {
        let outlook = MarketOutlook::new().with(
            Timeframe::Weekly,
            crate::domain::values::campaign::StructuralBias::Bear,
        );
        let ctx = context(Timeframe::Daily, outlook);
        let opps = RetracementStrategy.generate(&ctx).unwrap();

        let longs: Vec<_> = opps.iter().filter(|o| o.is_long()).collect();
        assert_eq!(longs.len(), 1);
        assert_eq!(longs[0].entry_level, Some(GannLevel::Half));
    }

    #[test]
    fn test_unconfirmed_break_demotes_to_low() {
        // Current price pinned to the 50% level: no movement, no break.
        let ctx = context(Timeframe::Daily, MarketOutlook::new());
        let opps = RetracementStrategy.generate(&ctx).unwrap();

        let at_half = opps
            .iter()
            .find(|o| o.is_long() && o.entry_level == Some(GannLevel::Half))
            .unwrap();
        assert_eq!(at_half.priority, Priority::Low);
        assert!(at_half
            .validation_reason
            .as_deref()
            .unwrap()
            .starts_with("Insufficient break confirmation"));
    }

    #[test]
    fn test_strong_break_promotes_to_high() {
        let mut ctx = context(Timeframe::Daily, MarketOutlook::new());
        // 25% level sits at 90; price 100 is 11% above it, twice the
        // daily threshold.
        ctx.current_price = 100.0;
        let opps = RetracementStrategy.generate(&ctx).unwrap();

        let at_quarter = opps
            .iter()
            .find(|o| o.is_long() && o.entry_level == Some(GannLevel::Quarter))
            .unwrap();
        assert_eq!(at_quarter.priority, Priority::High);
        assert!(at_quarter
            .validation_reason
            .as_deref()
            .unwrap()
            .starts_with("Confirmed Strong break"));
    }

    #[test]
    fn test_attaches_management_and_validation() {
        let ctx = context(Timeframe::Daily, MarketOutlook::new());
        let opps = RetracementStrategy.generate(&ctx).unwrap();

        for opp in &opps {
            assert!(opp.stop_schedule.is_some());
            assert!(opp.target_ladder.is_some());
            assert!(opp.volume_profile.is_some());
            assert!(opp.validation.is_some());
            assert!(opp.break_confirmation.is_some());
            assert!(opp.transition.is_some());
        }
    }
}
