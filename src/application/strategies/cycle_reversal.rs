//! Time cycle reversal strategy.
//!
//! Flags frames whose natural cycle is due to complete. Monthly and the
//! intraday scalping frames watch cycles continuously; 4h and 1h only
//! light up within two days of a Gann cycle day of the month.

use crate::domain::entities::opportunity::{Opportunity, OpportunityKind};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy::{GenerationContext, OpportunityStrategy};
use crate::domain::values::priority::Priority;
use crate::domain::values::projection;
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::risk;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::trade_direction::TradeDirection;

/// Emits a reversal setup when the frame's time cycle is completing.
pub struct CycleReversalStrategy;

fn cycle_watch_active(timeframe: Timeframe, evaluated_on: chrono::NaiveDate) -> bool {
    match timeframe {
        Timeframe::Monthly => true,
        Timeframe::FifteenMin | Timeframe::FiveMin | Timeframe::OneMin => true,
        Timeframe::FourHour | Timeframe::OneHour => projection::near_gann_cycle_day(evaluated_on),
        Timeframe::Weekly | Timeframe::Daily => false,
    }
}

impl OpportunityStrategy for CycleReversalStrategy {
    fn name(&self) -> &'static str {
        "cycle_reversal"
    }

    fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Opportunity>, DomainError> {
        if !cycle_watch_active(ctx.timeframe, ctx.evaluated_on) {
            return Ok(Vec::new());
        }

        let entry = match ctx.levels.price_of(GannLevel::Half) {
            Some(price) => price,
            None => return Ok(Vec::new()),
        };

        // Higher-frame bears flip the expected reversal downward.
        let direction = if ctx.influence.is_bear_driven() {
            TradeDirection::Short
        } else {
            TradeDirection::Long
        };

        let params = risk::risk_params(ctx.timeframe);
        let stop = params.stop_price(entry, direction);
        let target = params.target_price(entry, direction);
        let position_size = risk::position_units(ctx.trade_amount, entry);

        let (tone, slope) = if direction.is_long() {
            ("bullish", "uptrend")
        } else {
            ("bearish", "downtrend")
        };

        let mut opp = Opportunity::new(
            "cycle_reversal",
            OpportunityKind::TimeCycleReversal,
            direction,
            ctx.timeframe,
            entry,
            stop,
            target,
            position_size,
            format!(
                "Major {} time cycle approaching completion. Expect {} reversal.",
                ctx.timeframe, tone
            ),
            "Gann Rule: Time cycles create major reversal points",
            format!("Reversal into {} following cycle completion", slope),
        );
        opp.priority = Priority::High;
        opp.entry_level = Some(GannLevel::Half);
        opp.section = ctx.influence.section;
        opp.influence = ctx.influence.influence;
        opp.dominant_timeframe = ctx.influence.dominant_timeframe;
        opp.override_reason = ctx.influence.override_reason;

        Ok(vec![opp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::campaign::StructuralBias;
    use crate::domain::values::hierarchy::{resolve_influence, MarketOutlook};
    use crate::domain::values::retracement;
    use chrono::NaiveDate;

    fn context(
        timeframe: Timeframe,
        outlook: MarketOutlook,
        evaluated_on: NaiveDate,
    ) -> GenerationContext {
        let high = 120.0;
        let low = 80.0;
        GenerationContext {
            timeframe,
            current_price: 100.0,
            campaign_high: high,
            campaign_low: low,
            trade_amount: 1000.0,
            evaluated_on,
            influence: resolve_influence(timeframe, &outlook),
            outlook,
            levels: retracement::calculate_levels(high, low, false).unwrap(),
        }
    }

    fn off_cycle_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_monthly_always_watches_cycles() {
        let ctx = context(Timeframe::Monthly, MarketOutlook::new(), off_cycle_day());
        let opps = CycleReversalStrategy.generate(&ctx).unwrap();
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].priority, Priority::High);
        assert_eq!(opps[0].entry_level, Some(GannLevel::Half));
    }

    #[test]
    fn test_daily_never_emits() {
        let ctx = context(Timeframe::Daily, MarketOutlook::new(), off_cycle_day());
        assert!(CycleReversalStrategy.generate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_four_hour_needs_cycle_day_window() {
        let near = NaiveDate::from_ymd_opt(2024, 6, 13).unwrap();
        let ctx = context(Timeframe::FourHour, MarketOutlook::new(), near);
        assert_eq!(CycleReversalStrategy.generate(&ctx).unwrap().len(), 1);

        let far = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let ctx = context(Timeframe::FourHour, MarketOutlook::new(), far);
        assert!(CycleReversalStrategy.generate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_bear_influence_flips_direction_short() {
        let outlook = MarketOutlook::new().with(Timeframe::Monthly, StructuralBias::Bear);
        let ctx = context(Timeframe::FifteenMin, outlook, off_cycle_day());
        let opps = CycleReversalStrategy.generate(&ctx).unwrap();
        assert_eq!(opps.len(), 1);
        assert!(!opps[0].is_long());
        assert!(opps[0].description.contains("bearish reversal"));
    }
}
