use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::trade_direction::TradeDirection;
use serde::Serialize;

/// One scheduled tightening step: after `trigger_days` the stop moves to
/// `new_stop`.
#[derive(Debug, Clone, Serialize)]
pub struct StopAdjustment {
    pub trigger_days: f64,
    pub new_stop: f64,
    pub tighten_amount: f64,
    pub tighten_pct: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopSchedule {
    pub original_stop: f64,
    pub adjustments: Vec<StopAdjustment>,
    /// Percent tightening of the final step, the most the schedule will
    /// ever move the stop.
    pub max_tightening_pct: f64,
}

/// Tightening steps as (days held, percent of entry).
fn schedule_steps(timeframe: Timeframe) -> [(f64, f64); 3] {
    match timeframe {
        Timeframe::Monthly => [(30.0, 1.0), (60.0, 2.0), (90.0, 3.0)],
        Timeframe::Weekly => [(7.0, 1.0), (14.0, 2.0), (21.0, 3.0)],
        Timeframe::Daily => [(7.0, 0.5), (14.0, 1.0), (21.0, 1.5)],
        Timeframe::FourHour => [(1.0, 0.5), (2.0, 1.0), (3.0, 1.5)],
        Timeframe::OneHour => [(0.17, 0.3), (0.33, 0.6), (0.50, 0.9)],
        Timeframe::FifteenMin => [(0.021, 0.2), (0.042, 0.4), (0.083, 0.6)],
        Timeframe::FiveMin => [(0.021, 0.2), (0.042, 0.4), (0.063, 0.6)],
        Timeframe::OneMin => [(0.007, 0.1), (0.014, 0.2), (0.021, 0.3)],
    }
}

fn holding_span(days: f64) -> String {
    if days >= 1.0 {
        let whole = days.round() as i64;
        if whole == 1 {
            "1 day".to_string()
        } else {
            format!("{whole} days")
        }
    } else {
        let hours = (days * 24.0).round() as i64;
        if hours >= 1 {
            format!("{hours} hours")
        } else {
            format!("{} minutes", (days * 24.0 * 60.0).round() as i64)
        }
    }
}

/// Time-based stop tightening: the longer a position is held without
/// reaching its target, the closer the stop moves toward entry. Bulls
/// raise the stop, bears lower it.
pub fn stop_schedule(
    entry: f64,
    original_stop: f64,
    timeframe: Timeframe,
    direction: TradeDirection,
) -> StopSchedule {
    let steps = schedule_steps(timeframe);
    let adjustments = steps
        .iter()
        .map(|&(days, pct)| {
            let tighten_amount = entry * pct / 100.0;
            let new_stop = if direction.is_long() {
                original_stop + tighten_amount
            } else {
                original_stop - tighten_amount
            };
            StopAdjustment {
                trigger_days: days,
                new_stop,
                tighten_amount,
                tighten_pct: pct,
                description: format!(
                    "After {}: Move stop to ${new_stop:.2} ({pct}% tighter)",
                    holding_span(days)
                ),
            }
        })
        .collect();

    StopSchedule {
        original_stop,
        adjustments,
        max_tightening_pct: steps[2].1,
    }
}
