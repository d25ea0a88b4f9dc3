use crate::domain::values::retracement::GannLevel;
use crate::domain::values::trade_direction::TradeDirection;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RungKind {
    ExitTarget,
    Extension,
    LetRun,
}

/// Priority of a single ladder rung, distinct from opportunity priority.
/// Extensions and the let-run remainder are optional by nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RungPriority {
    High,
    Medium,
    Optional,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetRung {
    pub kind: RungKind,
    pub level: Option<GannLevel>,
    pub display_name: String,
    /// None for the let-run remainder, which has no fixed exit price.
    pub price: Option<f64>,
    pub exit_pct: f64,
    pub exit_size: f64,
    /// Profit at the rung for the scheduled exit size. None when nothing
    /// is scheduled to exit there.
    pub profit: Option<f64>,
    pub priority: RungPriority,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetLadder {
    /// At most six rungs, nearest exit first.
    pub rungs: Vec<TargetRung>,
    /// Rungs built before the six-rung cap.
    pub total_rungs: usize,
    pub quickest: Option<TargetRung>,
    /// The 50% rung, when it sits on the profitable side of entry.
    pub primary: Option<TargetRung>,
    pub extensions: Vec<TargetRung>,
}

const EXIT_FRACTIONS: [f64; 5] = [0.25, 0.25, 0.25, 0.15, 0.10];
const EXTENSION_LEVELS: [GannLevel; 2] = [GannLevel::NineEighths, GannLevel::FiveQuarters];
const MAX_RUNGS: usize = 6;

fn rung_price(level: GannLevel, high: f64, low: f64, direction: TradeDirection) -> f64 {
    let range = high - low;
    if level.is_extended() {
        let overshoot = range * (level.fraction() - 1.0);
        if direction.is_long() {
            high + overshoot
        } else {
            low - overshoot
        }
    } else if direction.is_long() {
        low + range * level.fraction()
    } else {
        high - range * level.fraction()
    }
}

fn on_profitable_side(price: f64, entry: f64, direction: TradeDirection) -> bool {
    if direction.is_long() {
        price > entry
    } else {
        price < entry
    }
}

/// Gann's progressive exit ladder over the campaign range. A quarter of
/// the position comes off at each of the first three eligible levels,
/// then 15% and 10%, with anything left riding toward the extensions.
pub fn target_ladder(
    entry: f64,
    campaign_high: f64,
    campaign_low: f64,
    direction: TradeDirection,
    position_size: f64,
) -> TargetLadder {
    let mut rungs: Vec<TargetRung> = Vec::new();
    let mut remaining = position_size;

    for (index, level) in GannLevel::TRADING.iter().enumerate() {
        let price = rung_price(*level, campaign_high, campaign_low, direction);
        if !on_profitable_side(price, entry, direction) {
            continue;
        }
        let exit_fraction = EXIT_FRACTIONS[index];
        let exit_size = position_size * exit_fraction;
        let display_name = format!("Target {}", index + 1);
        let is_half = matches!(level, GannLevel::Half);
        rungs.push(TargetRung {
            kind: RungKind::ExitTarget,
            level: Some(*level),
            price: Some(price),
            exit_pct: exit_fraction * 100.0,
            exit_size,
            profit: Some((price - entry).abs() * exit_size),
            priority: if is_half {
                RungPriority::High
            } else {
                RungPriority::Medium
            },
            description: if is_half {
                "50% Gann level - Most reliable target".to_string()
            } else {
                format!("{display_name} - Progressive exit")
            },
            display_name,
        });
        remaining -= exit_size;
    }

    // Threshold absorbs float residue from the fraction sum.
    if remaining > position_size * 0.001 {
        rungs.push(TargetRung {
            kind: RungKind::LetRun,
            level: None,
            display_name: "Let Run".to_string(),
            price: None,
            exit_pct: remaining / position_size * 100.0,
            exit_size: remaining,
            profit: None,
            priority: RungPriority::Optional,
            description: "Let remaining position run for maximum profit".to_string(),
        });
    }

    for (index, level) in EXTENSION_LEVELS.iter().enumerate() {
        let price = rung_price(*level, campaign_high, campaign_low, direction);
        rungs.push(TargetRung {
            kind: RungKind::Extension,
            level: Some(*level),
            display_name: format!("Extension {}", index + 1),
            price: Some(price),
            exit_pct: 0.0,
            exit_size: 0.0,
            profit: None,
            priority: RungPriority::Optional,
            description: "Extension beyond normal range".to_string(),
        });
    }

    let total_rungs = rungs.len();
    let quickest = rungs.first().cloned();
    let primary = rungs
        .iter()
        .find(|rung| rung.kind == RungKind::ExitTarget && rung.level == Some(GannLevel::Half))
        .cloned();
    let extensions = rungs
        .iter()
        .filter(|rung| rung.kind != RungKind::ExitTarget)
        .cloned()
        .collect();
    rungs.truncate(MAX_RUNGS);

    TargetLadder {
        rungs,
        total_rungs,
        quickest,
        primary,
        extensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bull_ladder_from_campaign_low() {
        let ladder = target_ladder(100.0, 200.0, 100.0, TradeDirection::Long, 8.0);
        // Five exit targets plus two extensions, capped to six rungs
        assert_eq!(ladder.total_rungs, 7);
        assert_eq!(ladder.rungs.len(), 6);
        assert_eq!(ladder.extensions.len(), 2);

        let first = ladder.quickest.as_ref().unwrap();
        assert_eq!(first.price, Some(125.0));
        assert_eq!(first.exit_size, 2.0);
        assert_eq!(first.profit, Some(50.0));

        let primary = ladder.primary.as_ref().unwrap();
        assert_eq!(primary.price, Some(150.0));
        assert_eq!(primary.priority, RungPriority::High);
        assert_eq!(primary.description, "50% Gann level - Most reliable target");

        // Exits sum to the whole position, so no let-run rung appears
        assert!(ladder
            .rungs
            .iter()
            .all(|rung| rung.kind != RungKind::LetRun));
        // The cap trims the far extension
        assert_eq!(ladder.rungs[5].display_name, "Extension 1");
        assert_eq!(ladder.rungs[5].price, Some(212.5));
    }

    #[test]
    fn test_entry_at_half_skips_lower_targets() {
        let ladder = target_ladder(150.0, 200.0, 100.0, TradeDirection::Long, 10.0);
        // 62.5% and 75% remain; 25/37.5/50 sit at or below entry
        let exit_targets: Vec<_> = ladder
            .rungs
            .iter()
            .filter(|rung| rung.kind == RungKind::ExitTarget)
            .collect();
        assert_eq!(exit_targets.len(), 2);
        assert_eq!(exit_targets[0].price, Some(162.5));
        assert_eq!(exit_targets[1].price, Some(175.0));
        assert!(ladder.primary.is_none());

        // 75% of the position rides
        let let_run = ladder
            .rungs
            .iter()
            .find(|rung| rung.kind == RungKind::LetRun)
            .unwrap();
        assert!((let_run.exit_pct - 75.0).abs() < 1e-9);
        assert_eq!(let_run.exit_size, 7.5);
        assert!(let_run.price.is_none());
    }

    #[test]
    fn test_bear_ladder_mirrors_from_campaign_high() {
        let ladder = target_ladder(175.0, 200.0, 100.0, TradeDirection::Short, 8.0);
        // 25% rung sits exactly at entry and is skipped
        let exit_targets: Vec<_> = ladder
            .rungs
            .iter()
            .filter(|rung| rung.kind == RungKind::ExitTarget)
            .collect();
        assert_eq!(exit_targets.len(), 4);
        assert_eq!(exit_targets[0].price, Some(162.5));

        let primary = ladder.primary.as_ref().unwrap();
        assert_eq!(primary.price, Some(150.0));

        // Let-run plus two price extensions below the campaign low
        assert_eq!(ladder.extensions.len(), 3);
        let prices: Vec<_> = ladder
            .extensions
            .iter()
            .filter_map(|rung| rung.price)
            .collect();
        assert_eq!(prices, vec![87.5, 75.0]);

        // The skipped 25% rung leaves a quarter of the position riding
        let let_run = ladder
            .rungs
            .iter()
            .find(|rung| rung.kind == RungKind::LetRun)
            .unwrap();
        assert!((let_run.exit_size - 2.0).abs() < 1e-9);
        assert!((let_run.exit_pct - 25.0).abs() < 1e-9);
    }
}
