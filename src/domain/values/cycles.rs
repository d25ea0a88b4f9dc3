use crate::domain::values::swing::{find_swings, SwingKind};
use serde::Serialize;

/// Gann bar-count cycles. Fractal: lengths are in bars of whatever
/// timeframe the series was sampled at.
pub const DEFAULT_CYCLE_LENGTHS: [usize; 6] = [7, 30, 45, 90, 120, 180];

pub const DEFAULT_CYCLE_LOOKBACK: usize = 3;

/// The swing the cycle counts run from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleAnchor {
    pub index: usize,
    pub kind: SwingKind,
    pub price: f64,
}

impl CycleAnchor {
    pub fn label(&self) -> &'static str {
        match self.kind {
            SwingKind::Top => "top",
            SwingKind::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleSpan {
    pub length: usize,
    pub from_index: usize,
    pub to_index: usize,
    pub kind: SwingKind,
    /// Latest bar sits inside this length's window (length +/- 1 bars
    /// from the anchor).
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleForecast {
    pub anchor: Option<CycleAnchor>,
    pub bars_since_anchor: Option<usize>,
    pub cycles: Vec<CycleSpan>,
    pub signals: Vec<String>,
}

impl CycleForecast {
    fn empty() -> CycleForecast {
        CycleForecast {
            anchor: None,
            bars_since_anchor: None,
            cycles: Vec::new(),
            signals: Vec::new(),
        }
    }
}

/// Count bars from the most recent swing and flag any cycle length whose
/// window (length +/- 1) the series has just entered.
pub fn forecast_cycles(closes: &[f64], cycle_lengths: &[usize], lookback: usize) -> CycleForecast {
    let swings = find_swings(closes, lookback);
    let Some((index, kind)) = swings.latest() else {
        return CycleForecast::empty();
    };

    let anchor = CycleAnchor {
        index,
        kind,
        price: closes[index],
    };
    let bars_since = closes.len() - 1 - index;

    let mut cycles = Vec::with_capacity(cycle_lengths.len());
    let mut signals = Vec::new();
    for &length in cycle_lengths {
        let active = bars_since + 1 >= length && bars_since <= length + 1;
        if active {
            signals.push(format!(
                "Cycle window ({length} bars) from last {}",
                anchor.label()
            ));
        }
        cycles.push(CycleSpan {
            length,
            from_index: index,
            to_index: closes.len() - 1,
            kind,
            active,
        });
    }

    CycleForecast {
        anchor: Some(anchor),
        bars_since_anchor: Some(bars_since),
        cycles,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A peak at `peak` followed by `tail` declining bars.
    fn series_with_peak(peak: usize, tail: usize) -> Vec<f64> {
        let mut closes: Vec<f64> = (0..=peak).map(|i| 100.0 + i as f64).collect();
        for i in 0..tail {
            closes.push(100.0 + peak as f64 - (i + 1) as f64 * 0.5);
        }
        closes
    }

    #[test]
    fn test_signal_fires_inside_cycle_window() {
        // Peak at index 5, then 7 bars: bars_since = 7 hits the 7-cycle
        let closes = series_with_peak(5, 7);
        let forecast = forecast_cycles(&closes, &DEFAULT_CYCLE_LENGTHS, 3);
        let anchor = forecast.anchor.unwrap();
        assert_eq!(anchor.index, 5);
        assert_eq!(anchor.kind, SwingKind::Top);
        assert_eq!(forecast.bars_since_anchor, Some(7));
        assert_eq!(forecast.signals, vec!["Cycle window (7 bars) from last top"]);
        assert!(forecast.cycles[0].active);
        assert!(!forecast.cycles[1].active);
    }

    #[test]
    fn test_window_spans_one_bar_either_side() {
        // bars_since = 6 is inside the 7-bar window (7 - 1)
        let closes = series_with_peak(5, 6);
        let forecast = forecast_cycles(&closes, &DEFAULT_CYCLE_LENGTHS, 3);
        assert_eq!(forecast.signals.len(), 1);

        // bars_since = 9 is outside every window
        let closes = series_with_peak(5, 9);
        let forecast = forecast_cycles(&closes, &DEFAULT_CYCLE_LENGTHS, 3);
        assert!(forecast.signals.is_empty());
        assert_eq!(forecast.cycles.len(), DEFAULT_CYCLE_LENGTHS.len());
    }

    #[test]
    fn test_trough_anchor_reads_bottom() {
        let mut closes: Vec<f64> = (0..6).map(|i| 100.0 - i as f64).collect();
        for i in 0..7 {
            closes.push(95.0 + i as f64 * 0.5);
        }
        let forecast = forecast_cycles(&closes, &[7], 3);
        let anchor = forecast.anchor.unwrap();
        assert_eq!(anchor.kind, SwingKind::Bottom);
        assert_eq!(
            forecast.signals,
            vec!["Cycle window (7 bars) from last bottom"]
        );
    }

    #[test]
    fn test_no_swings_yields_empty_forecast() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0];
        let forecast = forecast_cycles(&closes, &DEFAULT_CYCLE_LENGTHS, 3);
        assert!(forecast.anchor.is_none());
        assert!(forecast.cycles.is_empty());
        assert!(forecast.signals.is_empty());
    }
}
