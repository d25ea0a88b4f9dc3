use serde::{Deserialize, Serialize};

/// Swing points found in a close series. Indices are strictly increasing
/// within each list, and no index appears in both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwingSet {
    pub highs: Vec<usize>,
    pub lows: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    Top,
    Bottom,
}

impl SwingSet {
    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }

    /// Most recent swing by index. Ties cannot occur since the lists are
    /// disjoint, but a top would win one.
    pub fn latest(&self) -> Option<(usize, SwingKind)> {
        let last_high = self.highs.last().copied();
        let last_low = self.lows.last().copied();
        match (last_high, last_low) {
            (Some(h), Some(l)) if h >= l => Some((h, SwingKind::Top)),
            (Some(_), Some(l)) => Some((l, SwingKind::Bottom)),
            (Some(h), None) => Some((h, SwingKind::Top)),
            (None, Some(l)) => Some((l, SwingKind::Bottom)),
            (None, None) => None,
        }
    }
}

/// Detect swing highs and lows over a close series. Index `i` is a swing
/// high when its close strictly exceeds every close within `lookback` bars
/// on both sides; swing lows mirror that. The first and last `lookback`
/// bars can never qualify, and a series shorter than `2 * lookback + 1`
/// has no interior window at all.
pub fn find_swings(closes: &[f64], lookback: usize) -> SwingSet {
    let mut swings = SwingSet::default();
    if lookback == 0 || closes.len() < 2 * lookback + 1 {
        return swings;
    }

    for i in lookback..closes.len() - lookback {
        let window = &closes[i - lookback..=i + lookback];
        let center = closes[i];
        let is_high = window
            .iter()
            .enumerate()
            .all(|(j, &c)| j == lookback || c < center);
        let is_low = window
            .iter()
            .enumerate()
            .all(|(j, &c)| j == lookback || c > center);
        if is_high {
            swings.highs.push(i);
        } else if is_low {
            swings.lows.push(i);
        }
    }

    swings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_single_peak_and_trough() {
        // Peak at index 3, trough at index 7
        let closes = [1.0, 2.0, 3.0, 5.0, 3.0, 2.0, 1.5, 0.5, 1.0, 2.0, 3.0];
        let swings = find_swings(&closes, 3);
        assert_eq!(swings.highs, vec![3]);
        assert_eq!(swings.lows, vec![7]);
    }

    #[test]
    fn test_monotone_series_has_no_swings() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let swings = find_swings(&closes, 3);
        assert!(swings.is_empty());
    }

    #[test]
    fn test_short_series_is_empty() {
        let closes = [1.0, 2.0, 1.0, 2.0, 1.0, 2.0];
        assert!(find_swings(&closes, 3).is_empty());
        // 2 * 3 + 1 = 7 points is the minimum for lookback 3
        let closes = [1.0, 2.0, 3.0, 9.0, 3.0, 2.0, 1.0];
        assert_eq!(find_swings(&closes, 3).highs, vec![3]);
    }

    #[test]
    fn test_plateau_is_not_a_swing() {
        // Equal closes either side of the candidate disqualify it
        let closes = [1.0, 2.0, 3.0, 5.0, 5.0, 2.0, 1.0, 0.5, 0.2, 0.1, 0.0];
        let swings = find_swings(&closes, 3);
        assert!(swings.highs.is_empty());
    }

    #[test]
    fn test_edges_never_qualify() {
        // Global max at index 0 is outside every candidate window once the
        // peak at 7 is far enough from it; index 0 itself never qualifies
        let closes = [9.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 6.0, 0.0, 1.0, 2.0];
        let swings = find_swings(&closes, 3);
        assert_eq!(swings.highs, vec![7]);
        assert!(!swings.highs.contains(&0));
    }

    #[test]
    fn test_latest_prefers_most_recent_swing() {
        let closes = [1.0, 2.0, 3.0, 5.0, 3.0, 2.0, 1.5, 0.5, 1.0, 2.0, 3.0];
        let swings = find_swings(&closes, 3);
        assert_eq!(swings.latest(), Some((7, SwingKind::Bottom)));
    }

    #[test]
    fn test_lists_disjoint_and_increasing() {
        let closes = [
            10.0, 12.0, 15.0, 11.0, 9.0, 13.0, 17.0, 14.0, 12.0, 16.0, 19.0, 15.0, 13.0,
        ];
        let swings = find_swings(&closes, 2);
        for pair in swings.highs.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for pair in swings.lows.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for h in &swings.highs {
            assert!(!swings.lows.contains(h));
        }
    }
}
