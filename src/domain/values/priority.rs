use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution priority attached to a generated opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank for sorting, higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// One step up, saturating at High.
    pub fn bumped(&self) -> Priority {
        match self {
            Priority::High | Priority::Medium => Priority::High,
            Priority::Low => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// How close the current price sits to an opportunity's entry level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityPriority {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl ProximityPriority {
    /// Bucket a percentage distance between price and entry.
    pub fn from_distance(pct_distance: f64) -> ProximityPriority {
        if pct_distance <= 2.0 {
            ProximityPriority::VeryHigh
        } else if pct_distance <= 5.0 {
            ProximityPriority::High
        } else if pct_distance <= 10.0 {
            ProximityPriority::Medium
        } else {
            ProximityPriority::Low
        }
    }

    /// Combine base priority with proximity: imminent setups get pulled
    /// forward, distant ones keep their base priority.
    pub fn combine(&self, base: Priority) -> Priority {
        match (self, base) {
            (ProximityPriority::VeryHigh, Priority::Medium) => Priority::High,
            (ProximityPriority::VeryHigh, Priority::Low) => Priority::Medium,
            (ProximityPriority::High, Priority::Low) => Priority::Medium,
            (_, base) => base,
        }
    }
}

/// Confidence bucket used for sections, setups and timeframe defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Scaling factor applied to campaign-position reliability scores.
    pub fn multiplier(&self) -> f64 {
        match self {
            ConfidenceLevel::High => 1.0,
            ConfidenceLevel::Medium => 0.8,
            ConfidenceLevel::Low => 0.6,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "high"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::Low => write!(f, "low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proximity_buckets() {
        assert_eq!(
            ProximityPriority::from_distance(1.9),
            ProximityPriority::VeryHigh
        );
        assert_eq!(
            ProximityPriority::from_distance(2.0),
            ProximityPriority::VeryHigh
        );
        assert_eq!(ProximityPriority::from_distance(4.2), ProximityPriority::High);
        assert_eq!(
            ProximityPriority::from_distance(9.9),
            ProximityPriority::Medium
        );
        assert_eq!(ProximityPriority::from_distance(25.0), ProximityPriority::Low);
    }

    #[test]
    fn test_combine_pulls_imminent_setups_forward() {
        assert_eq!(
            ProximityPriority::VeryHigh.combine(Priority::Medium),
            Priority::High
        );
        assert_eq!(
            ProximityPriority::VeryHigh.combine(Priority::Low),
            Priority::Medium
        );
        assert_eq!(
            ProximityPriority::High.combine(Priority::Low),
            Priority::Medium
        );
        // Distant setups keep their base priority
        assert_eq!(
            ProximityPriority::Low.combine(Priority::High),
            Priority::High
        );
        assert_eq!(
            ProximityPriority::Medium.combine(Priority::Low),
            Priority::Low
        );
    }
}
