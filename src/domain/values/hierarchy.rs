use crate::domain::values::campaign::{SectionTag, StructuralBias};
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Caller-supplied read of each timeframe's structure. Frames without an
/// entry are treated as locally neutral rather than guessed at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub entries: HashMap<Timeframe, OutlookEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutlookEntry {
    pub bias: StructuralBias,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionTag>,
}

impl MarketOutlook {
    pub fn new() -> MarketOutlook {
        MarketOutlook::default()
    }

    pub fn with(mut self, timeframe: Timeframe, bias: StructuralBias) -> MarketOutlook {
        self.entries.insert(timeframe, OutlookEntry { bias, section: None });
        self
    }

    pub fn with_section(
        mut self,
        timeframe: Timeframe,
        bias: StructuralBias,
        section: SectionTag,
    ) -> MarketOutlook {
        self.entries.insert(
            timeframe,
            OutlookEntry {
                bias,
                section: Some(section),
            },
        );
        self
    }

    pub fn bias_of(&self, timeframe: Timeframe) -> Option<StructuralBias> {
        self.entries.get(&timeframe).map(|entry| entry.bias)
    }

    pub fn section_of(&self, timeframe: Timeframe) -> Option<SectionTag> {
        self.entries.get(&timeframe).and_then(|entry| entry.section)
    }

    fn is_bearish(&self, timeframe: Timeframe) -> bool {
        self.bias_of(timeframe) == Some(StructuralBias::Bear)
    }
}

/// Which frame's structure is actually steering trades on this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceSource {
    /// The top of the hierarchy answers to nobody.
    SelfDriven,
    MonthlyBear,
    WeeklyBear,
    Local,
}

impl fmt::Display for InfluenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfluenceSource::SelfDriven => write!(f, "self_driven"),
            InfluenceSource::MonthlyBear => write!(f, "monthly_bear"),
            InfluenceSource::WeeklyBear => write!(f, "weekly_bear"),
            InfluenceSource::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HierarchicalContext {
    pub timeframe: Timeframe,
    pub influence: InfluenceSource,
    /// Effective bias after higher-frame overrides.
    pub bias: StructuralBias,
    pub section: Option<SectionTag>,
    pub weight: u8,
    pub dominant_timeframe: Option<Timeframe>,
    pub override_reason: Option<&'static str>,
}

/// Resolve which structure drives a frame. Monthly bear overrides every
/// lower frame; failing that a weekly bear steers everything below
/// weekly; otherwise the frame trades its own read.
pub fn resolve_influence(timeframe: Timeframe, outlook: &MarketOutlook) -> HierarchicalContext {
    let own_bias = outlook.bias_of(timeframe).unwrap_or(StructuralBias::Neutral);
    let section = outlook.section_of(timeframe);
    let weight = timeframe.weight();

    if timeframe == Timeframe::Monthly {
        return HierarchicalContext {
            timeframe,
            influence: InfluenceSource::SelfDriven,
            bias: own_bias,
            section,
            weight,
            dominant_timeframe: None,
            override_reason: None,
        };
    }

    if outlook.is_bearish(Timeframe::Monthly) {
        return HierarchicalContext {
            timeframe,
            influence: InfluenceSource::MonthlyBear,
            bias: StructuralBias::Bear,
            section,
            weight,
            dominant_timeframe: Some(Timeframe::Monthly),
            override_reason: Some("Monthly BEAR market drives all lower timeframes"),
        };
    }

    if timeframe != Timeframe::Weekly && outlook.is_bearish(Timeframe::Weekly) {
        return HierarchicalContext {
            timeframe,
            influence: InfluenceSource::WeeklyBear,
            bias: StructuralBias::Bear,
            section,
            weight,
            dominant_timeframe: Some(Timeframe::Weekly),
            override_reason: Some("Weekly BEAR trend influences lower timeframes"),
        };
    }

    HierarchicalContext {
        timeframe,
        influence: InfluenceSource::Local,
        bias: own_bias,
        section,
        weight,
        dominant_timeframe: None,
        override_reason: None,
    }
}

impl HierarchicalContext {
    /// Longs are suppressed entirely under a monthly bear and confined to
    /// the 50% level under a weekly bear.
    pub fn allows_long_at(&self, level: GannLevel) -> bool {
        match self.influence {
            InfluenceSource::MonthlyBear => false,
            InfluenceSource::WeeklyBear => level == GannLevel::Half,
            InfluenceSource::SelfDriven | InfluenceSource::Local => true,
        }
    }

    /// Shorts run freely under bear influence; in neutral or bull
    /// environments only the upper half of the range is shorted.
    pub fn allows_short_at(&self, level: GannLevel) -> bool {
        match self.influence {
            InfluenceSource::MonthlyBear | InfluenceSource::WeeklyBear => true,
            InfluenceSource::SelfDriven | InfluenceSource::Local => matches!(
                level,
                GannLevel::Half | GannLevel::FiveEighths | GannLevel::ThreeQuarters
            ),
        }
    }

    pub fn is_bear_driven(&self) -> bool {
        matches!(
            self.influence,
            InfluenceSource::MonthlyBear | InfluenceSource::WeeklyBear
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bear_monthly_outlook() -> MarketOutlook {
        MarketOutlook::new()
            .with_section(Timeframe::Monthly, StructuralBias::Bear, SectionTag::BearB)
            .with(Timeframe::Weekly, StructuralBias::Neutral)
            .with_section(Timeframe::Daily, StructuralBias::Bull, SectionTag::Bull2)
    }

    #[test]
    fn test_monthly_is_self_driven() {
        let context = resolve_influence(Timeframe::Monthly, &bear_monthly_outlook());
        assert_eq!(context.influence, InfluenceSource::SelfDriven);
        assert_eq!(context.bias, StructuralBias::Bear);
        assert_eq!(context.section, Some(SectionTag::BearB));
        assert!(context.dominant_timeframe.is_none());
    }

    #[test]
    fn test_monthly_bear_overrides_lower_frames() {
        // Daily reads bullish on its own, but the monthly bear rules
        let context = resolve_influence(Timeframe::Daily, &bear_monthly_outlook());
        assert_eq!(context.influence, InfluenceSource::MonthlyBear);
        assert_eq!(context.bias, StructuralBias::Bear);
        assert_eq!(context.section, Some(SectionTag::Bull2));
        assert_eq!(context.dominant_timeframe, Some(Timeframe::Monthly));
        assert!(!context.allows_long_at(GannLevel::Half));
        assert!(context.allows_short_at(GannLevel::Quarter));
    }

    #[test]
    fn test_weekly_bear_steers_frames_below_weekly() {
        let outlook = MarketOutlook::new()
            .with(Timeframe::Monthly, StructuralBias::Neutral)
            .with(Timeframe::Weekly, StructuralBias::Bear);

        let context = resolve_influence(Timeframe::OneHour, &outlook);
        assert_eq!(context.influence, InfluenceSource::WeeklyBear);
        assert!(context.allows_long_at(GannLevel::Half));
        assert!(!context.allows_long_at(GannLevel::Quarter));
        assert!(context.allows_short_at(GannLevel::Quarter));

        // Weekly itself trades its own bearish read locally
        let context = resolve_influence(Timeframe::Weekly, &outlook);
        assert_eq!(context.influence, InfluenceSource::Local);
        assert_eq!(context.bias, StructuralBias::Bear);
    }

    #[test]
    fn test_absent_entries_degrade_to_neutral_local() {
        let context = resolve_influence(Timeframe::FourHour, &MarketOutlook::new());
        assert_eq!(context.influence, InfluenceSource::Local);
        assert_eq!(context.bias, StructuralBias::Neutral);
        assert!(context.section.is_none());
        assert!(context.allows_long_at(GannLevel::Quarter));
        assert!(!context.allows_short_at(GannLevel::ThreeEighths));
        assert!(context.allows_short_at(GannLevel::FiveEighths));
    }
}
