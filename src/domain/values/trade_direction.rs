use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    pub fn is_long(&self) -> bool {
        matches!(self, TradeDirection::Long)
    }

    pub fn opposite(&self) -> TradeDirection {
        match self {
            TradeDirection::Long => TradeDirection::Short,
            TradeDirection::Short => TradeDirection::Long,
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "long"),
            TradeDirection::Short => write!(f, "short"),
        }
    }
}

impl FromStr for TradeDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" | "bull" | "buy" => Ok(TradeDirection::Long),
            "short" | "bear" | "sell" => Ok(TradeDirection::Short),
            _ => Err(format!("Unknown trade direction: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("bull".parse::<TradeDirection>(), Ok(TradeDirection::Long));
        assert_eq!("SELL".parse::<TradeDirection>(), Ok(TradeDirection::Short));
        assert!("sideways".parse::<TradeDirection>().is_err());
    }

    #[test]
    fn test_opposite() {
        assert_eq!(TradeDirection::Long.opposite(), TradeDirection::Short);
        assert!(TradeDirection::Short.opposite().is_long());
    }
}
