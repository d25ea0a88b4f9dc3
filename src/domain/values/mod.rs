pub mod alignment;
pub mod breaks;
pub mod campaign;
pub mod cycles;
pub mod hierarchy;
pub mod patterns;
pub mod priority;
pub mod projection;
pub mod retracement;
pub mod risk;
pub mod stops;
pub mod structure;
pub mod swing;
pub mod targets;
pub mod timeframe;
pub mod trade_direction;
pub mod transitions;
pub mod validation;
pub mod volume;
