//! Strategy port for trade opportunity generation.
//!
//! Defines the [`OpportunityStrategy`] trait and supporting types for
//! generating trade setups from market structure. Strategies read the
//! prepared generation context and emit candidate opportunities.
//!
//! # Overview
//!
//! The strategy system is designed for extensibility:
//!
//! - Implement [`OpportunityStrategy`] to add new setup families
//! - Use [`GenerationContext`] to access the frame's ladder and structure
//! - Return [`Opportunity`] values; the pipeline validates and ranks them

use chrono::NaiveDate;

use crate::domain::entities::opportunity::Opportunity;
use crate::domain::error::DomainError;
use crate::domain::values::hierarchy::{HierarchicalContext, MarketOutlook};
use crate::domain::values::retracement::LevelLadder;
use crate::domain::values::timeframe::Timeframe;

/// Context provided to strategies during generation.
///
/// Carries the frame's retracement ladder, the resolved hierarchical
/// influence, and the trade sizing inputs every strategy prices from.
pub struct GenerationContext {
    pub timeframe: Timeframe,
    pub current_price: f64,
    /// Top of the generation range the ladder was built over.
    pub campaign_high: f64,
    /// Bottom of the generation range the ladder was built over.
    pub campaign_low: f64,
    /// Capital allocated per trade, used for position sizing.
    pub trade_amount: f64,
    /// Date the scan is evaluated on, drives cycle-day checks.
    pub evaluated_on: NaiveDate,
    /// Structural bias per higher frame, as supplied by the caller.
    pub outlook: MarketOutlook,
    /// Which frame's structure is steering this one.
    pub influence: HierarchicalContext,
    /// Retracement ladder over the generation range.
    pub levels: LevelLadder,
}

/// Trait for opportunity generation strategies.
///
/// Implement this to add new setup families. Each strategy reads the
/// prepared context and returns zero or more opportunities.
///
/// # Example
///
/// ```ignore
/// struct MyStrategy;
///
/// impl OpportunityStrategy for MyStrategy {
///     fn name(&self) -> &'static str { "my_strategy" }
///
///     fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Opportunity>, DomainError> {
///         // Read ctx.levels / ctx.influence, return opportunities
///         Ok(vec![])
///     }
/// }
/// ```
pub trait OpportunityStrategy: Send + Sync {
    /// Unique name for this strategy.
    fn name(&self) -> &'static str;

    /// Run generation against the provided context.
    fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Opportunity>, DomainError>;
}
