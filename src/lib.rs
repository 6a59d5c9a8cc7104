//! Savings Planner - compound-growth projections with profile-based recommendations
//!
//! This library provides:
//! - Month-by-month savings ledgers under a compound growth rate
//! - Goal tracking (first month a target balance is reached)
//! - A fixed risk profile → growth rate / asset list table
//! - Recommendation enrichment with trailing one-year returns from a price source
//! - CSV and JSON export of results

pub mod config;
pub mod error;
pub mod export;
pub mod market;
pub mod plan;
pub mod profiles;
pub mod projection;
pub mod recommend;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use market::{PricePoint, PriceSource, PriceSourceError};
pub use plan::{GoalStatus, PlanReport, PlanRequest, PlanRunner};
pub use profiles::{ProfileTable, RiskProfile};
pub use projection::{first_period_reaching, project, Ledger, LedgerEntry, ProjectionEngine, ProjectionParameters};
pub use recommend::{AssetRecommendation, Quote, RecommendationEnricher};
