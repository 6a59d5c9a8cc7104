//! Error types for projections, profile tables and price enrichment

use crate::market::PriceSourceError;
use thiserror::Error;

/// Errors surfaced by the planner library
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Input rejected before any computation was done
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// Price-history lookup failed and the failure policy is `Abort`
    #[error("price lookup for {ticker} failed: {source}")]
    ExternalSource {
        ticker: String,
        #[source]
        source: PriceSourceError,
    },

    #[error("price source setup failed: {0}")]
    PriceSourceSetup(#[source] PriceSourceError),

    #[error("profile table: {0}")]
    ProfileTable(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PlannerError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// True when the caller should ask the user to correct their input
    pub fn is_user_error(&self) -> bool {
        matches!(self, PlannerError::InvalidParameter { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
