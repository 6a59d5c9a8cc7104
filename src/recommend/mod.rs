//! Profile-based asset recommendations enriched with trailing price returns

mod enricher;

pub use enricher::{trailing_return, EnrichmentConfig, FetchFailurePolicy, RecommendationEnricher};

use serde::{Deserialize, Serialize};

use crate::market::{PricePoint, PriceSourceError};

/// Display value for fields that do not apply
pub const NOT_APPLICABLE: &str = "N/A";

/// Price data attached to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Quote {
    /// Return over the look-back window (as a fraction) and the latest close
    Live { trailing_return: f64, last_price: f64 },
    /// Not a market-traded instrument
    NotApplicable,
    /// Market asset whose lookup failed
    Unavailable { reason: String },
}

/// One row of the recommendation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecommendation {
    pub asset: String,
    pub quote: Quote,
}

impl AssetRecommendation {
    pub fn live(asset: &str, trailing_return: f64, last_price: f64) -> Self {
        Self {
            asset: asset.to_string(),
            quote: Quote::Live {
                trailing_return,
                last_price,
            },
        }
    }

    pub fn not_applicable(asset: &str) -> Self {
        Self {
            asset: asset.to_string(),
            quote: Quote::NotApplicable,
        }
    }

    pub fn unavailable(asset: &str, reason: impl Into<String>) -> Self {
        Self {
            asset: asset.to_string(),
            quote: Quote::Unavailable { reason: reason.into() },
        }
    }

    pub fn trailing_return(&self) -> Option<f64> {
        match self.quote {
            Quote::Live { trailing_return, .. } => Some(trailing_return),
            _ => None,
        }
    }

    pub fn last_price(&self) -> Option<f64> {
        match self.quote {
            Quote::Live { last_price, .. } => Some(last_price),
            _ => None,
        }
    }

    /// Return as a two-decimal percentage, e.g. "12.34%"
    pub fn return_display(&self) -> String {
        self.trailing_return()
            .map(|r| format!("{:.2}%", r * 100.0))
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }

    /// Latest price in reais, e.g. "R$ 104.20"
    pub fn price_display(&self) -> String {
        self.last_price()
            .map(|p| format!("R$ {p:.2}"))
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }
}

/// Outcome of a single price-history request
#[derive(Debug)]
pub enum HistoryLookup {
    Series(Vec<PricePoint>),
    /// The source answered but had no closes in the window
    Empty,
    Failure(PriceSourceError),
}

impl From<Result<Vec<PricePoint>, PriceSourceError>> for HistoryLookup {
    fn from(result: Result<Vec<PricePoint>, PriceSourceError>) -> Self {
        match result {
            Ok(points) if points.is_empty() => HistoryLookup::Empty,
            Ok(points) => HistoryLookup::Series(points),
            Err(e) => HistoryLookup::Failure(e),
        }
    }
}
