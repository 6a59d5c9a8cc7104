//! Price-history source used to enrich market-traded recommendations

mod yahoo;

pub use yahoo::{parse_chart, YahooChartSource, DEFAULT_CHART_URL};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trailing window used for recommendation returns
pub const TRAILING_YEAR_DAYS: u32 = 365;

/// One daily close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Error)]
pub enum PriceSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Daily closing-price history provider
///
/// Implementations return points in chronological order, and an empty series
/// when the symbol has no data in the window. Errors are reserved for lookups
/// that could not be completed.
pub trait PriceSource: Send + Sync {
    fn daily_history(&self, ticker: &str, days: u32) -> Result<Vec<PricePoint>, PriceSourceError>;
}
