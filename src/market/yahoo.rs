//! Yahoo Finance chart API client

use std::time::Duration;

use chrono::DateTime;
use reqwest::Url;
use serde::Deserialize;

use super::{PricePoint, PriceSource, PriceSourceError};

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Blocking client for the v8 chart endpoint. No API key required.
pub struct YahooChartSource {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl YahooChartSource {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, PriceSourceError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| PriceSourceError::Parse(format!("chart URL {:?}: {e}", base_url.as_ref())))?;
        if base_url.cannot_be_a_base() {
            return Err(PriceSourceError::Parse(format!("chart URL {base_url} cannot take a ticker path")));
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; SavingsPlanner/0.1)")
            .timeout(timeout)
            .build()
            .map_err(|e| PriceSourceError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

/// Chart URL for `ticker`, appended as a single escaped path segment
fn chart_url(base: &Url, ticker: &str) -> Result<Url, PriceSourceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PriceSourceError::Parse(format!("chart URL {base} cannot take a ticker path")))?
        .pop_if_empty()
        .push(ticker);
    Ok(url)
}

// Only the fields we read
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    // Absent when the window holds no trading days
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Smallest chart range covering a look-back of `days`
fn range_for(days: u32) -> &'static str {
    if days <= 5 {
        "5d"
    } else if days <= 30 {
        "1mo"
    } else if days <= 90 {
        "3mo"
    } else if days <= 180 {
        "6mo"
    } else if days <= 365 {
        "1y"
    } else if days <= 730 {
        "2y"
    } else {
        "5y"
    }
}

/// Parse a chart response body into chronological closes
///
/// A "Not Found" error or a result without timestamps is an empty series,
/// any other reported error is a bad response.
pub fn parse_chart(body: &str) -> Result<Vec<PricePoint>, PriceSourceError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| PriceSourceError::Parse(e.to_string()))?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Ok(Vec::new());
        }
        let detail = error.description.unwrap_or_default();
        return Err(PriceSourceError::BadResponse(format!("{}: {}", error.code, detail)));
    }

    let Some(result) = response.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(Vec::new());
    };

    if result.timestamp.is_empty() {
        return Ok(Vec::new());
    }

    let closes = &result
        .indicators
        .quote
        .first()
        .ok_or_else(|| PriceSourceError::BadResponse("missing quote".into()))?
        .close;

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        // Halted days come back as null closes
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };

        let date = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| PriceSourceError::Parse(format!("bad timestamp {ts}")))?
            .date_naive();

        points.push(PricePoint::new(date, close));
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

impl PriceSource for YahooChartSource {
    fn daily_history(&self, ticker: &str, days: u32) -> Result<Vec<PricePoint>, PriceSourceError> {
        let url = chart_url(&self.base_url, ticker)?;

        let response = self
            .client
            .get(url)
            .query(&[("range", range_for(days)), ("interval", "1d")])
            .send()
            .map_err(|e| PriceSourceError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceSourceError::RateLimited);
        }
        // Unknown symbols come back as 404 with a chart error body
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(PriceSourceError::BadResponse(format!("HTTP {status} for {ticker}")));
        }

        let body = response
            .text()
            .map_err(|e| PriceSourceError::Network(e.to_string()))?;

        let points = parse_chart(&body)?;
        log::debug!("fetched {} closes for {}", points.len(), ticker);
        Ok(points)
    }
}
