//! Resolves a profile's asset list and attaches live price data

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{AssetRecommendation, HistoryLookup};
use crate::error::{PlannerError, Result};
use crate::market::{PricePoint, PriceSource, TRAILING_YEAR_DAYS};
use crate::profiles::{is_market_asset, ProfileTable};

const NO_USABLE_CLOSES: &str = "price series has no usable closes";

/// What to do when a price lookup fails outright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Keep the asset, marked unavailable, and carry on with the rest
    #[default]
    Degrade,
    /// Fail the whole recommendation request
    Abort,
}

impl FetchFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "degrade" => Some(FetchFailurePolicy::Degrade),
            "abort" => Some(FetchFailurePolicy::Abort),
            _ => None,
        }
    }
}

/// Enrichment settings
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Trailing window for the return calculation
    pub lookback_days: u32,

    pub on_failure: FetchFailurePolicy,

    /// Fetch market assets concurrently; output order is unchanged
    pub parallel: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            lookback_days: TRAILING_YEAR_DAYS,
            on_failure: FetchFailurePolicy::Degrade,
            parallel: false,
        }
    }
}

/// Return over `series` as a fraction, with the last close
///
/// `None` when the series is empty, a close is not finite, or the first close is not positive.
pub fn trailing_return(series: &[PricePoint]) -> Option<(f64, f64)> {
    let first = series.first()?.close;
    let last = series.last()?.close;
    if !first.is_finite() || !last.is_finite() || first <= 0.0 {
        return None;
    }
    Some(((last - first) / first, last))
}

pub struct RecommendationEnricher {
    table: ProfileTable,
    source: Arc<dyn PriceSource>,
    config: EnrichmentConfig,
}

impl RecommendationEnricher {
    pub fn new(table: ProfileTable, source: Arc<dyn PriceSource>, config: EnrichmentConfig) -> Self {
        Self { table, source, config }
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Recommended assets for `name`, in the profile's list order
    ///
    /// Unknown profiles yield an empty list. Market assets with no history in
    /// the window are left out.
    pub fn recommendations_for(&self, name: &str) -> Result<Vec<AssetRecommendation>> {
        let Some((profile, spec)) = self.table.lookup(name) else {
            log::warn!("unrecognised risk profile {name:?}, no recommendations");
            return Ok(Vec::new());
        };

        // Results are collected positionally, so parallel fetches keep list order
        let resolved: Vec<Option<AssetRecommendation>> = if self.config.parallel {
            spec.assets
                .par_iter()
                .map(|asset| self.resolve(asset))
                .collect::<Result<_>>()?
        } else {
            spec.assets
                .iter()
                .map(|asset| self.resolve(asset))
                .collect::<Result<_>>()?
        };

        let recommendations: Vec<AssetRecommendation> = resolved.into_iter().flatten().collect();
        log::debug!(
            "{} of {} assets recommended for {}",
            recommendations.len(),
            spec.assets.len(),
            profile
        );
        Ok(recommendations)
    }

    fn resolve(&self, asset: &str) -> Result<Option<AssetRecommendation>> {
        if !is_market_asset(asset) {
            return Ok(Some(AssetRecommendation::not_applicable(asset)));
        }

        match self.lookup(asset) {
            HistoryLookup::Series(points) => Ok(Some(match trailing_return(&points) {
                Some((ret, last)) => AssetRecommendation::live(asset, ret, last),
                None => {
                    log::warn!("{asset}: price series has no usable closes for a return");
                    AssetRecommendation::unavailable(asset, NO_USABLE_CLOSES)
                }
            })),
            HistoryLookup::Empty => {
                log::info!("{asset}: no price history in the last {} days, skipping", self.config.lookback_days);
                Ok(None)
            }
            HistoryLookup::Failure(source) => match self.config.on_failure {
                FetchFailurePolicy::Abort => Err(PlannerError::ExternalSource {
                    ticker: asset.to_string(),
                    source,
                }),
                FetchFailurePolicy::Degrade => {
                    log::warn!("{asset}: price lookup failed: {source}");
                    Ok(Some(AssetRecommendation::unavailable(asset, source.to_string())))
                }
            },
        }
    }

    fn lookup(&self, ticker: &str) -> HistoryLookup {
        self.source.daily_history(ticker, self.config.lookback_days).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::PriceSourceError;
    use crate::recommend::Quote;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Canned {
        Closes(Vec<f64>),
        Empty,
        Fail,
    }

    /// In-memory price source that records every ticker it is asked for
    struct FakeSource {
        canned: HashMap<&'static str, Canned>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(canned: Vec<(&'static str, Canned)>) -> Arc<Self> {
            Arc::new(Self {
                canned: canned.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PriceSource for FakeSource {
        fn daily_history(&self, ticker: &str, _days: u32) -> std::result::Result<Vec<PricePoint>, PriceSourceError> {
            self.calls.lock().unwrap().push(ticker.to_string());
            let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            match self.canned.get(ticker) {
                Some(Canned::Closes(closes)) => Ok(closes
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
                    .collect()),
                Some(Canned::Empty) | None => Ok(Vec::new()),
                Some(Canned::Fail) => Err(PriceSourceError::Network("connection refused".into())),
            }
        }
    }

    fn enricher(source: Arc<FakeSource>, config: EnrichmentConfig) -> RecommendationEnricher {
        RecommendationEnricher::new(ProfileTable::builtin(), source, config)
    }

    fn assets(recs: &[AssetRecommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.asset.as_str()).collect()
    }

    #[test]
    fn test_live_returns_in_profile_order() {
        let source = FakeSource::new(vec![
            ("BOVA11.SA", Canned::Closes(vec![100.0, 110.0, 120.0])),
            ("IMAB11.SA", Canned::Closes(vec![50.0, 45.0])),
        ]);
        let recs = enricher(source, EnrichmentConfig::default())
            .recommendations_for("Equilibrado")
            .unwrap();

        assert_eq!(assets(&recs), ["BOVA11.SA", "IMAB11.SA", "CDB"]);
        assert_relative_eq!(recs[0].trailing_return().unwrap(), 0.2, epsilon = 1e-12);
        assert_eq!(recs[0].last_price(), Some(120.0));
        assert_relative_eq!(recs[1].trailing_return().unwrap(), -0.1, epsilon = 1e-12);
        assert_eq!(recs[2].quote, Quote::NotApplicable);
    }

    #[test]
    fn test_empty_history_skips_asset() {
        let source = FakeSource::new(vec![("IMAB11.SA", Canned::Empty)]);
        let recs = enricher(source.clone(), EnrichmentConfig::default())
            .recommendations_for("Conservador")
            .unwrap();

        assert_eq!(recs, vec![AssetRecommendation::not_applicable("TESOURO SELIC")]);
        assert_eq!(source.calls(), ["IMAB11.SA"]);
    }

    #[test]
    fn test_unknown_profile_makes_no_calls() {
        let source = FakeSource::new(vec![]);
        let recs = enricher(source.clone(), EnrichmentConfig::default())
            .recommendations_for("Moderado")
            .unwrap();

        assert!(recs.is_empty());
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_non_market_assets_are_not_fetched() {
        let source = FakeSource::new(vec![
            ("IVVB11.SA", Canned::Closes(vec![1.0, 2.0])),
            ("BOVA11.SA", Canned::Closes(vec![2.0, 1.0])),
        ]);
        enricher(source.clone(), EnrichmentConfig::default())
            .recommendations_for("Aggressive")
            .unwrap();

        assert_eq!(source.calls(), ["IVVB11.SA", "BOVA11.SA"]);
    }

    #[test]
    fn test_failure_degrades_per_asset() {
        let source = FakeSource::new(vec![
            ("BOVA11.SA", Canned::Fail),
            ("IMAB11.SA", Canned::Closes(vec![10.0, 11.0])),
        ]);
        let recs = enricher(source.clone(), EnrichmentConfig::default())
            .recommendations_for("Balanced")
            .unwrap();

        assert_eq!(assets(&recs), ["BOVA11.SA", "IMAB11.SA", "CDB"]);
        assert!(matches!(recs[0].quote, Quote::Unavailable { .. }));
        assert!(recs[1].trailing_return().is_some());
        // The failure did not stop the remaining lookups
        assert_eq!(source.calls().len(), 2);
    }

    #[test]
    fn test_failure_aborts_when_configured() {
        let source = FakeSource::new(vec![("IMAB11.SA", Canned::Fail)]);
        let config = EnrichmentConfig {
            on_failure: FetchFailurePolicy::Abort,
            ..Default::default()
        };
        let err = enricher(source, config).recommendations_for("Conservative").unwrap_err();

        match err {
            PlannerError::ExternalSource { ticker, source } => {
                assert_eq!(ticker, "IMAB11.SA");
                assert!(matches!(source, PriceSourceError::Network(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_history_is_not_a_failure_under_abort() {
        let source = FakeSource::new(vec![("IMAB11.SA", Canned::Empty)]);
        let config = EnrichmentConfig {
            on_failure: FetchFailurePolicy::Abort,
            ..Default::default()
        };
        let recs = enricher(source, config).recommendations_for("Conservative").unwrap();
        assert_eq!(assets(&recs), ["TESOURO SELIC"]);
    }

    #[test]
    fn test_parallel_fetch_preserves_order() {
        let source = FakeSource::new(vec![
            ("IVVB11.SA", Canned::Closes(vec![200.0, 230.0])),
            ("BOVA11.SA", Canned::Empty),
        ]);
        let config = EnrichmentConfig {
            parallel: true,
            ..Default::default()
        };
        let recs = enricher(source.clone(), config).recommendations_for("Agressivo").unwrap();

        assert_eq!(assets(&recs), ["IVVB11.SA", "BDR"]);
        assert_eq!(source.calls().len(), 2);
    }

    #[test]
    fn test_non_positive_first_close_is_unavailable() {
        let source = FakeSource::new(vec![("IMAB11.SA", Canned::Closes(vec![0.0, 5.0]))]);
        let recs = enricher(source, EnrichmentConfig::default())
            .recommendations_for("Conservative")
            .unwrap();

        assert!(matches!(recs[0].quote, Quote::Unavailable { .. }));
    }

    #[test]
    fn test_non_finite_last_close_is_unavailable() {
        let source = FakeSource::new(vec![("IMAB11.SA", Canned::Closes(vec![10.0, f64::NAN]))]);
        let recs = enricher(source, EnrichmentConfig::default())
            .recommendations_for("Conservative")
            .unwrap();

        let Quote::Unavailable { reason } = &recs[0].quote else {
            panic!("expected unavailable, got {:?}", recs[0].quote);
        };
        assert!(reason.contains("no usable closes"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_trailing_return_single_point() {
        let points = [PricePoint::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 42.0)];
        assert_eq!(trailing_return(&points), Some((0.0, 42.0)));
        assert_eq!(trailing_return(&[]), None);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(FetchFailurePolicy::parse("Abort"), Some(FetchFailurePolicy::Abort));
        assert_eq!(FetchFailurePolicy::parse("degrade"), Some(FetchFailurePolicy::Degrade));
        assert_eq!(FetchFailurePolicy::parse("retry"), None);
    }
}
