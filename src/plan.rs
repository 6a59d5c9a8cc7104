//! Plan runner: one request in, projection plus recommendations out
//!
//! Holds the profile table and the enricher for the life of the process, so
//! each request only pays for its own arithmetic and price lookups.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::market::{PricePoint, PriceSource, PriceSourceError, YahooChartSource};
use crate::profiles::ProfileTable;
use crate::projection::{
    monthly_rate_from_annual, months_between, Ledger, LedgerSummary, ProjectionEngine, ProjectionParameters,
};
use crate::recommend::{AssetRecommendation, FetchFailurePolicy, RecommendationEnricher};

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Free-text goal, e.g. "buy a house"; echoed back only
    #[serde(default)]
    pub goal: String,

    pub profile: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[serde(default)]
    pub starting_capital: f64,

    #[serde(default)]
    pub monthly_contribution: f64,

    /// Balance to reach; zero or less turns goal tracking off
    #[serde(default)]
    pub target_balance: f64,
}

/// Whether and when the target balance is reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalStatus {
    Disabled,
    Reached { period: u32 },
    NotReached,
}

impl GoalStatus {
    pub fn evaluate(ledger: &Ledger, target: f64) -> Self {
        if target.is_nan() || target <= 0.0 {
            return GoalStatus::Disabled;
        }
        match ledger.first_period_reaching(target) {
            Some(period) => GoalStatus::Reached { period },
            None => GoalStatus::NotReached,
        }
    }
}

/// Projection half of a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanProjection {
    pub horizon_months: u32,
    pub annual_rate: f64,
    pub monthly_rate: f64,
    pub ledger: Ledger,
    pub summary: LedgerSummary,
    pub goal: GoalStatus,
}

/// Complete answer to a [`PlanRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub goal: String,
    pub profile: String,
    pub target_balance: f64,
    pub projection: PlanProjection,
    pub recommendations: Vec<AssetRecommendation>,
}

/// Price source for runs that must not touch the network
struct OfflineSource;

impl PriceSource for OfflineSource {
    fn daily_history(&self, ticker: &str, _days: u32) -> std::result::Result<Vec<PricePoint>, PriceSourceError> {
        Err(PriceSourceError::Network(format!("offline mode, {ticker} not fetched")))
    }
}

pub struct PlanRunner {
    enricher: RecommendationEnricher,
}

impl PlanRunner {
    pub fn new(enricher: RecommendationEnricher) -> Self {
        Self { enricher }
    }

    /// Build a runner backed by the Yahoo chart API
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let table = load_table(config)?;
        let source = YahooChartSource::new(config.price_source_url.clone(), config.request_timeout)
            .map_err(PlannerError::PriceSourceSetup)?;
        Ok(Self::with_source(table, Arc::new(source), config))
    }

    /// Build a runner that never fetches prices; market assets are reported unavailable
    ///
    /// The failure policy is forced to `Degrade` since every lookup fails by construction.
    pub fn offline(config: &PlannerConfig) -> Result<Self> {
        let mut enrichment = config.enrichment.clone();
        enrichment.on_failure = FetchFailurePolicy::Degrade;
        let enricher = RecommendationEnricher::new(load_table(config)?, Arc::new(OfflineSource), enrichment);
        Ok(Self::new(enricher))
    }

    pub fn with_source(table: ProfileTable, source: Arc<dyn PriceSource>, config: &PlannerConfig) -> Self {
        Self::new(RecommendationEnricher::new(table, source, config.enrichment.clone()))
    }

    pub fn profiles(&self) -> &ProfileTable {
        self.enricher.table()
    }

    /// Projection parameters for a request, using the profile's growth rate
    pub fn parameters_for(&self, request: &PlanRequest) -> ProjectionParameters {
        let annual_rate = self.profiles().annual_rate_for(&request.profile);
        ProjectionParameters::with_annual_rate(
            request.starting_capital,
            request.monthly_contribution,
            months_between(request.start_date, request.end_date),
            annual_rate,
        )
    }

    pub fn project(&self, request: &PlanRequest) -> Result<PlanProjection> {
        if !request.target_balance.is_finite() {
            return Err(PlannerError::invalid(
                "target_balance",
                format!("{} is not a finite amount", request.target_balance),
            ));
        }

        let annual_rate = self.profiles().annual_rate_for(&request.profile);
        let params = self.parameters_for(request);
        let ledger = ProjectionEngine::new(params.clone()).project()?;

        Ok(PlanProjection {
            horizon_months: ledger.len() as u32,
            annual_rate,
            monthly_rate: monthly_rate_from_annual(annual_rate),
            summary: ledger.summary(params.starting_capital),
            goal: GoalStatus::evaluate(&ledger, request.target_balance),
            ledger,
        })
    }

    pub fn recommend(&self, profile: &str) -> Result<Vec<AssetRecommendation>> {
        self.enricher.recommendations_for(profile)
    }

    /// Projection and recommendations; the projection is validated first so
    /// bad input never triggers price lookups
    pub fn run(&self, request: &PlanRequest) -> Result<PlanReport> {
        let projection = self.project(request)?;
        let recommendations = self.recommend(&request.profile)?;

        Ok(PlanReport {
            goal: request.goal.clone(),
            profile: request.profile.clone(),
            target_balance: request.target_balance,
            projection,
            recommendations,
        })
    }
}

fn load_table(config: &PlannerConfig) -> Result<ProfileTable> {
    match &config.profiles_path {
        Some(path) => {
            log::info!("loading risk profiles from {}", path.display());
            ProfileTable::from_csv_path(path)
        }
        None => Ok(ProfileTable::builtin()),
    }
}
