//! Core projection engine for monthly savings ledgers

use serde::{Deserialize, Serialize};

use super::ledger::{Ledger, LedgerEntry};
use super::rates::monthly_rate_from_annual;
use super::state::ProjectionState;
use crate::error::{PlannerError, Result};

/// Longest horizon accepted, one hundred years
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Inputs to a single projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParameters {
    /// Balance at the start of period 1
    pub starting_capital: f64,

    /// Amount added at the start of every period
    pub monthly_contribution: f64,

    /// Number of whole months to project (negative values are rejected)
    pub horizon_months: i32,

    /// Growth rate applied each month
    pub monthly_rate: f64,
}

impl ProjectionParameters {
    pub fn new(starting_capital: f64, monthly_contribution: f64, horizon_months: i32, monthly_rate: f64) -> Self {
        Self {
            starting_capital,
            monthly_contribution,
            horizon_months,
            monthly_rate,
        }
    }

    /// Build parameters from an annual rate, compounding it down to a monthly one
    pub fn with_annual_rate(
        starting_capital: f64,
        monthly_contribution: f64,
        horizon_months: i32,
        annual_rate: f64,
    ) -> Self {
        Self::new(
            starting_capital,
            monthly_contribution,
            horizon_months,
            monthly_rate_from_annual(annual_rate),
        )
    }

    /// Check the inputs and return the horizon as a period count
    pub fn validate(&self) -> Result<u32> {
        check_amount("starting_capital", self.starting_capital)?;
        check_amount("monthly_contribution", self.monthly_contribution)?;

        if !self.monthly_rate.is_finite() {
            return Err(PlannerError::invalid("monthly_rate", format!("{} is not a finite rate", self.monthly_rate)));
        }

        let horizon = u32::try_from(self.horizon_months).map_err(|_| {
            PlannerError::invalid(
                "horizon_months",
                format!("{} months; the end date must not precede the start date", self.horizon_months),
            )
        })?;
        if horizon > MAX_HORIZON_MONTHS {
            return Err(PlannerError::invalid(
                "horizon_months",
                format!("{horizon} months exceeds the {MAX_HORIZON_MONTHS}-month limit"),
            ));
        }
        Ok(horizon)
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlannerError::invalid(field, format!("{value} is not a finite amount")));
    }
    if value < 0.0 {
        return Err(PlannerError::invalid(field, format!("{value:.2} must not be negative")));
    }
    Ok(())
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: ProjectionParameters,
}

impl ProjectionEngine {
    pub fn new(params: ProjectionParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &ProjectionParameters {
        &self.params
    }

    /// Run the projection, one ledger entry per month
    pub fn project(&self) -> Result<Ledger> {
        let horizon = self.params.validate()?;
        let mut ledger = Ledger::with_capacity(horizon as usize);
        let mut state = ProjectionState::from_parameters(&self.params);

        for _period in 1..=horizon {
            state.advance_period(self.params.monthly_contribution, self.params.monthly_rate);
            ledger.add_entry(self.record_period(&state));
        }

        log::debug!(
            "projected {} months at {:.6} monthly, final balance {:.2}",
            horizon,
            self.params.monthly_rate,
            state.balance
        );

        Ok(ledger)
    }

    fn record_period(&self, state: &ProjectionState) -> LedgerEntry {
        let total_invested = self.params.starting_capital + self.params.monthly_contribution * state.period as f64;
        LedgerEntry::new(state.period, state.balance, total_invested)
    }
}

/// Project `params` without keeping an engine around
pub fn project(params: &ProjectionParameters) -> Result<Ledger> {
    ProjectionEngine::new(params.clone()).project()
}
