//! Projection engine for monthly compound-growth savings ledgers

mod state;
mod engine;
mod ledger;
mod rates;

pub use state::ProjectionState;
pub use engine::{project, ProjectionEngine, ProjectionParameters, MAX_HORIZON_MONTHS};
pub use ledger::{first_period_reaching, Ledger, LedgerEntry, LedgerSummary};
pub use rates::{monthly_rate_from_annual, months_between};
