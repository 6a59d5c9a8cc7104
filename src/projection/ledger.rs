//! Ledger output structures for projections

use serde::{Deserialize, Serialize};

/// A single row of projection output for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Period index (1-based)
    pub period: u32,

    /// End-of-period balance, after contribution and growth
    pub balance: f64,

    /// Starting capital plus every contribution made so far
    pub total_invested: f64,

    /// Balance minus total invested
    pub cumulative_growth: f64,
}

impl LedgerEntry {
    pub fn new(period: u32, balance: f64, total_invested: f64) -> Self {
        Self {
            period,
            balance,
            total_invested,
            cumulative_growth: balance - total_invested,
        }
    }
}

/// Ordered per-period projection records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(months: usize) -> Self {
        Self {
            entries: Vec::with_capacity(months),
        }
    }

    /// Add an entry
    pub fn add_entry(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// First period whose balance meets or exceeds `target`
    ///
    /// A target of zero or less disables goal tracking and always yields `None`.
    pub fn first_period_reaching(&self, target: f64) -> Option<u32> {
        if target.is_nan() || target <= 0.0 {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.balance >= target)
            .map(|entry| entry.period)
    }

    /// Get summary statistics
    ///
    /// `starting_capital` is reported as the final balance of an empty ledger.
    pub fn summary(&self, starting_capital: f64) -> LedgerSummary {
        match self.entries.last() {
            Some(last) => LedgerSummary {
                total_months: self.entries.len() as u32,
                final_balance: last.balance,
                total_invested: last.total_invested,
                total_growth: last.cumulative_growth,
            },
            None => LedgerSummary {
                total_months: 0,
                final_balance: starting_capital,
                total_invested: starting_capital,
                total_growth: 0.0,
            },
        }
    }
}

impl From<Vec<LedgerEntry>> for Ledger {
    fn from(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_months: u32,
    pub final_balance: f64,
    pub total_invested: f64,
    pub total_growth: f64,
}

/// Scan `ledger` in period order for the first balance at or above `target`
pub fn first_period_reaching(ledger: &Ledger, target: f64) -> Option<u32> {
    ledger.first_period_reaching(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_from_balances(balances: &[f64]) -> Ledger {
        balances
            .iter()
            .enumerate()
            .map(|(i, &b)| LedgerEntry::new(i as u32 + 1, b, 1000.0))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_goal_reached_between_periods() {
        let ledger = ledger_from_balances(&[4400.0, 4500.0, 4600.0, 4700.0, 4800.0, 4900.0, 5050.0, 5200.0]);
        assert_eq!(first_period_reaching(&ledger, 5000.0), Some(7));
    }

    #[test]
    fn test_goal_equal_to_balance_returns_that_period() {
        let ledger = ledger_from_balances(&[100.0, 200.0, 300.0, 400.0]);
        assert_eq!(ledger.first_period_reaching(300.0), Some(3));
    }

    #[test]
    fn test_goal_returns_first_not_largest() {
        // Balances can dip when the rate is negative; the first crossing wins
        let ledger = ledger_from_balances(&[100.0, 600.0, 500.0, 900.0]);
        assert_eq!(ledger.first_period_reaching(550.0), Some(2));
    }

    #[test]
    fn test_goal_disabled_for_non_positive_target() {
        let ledger = ledger_from_balances(&[100.0, 200.0]);
        assert_eq!(ledger.first_period_reaching(0.0), None);
        assert_eq!(ledger.first_period_reaching(-50.0), None);
        assert_eq!(ledger.first_period_reaching(f64::NAN), None);
    }

    #[test]
    fn test_goal_above_final_balance_not_reached() {
        let ledger = ledger_from_balances(&[100.0, 200.0]);
        assert_eq!(ledger.first_period_reaching(200.01), None);
        assert_eq!(Ledger::new().first_period_reaching(1.0), None);
    }

    #[test]
    fn test_summary_of_empty_ledger() {
        let summary = Ledger::new().summary(750.0);
        assert_eq!(summary.total_months, 0);
        assert_eq!(summary.final_balance, 750.0);
        assert_eq!(summary.total_growth, 0.0);
    }

    #[test]
    fn test_entry_growth_is_balance_minus_invested() {
        let entry = LedgerEntry::new(3, 1320.5, 1300.0);
        assert_eq!(entry.cumulative_growth, 1320.5 - 1300.0);
    }
}
