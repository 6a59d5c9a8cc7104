//! Running state of a single projection

use super::engine::ProjectionParameters;

/// Balance carried from one period to the next
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current period (1-indexed once the first period has been advanced)
    pub period: u32,

    /// End-of-period balance
    pub balance: f64,

    /// Growth credited in the most recent period
    pub period_growth: f64,
}

impl ProjectionState {
    /// Initialize state before the first period
    pub fn from_parameters(params: &ProjectionParameters) -> Self {
        Self {
            period: 0,
            balance: params.starting_capital,
            period_growth: 0.0,
        }
    }

    /// Advance one period: contribution first, then growth on the new balance
    pub fn advance_period(&mut self, contribution: f64, monthly_rate: f64) {
        self.period += 1;
        self.balance += contribution;
        self.period_growth = self.balance * monthly_rate;
        self.balance += self.period_growth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contribution_applied_before_growth() {
        let params = ProjectionParameters::new(1000.0, 100.0, 1, 0.01);
        let mut state = ProjectionState::from_parameters(&params);

        state.advance_period(params.monthly_contribution, params.monthly_rate);

        assert_eq!(state.period, 1);
        // (1000 + 100) * 1.01, not 1000 * 1.01 + 100
        assert_relative_eq!(state.balance, 1111.0, epsilon = 1e-9);
        assert_relative_eq!(state.period_growth, 11.0, epsilon = 1e-9);
    }
}
