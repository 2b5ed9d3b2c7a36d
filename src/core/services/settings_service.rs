use crate::ledger::{LedgerState, RulePercentages};

use super::{finite, ServiceError, ServiceResult};

/// Validated updates to the exchange rate and the allocation rule.
pub struct SettingsService;

impl SettingsService {
    /// Replaces the rule percentages; they must add up to 100.
    pub fn update_rule_percentages(
        state: &mut LedgerState,
        rules: RulePercentages,
    ) -> ServiceResult<RulePercentages> {
        finite("Growth", rules.growth)?;
        finite("Stability", rules.stability)?;
        finite("Essentials", rules.essentials)?;
        finite("Rewards", rules.rewards)?;
        if !rules.totals_hundred() {
            return Err(ServiceError::Validation(format!(
                "percentages must total 100, got {}",
                rules.sum()
            )));
        }
        Ok(std::mem::replace(&mut state.rule_percentages, rules))
    }

    /// Sets how many local currency units one foreign unit is worth.
    pub fn update_exchange_rate(state: &mut LedgerState, rate: f64) -> ServiceResult<f64> {
        let rate = finite("Exchange rate", rate)?;
        if rate <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "exchange rate must be positive, got {rate}"
            )));
        }
        Ok(std::mem::replace(&mut state.exchange_rate, rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_update_requires_hundred() {
        let mut state = LedgerState::default();
        let err = SettingsService::update_rule_percentages(
            &mut state,
            RulePercentages::new(30.0, 20.0, 40.0, 20.0),
        )
        .expect_err("sum 110");
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(state.rule_percentages, RulePercentages::default());

        SettingsService::update_rule_percentages(
            &mut state,
            RulePercentages::new(30.0, 20.0, 40.0, 10.004),
        )
        .expect("within tolerance");
        assert_eq!(state.rule_percentages.growth, 30.0);
    }

    #[test]
    fn exchange_rate_must_be_positive() {
        let mut state = LedgerState::default();
        assert!(SettingsService::update_exchange_rate(&mut state, 0.0).is_err());
        assert!(SettingsService::update_exchange_rate(&mut state, f64::INFINITY).is_err());
        let previous = SettingsService::update_exchange_rate(&mut state, 305.5).unwrap();
        assert_eq!(previous, 290.0);
        assert_eq!(state.exchange_rate, 305.5);
    }
}
