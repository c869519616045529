//! Feature engineering for the credit scoring model
//!
//! Maps a [`CustomerProfile`] into a fixed-order numeric feature vector. The
//! feature order established here is the canonical order recorded at training
//! time; scaling and prediction rely on it matching exactly at inference.

use crate::customer::{CustomerKind, CustomerProfile};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Canonical feature order. Training records this list in the artifact and
/// inference must use the identical order; any divergence is a fatal
/// configuration error, not a silently-wrong score.
pub const FEATURE_NAMES: [&str; 13] = [
    "age",
    "is_business",
    "monthly_income",
    "monthly_expenses",
    "current_balance",
    "expense_to_income_ratio",
    "savings_rate",
    "overdrafts",
    "returned_payments",
    "gambling_transactions",
    "irregular_income",
    "existing_credit_score",
    "country_risk",
];

/// Age substituted when the profile does not carry one
pub const DEFAULT_AGE: f64 = 35.0;
/// Neutral prior score substituted when no credit record exists
pub const DEFAULT_CREDIT_SCORE: f64 = 650.0;
/// Risk weight for countries missing from the lookup table
pub const DEFAULT_COUNTRY_RISK: f64 = 0.2;

/// Feature vector in canonical order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    fn new(values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), FEATURE_NAMES.len());
        Self { values }
    }

    /// Value of a named feature, if it exists
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.values[i])
    }

    /// Values in canonical order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate (name, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Dense array view for model input
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.values.clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds feature vectors from customer profiles.
///
/// Missing nested data resolves to documented defaults; it is never an error.
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Risk weight for a country. Fixed configuration, no external calibration.
    pub fn country_risk(country: &str) -> f64 {
        match country {
            "Netherlands" => 0.05,
            "Germany" => 0.1,
            "France" => 0.15,
            "Italy" => 0.2,
            "Spain" => 0.25,
            "Poland" => 0.3,
            _ => DEFAULT_COUNTRY_RISK,
        }
    }

    /// Build the full 13-feature vector for a profile
    pub fn build(&self, profile: &CustomerProfile) -> FeatureVector {
        let age = profile.age.unwrap_or(DEFAULT_AGE);
        let is_business = match profile.kind {
            CustomerKind::Business => 1.0,
            CustomerKind::Individual => 0.0,
        };

        let (income, expenses, balance, indicators) = match &profile.bank_statement {
            Some(statement) => (
                statement.monthly_income,
                statement.monthly_expenses,
                statement.balance,
                statement.risk_indicators,
            ),
            None => (0.0, 0.0, 0.0, Default::default()),
        };

        // Ratio fallback: fully-consumed income when income is unknown or zero
        let (expense_ratio, savings_rate) = if income > 0.0 {
            (expenses / income, (income - expenses) / income)
        } else {
            (1.0, 0.0)
        };

        let existing_score = profile
            .credit_record
            .map(|record| record.score)
            .unwrap_or(DEFAULT_CREDIT_SCORE);

        FeatureVector::new(vec![
            age,
            is_business,
            income,
            expenses,
            balance,
            expense_ratio,
            savings_rate,
            indicators.overdrafts as f64,
            indicators.returned_payments as f64,
            if indicators.gambling_transactions { 1.0 } else { 0.0 },
            if indicators.irregular_income { 1.0 } else { 0.0 },
            existing_score,
            Self::country_risk(&profile.country),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::{BankStatement, ExistingCreditRecord, RiskIndicators};

    #[test]
    fn test_feature_completeness_with_empty_profile() {
        let profile = CustomerProfile::new("c1", CustomerKind::Individual, "Atlantis");
        let features = FeatureBuilder::new().build(&profile);

        assert_eq!(features.len(), FEATURE_NAMES.len());
        assert_eq!(features.get("age"), Some(DEFAULT_AGE));
        assert_eq!(features.get("is_business"), Some(0.0));
        assert_eq!(features.get("monthly_income"), Some(0.0));
        assert_eq!(features.get("monthly_expenses"), Some(0.0));
        assert_eq!(features.get("current_balance"), Some(0.0));
        assert_eq!(features.get("overdrafts"), Some(0.0));
        assert_eq!(features.get("returned_payments"), Some(0.0));
        assert_eq!(features.get("gambling_transactions"), Some(0.0));
        assert_eq!(features.get("irregular_income"), Some(0.0));
        assert_eq!(features.get("existing_credit_score"), Some(DEFAULT_CREDIT_SCORE));
        assert_eq!(features.get("country_risk"), Some(DEFAULT_COUNTRY_RISK));
    }

    #[test]
    fn test_zero_income_fallback() {
        // Expenses present but income zero: ratio pinned to 1.0, savings to 0.0
        let profile = CustomerProfile::new("c2", CustomerKind::Individual, "Germany")
            .with_bank_statement(BankStatement::new(0.0, 3000.0, 500.0));
        let features = FeatureBuilder::new().build(&profile);

        assert_eq!(features.get("expense_to_income_ratio"), Some(1.0));
        assert_eq!(features.get("savings_rate"), Some(0.0));
        assert_eq!(features.get("monthly_expenses"), Some(3000.0));
    }

    #[test]
    fn test_derived_ratios() {
        let profile = CustomerProfile::new("c3", CustomerKind::Individual, "Germany")
            .with_bank_statement(BankStatement::new(5000.0, 2000.0, 10000.0));
        let features = FeatureBuilder::new().build(&profile);

        assert!((features.get("expense_to_income_ratio").unwrap() - 0.4).abs() < 1e-12);
        assert!((features.get("savings_rate").unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_business_flag_and_risk_indicators() {
        let profile = CustomerProfile::new("c4", CustomerKind::Business, "Spain")
            .with_bank_statement(
                BankStatement::new(9000.0, 7000.0, 4000.0).with_risk_indicators(RiskIndicators {
                    overdrafts: 3,
                    returned_payments: 2,
                    gambling_transactions: true,
                    irregular_income: false,
                }),
            );
        let features = FeatureBuilder::new().build(&profile);

        assert_eq!(features.get("is_business"), Some(1.0));
        assert_eq!(features.get("overdrafts"), Some(3.0));
        assert_eq!(features.get("returned_payments"), Some(2.0));
        assert_eq!(features.get("gambling_transactions"), Some(1.0));
        assert_eq!(features.get("irregular_income"), Some(0.0));
        assert_eq!(features.get("country_risk"), Some(0.25));
    }

    #[test]
    fn test_country_risk_table() {
        assert_eq!(FeatureBuilder::country_risk("Netherlands"), 0.05);
        assert_eq!(FeatureBuilder::country_risk("Germany"), 0.1);
        assert_eq!(FeatureBuilder::country_risk("France"), 0.15);
        assert_eq!(FeatureBuilder::country_risk("Italy"), 0.2);
        assert_eq!(FeatureBuilder::country_risk("Spain"), 0.25);
        assert_eq!(FeatureBuilder::country_risk("Poland"), 0.3);
        assert_eq!(FeatureBuilder::country_risk("Elbonia"), DEFAULT_COUNTRY_RISK);
    }

    #[test]
    fn test_existing_credit_record_used() {
        let profile = CustomerProfile::new("c5", CustomerKind::Individual, "Germany")
            .with_credit_record(ExistingCreditRecord { score: 750.0 });
        let features = FeatureBuilder::new().build(&profile);
        assert_eq!(features.get("existing_credit_score"), Some(750.0));
    }

    #[test]
    fn test_vector_order_matches_names() {
        let profile = CustomerProfile::new("c6", CustomerKind::Individual, "Germany")
            .with_age(40.0);
        let features = FeatureBuilder::new().build(&profile);
        let pairs: Vec<_> = features.iter().collect();
        assert_eq!(pairs[0], ("age", 40.0));
        assert_eq!(pairs.len(), 13);
    }
}
