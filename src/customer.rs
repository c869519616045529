//! Typed customer input model
//!
//! The scoring core receives customer data from an external lookup
//! collaborator. Nested bank-statement and credit-record data may be missing
//! for new customers; absence is expressed with `Option` so feature fallbacks
//! are enforced by the type system rather than by ad hoc map lookups.

use serde::{Deserialize, Serialize};

/// Kind of customer being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerKind {
    Individual,
    Business,
}

/// Risk indicators derived from bank-statement analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicators {
    /// Number of overdraft events in the statement period
    pub overdrafts: u32,
    /// Number of returned (bounced) payments
    pub returned_payments: u32,
    /// Gambling transactions observed
    pub gambling_transactions: bool,
    /// Income arrives irregularly
    pub irregular_income: bool,
}

/// Summarized bank statement for a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankStatement {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub balance: f64,
    #[serde(default)]
    pub risk_indicators: RiskIndicators,
}

/// A previously assessed credit score, if the customer has one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExistingCreditRecord {
    pub score: f64,
}

/// Customer profile supplied by the customer-data collaborator.
///
/// Read-only input to the scoring core; the core never persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// External customer identifier
    pub id: String,
    pub kind: CustomerKind,
    pub country: String,
    /// Age in years; `None` when unknown
    pub age: Option<f64>,
    pub bank_statement: Option<BankStatement>,
    pub credit_record: Option<ExistingCreditRecord>,
}

impl CustomerProfile {
    /// Create a minimal profile with all optional data absent
    pub fn new(id: impl Into<String>, kind: CustomerKind, country: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            country: country.into(),
            age: None,
            bank_statement: None,
            credit_record: None,
        }
    }

    pub fn with_age(mut self, age: f64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_bank_statement(mut self, statement: BankStatement) -> Self {
        self.bank_statement = Some(statement);
        self
    }

    pub fn with_credit_record(mut self, record: ExistingCreditRecord) -> Self {
        self.credit_record = Some(record);
        self
    }
}

impl BankStatement {
    pub fn new(monthly_income: f64, monthly_expenses: f64, balance: f64) -> Self {
        Self {
            monthly_income,
            monthly_expenses,
            balance,
            risk_indicators: RiskIndicators::default(),
        }
    }

    pub fn with_risk_indicators(mut self, indicators: RiskIndicators) -> Self {
        self.risk_indicators = indicators;
        self
    }
}
