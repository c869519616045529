//! Lendscore - Credit scoring core for a lending platform
//!
//! This crate implements the scoring engine behind a lending product:
//! - Feature engineering over a typed customer profile
//! - Synthetic training data generation (seeded, reproducible)
//! - Logistic-regression training with holdout evaluation
//! - Score derivation with per-feature explanations
//! - Durable persistence of the trained artifact
//!
//! # Modules
//!
//! - [`customer`] - Typed customer input model
//! - [`features`] - Canonical feature order and feature engineering
//! - [`synthetic`] - Seeded synthetic training data generation
//! - [`model`] - The scoring model: train / predict / insights
//! - [`store`] - Trained-artifact persistence
//!
//! # Example
//!
//! ```no_run
//! use lendscore::prelude::*;
//!
//! let store = ModelStore::new("credit_model.bin");
//! let mut model = CreditScoringModel::new(store);
//!
//! let profile = CustomerProfile::new("cust_001", CustomerKind::Individual, "Germany")
//!     .with_age(40.0)
//!     .with_bank_statement(BankStatement::new(5000.0, 2000.0, 10000.0));
//!
//! // Implicitly trains (or loads the persisted artifact) on first use
//! let result = model.predict(&profile)?;
//! println!("score {} ({})", result.score, result.risk_level);
//! # Ok::<(), lendscore::ScoringError>(())
//! ```

pub mod customer;
pub mod error;
pub mod features;
pub mod model;
pub mod store;
pub mod synthetic;

pub use error::{Result, ScoringError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::customer::{
        BankStatement, CustomerKind, CustomerProfile, ExistingCreditRecord, RiskIndicators,
    };
    pub use crate::error::{Result, ScoringError};
    pub use crate::features::{FeatureBuilder, FeatureVector, FEATURE_NAMES};
    pub use crate::model::{
        CreditScoringModel, FeatureAttribution, FeatureInsight, ModelInsights, RiskLevel,
        ScoreResult, ScoringConfig,
    };
    pub use crate::store::{ArtifactFormat, ModelStore, TrainedArtifact};
    pub use crate::synthetic::{SyntheticDataGenerator, TrainingSet};
}
