//! Credit scoring model
//!
//! Owns the trained classifier and feature scaler, and exposes train,
//! predict, explain, and insight operations. The model is a two-state
//! machine: `Untrained` (initial) and `Trained`. Retraining always re-enters
//! a fresh trained state from scratch; there is no incremental update.

pub mod logistic;
pub mod metrics;
pub mod scaler;
pub mod split;

pub use logistic::LogisticRegression;
pub use metrics::ClassificationMetrics;
pub use scaler::StandardScaler;
pub use split::{stratified_train_test_split, TrainTestSplit};

use crate::customer::CustomerProfile;
use crate::error::{Result, ScoringError};
use crate::features::{FeatureBuilder, FEATURE_NAMES};
use crate::store::{ModelStore, TrainedArtifact};
use crate::synthetic::SyntheticDataGenerator;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Version string attached to every score result
pub const MODEL_VERSION: &str = "1.0";

/// Lowest possible credit score
pub const SCORE_MIN: u32 = 300;
/// Highest possible credit score
pub const SCORE_MAX: u32 = 850;

/// Four-bucket discretization of the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    MediumLow,
    Medium,
    High,
}

impl RiskLevel {
    /// Fixed thresholds on the credit score
    pub fn from_score(score: u32) -> Self {
        if score >= 740 {
            RiskLevel::Low
        } else if score >= 670 {
            RiskLevel::MediumLow
        } else if score >= 580 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::MediumLow => "Medium-Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        };
        f.write_str(label)
    }
}

/// One feature's contribution to a prediction.
///
/// `impact` is the coefficient times the *standardized* feature value, so the
/// impacts plus the intercept reconstruct the exact logit the classifier
/// evaluated. `value` carries the raw observed value for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureAttribution {
    pub feature: String,
    pub coefficient: f64,
    /// Raw (unscaled) observed value
    pub value: f64,
    /// coefficient × standardized value; exact logit contribution
    pub impact: f64,
}

/// Result of a single prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Integer credit score in [300, 850]
    pub score: u32,
    /// Probability of good credit in [0, 1]
    pub probability: f64,
    pub risk_level: RiskLevel,
    /// Per-feature attribution in canonical feature order
    pub attributions: Vec<FeatureAttribution>,
    pub model_version: String,
}

/// Direction of a coefficient's effect on the good-credit probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Positive,
    Negative,
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Effect::Positive => "Positive",
            Effect::Negative => "Negative",
        })
    }
}

/// A single feature's weight in the trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInsight {
    /// Display name, e.g. "Monthly Income"
    pub feature: String,
    pub coefficient: f64,
    /// Absolute coefficient magnitude
    pub importance: f64,
    pub effect: Effect,
}

/// Summary of the trained model, sorted by feature importance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInsights {
    pub model_kind: String,
    pub feature_count: usize,
    pub training_samples: usize,
    pub features: Vec<FeatureInsight>,
}

/// Training configuration with the defaults used in production
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Number of synthetic examples generated per training run
    pub n_samples: usize,
    /// Holdout fraction for evaluation
    pub test_fraction: f64,
    /// Seed for data generation and the stratified split
    pub seed: u64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            n_samples: 1500,
            test_fraction: 0.2,
            seed: 42,
            learning_rate: 0.1,
            max_iter: 1000,
            alpha: 0.01,
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// L2 regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Map a good-credit probability to the integer score range.
///
/// Linear in `p`, so the mapping is monotone and lands in [300, 850] for any
/// probability in [0, 1].
pub fn probability_to_score(probability: f64) -> u32 {
    (SCORE_MIN as f64 + probability * (SCORE_MAX - SCORE_MIN) as f64).round() as u32
}

/// Trained classifier, scaler, and bookkeeping
struct TrainedState {
    classifier: LogisticRegression,
    scaler: StandardScaler,
    training_samples: usize,
}

/// Credit scoring model.
///
/// Dependencies (store, config) are constructor-injected; the caller controls
/// lifetime. One instance owns at most one trained artifact at a time.
pub struct CreditScoringModel {
    config: ScoringConfig,
    builder: FeatureBuilder,
    generator: SyntheticDataGenerator,
    store: ModelStore,
    state: Option<TrainedState>,
}

impl CreditScoringModel {
    pub fn new(store: ModelStore) -> Self {
        Self::with_config(store, ScoringConfig::default())
    }

    pub fn with_config(store: ModelStore, config: ScoringConfig) -> Self {
        let generator = SyntheticDataGenerator::new().with_seed(config.seed);
        Self {
            config,
            builder: FeatureBuilder::new(),
            generator,
            store,
            state: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Train the model.
    ///
    /// When a persisted artifact exists and `force_retrain` is false, it is
    /// loaded instead of regenerating data. Otherwise a fresh fit runs:
    /// synthetic generation, stratified split, scaler + classifier fit on the
    /// training split, holdout evaluation (logged), then persistence.
    ///
    /// Artifact IO failures and corruption propagate; recovery from a corrupt
    /// artifact is always a forced retrain.
    pub fn train(&mut self, force_retrain: bool) -> Result<()> {
        if !force_retrain {
            if let Some(artifact) = self.store.load()? {
                info!(path = %self.store.path().display(), "loading persisted model artifact");
                self.install(artifact)?;
                return Ok(());
            }
        }

        info!(n_samples = self.config.n_samples, "training credit scoring model");
        let data = self.generator.generate(self.config.n_samples);
        debug!(positive_fraction = data.positive_fraction(), "generated synthetic corpus");

        let split = stratified_train_test_split(
            &data.x,
            &data.y,
            self.config.test_fraction,
            self.config.seed,
        )?;

        // Scaler statistics come from the training split only
        let mut scaler = StandardScaler::new();
        let x_train = scaler.fit_transform(&split.x_train)?;
        let x_test = scaler.transform(&split.x_test)?;

        let mut classifier = LogisticRegression::new()
            .with_alpha(self.config.alpha)
            .with_max_iter(self.config.max_iter)
            .with_learning_rate(self.config.learning_rate);
        classifier.fit(&x_train, &split.y_train)?;

        // Holdout evaluation is surfaced as log output, not a return value
        let y_prob = classifier.predict_proba(&x_test)?;
        let y_pred = classifier.predict(&x_test)?;
        let eval = ClassificationMetrics::compute(&split.y_test, &y_pred, &y_prob);
        info!(
            accuracy = eval.accuracy,
            precision = eval.precision,
            recall = eval.recall,
            f1_score = eval.f1_score,
            auc_roc = ?eval.auc_roc,
            holdout_samples = eval.n_samples,
            "holdout evaluation"
        );

        let artifact = TrainedArtifact {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            weights: classifier.weights()?.to_vec(),
            bias: classifier.bias(),
            scaler_means: scaler.means()?.to_vec(),
            scaler_scales: scaler.scales()?.to_vec(),
            training_samples: self.config.n_samples,
            trained_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.save(&artifact)?;

        self.state = Some(TrainedState {
            classifier,
            scaler,
            training_samples: self.config.n_samples,
        });
        Ok(())
    }

    /// Install a loaded artifact after checking it against the canonical
    /// feature order. Misaligned features would silently pair coefficients
    /// with the wrong inputs, so any divergence fails loud.
    fn install(&mut self, artifact: TrainedArtifact) -> Result<()> {
        artifact.validate()?;

        if artifact.feature_names != FEATURE_NAMES {
            return Err(ScoringError::FeatureOrderMismatch {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                actual: artifact.feature_names,
            });
        }

        self.state = Some(TrainedState {
            classifier: LogisticRegression::from_parameters(
                Array1::from_vec(artifact.weights),
                artifact.bias,
            ),
            scaler: StandardScaler::from_parameters(
                Array1::from_vec(artifact.scaler_means),
                Array1::from_vec(artifact.scaler_scales),
            ),
            training_samples: artifact.training_samples,
        });
        Ok(())
    }

    /// Predict a credit score for a customer.
    ///
    /// Calling while untrained triggers an implicit `train(false)` first;
    /// this is a deliberate convenience so callers at process warm-up need no
    /// separate training step. Either a complete [`ScoreResult`] is returned
    /// or an error is raised; no partial score ever leaks out.
    pub fn predict(&mut self, profile: &CustomerProfile) -> Result<ScoreResult> {
        if self.state.is_none() {
            info!("model untrained at predict time; running implicit training");
            self.train(false)?;
        }
        let state = self.state.as_ref().ok_or(ScoringError::ModelNotFitted)?;

        let features = self.builder.build(profile);
        let raw = features.to_array();
        let standardized = state.scaler.transform_row(&raw)?;
        let probability = state.classifier.predict_proba_row(&standardized)?;

        let score = probability_to_score(probability);
        let weights = state.classifier.weights()?;

        let attributions = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| FeatureAttribution {
                feature: name.to_string(),
                coefficient: weights[i],
                value: raw[i],
                impact: weights[i] * standardized[i],
            })
            .collect();

        Ok(ScoreResult {
            score,
            probability,
            risk_level: RiskLevel::from_score(score),
            attributions,
            model_version: MODEL_VERSION.to_string(),
        })
    }

    /// Summary of the trained model, or `None` while untrained
    pub fn insights(&self) -> Option<ModelInsights> {
        let state = self.state.as_ref()?;
        let weights = state.classifier.weights().ok()?;

        let mut features: Vec<FeatureInsight> = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| FeatureInsight {
                feature: display_name(name),
                coefficient: weights[i],
                importance: weights[i].abs(),
                effect: if weights[i] > 0.0 {
                    Effect::Positive
                } else {
                    Effect::Negative
                },
            })
            .collect();
        features.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Some(ModelInsights {
            model_kind: "Logistic Regression".to_string(),
            feature_count: FEATURE_NAMES.len(),
            training_samples: state.training_samples,
            features,
        })
    }
}

/// "monthly_income" -> "Monthly Income"
fn display_name(feature: &str) -> String {
    feature
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
