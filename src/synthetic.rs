//! Synthetic training data generation
//!
//! The scoring model is trained on generated data, never on real outcomes.
//! The generator draws a plausible customer story and derives the good-credit
//! label from a hand-designed probability, so the label is a known function
//! of the features plus independent sampling noise. A fixed seed makes the
//! corpus exactly reproducible across runs.

use crate::features::FEATURE_NAMES;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default generator seed; fixed so training is reproducible
pub const DEFAULT_SEED: u64 = 42;

/// Discrete country-risk values sampled for synthetic customers
const COUNTRY_RISK_VALUES: [f64; 6] = [0.05, 0.1, 0.15, 0.2, 0.25, 0.3];
/// Selection weights for [`COUNTRY_RISK_VALUES`]
const COUNTRY_RISK_WEIGHTS: [f64; 6] = [0.1, 0.2, 0.2, 0.2, 0.2, 0.1];

/// A labeled synthetic training table
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    /// Feature matrix, one row per example, columns in canonical order
    pub x: Array2<f64>,
    /// Binary labels: 1.0 = good credit, 0.0 = bad credit
    pub y: Array1<f64>,
}

impl TrainingSet {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Fraction of positive (good-credit) labels
    pub fn positive_fraction(&self) -> f64 {
        if self.y.is_empty() {
            return 0.0;
        }
        self.y.iter().filter(|&&l| l >= 0.5).count() as f64 / self.y.len() as f64
    }

    /// Column names, matching the canonical feature order
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

/// Seeded generator for synthetic credit customers
#[derive(Debug, Clone)]
pub struct SyntheticDataGenerator {
    seed: u64,
}

impl Default for SyntheticDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDataGenerator {
    pub fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate `n` labeled examples.
    ///
    /// The RNG is re-seeded on every call, so repeated calls with the same
    /// generator produce bit-identical tables.
    pub fn generate(&self, n: usize) -> TrainingSet {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n_features = FEATURE_NAMES.len();

        let mut x = Array2::zeros((n, n_features));
        let mut y = Array1::zeros(n);

        for i in 0..n {
            let (row, label) = Self::sample_customer(&mut rng);
            for (j, value) in row.iter().enumerate() {
                x[[i, j]] = *value;
            }
            y[i] = label;
        }

        TrainingSet { x, y }
    }

    /// Draw one synthetic customer row (canonical feature order) and label
    fn sample_customer(rng: &mut ChaCha8Rng) -> ([f64; 13], f64) {
        let age = sample_normal(rng, 40.0, 12.0).clamp(18.0, 80.0);

        let is_business = if rng.gen::<f64>() < 0.3 { 1.0 } else { 0.0 };

        // Income scales with age, boosted for business customers
        let mut base_income = 2000.0 + (age - 25.0) * 50.0;
        if is_business > 0.5 {
            base_income *= rng.gen_range(1.5..3.0);
        }
        let monthly_income = sample_normal(rng, base_income, base_income * 0.3).max(1000.0);

        let expense_ratio = rng.gen_range(0.5..0.95);
        let monthly_expenses = monthly_income * expense_ratio;

        let current_balance =
            sample_normal(rng, monthly_income * 2.0, monthly_income * 0.5).max(0.0);

        // Risk indicators gated behind an activation chance
        let overdrafts = if rng.gen::<f64>() < 0.3 {
            sample_poisson(rng, 1.0) as f64
        } else {
            0.0
        };
        let returned_payments = if rng.gen::<f64>() < 0.2 {
            sample_poisson(rng, 0.5) as f64
        } else {
            0.0
        };
        let gambling_transactions = if rng.gen::<f64>() < 0.1 { 1.0 } else { 0.0 };
        let irregular_income = if rng.gen::<f64>() < 0.15 { 1.0 } else { 0.0 };

        let existing_credit_score = sample_normal(rng, 700.0, 80.0).clamp(300.0, 850.0);

        let country_risk = sample_weighted(rng, &COUNTRY_RISK_VALUES, &COUNTRY_RISK_WEIGHTS);

        let expense_to_income_ratio = monthly_expenses / monthly_income;
        let savings_rate = (monthly_income - monthly_expenses) / monthly_income;

        // Additive penalties on the good-credit probability
        let mut good_credit_prob: f64 = 0.8;
        if expense_to_income_ratio > 0.9 {
            good_credit_prob -= 0.3;
        }
        if savings_rate < 0.1 {
            good_credit_prob -= 0.2;
        }
        if overdrafts > 2.0 {
            good_credit_prob -= 0.3;
        }
        if returned_payments > 1.0 {
            good_credit_prob -= 0.4;
        }
        if gambling_transactions > 0.5 {
            good_credit_prob -= 0.2;
        }
        if irregular_income > 0.5 {
            good_credit_prob -= 0.15;
        }
        if existing_credit_score < 600.0 {
            good_credit_prob -= 0.3;
        }
        if country_risk > 0.2 {
            good_credit_prob -= 0.1;
        }
        let good_credit_prob = good_credit_prob.clamp(0.05, 0.95);

        let label = if rng.gen::<f64>() < good_credit_prob {
            1.0
        } else {
            0.0
        };

        let row = [
            age,
            is_business,
            monthly_income,
            monthly_expenses,
            current_balance,
            expense_to_income_ratio,
            savings_rate,
            overdrafts,
            returned_payments,
            gambling_transactions,
            irregular_income,
            existing_credit_score,
            country_risk,
        ];
        (row, label)
    }
}

/// Draw from N(mean, sd) via the Box-Muller transform
fn sample_normal(rng: &mut ChaCha8Rng, mean: f64, sd: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + sd * z
}

/// Draw from Poisson(lambda) using Knuth's product method.
/// Adequate for the small lambdas used here.
fn sample_poisson(rng: &mut ChaCha8Rng, lambda: f64) -> u32 {
    let threshold = (-lambda).exp();
    let mut k = 0u32;
    let mut product = 1.0;
    loop {
        product *= rng.gen::<f64>();
        if product <= threshold {
            return k;
        }
        k += 1;
    }
}

/// Draw one of `values` with the given selection weights
fn sample_weighted(rng: &mut ChaCha8Rng, values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    let mut target = rng.gen::<f64>() * total;
    for (value, weight) in values.iter().zip(weights.iter()) {
        if target < *weight {
            return *value;
        }
        target -= weight;
    }
    *values.last().expect("non-empty value set")
}
