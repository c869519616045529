//! Trained-artifact persistence
//!
//! The artifact is an explicit serialization contract: weight vector, bias,
//! per-feature scaler statistics, and the canonical feature-name order. It is
//! written to a single addressable location wrapped in a checked blob (magic
//! bytes, format version, FNV-1a checksum) so a torn or corrupted file is
//! detected at load time rather than producing a plausible-looking score.

use crate::error::{Result, ScoringError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Blob serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtifactFormat {
    /// Compact binary encoding (bincode)
    #[default]
    Binary,
    /// Portable, human-readable JSON
    Json,
}

/// Durable output of a training run: everything needed to reproduce
/// predictions without retraining.
///
/// Immutable once produced; retraining replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedArtifact {
    /// Canonical feature order recorded at training time
    pub feature_names: Vec<String>,
    /// Classifier weight vector, aligned with `feature_names`
    pub weights: Vec<f64>,
    /// Classifier intercept
    pub bias: f64,
    /// Per-feature standardization means, aligned with `feature_names`
    pub scaler_means: Vec<f64>,
    /// Per-feature standardization scales, aligned with `feature_names`
    pub scaler_scales: Vec<f64>,
    /// Number of examples used in the fit
    pub training_samples: usize,
    /// ISO-8601 timestamp of the training run
    pub trained_at: String,
}

impl TrainedArtifact {
    /// Check internal consistency: every parameter vector must align with the
    /// feature-name list. A mismatch means the blob is corrupt.
    pub fn validate(&self) -> Result<()> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ScoringError::ArtifactCorruption(
                "artifact has no features".to_string(),
            ));
        }
        for (name, len) in [
            ("weights", self.weights.len()),
            ("scaler_means", self.scaler_means.len()),
            ("scaler_scales", self.scaler_scales.len()),
        ] {
            if len != n {
                return Err(ScoringError::ArtifactCorruption(format!(
                    "{} length {} does not match {} feature names",
                    name, len, n
                )));
            }
        }
        Ok(())
    }
}

/// On-disk wrapper around the serialized artifact
#[derive(Debug, Serialize, Deserialize)]
struct StoredBlob {
    magic: [u8; 4],
    format_version: u32,
    checksum: u64,
    payload: Vec<u8>,
}

impl StoredBlob {
    const MAGIC: [u8; 4] = *b"LSCR";
    const VERSION: u32 = 1;

    fn new(payload: Vec<u8>) -> Self {
        let checksum = fnv1a(&payload);
        Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            checksum,
            payload,
        }
    }

    fn verify(&self) -> Result<()> {
        if self.magic != Self::MAGIC {
            return Err(ScoringError::ArtifactCorruption(
                "bad magic bytes".to_string(),
            ));
        }
        if self.format_version != Self::VERSION {
            return Err(ScoringError::ArtifactCorruption(format!(
                "unsupported format version {}",
                self.format_version
            )));
        }
        if fnv1a(&self.payload) != self.checksum {
            return Err(ScoringError::ArtifactCorruption(
                "checksum mismatch".to_string(),
            ));
        }
        Ok(())
    }
}

/// FNV-1a hash for payload integrity checking
fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Single-location artifact store.
///
/// `save` overwrites any prior content; there is no versioning. Writes are
/// serialized through a mutex so concurrent retrains cannot tear the blob.
#[derive(Debug)]
pub struct ModelStore {
    path: PathBuf,
    format: ArtifactFormat,
    write_lock: Mutex<()>,
}

impl ModelStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: ArtifactFormat::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_format(mut self, format: ArtifactFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an artifact has ever been saved at this location
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist the artifact, overwriting any prior content
    pub fn save(&self, artifact: &TrainedArtifact) -> Result<()> {
        artifact.validate()?;

        let payload = bincode::serialize(artifact)?;
        let blob = StoredBlob::new(payload);

        let _guard = self.write_lock.lock();
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        match self.format {
            ArtifactFormat::Binary => {
                let bytes = bincode::serialize(&blob)?;
                writer.write_all(&bytes)?;
            }
            ArtifactFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &blob)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Load the artifact.
    ///
    /// Returns `Ok(None)` when nothing has ever been saved. Any unreadable or
    /// inconsistent blob surfaces as [`ScoringError::ArtifactCorruption`];
    /// there is no partial repair, the caller must retrain.
    pub fn load(&self) -> Result<Option<TrainedArtifact>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        let blob: StoredBlob = match self.format {
            ArtifactFormat::Binary => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                bincode::deserialize(&bytes).map_err(|e| {
                    ScoringError::ArtifactCorruption(format!("unreadable blob: {}", e))
                })?
            }
            ArtifactFormat::Json => serde_json::from_reader(&mut reader).map_err(|e| {
                ScoringError::ArtifactCorruption(format!("unreadable blob: {}", e))
            })?,
        };

        blob.verify()?;

        let artifact: TrainedArtifact = bincode::deserialize(&blob.payload).map_err(|e| {
            ScoringError::ArtifactCorruption(format!("unreadable payload: {}", e))
        })?;
        artifact.validate()?;
        Ok(Some(artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_artifact() -> TrainedArtifact {
        TrainedArtifact {
            feature_names: vec!["a".to_string(), "b".to_string()],
            weights: vec![0.5, -1.25],
            bias: 0.125,
            scaler_means: vec![10.0, 20.0],
            scaler_scales: vec![2.0, 4.0],
            training_samples: 1500,
            trained_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.bin"));
        assert!(store.load().unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn test_binary_round_trip_exact() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.bin"));

        let artifact = sample_artifact();
        store.save(&artifact).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(artifact, loaded);
    }

    #[test]
    fn test_json_round_trip_exact() {
        let dir = tempdir().unwrap();
        let store =
            ModelStore::new(dir.path().join("model.json")).with_format(ArtifactFormat::Json);

        let artifact = sample_artifact();
        store.save(&artifact).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(artifact, loaded);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.bin"));

        let mut artifact = sample_artifact();
        store.save(&artifact).unwrap();
        artifact.bias = 9.0;
        store.save(&artifact).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.bias, 9.0);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"not a model blob").unwrap();

        let store = ModelStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(ScoringError::ArtifactCorruption(_))
        ));
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let store = ModelStore::new(&path);
        store.save(&sample_artifact()).unwrap();

        // Flip a byte near the end of the file (inside the payload)
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            store.load(),
            Err(ScoringError::ArtifactCorruption(_))
        ));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut artifact = sample_artifact();
        artifact.weights.push(3.0);
        assert!(matches!(
            artifact.validate(),
            Err(ScoringError::ArtifactCorruption(_))
        ));
    }

    #[test]
    fn test_save_rejects_invalid_artifact() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.bin"));
        let mut artifact = sample_artifact();
        artifact.scaler_means.clear();
        assert!(store.save(&artifact).is_err());
        assert!(!store.exists());
    }
}
