//! Backend scoring an externally trained linear model.
//!
//! The artifact is a JSON document holding one weight row per output (DIN, SRP, pH) over the
//! 38 normalized features, plus a bias per output:
//!
//! ```json
//! {
//!   "version": "linear-2024-06",
//!   "weights": [[...38 values...], [...38 values...], [...38 values...]],
//!   "bias": [0.05, 0.02, 8.0]
//! }
//! ```

use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{BackendError, BackendKind, LoadError, RegressionBackend};
use crate::features::{FEATURE_LEN, FeatureVector};
use crate::prediction::PredictionTriple;

/// File name looked up when the model path is a directory.
pub const ARTIFACT_FILE_NAME: &str = "model.json";

const OUTPUTS: usize = 3;
const PH_BOUNDS: (f64, f64) = (0.0, 14.0);

#[derive(Debug, Deserialize)]
struct LinearArtifact {
    #[serde(default = "default_version")]
    version: String,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

fn default_version() -> String {
    "linear".to_string()
}

#[derive(Debug, Clone)]
pub struct TrainedBackend {
    version: String,
    weights: [[f64; FEATURE_LEN]; OUTPUTS],
    bias: [f64; OUTPUTS],
}

impl TrainedBackend {
    pub fn new(
        version: impl Into<String>,
        weights: [[f64; FEATURE_LEN]; OUTPUTS],
        bias: [f64; OUTPUTS],
    ) -> Result<Self, LoadError> {
        let all_finite = weights.iter().flatten().chain(bias.iter()).all(|w| w.is_finite());
        if !all_finite {
            return Err(LoadError::Invalid(
                "weights and bias must be finite".to_string(),
            ));
        }

        Ok(Self {
            version: version.into(),
            weights,
            bias,
        })
    }

    /// Loads an artifact from a file, or from the first `model.json` found under a directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LoadError::EmptyPath);
        }

        let artifact_path = Self::locate(path)?;
        debug!("Reading model artifact {}", artifact_path.display());

        let file = File::open(&artifact_path)?;
        let reader = BufReader::new(file);
        let artifact: LinearArtifact = serde_json::from_reader(reader)?;

        let backend = Self::from_artifact(artifact)?;
        info!(
            "Loaded trained model {} from {}",
            backend.version,
            artifact_path.display()
        );

        Ok(backend)
    }

    fn locate(path: &Path) -> Result<PathBuf, LoadError> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file()
                    && let Some(file_name) = entry.path().file_name()
                    && file_name == ARTIFACT_FILE_NAME
                {
                    return Ok(entry.into_path());
                }
            }
        }

        Err(LoadError::NotFound(path.to_path_buf()))
    }

    fn from_artifact(artifact: LinearArtifact) -> Result<Self, LoadError> {
        if artifact.weights.len() != OUTPUTS {
            return Err(LoadError::Invalid(format!(
                "expected {} weight rows, got {}",
                OUTPUTS,
                artifact.weights.len()
            )));
        }
        if artifact.bias.len() != OUTPUTS {
            return Err(LoadError::Invalid(format!(
                "expected {} bias values, got {}",
                OUTPUTS,
                artifact.bias.len()
            )));
        }

        let mut weights = [[0.0; FEATURE_LEN]; OUTPUTS];
        for (i, (row, out)) in artifact.weights.iter().zip(weights.iter_mut()).enumerate() {
            if row.len() != FEATURE_LEN {
                return Err(LoadError::Invalid(format!(
                    "weight row {} has {} values, expected {}",
                    i,
                    row.len(),
                    FEATURE_LEN
                )));
            }
            out.copy_from_slice(row);
        }

        let mut bias = [0.0; OUTPUTS];
        bias.copy_from_slice(&artifact.bias);

        Self::new(artifact.version, weights, bias)
    }

    fn score(&self, output: usize, features: &FeatureVector) -> f64 {
        self.bias[output]
            + self.weights[output]
                .iter()
                .zip(features.as_slice())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl RegressionBackend for TrainedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Trained
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionTriple, BackendError> {
        let din = self.score(0, features);
        let srp = self.score(1, features);
        let ph = self.score(2, features);

        for (name, value) in [("DIN", din), ("SRP", srp), ("pH", ph)] {
            if !value.is_finite() {
                return Err(BackendError::NonFinite(name));
            }
        }

        Ok(PredictionTriple::new(
            din.max(0.0),
            srp.max(0.0),
            ph.clamp(PH_BOUNDS.0, PH_BOUNDS.1),
        ))
    }
}
