//! Regression backends
//!
//! A backend maps a [`FeatureVector`] to a [`PredictionTriple`]. Two variants ship with the
//! crate: [`TrainedBackend`], which scores an externally trained artifact, and
//! [`SyntheticBackend`], a deterministic closed-form fallback. [`Backend::load_or_synthetic`]
//! tries the artifact first and never fails.
//!
//! Backends must be `Send + Sync`. Both shipped variants are immutable after construction and
//! can be shared between threads without locking; a backend wrapping a non re-entrant scorer
//! has to serialize calls itself.

use log::{info, warn};
use serde::Serialize;
use std::fmt::{self, Debug, Display};
use std::path::Path;

pub mod error;
pub mod synthetic;
pub mod trained;

pub use error::{BackendError, LoadError};
pub use synthetic::SyntheticBackend;
pub use trained::TrainedBackend;

use crate::config::Config;
use crate::features::FeatureVector;
use crate::prediction::PredictionTriple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Trained,
    Synthetic,
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Trained => write!(f, "trained"),
            BackendKind::Synthetic => write!(f, "synthetic"),
        }
    }
}

pub trait RegressionBackend: Debug + Send + Sync {
    fn kind(&self) -> BackendKind;

    fn version(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<PredictionTriple, BackendError>;

    /// Scores several vectors at once. Output order matches input order.
    fn predict_batch(
        &self,
        features: &[FeatureVector],
    ) -> Result<Vec<PredictionTriple>, BackendError> {
        features.iter().map(|f| self.predict(f)).collect()
    }
}

#[derive(Debug, Clone)]
pub enum Backend {
    Trained(TrainedBackend),
    Synthetic(SyntheticBackend),
}

impl Backend {
    pub fn from_config(config: &Config) -> Self {
        Self::load_or_synthetic(config.model_path())
    }

    /// Loads the trained artifact at `path`, falling back to [`SyntheticBackend`] when the
    /// path is absent or empty, or when loading fails for any reason.
    pub fn load_or_synthetic(path: Option<&Path>) -> Self {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            info!("No model path configured, using synthetic backend");
            return Backend::Synthetic(SyntheticBackend::new());
        };

        match TrainedBackend::load(path) {
            Ok(trained) => Backend::Trained(trained),
            Err(e) => {
                warn!(
                    "Could not load model from {} ({}), using synthetic backend",
                    path.display(),
                    e
                );
                Backend::Synthetic(SyntheticBackend::new())
            }
        }
    }

    fn inner(&self) -> &dyn RegressionBackend {
        match self {
            Backend::Trained(b) => b,
            Backend::Synthetic(b) => b,
        }
    }
}

impl RegressionBackend for Backend {
    fn kind(&self) -> BackendKind {
        self.inner().kind()
    }

    fn version(&self) -> &str {
        self.inner().version()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionTriple, BackendError> {
        self.inner().predict(features)
    }

    fn predict_batch(
        &self,
        features: &[FeatureVector],
    ) -> Result<Vec<PredictionTriple>, BackendError> {
        self.inner().predict_batch(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_path_falls_back() {
        let backend = Backend::from_config(&Config::default());
        assert_eq!(backend.kind(), BackendKind::Synthetic);

        let backend = Backend::load_or_synthetic(Some(Path::new("")));
        assert_eq!(backend.kind(), BackendKind::Synthetic);

        let backend = Backend::load_or_synthetic(Some(Path::new("/nonexistent/model.json")));
        assert_eq!(backend.kind(), BackendKind::Synthetic);
    }

    #[test]
    fn test_corrupt_artifact_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let backend = Backend::load_or_synthetic(Some(&path));
        assert_eq!(backend.kind(), BackendKind::Synthetic);
        assert_eq!(backend.version(), synthetic::SYNTHETIC_VERSION);
    }

    #[test]
    fn test_valid_artifact_is_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let row = vec![0.0; crate::features::FEATURE_LEN];
        let artifact = serde_json::json!({
            "version": "linear-v2",
            "weights": [row, row, row],
            "bias": [0.2, 0.01, 8.0],
        });
        fs::write(&path, artifact.to_string()).unwrap();

        let config = Config::default().with_model_path(dir.path());
        let backend = Backend::from_config(&config);
        assert_eq!(backend.kind(), BackendKind::Trained);
        assert_eq!(backend.version(), "linear-v2");

        let t = backend.predict(&FeatureVector::neutral()).unwrap();
        assert_eq!(t, PredictionTriple::new(0.2, 0.01, 8.0));
    }
}
