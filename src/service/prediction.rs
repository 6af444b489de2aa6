use log::{debug, error, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::confidence::ConfidenceModel;
use super::error::PredictionError;
use super::request::ObservationRequest;
use super::result::{PredictionResult, Provenance};
use crate::backend::{Backend, BackendKind, RegressionBackend};
use crate::config::Config;
use crate::ensemble::{EnsembleEstimate, SpatialEnsembleEvaluator};
use crate::quality;

#[derive(Debug)]
pub struct PredictionService {
    backend: Box<dyn RegressionBackend>,
    evaluator: SpatialEnsembleEvaluator,
    confidence: ConfidenceModel,
    model_version: String,
}

impl PredictionService {
    pub fn new<B: RegressionBackend + 'static>(backend: B, config: &Config) -> Self {
        // A configured version only describes a trained artifact
        let model_version = match (backend.kind(), config.model_version()) {
            (BackendKind::Trained, Some(version)) => version.to_string(),
            _ => backend.version().to_string(),
        };

        Self {
            backend: Box::new(backend),
            evaluator: SpatialEnsembleEvaluator::default(),
            confidence: ConfidenceModel::from_config(config),
            model_version,
        }
    }

    /// Selects the backend from `config`, falling back to the synthetic one.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Backend::from_config(config), config)
    }

    pub fn backend(&self) -> &dyn RegressionBackend {
        self.backend.as_ref()
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Scores one request. Never panics and never returns a partial result: every failure,
    /// including a panicking backend, becomes a result with `success == false`.
    pub fn handle(&self, request: &ObservationRequest) -> PredictionResult {
        let provenance = Provenance::new(
            self.backend.kind(),
            &self.model_version,
            request.latitude(),
            request.longitude(),
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(request)))
            .unwrap_or_else(|payload| {
                Err(PredictionError::Unexpected(panic_message(payload.as_ref())))
            });

        match outcome {
            Ok(estimate) => {
                let classification = quality::assess(&estimate.mean);
                let confidence = self
                    .confidence
                    .score(self.backend.kind(), estimate.is_degraded());

                debug!(
                    "Prediction {} graded {} (confidence {:.2})",
                    estimate.mean, classification.grade, confidence
                );

                PredictionResult::success(provenance, estimate.mean, classification, confidence)
            }
            Err(e) => {
                match &e {
                    PredictionError::MissingSpectralData => warn!("Rejected request: {}", e),
                    PredictionError::Unexpected(_) => error!("Prediction failed: {}", e),
                }
                PredictionResult::failure(provenance, e.to_string())
            }
        }
    }

    fn evaluate(&self, request: &ObservationRequest) -> Result<EnsembleEstimate, PredictionError> {
        if !request.has_spectral_data() {
            return Err(PredictionError::MissingSpectralData);
        }

        debug!(
            "Evaluating {} S2 and {} S3 bands at ({}, {}) with {} backend",
            request.s2_bands().len(),
            request.s3_bands().len(),
            request.latitude(),
            request.longitude(),
            self.backend.kind()
        );

        Ok(self.evaluator.estimate(
            self.backend.as_ref(),
            request.s2_bands(),
            request.s3_bands(),
            request.chlorophyll(),
            request.suspended_matter(),
            request.latitude(),
            request.longitude(),
        ))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "backend panicked".to_string()
    }
}
