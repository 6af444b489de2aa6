use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

use crate::backend::BackendKind;
use crate::config::Config;

pub const TRAINED_CONFIDENCE: f64 = 0.85;
pub const SYNTHETIC_CONFIDENCE: f64 = 0.60;
/// Multiplier applied when the ensemble fell back to the default estimate.
pub const DEGRADED_FACTOR: f64 = 0.5;

/// Confidence from provenance alone.
pub fn base_confidence(kind: BackendKind, degraded: bool) -> f64 {
    let base = match kind {
        BackendKind::Trained => TRAINED_CONFIDENCE,
        BackendKind::Synthetic => SYNTHETIC_CONFIDENCE,
    };

    if degraded { base * DEGRADED_FACTOR } else { base }
}

/// Seeded display jitter. Only the reported confidence is perturbed, never the predictions.
#[derive(Debug)]
pub struct ConfidenceJitter {
    amplitude: f64,
    rng: Mutex<StdRng>,
}

impl ConfidenceJitter {
    pub fn new(amplitude: f64, seed: u64) -> Self {
        Self {
            amplitude: amplitude.abs(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn apply(&self, confidence: f64) -> f64 {
        if self.amplitude == 0.0 {
            return confidence;
        }

        // A panic while holding the lock cannot leave the generator in a bad state
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let offset = rng.gen_range(-self.amplitude..=self.amplitude);

        (confidence + offset).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct ConfidenceModel {
    jitter: Option<ConfidenceJitter>,
}

impl ConfidenceModel {
    pub fn from_config(config: &Config) -> Self {
        let jitter = (config.confidence_jitter() > 0.0)
            .then(|| ConfidenceJitter::new(config.confidence_jitter(), config.jitter_seed()));

        Self { jitter }
    }

    pub fn score(&self, kind: BackendKind, degraded: bool) -> f64 {
        let confidence = base_confidence(kind, degraded);

        match &self.jitter {
            Some(jitter) => jitter.apply(confidence),
            None => confidence,
        }
    }
}
