//! Closed-form stand-in used when no trained artifact is available.
//!
//! The estimate is an affine function of a scalar `signal` built from the first
//! Sentinel-2 bands and the normalized coordinates, clamped to the ranges typically
//! observed in the Bohai Sea. It is fully deterministic.

use super::{BackendError, BackendKind, RegressionBackend};
use crate::features::{FeatureVector, LAT_INDEX, LON_INDEX};
use crate::prediction::PredictionTriple;

pub const SYNTHETIC_VERSION: &str = "synthetic-v1";

/// Number of leading features summed into the signal.
const SIGNAL_BANDS: usize = 5;
/// Weight of the coordinate term. Zero at (0, 0) since both normalized coordinates are 0.5.
const COORD_WEIGHT: f64 = 0.1;

pub const DIN_RANGE: (f64, f64) = (0.01, 0.15);
pub const SRP_RANGE: (f64, f64) = (0.005, 0.05);
pub const PH_RANGE: (f64, f64) = (7.8, 8.3);

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticBackend;

impl SyntheticBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn signal(features: &FeatureVector) -> f64 {
        let bands: f64 = features.as_slice()[..SIGNAL_BANDS].iter().sum();
        bands + COORD_WEIGHT * (features[LAT_INDEX] + features[LON_INDEX] - 1.0)
    }
}

impl RegressionBackend for SyntheticBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Synthetic
    }

    fn version(&self) -> &str {
        SYNTHETIC_VERSION
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionTriple, BackendError> {
        let signal = Self::signal(features);

        let din = (0.05 + signal * 0.02).clamp(DIN_RANGE.0, DIN_RANGE.1);
        let srp = (0.02 + signal * 0.01).clamp(SRP_RANGE.0, SRP_RANGE.1);
        let ph = (8.0 + signal * 0.1).clamp(PH_RANGE.0, PH_RANGE.1);

        Ok(PredictionTriple::new(din, srp, ph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::normalize;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_signal_at_origin() {
        let features = normalize(&[0.0; 13], &[0.0; 21], 0.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(SyntheticBackend::signal(&features), 0.0);

        let triple = SyntheticBackend.predict(&features).unwrap();
        assert_relative_eq!(triple.din, 0.05);
        assert_relative_eq!(triple.srp, 0.02);
        assert_relative_eq!(triple.ph, 8.0);
    }

    #[test]
    fn test_outputs_stay_in_bounds() {
        for &(band, lat, lon) in &[(0.0, -90.0, -180.0), (1.0, 90.0, 180.0), (0.4, 38.0, 119.0)]
        {
            let features = normalize(&[band; 13], &[band; 21], 5.0, 5.0, lat, lon);
            let t = SyntheticBackend.predict(&features).unwrap();
            assert!((DIN_RANGE.0..=DIN_RANGE.1).contains(&t.din), "{t}");
            assert!((SRP_RANGE.0..=SRP_RANGE.1).contains(&t.srp), "{t}");
            assert!((PH_RANGE.0..=PH_RANGE.1).contains(&t.ph), "{t}");
        }
    }

    #[test]
    fn test_repeated_predictions_are_bit_identical() {
        let features = normalize(&[0.12, 0.08, 0.05], &[0.03; 21], 3.2, 11.0, 38.9, 119.7);
        let first = SyntheticBackend.predict(&features).unwrap();
        for _ in 0..10 {
            let again = SyntheticBackend.predict(&features).unwrap();
            assert_eq!(first.din.to_bits(), again.din.to_bits());
            assert_eq!(first.srp.to_bits(), again.srp.to_bits());
            assert_eq!(first.ph.to_bits(), again.ph.to_bits());
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let a = normalize(&[0.0; 13], &[], 0.0, 0.0, 0.0, 0.0);
        let b = normalize(&[0.5; 13], &[], 0.0, 0.0, 0.0, 0.0);
        let batch = SyntheticBackend.predict_batch(&[a, b, a]).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], SyntheticBackend.predict(&a).unwrap());
        assert_eq!(batch[1], SyntheticBackend.predict(&b).unwrap());
        assert_eq!(batch[2], batch[0]);
        assert_ne!(batch[0], batch[1]);
    }
}
