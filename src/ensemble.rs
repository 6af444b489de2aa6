//! Spatial ensemble evaluation
//!
//! Point estimates from noisy remote-sensing features are unstable, so every request is
//! scored on a 3x3 grid of points spaced [`GRID_STEP_DEG`] apart around the requested
//! location, and the nine outputs are averaged per dimension. The spectral and covariate
//! inputs are reused for every grid point: over a box this small they are assumed constant,
//! only the coordinate features change.

use log::{debug, warn};

use crate::backend::{BackendError, RegressionBackend};
use crate::bbox::{Bbox, BboxError};
use crate::features::{FeatureNormalizer, FeatureVector};
use crate::prediction::PredictionTriple;

/// Spacing between grid points, in degrees. The grid spans about 0.01 degree.
pub const GRID_STEP_DEG: f64 = 0.003;
pub const GRID_OFFSETS: [f64; 3] = [-GRID_STEP_DEG, 0.0, GRID_STEP_DEG];
pub const GRID_POINTS: usize = GRID_OFFSETS.len() * GRID_OFFSETS.len();

/// Substituted for the whole ensemble when the backend fails on any grid point.
pub const DEFAULT_TRIPLE: PredictionTriple = PredictionTriple::new(0.05, 0.02, 8.1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Grid points in row-major order, latitude offset outermost. The centre is index 4.
pub fn grid_points(center_lat: f64, center_lon: f64) -> Vec<GridPoint> {
    GRID_OFFSETS
        .iter()
        .flat_map(|&dlat| {
            GRID_OFFSETS.iter().map(move |&dlon| GridPoint {
                latitude: center_lat + dlat,
                longitude: center_lon + dlon,
            })
        })
        .collect()
}

/// Extent covered by the grid around a centre point.
pub fn spatial_range(center_lat: f64, center_lon: f64) -> Result<Bbox, BboxError> {
    Bbox::around(center_lat, center_lon, GRID_STEP_DEG)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsembleStatus {
    Averaged { points: usize },
    DefaultSubstituted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleEstimate {
    pub mean: PredictionTriple,
    pub status: EnsembleStatus,
}

impl EnsembleEstimate {
    pub fn is_degraded(&self) -> bool {
        self.status == EnsembleStatus::DefaultSubstituted
    }
}

#[derive(Debug, Default)]
pub struct SpatialEnsembleEvaluator {
    normalizer: FeatureNormalizer,
}

impl SpatialEnsembleEvaluator {
    pub fn new(normalizer: FeatureNormalizer) -> Self {
        Self { normalizer }
    }

    /// One feature vector per grid point, in [`grid_points`] order.
    pub fn grid_features(
        &self,
        s2: &[f64],
        s3: &[f64],
        chlorophyll: f64,
        suspended_matter: f64,
        center_lat: f64,
        center_lon: f64,
    ) -> Vec<FeatureVector> {
        let points = grid_points(center_lat, center_lon);

        match self
            .normalizer
            .spectral(s2, s3, chlorophyll, suspended_matter)
        {
            Ok(spectral) => points
                .iter()
                .map(|p| spectral.at_or_neutral(p.latitude, p.longitude))
                .collect(),
            Err(e) => {
                warn!("Feature normalization failed ({}), using neutral vectors", e);
                vec![FeatureVector::neutral(); points.len()]
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn estimate(
        &self,
        backend: &dyn RegressionBackend,
        s2: &[f64],
        s3: &[f64],
        chlorophyll: f64,
        suspended_matter: f64,
        center_lat: f64,
        center_lon: f64,
    ) -> EnsembleEstimate {
        let features = self.grid_features(
            s2,
            s3,
            chlorophyll,
            suspended_matter,
            center_lat,
            center_lon,
        );

        let scored = backend.predict_batch(&features).and_then(|triples| {
            if triples.len() != features.len() {
                return Err(BackendError::BatchSize {
                    expected: features.len(),
                    actual: triples.len(),
                });
            }
            Ok(triples)
        });

        match scored.map(|triples| PredictionTriple::mean(&triples)) {
            Ok(Some(mean)) if !mean.is_finite() => {
                warn!("Ensemble mean is not finite ({}), using default estimate", mean);
                Self::substituted()
            }
            Ok(Some(mean)) => {
                debug!("Ensemble mean over {} points: {}", features.len(), mean);
                EnsembleEstimate {
                    mean,
                    status: EnsembleStatus::Averaged {
                        points: features.len(),
                    },
                }
            }
            Ok(None) => {
                warn!("Ensemble produced no predictions, using default estimate");
                Self::substituted()
            }
            Err(e) => {
                warn!("Backend failed on ensemble grid ({}), using default estimate", e);
                Self::substituted()
            }
        }
    }

    fn substituted() -> EnsembleEstimate {
        EnsembleEstimate {
            mean: DEFAULT_TRIPLE,
            status: EnsembleStatus::DefaultSubstituted,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_averaged(
        &self,
        backend: &dyn RegressionBackend,
        s2: &[f64],
        s3: &[f64],
        chlorophyll: f64,
        suspended_matter: f64,
        center_lat: f64,
        center_lon: f64,
    ) -> PredictionTriple {
        self.estimate(
            backend,
            s2,
            s3,
            chlorophyll,
            suspended_matter,
            center_lat,
            center_lon,
        )
        .mean
    }
}
