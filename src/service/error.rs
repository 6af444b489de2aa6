use thiserror::Error;

/// Request-level failures. These never escape [`super::PredictionService::handle`]; they are
/// reported through the `error` field of the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("missing spectral data")]
    MissingSpectralData,

    #[error("unexpected fault during prediction: {0}")]
    Unexpected(String),
}
