//! Request handling: validation, ensemble evaluation, classification and the response envelope.
//!
//! [`PredictionService::handle`] is the only entry point. It always returns a well formed
//! [`PredictionResult`]; failures are reported in its `error` field.

pub mod confidence;
pub mod error;
pub mod prediction;
pub mod request;
pub mod result;

pub use confidence::{ConfidenceJitter, ConfidenceModel};
pub use error::PredictionError;
pub use prediction::PredictionService;
pub use request::ObservationRequest;
pub use result::{Location, PredictionResult, Provenance};
