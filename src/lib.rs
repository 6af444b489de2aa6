//! Water quality prediction from satellite reflectance.
//!
//! Sentinel-2 and Sentinel-3 band values, two in-water covariates and a location are turned
//! into a DIN, SRP and pH estimate averaged over a small spatial grid, then graded against the
//! GB 3097-1997 seawater classes. [`service::PredictionService`] ties the stages together.

pub mod backend;
pub mod bbox;
pub mod config;
pub mod ensemble;
pub mod features;
pub mod prediction;
pub mod quality;
pub mod sat_bands;
pub mod service;

pub use backend::{Backend, BackendKind, RegressionBackend};
pub use config::Config;
pub use prediction::PredictionTriple;
pub use quality::QualityGrade;
pub use service::{ObservationRequest, PredictionResult, PredictionService};
