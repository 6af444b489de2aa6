use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::backend::BackendKind;
use crate::bbox::{self, Bbox};
use crate::ensemble;
use crate::prediction::PredictionTriple;
use crate::quality::{Classification, QualityGrade};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response envelope. `predictions` and `grade` are present exactly when `error` is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub success: bool,
    #[serde(serialize_with = "zeroed_when_absent")]
    pub predictions: Option<PredictionTriple>,
    #[serde(rename = "qualityLevel")]
    pub grade: Option<QualityGrade>,
    pub water_quality_level: Option<&'static str>,
    pub classification: Option<Classification>,
    pub confidence: f64,
    pub model_version: String,
    pub backend: BackendKind,
    pub location: Location,
    pub spatial_range: Option<Bbox>,
    pub region_name: &'static str,
    pub prediction_timestamp: DateTime<Utc>,
    pub error: Option<String>,
}

// Consumers expect a predictions object even on failure
fn zeroed_when_absent<S>(
    predictions: &Option<PredictionTriple>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    predictions
        .unwrap_or(PredictionTriple::zeroed())
        .serialize(serializer)
}

/// Fields shared by successful and failed results.
#[derive(Debug, Clone)]
pub struct Provenance {
    pub backend: BackendKind,
    pub model_version: String,
    pub location: Location,
}

impl Provenance {
    /// Coordinates are clamped into valid ranges before being echoed.
    pub fn new(backend: BackendKind, model_version: &str, latitude: f64, longitude: f64) -> Self {
        let (latitude, longitude) = bbox::clamp_coordinates(latitude, longitude);
        Self {
            backend,
            model_version: model_version.to_string(),
            location: Location {
                latitude,
                longitude,
            },
        }
    }
}

impl PredictionResult {
    pub fn success(
        provenance: Provenance,
        predictions: PredictionTriple,
        classification: Classification,
        confidence: f64,
    ) -> Self {
        let grade = classification.grade;
        Self {
            success: true,
            predictions: Some(predictions),
            grade: Some(grade),
            water_quality_level: Some(grade.class_label()),
            classification: Some(classification),
            confidence,
            ..Self::envelope(provenance)
        }
    }

    pub fn failure(provenance: Provenance, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::envelope(provenance)
        }
    }

    fn envelope(provenance: Provenance) -> Self {
        let Location {
            latitude,
            longitude,
        } = provenance.location;

        Self {
            success: false,
            predictions: None,
            grade: None,
            water_quality_level: None,
            classification: None,
            confidence: 0.0,
            model_version: provenance.model_version,
            backend: provenance.backend,
            location: provenance.location,
            spatial_range: ensemble::spatial_range(latitude, longitude).ok(),
            region_name: bbox::region_name(latitude, longitude),
            prediction_timestamp: Utc::now(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::assess;
    use serde_json::Value;

    fn provenance() -> Provenance {
        Provenance::new(BackendKind::Synthetic, "synthetic-v1", 38.5, 119.5)
    }

    #[test]
    fn test_success_wire_shape() {
        let triple = PredictionTriple::new(0.05, 0.01, 8.1);
        let result = PredictionResult::success(provenance(), triple, assess(&triple), 0.6);
        let json: Value = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["predictions"]["DIN"], 0.05);
        assert_eq!(json["predictions"]["pH"], 8.1);
        assert_eq!(json["qualityLevel"], "EXCELLENT");
        assert_eq!(json["waterQualityLevel"], "Class I");
        assert_eq!(json["modelVersion"], "synthetic-v1");
        assert_eq!(json["backend"], "synthetic");
        assert_eq!(json["regionName"], "Bohai Sea");
        assert_eq!(json["classification"]["overallScore"], 100.0);
        assert_eq!(json["location"]["latitude"], 38.5);
        assert!(json["spatialRange"]["minLat"].as_f64().unwrap() < 38.5);
        assert!(json["error"].is_null());
        assert!(json["predictionTimestamp"].is_string());
    }

    #[test]
    fn test_location_is_always_valid() {
        let result = PredictionResult::failure(
            Provenance::new(BackendKind::Trained, "v", f64::NAN, 500.0),
            "boom",
        );
        assert_eq!(
            result.location,
            Location {
                latitude: 0.0,
                longitude: 180.0
            }
        );
        assert!(result.spatial_range.is_some());
    }

    #[test]
    fn test_failure_serializes_zeroed_predictions() {
        let result = PredictionResult::failure(provenance(), "missing spectral data");
        assert!(result.predictions.is_none());
        assert!(result.grade.is_none());

        let json: Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["predictions"]["DIN"], 0.0);
        assert_eq!(json["predictions"]["SRP"], 0.0);
        assert_eq!(json["predictions"]["pH"], 0.0);
        assert!(json["qualityLevel"].is_null());
        assert!(json["classification"].is_null());
        assert_eq!(json["confidence"], 0.0);
        assert_eq!(json["error"], "missing spectral data");
    }
}
