use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bbox;

/// One observation to score. Fields are private so a request cannot change after decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObservationRequest {
    #[serde(rename = "s2Data")]
    s2_bands: Vec<f64>,
    #[serde(rename = "s3Data")]
    s3_bands: Vec<f64>,
    #[serde(rename = "chlNN")]
    chlorophyll: f64,
    #[serde(rename = "tsmNN")]
    suspended_matter: f64,
    latitude: f64,
    longitude: f64,
}

impl ObservationRequest {
    pub fn new(
        s2_bands: Vec<f64>,
        s3_bands: Vec<f64>,
        chlorophyll: f64,
        suspended_matter: f64,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            s2_bands,
            s3_bands,
            chlorophyll,
            suspended_matter,
            latitude,
            longitude,
        }
        .sanitized()
    }

    // Covariates are concentrations and cannot be negative; coordinates are clamped to the globe
    fn sanitized(self) -> Self {
        let non_negative = |field: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                v
            } else {
                warn!("{} must be a non-negative number, got {}; using 0.0", field, v);
                0.0
            }
        };

        let (latitude, longitude) = bbox::clamp_coordinates(self.latitude, self.longitude);
        if (latitude, longitude) != (self.latitude, self.longitude) {
            warn!(
                "Coordinates ({}, {}) out of range, clamped to ({}, {})",
                self.latitude, self.longitude, latitude, longitude
            );
        }

        Self {
            chlorophyll: non_negative("chlNN", self.chlorophyll),
            suspended_matter: non_negative("tsmNN", self.suspended_matter),
            latitude,
            longitude,
            ..self
        }
    }

    pub fn s2_bands(&self) -> &[f64] {
        &self.s2_bands
    }

    pub fn s3_bands(&self) -> &[f64] {
        &self.s3_bands
    }

    pub fn chlorophyll(&self) -> f64 {
        self.chlorophyll
    }

    pub fn suspended_matter(&self) -> f64 {
        self.suspended_matter
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn has_spectral_data(&self) -> bool {
        !self.s2_bands.is_empty() || !self.s3_bands.is_empty()
    }
}

fn coerce_number(field: &str, value: &Value) -> f64 {
    let parsed = match value {
        Value::Null => return 0.0,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            warn!("Malformed value for {} ({}), using 0.0", field, value);
            0.0
        }
    }
}

fn coerce_array(field: &str, value: &Value) -> Vec<f64> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(|v| coerce_number(field, v)).collect(),
        other => {
            warn!("Expected an array for {}, got {}; treating as empty", field, other);
            Vec::new()
        }
    }
}

// Lenient decoding: a missing, null or malformed field takes its default instead of rejecting
// the whole request. Only a payload that is not a JSON object is an error.
impl<'de> Deserialize<'de> for ObservationRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RequestHelper {
            #[serde(rename = "s2Data", default)]
            s2_bands: Value,
            #[serde(rename = "s3Data", default)]
            s3_bands: Value,
            #[serde(rename = "chlNN", default)]
            chlorophyll: Value,
            #[serde(rename = "tsmNN", default)]
            suspended_matter: Value,
            #[serde(default)]
            latitude: Value,
            #[serde(default)]
            longitude: Value,
        }

        let helper = RequestHelper::deserialize(deserializer)?;

        Ok(ObservationRequest::new(
            coerce_array("s2Data", &helper.s2_bands),
            coerce_array("s3Data", &helper.s3_bands),
            coerce_number("chlNN", &helper.chlorophyll),
            coerce_number("tsmNN", &helper.suspended_matter),
            coerce_number("latitude", &helper.latitude),
            coerce_number("longitude", &helper.longitude),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wire_names() {
        let request: ObservationRequest = serde_json::from_str(
            r#"{
                "s2Data": [0.1, 0.2],
                "s3Data": [0.3],
                "chlNN": 2.5,
                "tsmNN": 10,
                "latitude": 38.5,
                "longitude": 119.2
            }"#,
        )
        .unwrap();

        assert_eq!(request.s2_bands(), &[0.1, 0.2]);
        assert_eq!(request.s3_bands(), &[0.3]);
        assert_eq!(request.chlorophyll(), 2.5);
        assert_eq!(request.suspended_matter(), 10.0);
        assert_eq!(request.latitude(), 38.5);
        assert_eq!(request.longitude(), 119.2);
        assert!(request.has_spectral_data());
    }

    #[test]
    fn test_missing_fields_default() {
        let request: ObservationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, ObservationRequest::default());
        assert!(!request.has_spectral_data());
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let request: ObservationRequest =
            serde_json::from_str(r#"{"chlNN": " 3.5 ", "latitude": "39", "s2Data": ["0.25", 1]}"#)
                .unwrap();
        assert_eq!(request.chlorophyll(), 3.5);
        assert_eq!(request.latitude(), 39.0);
        assert_eq!(request.s2_bands(), &[0.25, 1.0]);
    }

    #[test]
    fn test_malformed_values_become_zero() {
        let request: ObservationRequest = serde_json::from_str(
            r#"{
                "chlNN": "abc",
                "tsmNN": null,
                "latitude": true,
                "longitude": {"deg": 120},
                "s2Data": [0.1, "x", null],
                "s3Data": "not an array"
            }"#,
        )
        .unwrap();

        assert_eq!(request.chlorophyll(), 0.0);
        assert_eq!(request.suspended_matter(), 0.0);
        assert_eq!(request.latitude(), 0.0);
        assert_eq!(request.longitude(), 0.0);
        assert_eq!(request.s2_bands(), &[0.1, 0.0, 0.0]);
        assert!(request.s3_bands().is_empty());
    }

    #[test]
    fn test_non_finite_strings_become_zero() {
        let request: ObservationRequest =
            serde_json::from_str(r#"{"chlNN": "NaN", "tsmNN": "inf"}"#).unwrap();
        assert_eq!(request.chlorophyll(), 0.0);
        assert_eq!(request.suspended_matter(), 0.0);
    }

    #[test]
    fn test_covariates_and_coordinates_are_clamped() {
        let request: ObservationRequest = serde_json::from_str(
            r#"{"chlNN": -2.0, "tsmNN": "-0.5", "latitude": 120, "longitude": -400}"#,
        )
        .unwrap();
        assert_eq!(request.chlorophyll(), 0.0);
        assert_eq!(request.suspended_matter(), 0.0);
        assert_eq!(request.latitude(), 90.0);
        assert_eq!(request.longitude(), -180.0);

        let request = ObservationRequest::new(vec![], vec![], f64::NAN, 3.0, f64::NAN, 200.0);
        assert_eq!(request.chlorophyll(), 0.0);
        assert_eq!(request.suspended_matter(), 3.0);
        assert_eq!((request.latitude(), request.longitude()), (0.0, 180.0));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_str::<ObservationRequest>("42").is_err());
        assert!(serde_json::from_str::<ObservationRequest>("\"s2Data\"").is_err());
    }
}
