use log::warn;
use thiserror::Error;

use super::vector::{COVARIATE_OFFSET, FEATURE_LEN, FeatureVector, LAT_INDEX, LON_INDEX, S3_OFFSET};
use crate::sat_bands::{SatBands, Satellites};

/// Covariate value mapped to 1.0 after log compression. Chlorophyll (mg/m^3) and suspended
/// matter (g/m^3) above this are saturated.
pub const COVARIATE_CEILING: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("non-finite value in {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
}

fn finite(field: &'static str, value: f64) -> Result<f64, NormalizeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NormalizeError::NonFinite { field, value })
    }
}

fn scale_covariate(value: f64) -> f64 {
    (value.max(0.0).ln_1p() / COVARIATE_CEILING.ln_1p()).clamp(0.0, 1.0)
}

/// Spectral and covariate features of an observation, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFeatures {
    values: [f64; FEATURE_LEN],
}

impl SpectralFeatures {
    /// Completes the vector with the normalized coordinates of a point.
    pub fn at(&self, latitude: f64, longitude: f64) -> Result<FeatureVector, NormalizeError> {
        let latitude = finite("latitude", latitude)?.clamp(-90.0, 90.0);
        let longitude = finite("longitude", longitude)?.clamp(-180.0, 180.0);

        let mut values = self.values;
        values[LAT_INDEX] = (latitude + 90.0) / 180.0;
        values[LON_INDEX] = (longitude + 180.0) / 360.0;

        Ok(FeatureVector::from_array(values))
    }

    /// Same as [`SpectralFeatures::at`], falling back to the neutral vector.
    pub fn at_or_neutral(&self, latitude: f64, longitude: f64) -> FeatureVector {
        self.at(latitude, longitude).unwrap_or_else(|e| {
            warn!("Feature normalization failed ({}), using neutral vector", e);
            FeatureVector::neutral()
        })
    }
}

#[derive(Debug)]
pub struct FeatureNormalizer {
    s2: SatBands,
    s3: SatBands,
}

impl Default for FeatureNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureNormalizer {
    pub fn new() -> Self {
        Self {
            s2: SatBands::new(Satellites::Sentinel2),
            s3: SatBands::new(Satellites::Sentinel3),
        }
    }

    fn fit_bands(&self, bands: &SatBands, values: &[f64]) -> Vec<f64> {
        let (fitted, adjusted) = bands.fit(values);
        if adjusted {
            warn!(
                "{} data has {} bands, expected {}; adjusted by truncating or zero-padding",
                bands.sensor(),
                values.len(),
                bands.nominal_len()
            );
        }
        fitted
    }

    /// Normalizes everything but the coordinates. Reflectances are clamped to [0, 1],
    /// covariates are log-compressed then scaled by [`COVARIATE_CEILING`].
    pub fn spectral(
        &self,
        s2: &[f64],
        s3: &[f64],
        chlorophyll: f64,
        suspended_matter: f64,
    ) -> Result<SpectralFeatures, NormalizeError> {
        let s2 = self.fit_bands(&self.s2, s2);
        let s3 = self.fit_bands(&self.s3, s3);

        let mut values = [0.0; FEATURE_LEN];
        for (slot, &v) in values[..S3_OFFSET].iter_mut().zip(&s2) {
            *slot = finite("s2Data", v)?.clamp(0.0, 1.0);
        }
        for (slot, &v) in values[S3_OFFSET..COVARIATE_OFFSET].iter_mut().zip(&s3) {
            *slot = finite("s3Data", v)?.clamp(0.0, 1.0);
        }
        values[COVARIATE_OFFSET] = scale_covariate(finite("chlNN", chlorophyll)?);
        values[COVARIATE_OFFSET + 1] = scale_covariate(finite("tsmNN", suspended_matter)?);

        Ok(SpectralFeatures { values })
    }

    /// Builds the full feature vector. Never fails: any value that cannot be normalized
    /// yields the neutral vector instead.
    pub fn normalize(
        &self,
        s2: &[f64],
        s3: &[f64],
        chlorophyll: f64,
        suspended_matter: f64,
        latitude: f64,
        longitude: f64,
    ) -> FeatureVector {
        match self.spectral(s2, s3, chlorophyll, suspended_matter) {
            Ok(spectral) => spectral.at_or_neutral(latitude, longitude),
            Err(e) => {
                warn!("Feature normalization failed ({}), using neutral vector", e);
                FeatureVector::neutral()
            }
        }
    }
}

pub fn normalize(
    s2: &[f64],
    s3: &[f64],
    chlorophyll: f64,
    suspended_matter: f64,
    latitude: f64,
    longitude: f64,
) -> FeatureVector {
    FeatureNormalizer::new().normalize(s2, s3, chlorophyll, suspended_matter, latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{S2_LEN, S3_LEN};
    use approx::assert_relative_eq;

    #[test]
    fn test_coordinates_are_affine() {
        for &(lat, lon) in &[
            (0.0, 0.0),
            (-90.0, -180.0),
            (90.0, 180.0),
            (38.75, 119.4),
            (-12.3, -77.05),
        ] {
            let v = normalize(&[0.1; 13], &[0.1; 21], 1.0, 1.0, lat, lon);
            let (nlat, nlon) = v.coordinates();
            assert_relative_eq!(nlat, (lat + 90.0) / 180.0);
            assert_relative_eq!(nlon, (lon + 180.0) / 360.0);
            assert!((0.0..=1.0).contains(&nlat));
            assert!((0.0..=1.0).contains(&nlon));
        }
    }

    #[test]
    fn test_out_of_range_coordinates_are_clamped() {
        let v = normalize(&[0.1; 13], &[0.1; 21], 0.0, 0.0, 120.0, -400.0);
        assert_eq!(v.coordinates(), (1.0, 0.0));
    }

    #[test]
    fn test_band_lengths_are_fixed() {
        let v = normalize(&[0.3; 5], &[0.4; 30], 0.0, 0.0, 0.0, 0.0);
        assert_eq!(v.s2().len(), S2_LEN);
        assert_eq!(v.s3().len(), S3_LEN);
        assert!(v.s2()[..5].iter().all(|&x| x == 0.3));
        assert!(v.s2()[5..].iter().all(|&x| x == 0.0));
        assert!(v.s3().iter().all(|&x| x == 0.4));

        let v = normalize(&[], &[0.2; 3], 0.0, 0.0, 0.0, 0.0);
        assert!(v.s2().iter().all(|&x| x == 0.0));
        assert!(v.s3()[3..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_reflectances_are_clipped() {
        let v = normalize(&[-0.5, 1.7, 0.25], &[2500.0], 0.0, 0.0, 0.0, 0.0);
        assert_eq!(&v.s2()[..3], &[0.0, 1.0, 0.25]);
        assert_eq!(v.s3()[0], 1.0);
    }

    #[test]
    fn test_covariates_are_log_compressed() {
        let v = normalize(&[], &[], 0.0, -3.0, 0.0, 0.0);
        assert_eq!(v.covariates(), (0.0, 0.0));

        let v = normalize(&[], &[], 9.0, 100.0, 0.0, 0.0);
        let (chl, tsm) = v.covariates();
        assert_relative_eq!(chl, 10f64.ln() / 101f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(tsm, 1.0, epsilon = 1e-12);

        // Saturates above the ceiling
        let v = normalize(&[], &[], 5000.0, 0.0, 0.0, 0.0);
        assert_eq!(v.covariates().0, 1.0);
    }

    #[test]
    fn test_every_element_in_unit_interval() {
        let v = normalize(
            &[-1.0, 0.5, 3.0, 0.01],
            &[0.9; 25],
            1e6,
            42.0,
            -89.9,
            179.9,
        );
        assert!(v.as_slice().iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn test_non_finite_input_yields_neutral_vector() {
        let v = normalize(&[f64::NAN], &[0.1; 21], 0.0, 0.0, 0.0, 0.0);
        assert_eq!(v, FeatureVector::neutral());

        let v = normalize(&[0.1; 13], &[0.1; 21], 0.0, 0.0, f64::INFINITY, 0.0);
        assert_eq!(v, FeatureVector::neutral());

        let err = FeatureNormalizer::new()
            .spectral(&[], &[], f64::NAN, 0.0)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::NonFinite { field: "chlNN", .. }));
    }
}
