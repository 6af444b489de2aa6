pub const S2_LEN: usize = 13;
pub const S3_LEN: usize = 21;
pub const S3_OFFSET: usize = S2_LEN;
pub const COVARIATE_OFFSET: usize = S2_LEN + S3_LEN;
pub const LAT_INDEX: usize = COVARIATE_OFFSET + 2;
pub const LON_INDEX: usize = LAT_INDEX + 1;
pub const FEATURE_LEN: usize = LON_INDEX + 1;

/// Value used for every element when an observation cannot be normalized.
pub const NEUTRAL_VALUE: f64 = 0.5;

/// Normalized model input. Every element lies in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_LEN]);

impl FeatureVector {
    pub(crate) fn from_array(values: [f64; FEATURE_LEN]) -> Self {
        debug_assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        Self(values)
    }

    pub fn neutral() -> Self {
        Self([NEUTRAL_VALUE; FEATURE_LEN])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn s2(&self) -> &[f64] {
        &self.0[..S3_OFFSET]
    }

    pub fn s3(&self) -> &[f64] {
        &self.0[S3_OFFSET..COVARIATE_OFFSET]
    }

    pub fn covariates(&self) -> (f64, f64) {
        (self.0[COVARIATE_OFFSET], self.0[COVARIATE_OFFSET + 1])
    }

    /// Normalized (latitude, longitude).
    pub fn coordinates(&self) -> (f64, f64) {
        (self.0[LAT_INDEX], self.0[LON_INDEX])
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat_bands::{SatBands, Satellites};

    #[test]
    fn test_layout_matches_sensor_tables() {
        assert_eq!(S2_LEN, SatBands::new(Satellites::Sentinel2).nominal_len());
        assert_eq!(S3_LEN, SatBands::new(Satellites::Sentinel3).nominal_len());
        assert_eq!(FEATURE_LEN, 38);
    }

    #[test]
    fn test_neutral_vector() {
        let v = FeatureVector::neutral();
        assert_eq!(v.len(), FEATURE_LEN);
        assert!(v.as_slice().iter().all(|&x| x == NEUTRAL_VALUE));
        assert_eq!(v.coordinates(), (0.5, 0.5));
    }
}
