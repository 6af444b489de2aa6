//! Feature normalization
//!
//! Turns a raw observation (two spectral band arrays, two covariates and a coordinate pair)
//! into the fixed 38-element layout every regression backend consumes:
//!
//! | index   | content                                   |
//! |---------|-------------------------------------------|
//! | 0..13   | Sentinel-2 MSI reflectances, clamped      |
//! | 13..34  | Sentinel-3 OLCI reflectances, clamped     |
//! | 34, 35  | log-compressed chlorophyll, suspended matter |
//! | 36, 37  | latitude, longitude rescaled to [0, 1]    |

pub mod normalizer;
pub mod vector;

pub use normalizer::{FeatureNormalizer, NormalizeError, SpectralFeatures, normalize};
pub use vector::{
    COVARIATE_OFFSET, FEATURE_LEN, FeatureVector, LAT_INDEX, LON_INDEX, S2_LEN, S3_LEN,
    S3_OFFSET,
};
