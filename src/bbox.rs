use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BboxError {
    #[error("box edge is not a finite number")]
    NonFinite,
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("min edge exceeds max edge")]
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bbox {
    #[serde(rename = "minLon")]
    pub xmin: f64,
    #[serde(rename = "maxLon")]
    pub xmax: f64,
    #[serde(rename = "minLat")]
    pub ymin: f64,
    #[serde(rename = "maxLat")]
    pub ymax: f64,
}

/// Approximate extent of the Bohai Sea, the area the regression models were fitted on.
pub const BOHAI: Bbox = Bbox {
    xmin: 117.0,
    xmax: 121.8,
    ymin: 37.0,
    ymax: 41.5,
};

impl Bbox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, BboxError> {
        if ![xmin, xmax, ymin, ymax].iter().all(|v| v.is_finite()) {
            return Err(BboxError::NonFinite);
        }

        if let Some(&lon) = [xmin, xmax].iter().find(|v| !(-180.0..=180.0).contains(*v)) {
            return Err(BboxError::Longitude(lon));
        }

        if let Some(&lat) = [ymin, ymax].iter().find(|v| !(-90.0..=90.0).contains(*v)) {
            return Err(BboxError::Latitude(lat));
        }

        if xmin > xmax || ymin > ymax {
            return Err(BboxError::Order);
        }

        Ok(Bbox {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Square box of `half_width` degrees around a point, clipped to valid coordinates.
    /// Fails only when the centre or the width is not finite.
    pub fn around(latitude: f64, longitude: f64, half_width: f64) -> Result<Self, BboxError> {
        let half_width = half_width.abs();
        Bbox::new(
            (longitude - half_width).clamp(-180.0, 180.0),
            (longitude + half_width).clamp(-180.0, 180.0),
            (latitude - half_width).clamp(-90.0, 90.0),
            (latitude + half_width).clamp(-90.0, 90.0),
        )
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.xmin..=self.xmax).contains(&longitude) && (self.ymin..=self.ymax).contains(&latitude)
    }
}

/// Clamps a coordinate pair into valid latitude and longitude ranges. Non-finite values
/// become 0.0.
pub fn clamp_coordinates(latitude: f64, longitude: f64) -> (f64, f64) {
    let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
    (
        finite_or_zero(latitude).clamp(-90.0, 90.0),
        finite_or_zero(longitude).clamp(-180.0, 180.0),
    )
}

pub fn region_name(latitude: f64, longitude: f64) -> &'static str {
    if BOHAI.contains(latitude, longitude) {
        "Bohai Sea"
    } else {
        "Outside Bohai Sea"
    }
}
