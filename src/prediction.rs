use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Water-quality estimate for one location.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionTriple {
    /// Dissolved inorganic nitrogen [mg/L]
    #[serde(rename = "DIN")]
    pub din: f64,
    /// Soluble reactive phosphorus [mg/L]
    #[serde(rename = "SRP")]
    pub srp: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
}

impl PredictionTriple {
    pub const fn new(din: f64, srp: f64, ph: f64) -> Self {
        Self { din, srp, ph }
    }

    pub const fn zeroed() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.din.is_finite() && self.srp.is_finite() && self.ph.is_finite()
    }

    /// Elementwise arithmetic mean. `None` for an empty slice.
    pub fn mean(triples: &[PredictionTriple]) -> Option<PredictionTriple> {
        if triples.is_empty() {
            return None;
        }

        // Dividing before summing keeps the mean finite when every term is
        let n = triples.len() as f64;
        Some(triples.iter().fold(Self::zeroed(), |acc, t| {
            Self::new(acc.din + t.din / n, acc.srp + t.srp / n, acc.ph + t.ph / n)
        }))
    }
}

impl Display for PredictionTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DIN={:.4} mg/L, SRP={:.4} mg/L, pH={:.2}",
            self.din, self.srp, self.ph
        )
    }
}
