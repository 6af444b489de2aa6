use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Seawater quality grade, best to worst. The four grades match classes I to IV of the
/// GB 3097-1997 seawater quality standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityGrade {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 4] = [
        QualityGrade::Excellent,
        QualityGrade::Good,
        QualityGrade::Moderate,
        QualityGrade::Poor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "EXCELLENT",
            QualityGrade::Good => "GOOD",
            QualityGrade::Moderate => "MODERATE",
            QualityGrade::Poor => "POOR",
        }
    }

    pub fn class_label(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "Class I",
            QualityGrade::Good => "Class II",
            QualityGrade::Moderate => "Class III",
            QualityGrade::Poor => "Class IV",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "#00FF00",
            QualityGrade::Good => "#7FFF00",
            QualityGrade::Moderate => "#FFFF00",
            QualityGrade::Poor => "#FFA500",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "Marine fishery waters, nature reserves, natural bathing beaches",
            QualityGrade::Good => "Aquaculture areas, bathing beaches, recreational waters",
            QualityGrade::Moderate => "General industrial water use, coastal scenic areas",
            QualityGrade::Poor => "Harbour waters and marine development zones only",
        }
    }
}

impl Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.class_label(), self.label())
    }
}
