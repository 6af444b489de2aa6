use serde::Serialize;

use super::QualityGrade;
use crate::prediction::PredictionTriple;

/// Upper limits (inclusive) of classes I, II and III. Anything above is class IV.
pub const DIN_LIMITS_MG_L: [f64; 3] = [0.20, 0.30, 0.40];
pub const SRP_LIMITS_MG_L: [f64; 3] = [0.015, 0.030, 0.045];
/// Inclusive pH windows of classes I, II and III, narrowest first.
pub const PH_WINDOWS: [(f64, f64); 3] = [(7.8, 8.5), (7.6, 8.8), (7.4, 9.0)];

// Weights of DIN, SRP and pH in the overall score
const SCORE_WEIGHTS: [f64; 3] = [0.4, 0.4, 0.2];

/// Score of classes I to III, then of the band just past class III. Values beyond
/// that band, and non-finite values, score [`SEVERE_SCORE`].
const TIER_SCORES: [f64; 4] = [1.0, 0.8, 0.6, 0.4];
const SEVERE_SCORE: f64 = 0.2;
pub const DIN_SEVERE_MG_L: f64 = 0.50;
pub const SRP_SEVERE_MG_L: f64 = 0.060;
pub const PH_SEVERE_WINDOW: (f64, f64) = (7.0, 9.5);

fn grade_at(index: Option<usize>) -> QualityGrade {
    index
        .and_then(|i| QualityGrade::ALL.get(i).copied())
        .unwrap_or(QualityGrade::Poor)
}

fn grade_by_limit(value: f64, limits: &[f64; 3]) -> QualityGrade {
    grade_at(limits.iter().position(|&limit| value <= limit))
}

pub fn din_grade(din: f64) -> QualityGrade {
    grade_by_limit(din, &DIN_LIMITS_MG_L)
}

pub fn srp_grade(srp: f64) -> QualityGrade {
    grade_by_limit(srp, &SRP_LIMITS_MG_L)
}

pub fn ph_grade(ph: f64) -> QualityGrade {
    grade_at(
        PH_WINDOWS
            .iter()
            .position(|&(low, high)| (low..=high).contains(&ph)),
    )
}

fn score_at(index: Option<usize>) -> f64 {
    index
        .and_then(|i| TIER_SCORES.get(i).copied())
        .unwrap_or(SEVERE_SCORE)
}

fn score_by_limit(value: f64, limits: &[f64; 3], severe: f64) -> f64 {
    score_at(
        limits
            .iter()
            .chain(std::iter::once(&severe))
            .position(|&limit| value <= limit),
    )
}

pub fn din_score(din: f64) -> f64 {
    score_by_limit(din, &DIN_LIMITS_MG_L, DIN_SEVERE_MG_L)
}

pub fn srp_score(srp: f64) -> f64 {
    score_by_limit(srp, &SRP_LIMITS_MG_L, SRP_SEVERE_MG_L)
}

pub fn ph_score(ph: f64) -> f64 {
    score_at(
        PH_WINDOWS
            .iter()
            .chain(std::iter::once(&PH_SEVERE_WINDOW))
            .position(|&(low, high)| (low..=high).contains(&ph)),
    )
}

/// Worst of the three per-parameter grades. A single out-of-range parameter sets the grade.
pub fn classify(triple: &PredictionTriple) -> QualityGrade {
    din_grade(triple.din)
        .max(srp_grade(triple.srp))
        .max(ph_grade(triple.ph))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub grade: QualityGrade,
    pub din_grade: QualityGrade,
    pub srp_grade: QualityGrade,
    pub ph_grade: QualityGrade,
    /// Weighted score, 0-100
    pub overall_score: f64,
    pub reason: String,
    pub color: &'static str,
    pub usage: &'static str,
}

/// Grade plus the per-parameter breakdown, score and explanation.
pub fn assess(triple: &PredictionTriple) -> Classification {
    let grades = [
        din_grade(triple.din),
        srp_grade(triple.srp),
        ph_grade(triple.ph),
    ];
    let grade = classify(triple);

    let scores = [
        din_score(triple.din),
        srp_score(triple.srp),
        ph_score(triple.ph),
    ];
    let overall_score = 100.0
        * scores
            .iter()
            .zip(SCORE_WEIGHTS)
            .map(|(s, w)| s * w)
            .sum::<f64>();

    Classification {
        grade,
        din_grade: grades[0],
        srp_grade: grades[1],
        ph_grade: grades[2],
        overall_score,
        reason: reason(grade, &grades),
        color: grade.color(),
        usage: grade.usage(),
    }
}

fn reason(grade: QualityGrade, grades: &[QualityGrade; 3]) -> String {
    let names = ["DIN", "SRP", "pH"];

    let breakdown = names
        .iter()
        .zip(grades)
        .map(|(name, g)| format!("{}: {}", name, g.class_label()))
        .collect::<Vec<_>>()
        .join("; ");

    let mut reason = format!("Overall {}. {}.", grade, breakdown);

    if grade != QualityGrade::Excellent {
        let limiting = names
            .iter()
            .zip(grades)
            .filter(|(_, g)| **g == grade)
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        reason.push_str(&format!(" Limited by {}.", limiting));
    }

    reason.push_str(&format!(" Suitable for: {}.", grade.usage()));
    reason
}
