//! Water quality classification against the GB 3097-1997 seawater standard.
//!
//! Each parameter is graded on its own threshold bands and the overall grade is the worst of
//! the three. Values exactly on a boundary belong to the better class.

pub mod classifier;
pub mod grade;

pub use classifier::{
    Classification, assess, classify, din_grade, din_score, ph_grade, ph_score, srp_grade,
    srp_score,
};
pub use grade::QualityGrade;
