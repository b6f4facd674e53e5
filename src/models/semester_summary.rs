//! Semester summary models.
//!
//! This module contains the [`SemesterSummary`] produced for each
//! (student, semester, session) and the [`CumulativeSnapshot`] it builds on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cumulative totals as of the end of the previous recorded session.
///
/// Supplied by storage and trusted as-is; `tgp` is a grade-point total,
/// not an average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeSnapshot {
    /// Cumulative total credit units.
    pub tcu: u32,
    /// Cumulative total grade points.
    pub tgp: Decimal,
    /// Cumulative GPA.
    pub cgpa: Decimal,
}

/// A student's academic summary for one semester.
///
/// # Example
///
/// ```
/// use result_engine::models::{CumulativeSnapshot, SemesterSummary};
/// use rust_decimal::Decimal;
///
/// let summary = SemesterSummary {
///     tcu: 5,
///     tgp: Decimal::from(18),
///     gpa: Decimal::new(360, 2),
///     cumulative_tcu: 15,
///     cumulative_tgp: Decimal::from(53),
///     cgpa: Decimal::new(353, 2),
///     previous: CumulativeSnapshot { tcu: 10, tgp: Decimal::from(35), cgpa: Decimal::new(350, 2) },
///     comment: "Second Class Upper".to_string(),
/// };
/// assert_eq!(summary.cumulative_tcu, summary.previous.tcu + summary.tcu);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterSummary {
    /// Total credit units of graded courses this semester.
    pub tcu: u32,
    /// Total grade points this semester.
    pub tgp: Decimal,
    /// Semester GPA, rounded to 2 decimal places.
    pub gpa: Decimal,
    /// Previous cumulative credit units plus this semester's.
    pub cumulative_tcu: u32,
    /// Previous cumulative grade points plus this semester's.
    pub cumulative_tgp: Decimal,
    /// Cumulative GPA, rounded to 2 decimal places.
    pub cgpa: Decimal,
    /// The snapshot this summary was built on.
    pub previous: CumulativeSnapshot,
    /// Class-of-result comment for the semester GPA.
    pub comment: String,
}

impl SemesterSummary {
    /// Returns the cumulative totals as of the end of this semester.
    pub fn as_snapshot(&self) -> CumulativeSnapshot {
        CumulativeSnapshot {
            tcu: self.cumulative_tcu,
            tgp: self.cumulative_tgp,
            cgpa: self.cgpa,
        }
    }
}
