//! Line-item result model.
//!
//! A [`LineItemResult`] is the evaluated outcome of one course registration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of a course for a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Remark {
    /// The score resolved to a grade worth more than zero points.
    Passed,
    /// The score resolved to a grade worth zero points.
    Failed,
    /// No score is recorded, or the score matched no grade band.
    NotGraded,
}

impl Remark {
    /// Returns true if the line item carries a resolvable grade.
    pub fn is_graded(self) -> bool {
        self != Remark::NotGraded
    }
}

/// The evaluated result of one course registration.
///
/// # Example
///
/// ```
/// use result_engine::models::{LineItemResult, Remark};
/// use rust_decimal::Decimal;
///
/// let item = LineItemResult {
///     course_id: "NUR101".to_string(),
///     credit_units: 20,
///     score: Some(Decimal::from(68)),
///     grade: "B2".to_string(),
///     grade_point: Decimal::from(120),
///     remark: Remark::Passed,
/// };
/// assert!(item.remark.is_graded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemResult {
    /// The course this result is for.
    pub course_id: String,
    /// Credit units carried by the course.
    pub credit_units: u32,
    /// The score the result was computed from.
    pub score: Option<Decimal>,
    /// The resolved grade, or an empty string when not graded.
    pub grade: String,
    /// Grade point contribution (`point * credit_units`).
    pub grade_point: Decimal,
    /// Pass/fail/not-graded remark.
    pub remark: Remark,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remark_serialization() {
        assert_eq!(serde_json::to_string(&Remark::Passed).unwrap(), "\"PASSED\"");
        assert_eq!(serde_json::to_string(&Remark::Failed).unwrap(), "\"FAILED\"");
        assert_eq!(
            serde_json::to_string(&Remark::NotGraded).unwrap(),
            "\"NOT_GRADED\""
        );
    }

    #[test]
    fn test_remark_is_graded() {
        assert!(Remark::Passed.is_graded());
        assert!(Remark::Failed.is_graded());
        assert!(!Remark::NotGraded.is_graded());
    }
}
