//! Grading scheme resolution.
//!
//! Maps a numeric score to a grade and point, and a GPA to a class-of-result
//! comment, by scanning ordered band tables.

use rust_decimal::Decimal;

use crate::models::{CommentBand, GradeBand};

/// Comment reported when a GPA matches no comment band.
pub const COMMENT_NOT_SET: &str = "Not Set";

/// The result of resolving a score against a grade band table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeResolution<'a> {
    /// The score matched a band.
    Graded {
        /// The band's grade label.
        grade: &'a str,
        /// The band's grade point.
        point: Decimal,
    },
    /// The score matched no band.
    Ungraded,
}

impl<'a> GradeResolution<'a> {
    /// Returns the grade label, if any.
    pub fn grade(&self) -> Option<&'a str> {
        match *self {
            GradeResolution::Graded { grade, .. } => Some(grade),
            GradeResolution::Ungraded => None,
        }
    }
}

/// Resolves a score to a grade and point.
///
/// Bands are scanned in table order and the first band whose inclusive
/// `[min_score, max_score]` range contains the score wins. A score that
/// matches no band resolves to [`GradeResolution::Ungraded`]; this never fails.
///
/// # Example
///
/// ```
/// use result_engine::calculation::{GradeResolution, resolve_grade};
/// use result_engine::models::GradeBand;
/// use rust_decimal::Decimal;
///
/// let bands = vec![GradeBand {
///     min_score: Decimal::from(65),
///     max_score: Decimal::from(69),
///     grade: "B2".to_string(),
///     point: Decimal::from(6),
/// }];
///
/// assert_eq!(
///     resolve_grade(Decimal::from(68), &bands),
///     GradeResolution::Graded { grade: "B2", point: Decimal::from(6) }
/// );
/// assert_eq!(resolve_grade(Decimal::from(70), &bands), GradeResolution::Ungraded);
/// ```
pub fn resolve_grade(score: Decimal, bands: &[GradeBand]) -> GradeResolution<'_> {
    bands
        .iter()
        .find(|band| band.contains(score))
        .map_or(GradeResolution::Ungraded, |band| GradeResolution::Graded {
            grade: band.grade.as_str(),
            point: band.point,
        })
}

/// Resolves a GPA to a comment, or an empty string when no band matches.
pub fn resolve_comment(value: Decimal, bands: &[CommentBand]) -> &str {
    bands
        .iter()
        .find(|band| band.contains(value))
        .map_or("", |band| band.comment.as_str())
}

/// Resolves a GPA to a comment, falling back to [`COMMENT_NOT_SET`].
pub fn resolve_comment_or_default(value: Decimal, bands: &[CommentBand]) -> &str {
    match resolve_comment(value, bands) {
        "" => COMMENT_NOT_SET,
        comment => comment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn grade_band(min: &str, max: &str, grade: &str, point: i64) -> GradeBand {
        GradeBand {
            min_score: dec(min),
            max_score: dec(max),
            grade: grade.to_string(),
            point: Decimal::from(point),
        }
    }

    fn comment_band(min: &str, max: &str, comment: &str) -> CommentBand {
        CommentBand {
            min_score: dec(min),
            max_score: dec(max),
            comment: comment.to_string(),
        }
    }

    fn create_bands() -> Vec<GradeBand> {
        vec![
            grade_band("70", "100", "A", 5),
            grade_band("60", "69.99", "B", 4),
            grade_band("50", "59.99", "C", 3),
            grade_band("45", "49.99", "D", 2),
            grade_band("40", "44.99", "E", 1),
            grade_band("0", "39.99", "F", 0),
        ]
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bands = create_bands();
        assert_eq!(resolve_grade(dec("70"), &bands).grade(), Some("A"));
        assert_eq!(resolve_grade(dec("100"), &bands).grade(), Some("A"));
        assert_eq!(resolve_grade(dec("69.99"), &bands).grade(), Some("B"));
        assert_eq!(resolve_grade(dec("0"), &bands).grade(), Some("F"));
    }

    #[test]
    fn test_failing_band_resolves_with_zero_point() {
        let bands = create_bands();
        assert_eq!(
            resolve_grade(dec("30"), &bands),
            GradeResolution::Graded {
                grade: "F",
                point: Decimal::ZERO
            }
        );
    }

    #[test]
    fn test_score_in_gap_is_ungraded() {
        let bands = create_bands();
        assert_eq!(resolve_grade(dec("69.995"), &bands), GradeResolution::Ungraded);
    }

    #[test]
    fn test_score_outside_table_is_ungraded() {
        let bands = create_bands();
        assert_eq!(resolve_grade(dec("101"), &bands), GradeResolution::Ungraded);
        assert_eq!(resolve_grade(dec("-1"), &bands), GradeResolution::Ungraded);
    }

    #[test]
    fn test_empty_table_is_ungraded() {
        assert_eq!(resolve_grade(dec("50"), &[]), GradeResolution::Ungraded);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let bands = vec![grade_band("50", "70", "X", 3), grade_band("60", "80", "Y", 4)];
        assert_eq!(resolve_grade(dec("65"), &bands).grade(), Some("X"));
    }

    #[test]
    fn test_resolve_comment() {
        let bands = vec![
            comment_band("3.50", "4.49", "Upper Credit"),
            comment_band("2.50", "3.49", "Lower Credit"),
        ];
        assert_eq!(resolve_comment(dec("3.6"), &bands), "Upper Credit");
        assert_eq!(resolve_comment(dec("2.5"), &bands), "Lower Credit");
        assert_eq!(resolve_comment(dec("4.9"), &bands), "");
    }

    #[test]
    fn test_resolve_comment_or_default_falls_back() {
        let bands = vec![comment_band("3.50", "4.49", "Upper Credit")];
        assert_eq!(resolve_comment_or_default(dec("3.6"), &bands), "Upper Credit");
        assert_eq!(resolve_comment_or_default(dec("1.0"), &bands), COMMENT_NOT_SET);
        assert_eq!(resolve_comment_or_default(dec("1.0"), &[]), "Not Set");
    }
}
