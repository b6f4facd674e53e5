//! Semester summary aggregation.
//!
//! Folds a student's line items for one semester into TCU/TGP/GPA and
//! combines them with the stored cumulative snapshot to produce CGPA.

use rust_decimal::Decimal;

use crate::models::{CommentBand, CumulativeSnapshot, LineItemResult, SemesterSummary};

use super::grade_resolution::resolve_comment_or_default;
use super::rounding::{round_2dp, safe_div};

/// Aggregates line items into a semester summary.
///
/// - `tcu` sums credit units of graded items only; an ungraded course does
///   not count toward the semester's credit load yet.
/// - `tgp` sums grade points (ungraded items contribute zero).
/// - `gpa = tgp / tcu` and `cgpa = cumulative_tgp / cumulative_tcu`, each zero
///   when the denominator is zero, rounded to 2 decimal places.
/// - Cumulative totals add this semester's totals to `previous` exactly.
/// - `comment` is resolved from the rounded GPA, falling back to "Not Set".
///
/// `previous` is copied into the summary, never modified.
///
/// # Example
///
/// ```
/// use result_engine::calculation::aggregate;
/// use result_engine::models::{CumulativeSnapshot, LineItemResult, Remark};
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     LineItemResult {
///         course_id: "NUR101".to_string(),
///         credit_units: 2,
///         score: Some(Decimal::from(30)),
///         grade: "F".to_string(),
///         grade_point: Decimal::ZERO,
///         remark: Remark::Failed,
///     },
///     LineItemResult {
///         course_id: "NUR102".to_string(),
///         credit_units: 3,
///         score: Some(Decimal::from(68)),
///         grade: "B2".to_string(),
///         grade_point: Decimal::from(18),
///         remark: Remark::Passed,
///     },
/// ];
/// let previous = CumulativeSnapshot { tcu: 10, tgp: Decimal::from(35), cgpa: Decimal::new(35, 1) };
///
/// let summary = aggregate(&items, &previous, &[]);
/// assert_eq!(summary.tcu, 5);
/// assert_eq!(summary.gpa, Decimal::new(36, 1));
/// assert_eq!(summary.cumulative_tgp, Decimal::from(53));
/// assert_eq!(summary.cgpa, Decimal::new(353, 2));
/// assert_eq!(summary.comment, "Not Set");
/// ```
pub fn aggregate(
    line_items: &[LineItemResult],
    previous: &CumulativeSnapshot,
    comment_bands: &[CommentBand],
) -> SemesterSummary {
    let tcu: u32 = line_items
        .iter()
        .filter(|item| item.remark.is_graded())
        .map(|item| item.credit_units)
        .fold(0, u32::saturating_add);

    let tgp = line_items
        .iter()
        .map(|item| item.grade_point)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let gpa = round_2dp(safe_div(tgp, Decimal::from(tcu)));

    let cumulative_tcu = previous.tcu.saturating_add(tcu);
    let cumulative_tgp = previous.tgp.saturating_add(tgp);
    let cgpa = round_2dp(safe_div(cumulative_tgp, Decimal::from(cumulative_tcu)));

    let comment = resolve_comment_or_default(gpa, comment_bands).to_string();

    SemesterSummary {
        tcu,
        tgp,
        gpa,
        cumulative_tcu,
        cumulative_tgp,
        cgpa,
        previous: *previous,
        comment,
    }
}
