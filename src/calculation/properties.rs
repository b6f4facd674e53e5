//! Property tests for the calculation functions.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::models::{
    CourseRegistration, CourseScope, CumulativeSnapshot, GradeBand, LineItemResult, Remark,
    Semester,
};

use super::{aggregate, evaluate, plan_bulk_adjustment, resolve_grade};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// The nursing table: gap-free over [0, 100] at two decimal places.
fn gap_free_bands() -> Vec<GradeBand> {
    let band = |min: i64, max: i64, grade: &str, point: i64| GradeBand {
        min_score: Decimal::new(min, 2),
        max_score: Decimal::new(max, 2),
        grade: grade.to_string(),
        point: Decimal::from(point),
    };
    vec![
        band(7000, 10000, "A", 5),
        band(6000, 6999, "B", 4),
        band(5000, 5999, "C", 3),
        band(4500, 4999, "D", 2),
        band(4000, 4499, "E", 1),
        band(0, 3999, "F", 0),
    ]
}

/// A score in [0, 100] at two decimal places.
fn arb_score() -> impl Strategy<Value = Decimal> {
    (0i64..=10000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn arb_line_item() -> impl Strategy<Value = LineItemResult> {
    (1u32..=6, prop::option::of(0i64..=5)).prop_map(|(credit_units, point)| match point {
        Some(point) => LineItemResult {
            course_id: "C".to_string(),
            credit_units,
            score: Some(Decimal::from(50)),
            grade: "X".to_string(),
            grade_point: Decimal::from(point * i64::from(credit_units)),
            remark: if point == 0 {
                Remark::Failed
            } else {
                Remark::Passed
            },
        },
        None => LineItemResult {
            course_id: "C".to_string(),
            credit_units,
            score: None,
            grade: String::new(),
            grade_point: Decimal::ZERO,
            remark: Remark::NotGraded,
        },
    })
}

fn arb_snapshot() -> impl Strategy<Value = CumulativeSnapshot> {
    (0u32..200, 0i64..100_000).prop_map(|(tcu, tgp_hundredths)| CumulativeSnapshot {
        tcu,
        tgp: Decimal::new(tgp_hundredths, 2),
        cgpa: Decimal::ZERO,
    })
}

fn registration(index: usize, score: Option<Decimal>) -> CourseRegistration {
    CourseRegistration {
        id: format!("reg_{}", index),
        student_id: format!("stu_{}", index),
        course_id: "NUR101".to_string(),
        semester: Semester::First,
        session: "2024/2025".to_string(),
        score,
        grade: None,
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every score in range matches exactly one band of a gap-free table.
    #[test]
    fn gap_free_table_matches_exactly_one_band(score in arb_score()) {
        let bands = gap_free_bands();
        let matches = bands.iter().filter(|band| band.contains(score)).count();
        prop_assert_eq!(matches, 1);
        prop_assert!(resolve_grade(score, &bands).grade().is_some());
    }

    /// A higher score never earns fewer points.
    #[test]
    fn grade_point_is_monotone_in_score(a in arb_score(), b in arb_score()) {
        let bands = gap_free_bands();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let point = |score| match resolve_grade(score, &bands) {
            super::GradeResolution::Graded { point, .. } => point,
            super::GradeResolution::Ungraded => Decimal::MIN,
        };
        prop_assert!(point(low) <= point(high));
    }

    /// Stepping a score up by 0.01 changes the grade only at a band's lower edge.
    #[test]
    fn grade_changes_only_across_a_boundary(hundredths in 0i64..10000) {
        let bands = gap_free_bands();
        let score = Decimal::new(hundredths, 2);
        let next = Decimal::new(hundredths + 1, 2);

        let before = resolve_grade(score, &bands).grade();
        let after = resolve_grade(next, &bands).grade();
        let crosses = bands.iter().any(|band| band.min_score == next);
        prop_assert_eq!(before != after, crosses);
    }

    /// GPA is zero whenever no graded credit was taken.
    #[test]
    fn gpa_is_zero_without_graded_credit(
        credits in prop::collection::vec(1u32..=6, 0..8),
        previous in arb_snapshot(),
    ) {
        let items: Vec<LineItemResult> = credits
            .into_iter()
            .map(|credit_units| LineItemResult {
                course_id: "C".to_string(),
                credit_units,
                score: None,
                grade: String::new(),
                grade_point: Decimal::ZERO,
                remark: Remark::NotGraded,
            })
            .collect();

        let summary = aggregate(&items, &previous, &[]);
        prop_assert_eq!(summary.tcu, 0);
        prop_assert_eq!(summary.gpa, Decimal::ZERO);
    }

    /// Cumulative totals are the previous totals plus this semester's, exactly.
    #[test]
    fn aggregation_is_additive(
        items in prop::collection::vec(arb_line_item(), 0..10),
        previous in arb_snapshot(),
    ) {
        let summary = aggregate(&items, &previous, &[]);
        prop_assert_eq!(summary.cumulative_tgp, previous.tgp + summary.tgp);
        prop_assert_eq!(summary.cumulative_tcu, previous.tcu + summary.tcu);
        prop_assert_eq!(summary.previous, previous);
    }

    /// Evaluating the same registration twice gives the same line item.
    #[test]
    fn evaluation_is_idempotent(
        score in prop::option::of(arb_score()),
        credit_units in 0u32..=20,
    ) {
        let bands = gap_free_bands();
        let registration = registration(0, score);
        prop_assert_eq!(
            evaluate(&registration, &bands, credit_units),
            evaluate(&registration, &bands, credit_units)
        );
    }

    /// A second positive adjustment never selects more registrations than the first.
    #[test]
    fn bulk_adjustment_is_monotone(
        scores in prop::collection::vec(prop::option::of(arb_score()), 0..30),
        delta_hundredths in 1i64..=10000,
    ) {
        let scope = CourseScope::new("NUR101", Semester::First, "2024/2025");
        let delta = Decimal::new(delta_hundredths, 2);
        let mut registrations: Vec<CourseRegistration> = scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| registration(i, score))
            .collect();

        let first = plan_bulk_adjustment(&registrations, &scope, delta);
        for planned in &first {
            if let Some(r) = registrations.iter_mut().find(|r| r.id == planned.registration_id) {
                r.score = Some(planned.new_score);
            }
        }
        let second = plan_bulk_adjustment(&registrations, &scope, delta);

        prop_assert!(second.len() <= first.len());
        prop_assert!(first.iter().all(|p| p.new_score <= Decimal::ONE_HUNDRED));
    }
}
