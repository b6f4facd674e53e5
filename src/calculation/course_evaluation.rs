//! Course result evaluation.
//!
//! Turns one course registration into a [`LineItemResult`] using a
//! department's grade bands.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Course, CourseRegistration, GradeBand, LineItemResult, Remark};

use super::grade_resolution::{GradeResolution, resolve_grade};

/// Evaluates one registration.
///
/// - No score: `NOT_GRADED` with an empty grade and zero grade point.
/// - Score matching no band: `NOT_GRADED`, same as above.
/// - Otherwise `grade_point = point * credit_units`, and the remark is
///   `FAILED` for a zero-point grade and `PASSED` for anything else.
///
/// This is a pure function of its inputs, so re-evaluating after a score
/// change always yields the same result for the same score.
///
/// # Example
///
/// ```
/// use result_engine::calculation::evaluate;
/// use result_engine::models::{CourseRegistration, GradeBand, Remark, Semester};
/// use rust_decimal::Decimal;
///
/// let bands = vec![GradeBand {
///     min_score: Decimal::from(65),
///     max_score: Decimal::from(69),
///     grade: "B2".to_string(),
///     point: Decimal::from(6),
/// }];
/// let registration = CourseRegistration {
///     id: "reg_001".to_string(),
///     student_id: "stu_001".to_string(),
///     course_id: "CHE201".to_string(),
///     semester: Semester::First,
///     session: "2024/2025".to_string(),
///     score: Some(Decimal::from(68)),
///     grade: None,
/// };
///
/// let item = evaluate(&registration, &bands, 20);
/// assert_eq!(item.grade, "B2");
/// assert_eq!(item.grade_point, Decimal::from(120));
/// assert_eq!(item.remark, Remark::Passed);
/// ```
pub fn evaluate(
    registration: &CourseRegistration,
    grade_bands: &[GradeBand],
    credit_units: u32,
) -> LineItemResult {
    let resolution = match registration.score {
        Some(score) => resolve_grade(score, grade_bands),
        None => GradeResolution::Ungraded,
    };

    let (grade, grade_point, remark) = match resolution {
        GradeResolution::Graded { grade, point } => {
            let remark = if point.is_zero() {
                Remark::Failed
            } else {
                Remark::Passed
            };
            (grade.to_string(), point * Decimal::from(credit_units), remark)
        }
        GradeResolution::Ungraded => (String::new(), Decimal::ZERO, Remark::NotGraded),
    };

    LineItemResult {
        course_id: registration.course_id.clone(),
        credit_units,
        score: registration.score,
        grade,
        grade_point,
        remark,
    }
}

/// Evaluates a student's registrations against their courses.
///
/// Results are returned in registration order. Every registration must
/// reference a known course.
pub fn evaluate_registrations(
    registrations: &[CourseRegistration],
    courses: &[Course],
    grade_bands: &[GradeBand],
) -> EngineResult<Vec<LineItemResult>> {
    registrations
        .iter()
        .map(|registration| {
            let course = courses
                .iter()
                .find(|c| c.id == registration.course_id)
                .ok_or_else(|| EngineError::CourseNotFound {
                    course_id: registration.course_id.clone(),
                })?;
            Ok(evaluate(registration, grade_bands, course.credit_units))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Semester;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_bands() -> Vec<GradeBand> {
        vec![
            GradeBand {
                min_score: dec("65"),
                max_score: dec("69"),
                grade: "B2".to_string(),
                point: dec("6"),
            },
            GradeBand {
                min_score: dec("0"),
                max_score: dec("39"),
                grade: "F9".to_string(),
                point: dec("0"),
            },
        ]
    }

    fn create_registration(course_id: &str, score: Option<&str>) -> CourseRegistration {
        CourseRegistration {
            id: format!("reg_{}", course_id),
            student_id: "stu_001".to_string(),
            course_id: course_id.to_string(),
            semester: Semester::First,
            session: "2024/2025".to_string(),
            score: score.map(dec),
            grade: None,
        }
    }

    fn create_course(id: &str, credit_units: u32) -> Course {
        Course {
            id: id.to_string(),
            code: id.to_string(),
            title: format!("Course {}", id),
            credit_units,
            department: "community_health".to_string(),
        }
    }

    #[test]
    fn test_score_68_in_20_unit_course_earns_120() {
        let item = evaluate(&create_registration("CHE201", Some("68")), &create_bands(), 20);

        assert_eq!(item.grade, "B2");
        assert_eq!(item.grade_point, dec("120"));
        assert_eq!(item.remark, Remark::Passed);
        assert_eq!(item.credit_units, 20);
        assert_eq!(item.score, Some(dec("68")));
    }

    #[test]
    fn test_absent_score_is_not_graded() {
        let item = evaluate(&create_registration("CHE201", None), &create_bands(), 3);

        assert_eq!(item.grade, "");
        assert_eq!(item.grade_point, Decimal::ZERO);
        assert_eq!(item.remark, Remark::NotGraded);
    }

    #[test]
    fn test_unmatched_score_is_not_graded() {
        let item = evaluate(&create_registration("CHE201", Some("50")), &create_bands(), 3);

        assert_eq!(item.grade, "");
        assert_eq!(item.grade_point, Decimal::ZERO);
        assert_eq!(item.remark, Remark::NotGraded);
    }

    #[test]
    fn test_zero_point_grade_fails() {
        let item = evaluate(&create_registration("CHE201", Some("30")), &create_bands(), 2);

        assert_eq!(item.grade, "F9");
        assert_eq!(item.grade_point, Decimal::ZERO);
        assert_eq!(item.remark, Remark::Failed);
    }

    #[test]
    fn test_zero_credit_course_passes_with_zero_points() {
        let item = evaluate(&create_registration("GST100", Some("66")), &create_bands(), 0);

        assert_eq!(item.grade_point, Decimal::ZERO);
        assert_eq!(item.remark, Remark::Passed);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let registration = create_registration("CHE201", Some("67"));
        let bands = create_bands();
        assert_eq!(evaluate(&registration, &bands, 3), evaluate(&registration, &bands, 3));
    }

    #[test]
    fn test_evaluate_registrations_uses_course_credit_units() {
        let registrations = vec![
            create_registration("CHE201", Some("68")),
            create_registration("CHE202", Some("30")),
        ];
        let courses = vec![create_course("CHE202", 2), create_course("CHE201", 3)];

        let items = evaluate_registrations(&registrations, &courses, &create_bands()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].course_id, "CHE201");
        assert_eq!(items[0].grade_point, dec("18"));
        assert_eq!(items[1].credit_units, 2);
        assert_eq!(items[1].remark, Remark::Failed);
    }

    #[test]
    fn test_evaluate_registrations_unknown_course_returns_error() {
        let registrations = vec![create_registration("CHE999", Some("68"))];

        match evaluate_registrations(&registrations, &[], &create_bands()) {
            Err(EngineError::CourseNotFound { course_id }) => assert_eq!(course_id, "CHE999"),
            other => panic!("Expected CourseNotFound, got {:?}", other),
        }
    }
}
