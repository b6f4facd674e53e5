//! Gated semester result computation.
//!
//! Composes the entitlement gate, course evaluation and semester aggregation
//! into a single [`ResultComputation`] with an audit trace.

use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Course, CourseRegistration, CumulativeSnapshot,
    GradingScheme, PayableWithPaymentInfo, ResultComputation, Semester, StudentProfile,
};

use super::course_evaluation::evaluate_registrations;
use super::entitlement::{EntitlementScope, check_entitlement_for};
use super::grade_resolution::COMMENT_NOT_SET;
use super::semester_summary::aggregate;

/// Everything needed to compute one student's semester result.
#[derive(Debug, Clone, Copy)]
pub struct SemesterResultInput<'a> {
    /// The student the result is for.
    pub student: &'a StudentProfile,
    /// The semester. Must be `first` or `second`.
    pub semester: Semester,
    /// The academic session.
    pub session: &'a str,
    /// The student's registrations. Registrations for other students or
    /// semesters are ignored.
    pub registrations: &'a [CourseRegistration],
    /// Courses referenced by the registrations.
    pub courses: &'a [Course],
    /// Cumulative totals the semester builds on.
    pub previous: CumulativeSnapshot,
    /// Payables with the amounts paid against them.
    pub payables: &'a [PayableWithPaymentInfo],
}

/// Computes a student's semester result, withholding it if unpaid.
///
/// The entitlement gate runs first. If any relevant payable is unsatisfied
/// the result carries the outstanding requirements and neither line items
/// nor summary; the audit trace then records only the gate decision.
///
/// Otherwise every registration is evaluated against `scheme` and the line
/// items are aggregated onto `input.previous`.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if `input.semester` is
/// [`Semester::Session`], and [`EngineError::CourseNotFound`] if a
/// registration references a course not in `input.courses`.
pub fn compute_semester_result(
    input: &SemesterResultInput<'_>,
    scheme: &GradingScheme,
) -> EngineResult<ResultComputation> {
    if input.semester == Semester::Session {
        return Err(EngineError::CalculationError {
            message: "results are computed per semester, not per session".to_string(),
        });
    }

    let start_time = Instant::now();
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let scope = EntitlementScope::for_student(input.student, input.semester, input.session);
    let entitlement = check_entitlement_for(input.payables, &scope);

    steps.push(AuditStep {
        step_number,
        rule_id: "entitlement_gate".to_string(),
        rule_name: "Result Entitlement Gate".to_string(),
        input: json!({
            "school": scope.school,
            "department": scope.department,
            "level": scope.level,
            "is_fresh": scope.is_fresh,
            "payables_supplied": input.payables.len(),
        }),
        output: json!({
            "satisfied": entitlement.satisfied,
            "outstanding": entitlement
                .outstanding
                .iter()
                .map(|r| r.payable_id.as_str())
                .collect::<Vec<_>>(),
        }),
        reasoning: if entitlement.satisfied {
            "Every payable linked to this result is satisfied".to_string()
        } else {
            format!(
                "{} payable(s) linked to this result are below their required percentage",
                entitlement.outstanding.len()
            )
        },
    });
    step_number += 1;

    if !entitlement.satisfied {
        warnings.push(AuditWarning {
            code: "RESULT_WITHHELD".to_string(),
            message: "Result withheld until outstanding payables are settled".to_string(),
            severity: "high".to_string(),
        });

        return Ok(ResultComputation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            student_id: input.student.id.clone(),
            semester: input.semester,
            session: input.session.to_string(),
            entitlement,
            line_items: None,
            summary: None,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us: start_time.elapsed().as_micros() as u64,
            },
        });
    }

    let registrations: Vec<CourseRegistration> = input
        .registrations
        .iter()
        .filter(|r| r.student_id == input.student.id && r.in_semester(input.semester, input.session))
        .cloned()
        .collect();

    let line_items = evaluate_registrations(&registrations, input.courses, &scheme.grade_bands)?;

    for item in &line_items {
        steps.push(AuditStep {
            step_number,
            rule_id: "course_evaluation".to_string(),
            rule_name: "Course Result Evaluation".to_string(),
            input: json!({
                "course_id": item.course_id,
                "credit_units": item.credit_units,
                "score": item.score,
            }),
            output: json!({
                "grade": item.grade,
                "grade_point": item.grade_point,
                "remark": item.remark,
            }),
            reasoning: match item.score {
                Some(score) if item.remark.is_graded() => format!(
                    "Score {} graded {} under the {} scheme; {} credit unit(s) earn {} point(s)",
                    score, item.grade, scheme.department, item.credit_units, item.grade_point
                ),
                Some(score) => format!(
                    "Score {} matches no grade band in the {} scheme",
                    score, scheme.department
                ),
                None => "No score recorded".to_string(),
            },
        });
        step_number += 1;

        if !item.remark.is_graded() {
            warnings.push(AuditWarning {
                code: "COURSE_NOT_GRADED".to_string(),
                message: format!("Course {} is not graded", item.course_id),
                severity: "medium".to_string(),
            });
        }
    }

    let summary = aggregate(&line_items, &input.previous, &scheme.comment_bands);

    steps.push(AuditStep {
        step_number,
        rule_id: "semester_aggregation".to_string(),
        rule_name: "Semester Summary Aggregation".to_string(),
        input: json!({
            "line_items": line_items.len(),
            "previous": input.previous,
        }),
        output: json!({
            "tcu": summary.tcu,
            "tgp": summary.tgp,
            "gpa": summary.gpa,
            "cumulative_tcu": summary.cumulative_tcu,
            "cumulative_tgp": summary.cumulative_tgp,
            "cgpa": summary.cgpa,
            "comment": summary.comment,
        }),
        reasoning: format!(
            "GPA {} = {} / {}; CGPA {} = {} / {}",
            summary.gpa,
            summary.tgp,
            summary.tcu,
            summary.cgpa,
            summary.cumulative_tgp,
            summary.cumulative_tcu
        ),
    });

    if summary.comment == COMMENT_NOT_SET {
        warnings.push(AuditWarning {
            code: "COMMENT_NOT_SET".to_string(),
            message: format!("GPA {} matches no comment band", summary.gpa),
            severity: "low".to_string(),
        });
    }

    Ok(ResultComputation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        student_id: input.student.id.clone(),
        semester: input.semester,
        session: input.session.to_string(),
        entitlement,
        line_items: Some(line_items),
        summary: Some(summary),
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}
