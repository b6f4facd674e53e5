//! Result computation models for the Result Engine.
//!
//! This module contains the [`ResultComputation`] type returned when a
//! student's semester result is computed, the [`BulkAdjustmentOutcome`]
//! returned by a mark adjustment, and the audit trace both carry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CourseScope, EntitlementDecision, LineItemResult, SemesterSummary, Semester};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation but that the
/// caller should render explicitly, such as an ungraded course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use result_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete, gated result of a student's semester.
///
/// When the entitlement gate is not satisfied, `line_items` and `summary`
/// are both `None`: the whole semester result is withheld and only the
/// outstanding payment requirements are disclosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultComputation {
    /// Unique identifier for this computation.
    pub calculation_id: Uuid,
    /// When the computation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the computation.
    pub engine_version: String,
    /// The student the result is for.
    pub student_id: String,
    /// The semester the result is for.
    pub semester: Semester,
    /// The academic session the result is for.
    pub session: String,
    /// The entitlement gate's decision.
    pub entitlement: EntitlementDecision,
    /// Per-course results, disclosed only when entitled.
    pub line_items: Option<Vec<LineItemResult>>,
    /// Semester summary, disclosed only when entitled.
    pub summary: Option<SemesterSummary>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// A single score changed by a bulk adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    /// The adjusted registration.
    pub registration_id: String,
    /// The student the registration belongs to.
    pub student_id: String,
    /// Score before adjustment.
    pub old_score: Decimal,
    /// Score after adjustment, clamped to `[0, 100]`.
    pub new_score: Decimal,
    /// Grade after re-evaluation, or `None` when the new score is ungraded.
    pub new_grade: Option<String>,
}

/// A recomputed summary for one affected student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    /// The student.
    pub student_id: String,
    /// The student's recomputed semester summary.
    pub summary: SemesterSummary,
}

/// The outcome of a committed bulk mark adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAdjustmentOutcome {
    /// The adjusted course scope.
    pub scope: CourseScope,
    /// The delta that was applied.
    pub delta: Decimal,
    /// Number of registrations updated; zero when nobody was below the pass mark.
    pub updated_count: usize,
    /// Every score that changed.
    pub new_scores: Vec<ScoreChange>,
    /// Every affected student's recomputed summary.
    pub recomputed_summaries: Vec<StudentSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CumulativeSnapshot;

    fn create_sample_audit_trace() -> AuditTrace {
        AuditTrace {
            steps: vec![AuditStep {
                step_number: 1,
                rule_id: "entitlement_gate".to_string(),
                rule_name: "Entitlement Gate".to_string(),
                input: serde_json::json!({"payables": 0}),
                output: serde_json::json!({"satisfied": true}),
                reasoning: "No payables are linked to this result".to_string(),
            }],
            warnings: vec![],
            duration_us: 10,
        }
    }

    #[test]
    fn test_withheld_result_serializes_nulls() {
        let result = ResultComputation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            student_id: "stu_001".to_string(),
            semester: Semester::First,
            session: "2024/2025".to_string(),
            entitlement: EntitlementDecision {
                satisfied: false,
                outstanding: vec![],
            },
            line_items: None,
            summary: None,
            audit_trace: create_sample_audit_trace(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["line_items"].is_null());
        assert!(json["summary"].is_null());
        assert_eq!(json["semester"], "first");
        assert_eq!(json["entitlement"]["satisfied"], false);
    }

    #[test]
    fn test_result_computation_deserialization() {
        let result = ResultComputation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            student_id: "stu_001".to_string(),
            semester: Semester::Second,
            session: "2024/2025".to_string(),
            entitlement: EntitlementDecision {
                satisfied: true,
                outstanding: vec![],
            },
            line_items: Some(vec![]),
            summary: Some(SemesterSummary {
                tcu: 0,
                tgp: Decimal::ZERO,
                gpa: Decimal::ZERO,
                cumulative_tcu: 0,
                cumulative_tgp: Decimal::ZERO,
                cgpa: Decimal::ZERO,
                previous: CumulativeSnapshot::default(),
                comment: "Not Set".to_string(),
            }),
            audit_trace: create_sample_audit_trace(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: ResultComputation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary.unwrap().comment, "Not Set");
        assert_eq!(parsed.audit_trace.steps[0].rule_id, "entitlement_gate");
    }
}
