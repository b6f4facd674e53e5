//! Bulk mark adjustment.
//!
//! Applies a uniform delta to every registration in a course scope whose
//! current score is below the pass mark, then re-evaluates the changed
//! registrations and recomputes every affected student's semester summary.
//!
//! The adjustment is one logical transaction. All new scores, grades and
//! summaries are computed before anything is written; each write is retried
//! on transient store failures without re-running selection; and any
//! unrecoverable failure rolls back every write already made.

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BulkAdjustmentOutcome, Course, CourseRegistration, CourseScope, ScoreChange, SemesterSummary,
    StudentSummary, clamp_score,
};
use crate::store::{ResultStore, SummaryKey};

use super::cohort_stats::StatsCache;
use super::course_evaluation::{evaluate, evaluate_registrations};
use super::semester_summary::aggregate;

/// The institution's pass mark. Scores below it are selected for adjustment.
pub const PASS_MARK: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// A single planned score change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAdjustment {
    /// The registration to change.
    pub registration_id: String,
    /// The student the registration belongs to.
    pub student_id: String,
    /// The score at selection time.
    pub old_score: Decimal,
    /// `clamp(old_score + delta, 0, 100)`.
    pub new_score: Decimal,
}

/// Selects registrations in `scope` scored below [`PASS_MARK`] and computes
/// their adjusted scores.
///
/// Selection is by current score: registrations without a score are never
/// selected, and a student lifted to or above the pass mark by an earlier
/// adjustment is not selected again. New scores are clamped to `[0, 100]`.
///
/// # Example
///
/// ```
/// use result_engine::calculation::plan_bulk_adjustment;
/// use result_engine::models::{CourseRegistration, CourseScope, Semester};
/// use rust_decimal::Decimal;
///
/// let registration = |id: &str, score: i64| CourseRegistration {
///     id: id.to_string(),
///     student_id: format!("stu_{}", id),
///     course_id: "NUR101".to_string(),
///     semester: Semester::First,
///     session: "2024/2025".to_string(),
///     score: Some(Decimal::from(score)),
///     grade: None,
/// };
/// let registrations = vec![registration("a", 38), registration("b", 40), registration("c", 12)];
/// let scope = CourseScope::new("NUR101", Semester::First, "2024/2025");
///
/// let plan = plan_bulk_adjustment(&registrations, &scope, Decimal::from(5));
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan[0].new_score, Decimal::from(43));
/// ```
pub fn plan_bulk_adjustment(
    registrations: &[CourseRegistration],
    scope: &CourseScope,
    delta: Decimal,
) -> Vec<PlannedAdjustment> {
    registrations
        .iter()
        .filter(|registration| registration.in_scope(scope))
        .filter_map(|registration| {
            let old_score = registration.score?;
            (old_score < PASS_MARK).then(|| PlannedAdjustment {
                registration_id: registration.id.clone(),
                student_id: registration.student_id.clone(),
                old_score,
                new_score: clamp_score(old_score.saturating_add(delta)),
            })
        })
        .collect()
}

/// One write of the transaction, with the write that undoes it.
#[derive(Debug, Clone)]
struct PendingWrite {
    forward: Write,
    undo: Write,
}

#[derive(Debug, Clone)]
enum Write {
    Score {
        registration_id: String,
        score: Option<Decimal>,
        grade: Option<String>,
    },
    Summary {
        key: SummaryKey,
        summary: Option<SemesterSummary>,
    },
}

impl Write {
    fn apply<S: ResultStore>(&self, store: &mut S) -> EngineResult<()> {
        match self {
            Write::Score {
                registration_id,
                score,
                grade,
            } => store.write_score(registration_id, *score, grade.clone()),
            Write::Summary { key, summary } => store.write_summary(key, summary.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Write::Score {
                registration_id, ..
            } => format!("registration {}", registration_id),
            Write::Summary { key, .. } => format!("summary {}", key),
        }
    }
}

/// Applies a bulk mark adjustment to `scope` as a single transaction.
///
/// Every student with a selected registration has their semester summary
/// recomputed from all of their registrations for the semester, using the
/// grading scheme of their department. On success the cached cohort
/// statistics for the scope are invalidated.
///
/// Selecting nobody is not an error: the outcome reports `updated_count: 0`
/// and nothing is written.
///
/// # Errors
///
/// Read failures (unknown course, student or scheme) are returned before
/// anything is written. A write that still fails after
/// `max_write_attempts`, or fails permanently, rolls back every earlier
/// write and returns [`EngineError::TransactionFailure`].
pub fn bulk_adjust<S: ResultStore>(
    store: &mut S,
    config: &ConfigLoader,
    cache: &mut StatsCache,
    scope: &CourseScope,
    delta: Decimal,
) -> EngineResult<BulkAdjustmentOutcome> {
    let registrations = store.course_registrations(scope)?;
    let plan = plan_bulk_adjustment(&registrations, scope, delta);

    if plan.is_empty() {
        info!(scope = %scope, "No registrations below the pass mark; nothing to adjust");
        return Ok(BulkAdjustmentOutcome {
            scope: scope.clone(),
            delta,
            updated_count: 0,
            new_scores: Vec::new(),
            recomputed_summaries: Vec::new(),
        });
    }

    let (writes, new_scores, recomputed_summaries) = prepare_writes(store, config, scope, &plan)?;

    commit(store, &writes, config.max_write_attempts(), scope)?;

    cache.invalidate(scope);
    info!(
        scope = %scope,
        delta = %delta,
        updated_count = new_scores.len(),
        recomputed_summaries = recomputed_summaries.len(),
        "Bulk adjustment committed"
    );

    Ok(BulkAdjustmentOutcome {
        scope: scope.clone(),
        delta,
        updated_count: new_scores.len(),
        new_scores,
        recomputed_summaries,
    })
}

type PreparedWrites = (Vec<PendingWrite>, Vec<ScoreChange>, Vec<StudentSummary>);

/// Computes every new score, grade and summary without writing anything.
fn prepare_writes<S: ResultStore>(
    store: &S,
    config: &ConfigLoader,
    scope: &CourseScope,
    plan: &[PlannedAdjustment],
) -> EngineResult<PreparedWrites> {
    let course = store.course(&scope.course_id)?;

    let mut students: Vec<&str> = Vec::new();
    for planned in plan {
        if !students.contains(&planned.student_id.as_str()) {
            students.push(planned.student_id.as_str());
        }
    }

    let mut writes = Vec::new();
    let mut new_scores = Vec::with_capacity(plan.len());
    let mut recomputed_summaries = Vec::with_capacity(students.len());

    for student_id in students {
        let student = store.student(student_id)?;
        let scheme = config.get_scheme(&student.department)?;
        let key = SummaryKey::new(student_id, scope.semester, scope.session.clone());

        let mut semester_registrations = store.student_registrations(&key)?;
        for registration in &mut semester_registrations {
            if let Some(planned) = plan.iter().find(|p| p.registration_id == registration.id) {
                registration.score = Some(planned.new_score);
            }
        }

        for planned in plan.iter().filter(|p| p.student_id == student_id) {
            let old_grade = semester_registrations
                .iter()
                .find(|r| r.id == planned.registration_id)
                .and_then(|r| r.grade.clone());

            let adjusted = CourseRegistration {
                id: planned.registration_id.clone(),
                student_id: planned.student_id.clone(),
                course_id: scope.course_id.clone(),
                semester: scope.semester,
                session: scope.session.clone(),
                score: Some(planned.new_score),
                grade: None,
            };
            let item = evaluate(&adjusted, &scheme.grade_bands, course.credit_units);
            let new_grade = (!item.grade.is_empty()).then_some(item.grade);

            writes.push(PendingWrite {
                forward: Write::Score {
                    registration_id: planned.registration_id.clone(),
                    score: Some(planned.new_score),
                    grade: new_grade.clone(),
                },
                undo: Write::Score {
                    registration_id: planned.registration_id.clone(),
                    score: Some(planned.old_score),
                    grade: old_grade,
                },
            });
            new_scores.push(ScoreChange {
                registration_id: planned.registration_id.clone(),
                student_id: planned.student_id.clone(),
                old_score: planned.old_score,
                new_score: planned.new_score,
                new_grade,
            });
        }

        let courses = courses_for(store, &semester_registrations, &course)?;
        let line_items = evaluate_registrations(&semester_registrations, &courses, &scheme.grade_bands)?;
        let previous = store.previous_cumulative(&key)?;
        let summary = aggregate(&line_items, &previous, &scheme.comment_bands);
        let old_summary = store.summary(&key)?;

        writes.push(PendingWrite {
            forward: Write::Summary {
                key: key.clone(),
                summary: Some(summary.clone()),
            },
            undo: Write::Summary {
                key,
                summary: old_summary,
            },
        });
        recomputed_summaries.push(StudentSummary {
            student_id: student_id.to_string(),
            summary,
        });
    }

    // Score writes go first so a summary is never newer than its scores.
    writes.sort_by_key(|w| matches!(w.forward, Write::Summary { .. }));

    Ok((writes, new_scores, recomputed_summaries))
}

/// Looks up the course of every registration, reusing the adjusted course.
fn courses_for<S: ResultStore>(
    store: &S,
    registrations: &[CourseRegistration],
    adjusted_course: &Course,
) -> EngineResult<Vec<Course>> {
    let mut courses = vec![adjusted_course.clone()];
    for registration in registrations {
        if !courses.iter().any(|c| c.id == registration.course_id) {
            courses.push(store.course(&registration.course_id)?);
        }
    }
    Ok(courses)
}

/// Applies every write, rolling back on failure.
fn commit<S: ResultStore>(
    store: &mut S,
    writes: &[PendingWrite],
    max_attempts: u32,
    scope: &CourseScope,
) -> EngineResult<()> {
    for (applied, write) in writes.iter().enumerate() {
        if let Err(err) = apply_with_retry(store, &write.forward, max_attempts) {
            warn!(
                scope = %scope,
                write = %write.forward.describe(),
                error = %err,
                applied_writes = applied,
                "Bulk adjustment write failed; rolling back"
            );

            let mut message = err.to_string();
            if let Err(rollback_err) = rollback(store, &writes[..applied], max_attempts) {
                error!(
                    scope = %scope,
                    error = %rollback_err,
                    "Rollback failed; records may be inconsistent"
                );
                message = format!("{}; rollback failed: {}", message, rollback_err);
            }

            return Err(EngineError::TransactionFailure {
                scope: scope.to_string(),
                applied_writes: applied,
                message,
            });
        }
    }
    Ok(())
}

/// Undoes applied writes in reverse order.
///
/// Every undo is attempted even if an earlier one fails; the first failure is returned.
fn rollback<S: ResultStore>(
    store: &mut S,
    applied: &[PendingWrite],
    max_attempts: u32,
) -> EngineResult<()> {
    let mut first_error = None;
    for write in applied.iter().rev() {
        if let Err(err) = apply_with_retry(store, &write.undo, max_attempts) {
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn apply_with_retry<S: ResultStore>(
    store: &mut S,
    write: &Write,
    max_attempts: u32,
) -> EngineResult<()> {
    let mut attempt = 1;
    loop {
        match write.apply(store) {
            Ok(()) => return Ok(()),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                warn!(
                    write = %write.describe(),
                    attempt,
                    max_attempts,
                    error = %err,
                    "Transient store failure; retrying write"
                );
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
