//! Storage seam for the Result Engine.
//!
//! Registrations, courses, students and summaries are owned by a storage
//! layer outside the engine. [`ResultStore`] is the interface the engine
//! reads them through and the only path the bulk mark adjustment writes
//! through. [`InMemoryStore`] backs the HTTP service and the tests.

mod memory;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    Course, CourseRegistration, CourseScope, CumulativeSnapshot, Semester, SemesterSummary,
    StudentProfile,
};

pub use memory::{ImportChanges, InMemoryStore, RecordSet, SnapshotRecord};

/// Identifies a student's summary for one semester of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    /// The student.
    pub student_id: String,
    /// The semester.
    pub semester: Semester,
    /// The academic session.
    pub session: String,
}

impl SummaryKey {
    /// Creates a new key.
    pub fn new(student_id: impl Into<String>, semester: Semester, session: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            semester,
            session: session.into(),
        }
    }
}

impl fmt::Display for SummaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.student_id, self.semester, self.session)
    }
}

/// Read and write access to result records.
///
/// Writes may fail with [`EngineError::StoreUnavailable`](crate::error::EngineError::StoreUnavailable)
/// when a retry could succeed; any other error is permanent.
pub trait ResultStore {
    /// Returns a course by ID.
    fn course(&self, course_id: &str) -> EngineResult<Course>;

    /// Returns a student by ID.
    fn student(&self, student_id: &str) -> EngineResult<StudentProfile>;

    /// Returns every registration in a course scope.
    fn course_registrations(&self, scope: &CourseScope) -> EngineResult<Vec<CourseRegistration>>;

    /// Returns a student's registrations for one semester of a session.
    fn student_registrations(&self, key: &SummaryKey) -> EngineResult<Vec<CourseRegistration>>;

    /// Returns the cumulative snapshot a student's summary for `key` builds on.
    ///
    /// A student with no recorded history starts from an all-zero snapshot.
    fn previous_cumulative(&self, key: &SummaryKey) -> EngineResult<CumulativeSnapshot>;

    /// Returns the stored summary for `key`, if any.
    fn summary(&self, key: &SummaryKey) -> EngineResult<Option<SemesterSummary>>;

    /// Overwrites a registration's score and derived grade.
    fn write_score(
        &mut self,
        registration_id: &str,
        score: Option<Decimal>,
        grade: Option<String>,
    ) -> EngineResult<()>;

    /// Overwrites (or, with `None`, removes) the stored summary for `key`.
    fn write_summary(&mut self, key: &SummaryKey, summary: Option<SemesterSummary>)
    -> EngineResult<()>;
}
