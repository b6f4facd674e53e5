//! In-memory result store.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Course, CourseRegistration, CourseScope, CumulativeSnapshot, Semester, SemesterSummary,
    StudentProfile,
};

use super::{ResultStore, SummaryKey};

/// A cumulative snapshot recorded for a student's semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// The student.
    pub student_id: String,
    /// The semester the snapshot is the starting point for.
    pub semester: Semester,
    /// The session the snapshot is the starting point for.
    pub session: String,
    /// The cumulative totals as of the end of the previous recorded session.
    #[serde(flatten)]
    pub snapshot: CumulativeSnapshot,
}

/// A batch of records to import into a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Students to insert or replace.
    #[serde(default)]
    pub students: Vec<StudentProfile>,
    /// Courses to insert or replace.
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Registrations to insert or replace.
    #[serde(default)]
    pub registrations: Vec<CourseRegistration>,
    /// Cumulative snapshots to insert or replace.
    #[serde(default)]
    pub snapshots: Vec<SnapshotRecord>,
}

impl RecordSet {
    /// Rejects malformed records before anything is imported.
    pub fn validate(&self) -> EngineResult<()> {
        self.registrations
            .iter()
            .try_for_each(CourseRegistration::validate)
    }
}

/// What an import changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportChanges {
    /// Scopes that gained, lost or changed a registration.
    pub scopes: HashSet<CourseScope>,
    /// Stored summaries dropped because a registration, course or snapshot
    /// they were computed from changed.
    pub dropped_summaries: usize,
}

/// A [`ResultStore`] held entirely in memory.
///
/// Registrations keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    courses: HashMap<String, Course>,
    students: HashMap<String, StudentProfile>,
    registrations: Vec<CourseRegistration>,
    snapshots: HashMap<SummaryKey, CumulativeSnapshot>,
    summaries: HashMap<SummaryKey, SemesterSummary>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records`.
    pub fn from_records(records: RecordSet) -> EngineResult<Self> {
        let mut store = Self::new();
        store.import(records)?;
        Ok(store)
    }

    /// Validates and imports `records`, replacing existing records with the same ID.
    ///
    /// Nothing is imported if any record is invalid. A replaced registration
    /// reports both its old and new scope. Any stored summary computed from a
    /// registration, course or snapshot the import touched is dropped.
    pub fn import(&mut self, records: RecordSet) -> EngineResult<ImportChanges> {
        records.validate()?;

        let mut scopes = HashSet::new();
        let mut stale = HashSet::new();

        for course in records.courses {
            stale.extend(
                self.registrations
                    .iter()
                    .filter(|r| r.course_id == course.id)
                    .map(summary_key),
            );
            self.courses.insert(course.id.clone(), course);
        }
        for student in records.students {
            self.students.insert(student.id.clone(), student);
        }
        for registration in records.registrations {
            scopes.insert(registration.scope());
            stale.insert(summary_key(&registration));
            match self.registrations.iter_mut().find(|r| r.id == registration.id) {
                Some(existing) => {
                    scopes.insert(existing.scope());
                    stale.insert(summary_key(existing));
                    *existing = registration;
                }
                None => self.registrations.push(registration),
            }
        }
        for record in records.snapshots {
            let key = SummaryKey::new(record.student_id, record.semester, record.session);
            stale.insert(key.clone());
            self.snapshots.insert(key, record.snapshot);
        }

        let before = self.summaries.len();
        self.summaries.retain(|key, _| !stale.contains(key));

        Ok(ImportChanges {
            scopes,
            dropped_summaries: before - self.summaries.len(),
        })
    }

    /// Returns a registration by ID.
    pub fn registration(&self, registration_id: &str) -> Option<&CourseRegistration> {
        self.registrations.iter().find(|r| r.id == registration_id)
    }

    /// Returns every course in the store.
    pub fn courses(&self) -> Vec<Course> {
        self.courses.values().cloned().collect()
    }

    /// Number of registrations held.
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }
}

fn summary_key(registration: &CourseRegistration) -> SummaryKey {
    SummaryKey::new(
        registration.student_id.clone(),
        registration.semester,
        registration.session.clone(),
    )
}

impl ResultStore for InMemoryStore {
    fn course(&self, course_id: &str) -> EngineResult<Course> {
        self.courses
            .get(course_id)
            .cloned()
            .ok_or_else(|| EngineError::CourseNotFound {
                course_id: course_id.to_string(),
            })
    }

    fn student(&self, student_id: &str) -> EngineResult<StudentProfile> {
        self.students
            .get(student_id)
            .cloned()
            .ok_or_else(|| EngineError::StudentNotFound {
                student_id: student_id.to_string(),
            })
    }

    fn course_registrations(&self, scope: &CourseScope) -> EngineResult<Vec<CourseRegistration>> {
        Ok(self
            .registrations
            .iter()
            .filter(|r| r.in_scope(scope))
            .cloned()
            .collect())
    }

    fn student_registrations(&self, key: &SummaryKey) -> EngineResult<Vec<CourseRegistration>> {
        Ok(self
            .registrations
            .iter()
            .filter(|r| r.student_id == key.student_id && r.in_semester(key.semester, &key.session))
            .cloned()
            .collect())
    }

    fn previous_cumulative(&self, key: &SummaryKey) -> EngineResult<CumulativeSnapshot> {
        Ok(self.snapshots.get(key).copied().unwrap_or_default())
    }

    fn summary(&self, key: &SummaryKey) -> EngineResult<Option<SemesterSummary>> {
        Ok(self.summaries.get(key).cloned())
    }

    fn write_score(
        &mut self,
        registration_id: &str,
        score: Option<Decimal>,
        grade: Option<String>,
    ) -> EngineResult<()> {
        let registration = self
            .registrations
            .iter_mut()
            .find(|r| r.id == registration_id)
            .ok_or_else(|| EngineError::InvalidRegistration {
                registration_id: registration_id.to_string(),
                message: "registration does not exist".to_string(),
            })?;

        registration.score = score;
        registration.grade = grade;
        Ok(())
    }

    fn write_summary(
        &mut self,
        key: &SummaryKey,
        summary: Option<SemesterSummary>,
    ) -> EngineResult<()> {
        match summary {
            Some(summary) => {
                self.summaries.insert(key.clone(), summary);
            }
            None => {
                self.summaries.remove(key);
            }
        }
        Ok(())
    }
}
