//! Course, student and registration models.
//!
//! This module defines the [`CourseRegistration`] record that carries a
//! student's score for one course, together with the [`Course`] and
//! [`StudentProfile`] metadata the engine reads alongside it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The highest score a registration can hold.
pub const MAX_SCORE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// A half of the academic year, or the whole session.
///
/// Registrations are always for `First` or `Second`. `Session` only appears
/// on payables, where it matches both halves of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    /// First semester (harmattan).
    First,
    /// Second semester (rain).
    Second,
    /// The whole academic session.
    Session,
}

impl Semester {
    /// Returns true if an obligation for `self` applies to `other`.
    ///
    /// # Example
    ///
    /// ```
    /// use result_engine::models::Semester;
    ///
    /// assert!(Semester::Session.covers(Semester::First));
    /// assert!(Semester::Session.covers(Semester::Second));
    /// assert!(Semester::First.covers(Semester::First));
    /// assert!(!Semester::First.covers(Semester::Second));
    /// ```
    pub fn covers(self, other: Semester) -> bool {
        self == Semester::Session || self == other
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Semester::First => "first",
            Semester::Second => "second",
            Semester::Session => "session",
        };
        f.write_str(name)
    }
}

/// Identifies all registrations for one course in one semester of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseScope {
    /// The course ID.
    pub course_id: String,
    /// The semester the course was taken in.
    pub semester: Semester,
    /// The academic session (e.g., "2024/2025").
    pub session: String,
}

impl CourseScope {
    /// Creates a new scope.
    pub fn new(course_id: impl Into<String>, semester: Semester, session: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            semester,
            session: session.into(),
        }
    }
}

impl fmt::Display for CourseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.course_id, self.semester, self.session)
    }
}

/// Course metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier for the course.
    pub id: String,
    /// The course code (e.g., "NUR 101").
    pub code: String,
    /// The course title.
    pub title: String,
    /// Number of credit units the course carries.
    pub credit_units: u32,
    /// The department that owns the course and its grading scheme.
    pub department: String,
}

/// A student as seen by the result engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Unique identifier for the student.
    pub id: String,
    /// The school (faculty) the student belongs to.
    pub school: String,
    /// The student's department.
    pub department: String,
    /// The student's current level (e.g., 100, 200).
    pub level: u32,
    /// The session the student was admitted in.
    pub admission_session: String,
}

impl StudentProfile {
    /// Returns true if `session` is the student's first session.
    pub fn is_fresh_in(&self, session: &str) -> bool {
        self.admission_session == session
    }
}

/// A student's registration for one course.
///
/// Identity (student, course, semester, session) never changes. `score` is
/// absent until an instructor records a mark, and `grade` is derived from the
/// score whenever the registration is re-evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRegistration {
    /// Unique identifier for the registration.
    pub id: String,
    /// The registered student.
    pub student_id: String,
    /// The registered course.
    pub course_id: String,
    /// The semester of registration.
    pub semester: Semester,
    /// The academic session of registration.
    pub session: String,
    /// The recorded score, if any.
    #[serde(default)]
    pub score: Option<Decimal>,
    /// The grade last derived from `score`.
    #[serde(default)]
    pub grade: Option<String>,
}

impl CourseRegistration {
    /// The course scope this registration belongs to.
    pub fn scope(&self) -> CourseScope {
        CourseScope::new(self.course_id.clone(), self.semester, self.session.clone())
    }

    /// Returns true if this registration belongs to `scope`.
    pub fn in_scope(&self, scope: &CourseScope) -> bool {
        self.course_id == scope.course_id
            && self.semester == scope.semester
            && self.session == scope.session
    }

    /// Returns true if this registration is for the given semester of a session.
    pub fn in_semester(&self, semester: Semester, session: &str) -> bool {
        self.semester == semester && self.session == session
    }

    /// Rejects registrations the calculation stage must never see.
    ///
    /// Scores must lie in `[0, 100]`, and a registration is never for the
    /// whole session.
    pub fn validate(&self) -> EngineResult<()> {
        if self.semester == Semester::Session {
            return Err(EngineError::InvalidRegistration {
                registration_id: self.id.clone(),
                message: "registrations must be for the first or second semester".to_string(),
            });
        }

        match self.score {
            Some(score) if score < Decimal::ZERO || score > MAX_SCORE => {
                Err(EngineError::InvalidRegistration {
                    registration_id: self.id.clone(),
                    message: format!("score {} is outside 0-100", score.normalize()),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Clamps a score into the valid `[0, 100]` range.
pub fn clamp_score(score: Decimal) -> Decimal {
    score.clamp(Decimal::ZERO, MAX_SCORE)
}
