//! Cohort statistics models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CourseScope;

/// How many students in a cohort earned one grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCount {
    /// The grade label.
    pub grade: String,
    /// Number of students with this grade.
    pub count: usize,
    /// `count / total_students * 100`, rounded to 2 decimal places.
    pub percentage: Decimal,
}

/// Instructor-facing statistics for one course in one semester of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    /// The course, semester and session these statistics cover.
    #[serde(flatten)]
    pub scope: CourseScope,
    /// Every registration in scope, graded or not.
    pub total_students: usize,
    /// Registrations whose score resolved to a grade.
    pub graded_count: usize,
    /// Registrations with no score or an unresolvable score.
    pub ungraded_count: usize,
    /// Graded registrations with a non-failing grade.
    pub pass_count: usize,
    /// Graded registrations with a failing grade.
    pub fail_count: usize,
    /// Mean over present scores, rounded to 2 decimal places.
    pub average_score: Option<Decimal>,
    /// Highest present score.
    pub highest_score: Option<Decimal>,
    /// Lowest present score.
    pub lowest_score: Option<Decimal>,
    /// One entry per grade in the scheme, zero counts included.
    pub grade_distribution: Vec<GradeCount>,
}
