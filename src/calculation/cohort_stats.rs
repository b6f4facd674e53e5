//! Cohort statistics for one course.
//!
//! Computes grade distribution, pass/fail counts and score extrema over
//! every registration for a course in one semester of a session. The
//! computation is order-independent and keeps no state; [`StatsCache`]
//! memoizes results per scope until a mutation invalidates them.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{CourseRegistration, CourseScope, CourseStats, GradeCount, GradingScheme};

use super::grade_resolution::resolve_grade;
use super::rounding::{percentage, round_2dp, safe_div};

/// Computes statistics for the registrations in `scope`.
///
/// Registrations outside the scope are ignored.
///
/// - `total_students` counts every registration, graded or not.
/// - Pass/fail counts only cover registrations whose score resolves to a
///   grade; a failing grade is one worth zero points.
/// - Mean and extrema are taken over present scores only; they are `None`
///   when no registration has a score.
/// - The distribution lists every grade in the scheme, in band order,
///   including grades nobody earned. Percentages are of `total_students`.
pub fn compute_cohort_stats(
    scope: &CourseScope,
    registrations: &[CourseRegistration],
    scheme: &GradingScheme,
) -> CourseStats {
    let in_scope: Vec<&CourseRegistration> = registrations
        .iter()
        .filter(|registration| registration.in_scope(scope))
        .collect();

    let total_students = in_scope.len();
    let labels = scheme.grade_labels();
    let mut counts: HashMap<&str, usize> = labels.iter().map(|label| (*label, 0)).collect();

    let mut graded_count = 0;
    let mut fail_count = 0;
    let mut scores: Vec<Decimal> = Vec::with_capacity(total_students);

    for registration in &in_scope {
        let Some(score) = registration.score else {
            continue;
        };
        scores.push(score);

        if let Some(grade) = resolve_grade(score, &scheme.grade_bands).grade() {
            graded_count += 1;
            *counts.entry(grade).or_insert(0) += 1;
            if scheme.is_failing_grade(grade) {
                fail_count += 1;
            }
        }
    }

    let total = Decimal::from(total_students);
    let grade_distribution = labels
        .iter()
        .map(|label| {
            let count = counts.get(label).copied().unwrap_or(0);
            GradeCount {
                grade: label.to_string(),
                count,
                percentage: percentage(Decimal::from(count), total),
            }
        })
        .collect();

    let average_score = if scores.is_empty() {
        None
    } else {
        let sum: Decimal = scores.iter().sum();
        Some(round_2dp(safe_div(sum, Decimal::from(scores.len()))))
    };

    CourseStats {
        scope: scope.clone(),
        total_students,
        graded_count,
        ungraded_count: total_students - graded_count,
        pass_count: graded_count - fail_count,
        fail_count,
        average_score,
        highest_score: scores.iter().max().copied(),
        lowest_score: scores.iter().min().copied(),
        grade_distribution,
    }
}

/// Memoized cohort statistics keyed by course scope.
#[derive(Debug, Default)]
pub struct StatsCache {
    entries: HashMap<CourseScope, CourseStats>,
}

impl StatsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns cached statistics for `scope`, computing them on a miss.
    pub fn get_or_compute(
        &mut self,
        scope: &CourseScope,
        registrations: &[CourseRegistration],
        scheme: &GradingScheme,
    ) -> CourseStats {
        self.entries
            .entry(scope.clone())
            .or_insert_with(|| compute_cohort_stats(scope, registrations, scheme))
            .clone()
    }

    /// Returns cached statistics for `scope` without computing.
    pub fn get(&self, scope: &CourseScope) -> Option<&CourseStats> {
        self.entries.get(scope)
    }

    /// Drops cached statistics for `scope`. Returns true if an entry was dropped.
    pub fn invalidate(&mut self, scope: &CourseScope) -> bool {
        self.entries.remove(scope).is_some()
    }

    /// Drops cached statistics for every scope of `course_id`. Returns how many were dropped.
    pub fn invalidate_course(&mut self, course_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|scope, _| scope.course_id != course_id);
        before - self.entries.len()
    }

    /// Number of cached scopes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
