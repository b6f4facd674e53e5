//! Calculation logic for the Result Engine.
//!
//! This module contains the grading scheme resolver, course result
//! evaluation, semester summary aggregation, cohort statistics, the bulk
//! mark adjustment transaction, and the entitlement gate that decides
//! whether a result may be disclosed.

mod bulk_adjustment;
mod cohort_stats;
mod course_evaluation;
mod entitlement;
mod grade_resolution;
mod result_computation;
mod rounding;
mod semester_summary;

#[cfg(test)]
mod properties;

pub use bulk_adjustment::{PASS_MARK, PlannedAdjustment, bulk_adjust, plan_bulk_adjustment};
pub use cohort_stats::{StatsCache, compute_cohort_stats};
pub use course_evaluation::{evaluate, evaluate_registrations};
pub use entitlement::{
    EntitlementScope, check_entitlement, check_entitlement_for, payment_info, relevant_payables,
};
pub use grade_resolution::{
    COMMENT_NOT_SET, GradeResolution, resolve_comment, resolve_comment_or_default, resolve_grade,
};
pub use result_computation::{SemesterResultInput, compute_semester_result};
pub use rounding::{percentage, round_2dp, safe_div};
pub use semester_summary::aggregate;
