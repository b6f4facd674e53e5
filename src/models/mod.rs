//! Core data models for the Result Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod course_stats;
mod grading_scheme;
mod line_item;
mod payable;
mod registration;
mod result_computation;
mod semester_summary;

pub use course_stats::{CourseStats, GradeCount};
pub use grading_scheme::{CommentBand, GradeBand, GradingScheme};
pub use line_item::{LineItemResult, Remark};
pub use payable::{
    EntitlementDecision, LinkedTo, Payable, PayableWithPaymentInfo, PaymentRequirement,
    TargetGroup,
};
pub use registration::{
    Course, CourseRegistration, CourseScope, MAX_SCORE, Semester, StudentProfile, clamp_score,
};
pub use result_computation::{
    AuditStep, AuditTrace, AuditWarning, BulkAdjustmentOutcome, ResultComputation, ScoreChange,
    StudentSummary,
};
pub use semester_summary::{CumulativeSnapshot, SemesterSummary};
