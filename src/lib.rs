//! Result Computation & Entitlement Engine
//!
//! This crate turns raw course scores into graded line items, semester and
//! cumulative grade point averages, and course-wide statistics, applies bulk
//! mark adjustments as a single transaction, and decides whether a student's
//! result may be disclosed given their outstanding payables.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
