//! HTTP API module for the Result Engine.
//!
//! This module provides the REST API endpoints for importing records,
//! computing gated semester results, serving course statistics and
//! applying bulk mark adjustments.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AdjustRequest, ComputeResultRequest, PayableRequest, StatsQuery};
pub use response::{ApiError, ImportSummary};
pub use state::AppState;
