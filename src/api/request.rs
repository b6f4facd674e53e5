//! Request types for the Result Engine API.
//!
//! This module defines the JSON request and query structures for the
//! result, statistics and adjustment endpoints. Record imports use
//! [`RecordSet`](crate::store::RecordSet) directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::payment_info;
use crate::error::EngineError;
use crate::models::{Payable, PayableWithPaymentInfo, Semester};

use super::response::ApiError;

/// Request body for the `/results/compute` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeResultRequest {
    /// The student whose result to compute.
    pub student_id: String,
    /// The semester (`first` or `second`).
    pub semester: Semester,
    /// The academic session, e.g. `2024/2025`.
    pub session: String,
    /// Payables that may gate the result, with the amounts paid against them.
    #[serde(default)]
    pub payables: Vec<PayableRequest>,
}

/// A payable and the total paid against it, as computed by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayableRequest {
    /// The payable.
    pub payable: Payable,
    /// Total paid so far.
    pub total_paid: Decimal,
}

impl TryFrom<PayableRequest> for PayableWithPaymentInfo {
    type Error = EngineError;

    fn try_from(req: PayableRequest) -> Result<Self, Self::Error> {
        let invalid = |message: &str| EngineError::InvalidPayable {
            payable_id: req.payable.id.clone(),
            message: message.to_string(),
        };

        if req.payable.amount < Decimal::ZERO {
            return Err(invalid("amount must not be negative"));
        }
        if req.total_paid < Decimal::ZERO {
            return Err(invalid("total_paid must not be negative"));
        }
        if let Some(min) = req.payable.min_percentage {
            if min < Decimal::ZERO || min > Decimal::ONE_HUNDRED {
                return Err(invalid("min_percentage must be between 0 and 100"));
            }
        }

        Ok(payment_info(req.payable, req.total_paid))
    }
}

/// Query parameters for the `/courses/{course_id}/stats` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsQuery {
    /// The semester (`first` or `second`).
    pub semester: Semester,
    /// The academic session.
    pub session: String,
}

/// Request body for the `/courses/{course_id}/adjust` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustRequest {
    /// The semester (`first` or `second`).
    pub semester: Semester,
    /// The academic session.
    pub session: String,
    /// Marks to add to every score below the pass mark. May be negative.
    pub delta: Decimal,
}

impl AdjustRequest {
    /// Rejects a delta larger than the whole score range.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.delta.abs() > Decimal::ONE_HUNDRED {
            return Err(ApiError::validation_error("delta must be between -100 and 100"));
        }
        Ok(())
    }
}
