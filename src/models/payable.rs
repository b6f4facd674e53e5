//! Payable models.
//!
//! A [`Payable`] is a financial obligation that can gate disclosure of a
//! student's results. [`PayableWithPaymentInfo`] pairs it with the amount
//! already paid, as computed from the payment ledger outside this engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Semester;

/// Which students a payable is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
    /// Every student in scope.
    All,
    /// Students in their admission session.
    Fresh,
    /// Students past their admission session.
    Returning,
}

/// What a payable unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedTo {
    /// Disclosure of semester results.
    Result,
    /// Course registration.
    CourseRegistration,
    /// Sitting examinations.
    Examination,
    /// Not linked to an academic activity.
    Other,
}

/// A financial obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payable {
    /// Unique identifier for the payable.
    pub id: String,
    /// Human-readable description (e.g., "School fees").
    pub description: String,
    /// The school the payable is charged in.
    pub school: String,
    /// The department, when not charged to all departments.
    #[serde(default)]
    pub department: Option<String>,
    /// The level the payable is charged to.
    pub level: u32,
    /// Which students the payable is charged to.
    pub target_group: TargetGroup,
    /// The academic session of the payable.
    pub session: String,
    /// The semester of the payable; `session` covers both semesters.
    pub semester: Semester,
    /// Whether part payment is accepted.
    #[serde(default)]
    pub part_payment: bool,
    /// Minimum percentage required when part payment is accepted.
    #[serde(default)]
    pub min_percentage: Option<Decimal>,
    /// The full amount due.
    pub amount: Decimal,
    /// When the payable falls due.
    pub due_date: NaiveDate,
    /// What the payable unlocks.
    pub linked_to: LinkedTo,
    /// Whether the payable applies to every department in the school.
    #[serde(default)]
    pub is_for_all_departments: bool,
}

impl Payable {
    /// Returns the percentage that must be paid to satisfy this payable.
    ///
    /// Full payment is required unless part payment is accepted, in which
    /// case the minimum percentage applies. A part-payment payable without a
    /// minimum still requires 100%.
    pub fn required_percentage(&self) -> Decimal {
        if self.part_payment {
            self.min_percentage.unwrap_or(Decimal::ONE_HUNDRED)
        } else {
            Decimal::ONE_HUNDRED
        }
    }
}

/// A payable together with how much has been paid against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableWithPaymentInfo {
    /// The payable.
    #[serde(flatten)]
    pub payable: Payable,
    /// Total amount paid, from the payment ledger.
    pub total_paid: Decimal,
    /// `min(100, total_paid / amount * 100)`, unrounded.
    pub percentage_paid: Decimal,
}

/// What remains to be paid on an unsatisfied payable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequirement {
    /// The payable ID.
    pub payable_id: String,
    /// The payable description.
    pub description: String,
    /// The full amount due.
    pub amount: Decimal,
    /// Amount paid so far.
    pub total_paid: Decimal,
    /// Percentage paid so far, truncated to 2 decimal places.
    pub percentage_paid: Decimal,
    /// Percentage that must be paid.
    pub required_percentage: Decimal,
    /// `max(0, required_percentage - percentage_paid)`, rounded up to 2 decimal places.
    pub percentage_deficit: Decimal,
    /// `amount * percentage_deficit / 100`, taken as the required amount
    /// less `total_paid`, rounded to 2 decimal places.
    pub amount_deficit: Decimal,
    /// When the payable falls due.
    pub due_date: NaiveDate,
}

/// The outcome of the entitlement gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementDecision {
    /// True when every relevant payable is satisfied.
    pub satisfied: bool,
    /// Every unsatisfied payable, in input order.
    pub outstanding: Vec<PaymentRequirement>,
}
