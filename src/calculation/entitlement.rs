//! Entitlement gate.
//!
//! Decides whether a student's semester result may be disclosed, based on
//! the payables linked to it and how much has been paid against each.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    EntitlementDecision, LinkedTo, Payable, PayableWithPaymentInfo, PaymentRequirement, Semester,
    StudentProfile, TargetGroup,
};

use super::rounding::{round_2dp, safe_div};

/// The student and period a result disclosure is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementScope {
    /// The student's school.
    pub school: String,
    /// The student's department.
    pub department: String,
    /// The student's level.
    pub level: u32,
    /// The academic session of the result.
    pub session: String,
    /// The semester of the result.
    pub semester: Semester,
    /// Whether the student is in their admission session.
    pub is_fresh: bool,
}

impl EntitlementScope {
    /// Builds the scope for a student's result in one semester of a session.
    pub fn for_student(student: &StudentProfile, semester: Semester, session: &str) -> Self {
        Self {
            school: student.school.clone(),
            department: student.department.clone(),
            level: student.level,
            session: session.to_string(),
            semester,
            is_fresh: student.is_fresh_in(session),
        }
    }

    /// Returns true if `payable` gates this scope's result.
    pub fn is_gated_by(&self, payable: &Payable) -> bool {
        let department_matches = payable.is_for_all_departments
            || payable.department.as_deref() == Some(self.department.as_str());
        let target_matches = match payable.target_group {
            TargetGroup::All => true,
            TargetGroup::Fresh => self.is_fresh,
            TargetGroup::Returning => !self.is_fresh,
        };

        payable.linked_to == LinkedTo::Result
            && payable.school == self.school
            && department_matches
            && payable.level == self.level
            && payable.session == self.session
            && payable.semester.covers(self.semester)
            && target_matches
    }
}

/// Attaches payment information to a payable.
///
/// `percentage_paid = min(100, total_paid / amount * 100)`, unrounded.
/// A payable with a zero amount counts as fully paid.
///
/// # Example
///
/// ```
/// use result_engine::calculation::payment_info;
/// # use result_engine::models::{LinkedTo, Payable, Semester, TargetGroup};
/// # use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// # let payable = Payable {
/// #     id: "pay_001".to_string(),
/// #     description: "School fees".to_string(),
/// #     school: "nursing".to_string(),
/// #     department: None,
/// #     level: 100,
/// #     target_group: TargetGroup::All,
/// #     session: "2024/2025".to_string(),
/// #     semester: Semester::Session,
/// #     part_payment: false,
/// #     min_percentage: None,
/// #     amount: Decimal::from(200),
/// #     due_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
/// #     linked_to: LinkedTo::Result,
/// #     is_for_all_departments: true,
/// # };
/// let info = payment_info(payable, Decimal::from(50));
/// assert_eq!(info.percentage_paid, Decimal::from(25));
/// ```
pub fn payment_info(payable: Payable, total_paid: Decimal) -> PayableWithPaymentInfo {
    let percentage_paid = if payable.amount <= Decimal::ZERO || total_paid >= payable.amount {
        Decimal::ONE_HUNDRED
    } else {
        // total_paid < amount, so the ratio is below 1 and the product cannot overflow.
        safe_div(total_paid, payable.amount) * Decimal::ONE_HUNDRED
    };

    PayableWithPaymentInfo {
        payable,
        total_paid,
        percentage_paid,
    }
}

/// Selects the payables that gate the result for `scope`.
///
/// A payable is relevant when it is linked to results, charged in the
/// student's school, to the student's department (or all departments), at
/// the student's level, in the result's session, for the result's semester
/// (a `session` payable covers both semesters), and to the student's target
/// group.
pub fn relevant_payables<'a>(
    payables: &'a [PayableWithPaymentInfo],
    scope: &EntitlementScope,
) -> Vec<&'a PayableWithPaymentInfo> {
    payables
        .iter()
        .filter(|info| scope.is_gated_by(&info.payable))
        .collect()
}

/// Checks payables that are already known to be relevant.
///
/// The gate is satisfied only if every payable is satisfied; a single unmet
/// payable withholds the whole result. No payables means the gate passes.
///
/// # Example
///
/// ```
/// use result_engine::calculation::check_entitlement;
///
/// let decision = check_entitlement(&[]);
/// assert!(decision.satisfied);
/// assert!(decision.outstanding.is_empty());
/// ```
pub fn check_entitlement(payables: &[PayableWithPaymentInfo]) -> EntitlementDecision {
    evaluate_payables(payables.iter())
}

/// Filters `payables` to those relevant to `scope`, then checks them.
pub fn check_entitlement_for(
    payables: &[PayableWithPaymentInfo],
    scope: &EntitlementScope,
) -> EntitlementDecision {
    evaluate_payables(relevant_payables(payables, scope).into_iter())
}

fn evaluate_payables<'a>(
    payables: impl Iterator<Item = &'a PayableWithPaymentInfo>,
) -> EntitlementDecision {
    let outstanding: Vec<PaymentRequirement> = payables.filter_map(requirement_for).collect();

    EntitlementDecision {
        satisfied: outstanding.is_empty(),
        outstanding,
    }
}

/// Returns what remains to be paid, or `None` when the payable is satisfied.
///
/// The comparison uses the unrounded percentage. Reported figures are
/// rounded so that an unmet payable never shows as fully paid: the paid
/// percentage toward zero, the deficit away from zero.
fn requirement_for(info: &PayableWithPaymentInfo) -> Option<PaymentRequirement> {
    let required = info.payable.required_percentage();
    if info.percentage_paid >= required {
        return None;
    }

    let percentage_deficit = (required - info.percentage_paid).max(Decimal::ZERO);
    // Equal to amount * percentage_deficit / 100, without the repeating decimals.
    let required_amount = (info.payable.amount / Decimal::ONE_HUNDRED).saturating_mul(required);
    let amount_deficit =
        round_2dp(required_amount.saturating_sub(info.total_paid).max(Decimal::ZERO));

    Some(PaymentRequirement {
        payable_id: info.payable.id.clone(),
        description: info.payable.description.clone(),
        amount: info.payable.amount,
        total_paid: info.total_paid,
        percentage_paid: info
            .percentage_paid
            .round_dp_with_strategy(2, RoundingStrategy::ToZero),
        required_percentage: required,
        percentage_deficit: percentage_deficit
            .round_dp_with_strategy(2, RoundingStrategy::AwayFromZero),
        amount_deficit,
        due_date: info.payable.due_date,
    })
}
