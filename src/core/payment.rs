//! Invoice payment transitions
//!
//! Marking an invoice paid stamps today's date, marking it unpaid clears the
//! date, and leaving the flag alone keeps whatever date is stored. Storage
//! backends evaluate this between a locked read of the current row and the
//! `UPDATE`, inside one transaction.

use chrono::{Local, NaiveDate};

/// How the `paid` flag moves between the stored row and the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTransition {
    /// `false -> true`
    MarkPaid,
    /// `true -> false`
    MarkUnpaid,
    /// Flag unchanged in either direction
    Unchanged,
}

impl PaymentTransition {
    /// Classify the move from `current_paid` to `requested_paid`
    pub fn between(current_paid: bool, requested_paid: bool) -> Self {
        match (current_paid, requested_paid) {
            (false, true) => PaymentTransition::MarkPaid,
            (true, false) => PaymentTransition::MarkUnpaid,
            _ => PaymentTransition::Unchanged,
        }
    }

    /// New `paid_date` after this transition
    pub fn apply(self, current_paid_date: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            PaymentTransition::MarkPaid => Some(today),
            PaymentTransition::MarkUnpaid => None,
            PaymentTransition::Unchanged => current_paid_date,
        }
    }
}

/// Compute the `paid_date` to persist for a requested `paid` flag
///
/// # Examples
///
/// ```
/// use biztime::core::payment::resolve_paid_date;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let earlier = NaiveDate::from_ymd_opt(2024, 1, 15);
///
/// assert_eq!(resolve_paid_date(false, None, true, today), Some(today));
/// assert_eq!(resolve_paid_date(true, earlier, false, today), None);
/// assert_eq!(resolve_paid_date(true, earlier, true, today), earlier);
/// ```
pub fn resolve_paid_date(
    current_paid: bool,
    current_paid_date: Option<NaiveDate>,
    requested_paid: bool,
    today: NaiveDate,
) -> Option<NaiveDate> {
    PaymentTransition::between(current_paid, requested_paid).apply(current_paid_date, today)
}

/// The calendar date used for `add_date` and newly stamped `paid_date`s
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
