//! Due-Date Evaluation
//!
//! Decides whether a registered autopayment should fire at a given
//! instant. Pure functions so schedulers can evaluate candidates without
//! touching the store.

use chrono::{DateTime, Datelike, NaiveTime, Utc};

use crate::model::{Autopayment, PaymentFrequency};

/// Whether `autopayment` is due at `now`.
///
/// The schedule window is exclusive on both sides, with each date taken
/// at midnight UTC: nothing is due before the start date has passed or
/// once the end date has begun. Inside the window, a payment with no
/// prior run is always due. Otherwise the frequency compares calendar
/// ordinals of the last run against `now`: day of month for daily, ISO
/// week number for weekly, month for monthly, year for yearly. A period
/// counts as elapsed only when the ordinal strictly increases.
pub fn is_payment_due_at(autopayment: &Autopayment, now: DateTime<Utc>) -> bool {
    let schedule = &autopayment.schedule;
    let start = schedule.start_date.and_time(NaiveTime::MIN).and_utc();
    let end = schedule.end_date.and_time(NaiveTime::MIN).and_utc();
    if !(start < now && now < end) {
        return false;
    }

    let Some(last) = autopayment.last_payment else {
        return true;
    };

    match schedule.frequency {
        PaymentFrequency::Daily => now.day() > last.day(),
        PaymentFrequency::Weekly => now.iso_week().week() > last.iso_week().week(),
        PaymentFrequency::Monthly => now.month() > last.month(),
        PaymentFrequency::Yearly => now.year() > last.year(),
    }
}

/// [`is_payment_due_at`] evaluated against the current wall clock.
pub fn is_payment_due(autopayment: &Autopayment) -> bool {
    is_payment_due_at(autopayment, Utc::now())
}
