//! Recurring payments: registration and due-date evaluation.

pub mod builder;
pub mod due;
pub mod error;

pub use builder::{AccountRef, AutopaymentBuilder, AutopaymentRequest, ScheduleRequest};
pub use due::{is_payment_due, is_payment_due_at};
pub use error::AutopayError;
