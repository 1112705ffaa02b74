mod amenity;
mod models;
mod payment;
mod policy;
pub mod pricing;
pub mod rewards;
mod station;
mod wizard;

pub use crate::amenity::AmenityCatalog;
pub use crate::models::*;
pub use crate::payment::{PaymentMethod, PaymentOption, Wallet, payment_options};
pub use crate::policy::{BookingPolicy, DurationPolicy, FeeSchedule, SlotSchedule};
pub use crate::station::StationFilter;
pub use crate::wizard::{BookingStep, BookingWizard, can_advance_from_select_time};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("A date and a time slot must be selected before continuing")]
    SlotIncomplete,
    #[error("Action requires step {expected}, but the booking is at step {actual}")]
    StepMismatch {
        expected: BookingStep,
        actual: BookingStep,
    },
    #[error("Cannot advance from step {from}")]
    InvalidTransition { from: BookingStep },
    #[error("Booking is already confirmed")]
    AlreadyConfirmed,
    #[error("Amenity {amenity_id} does not exist in the catalog")]
    AmenityNotFound { amenity_id: String },
    #[error("At most {cap} {kind} amenities can be selected")]
    AmenityCapReached { kind: AmenityKind, cap: usize },
    #[error("Payment method {method} is unavailable for a total of {total} (wallet balance {balance})")]
    PaymentMethodUnavailable {
        method: PaymentMethod,
        total: u64,
        balance: u64,
    },
    #[error("Wallet balance {balance} does not cover {requested}")]
    InsufficientBalance { requested: u64, balance: u64 },
    #[error("Submission failed: {reason}")]
    SubmissionFailed { reason: String },
}

impl BookingError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        BookingError::InvalidInput {
            reason: reason.into(),
        }
    }
}
