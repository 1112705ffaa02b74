//! Booking submission and persistence for the SuryaVolt marketplace.

mod checkout;
mod emitter;
mod store;

pub use crate::checkout::{
    BookingService, Checkout, Confirmation, PaymentGateway, SimulatedGateway,
};
pub use crate::emitter::{BookingEmitter, NewBooking, generate_booking_id};
pub use crate::store::{BOOKINGS_COLLECTION, BookingStore, JsonFileStore, MemoryStore, StoreError};

use thiserror::Error;
use volt_core::BookingError;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
