use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use volt_core::{
    AmenityItem, BookingRecord, BookingStatus, ChosenSlot, CostBreakdown, PaymentMethod,
};

use crate::store::{BookingStore, StoreError};

const BOOKING_ID_LENGTH: usize = 9;

/// Random uppercase alphanumeric token. Not meant to be unguessable.
pub fn generate_booking_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOOKING_ID_LENGTH)
        .map(|byte| char::from(byte).to_ascii_uppercase())
        .collect()
}

/// Everything a confirmed booking is made of, minus its id and timestamp.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub station_id: String,
    pub station_title: String,
    pub chosen_slot: ChosenSlot,
    pub duration_minutes: u32,
    pub breakdown: CostBreakdown,
    pub selected_amenities: Vec<AmenityItem>,
    pub payment_method: PaymentMethod,
}

/// Writes confirmed bookings, newest first. Records are never updated or
/// removed.
#[derive(Clone)]
pub struct BookingEmitter {
    store: Arc<dyn BookingStore>,
}

impl BookingEmitter {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        BookingEmitter { store }
    }

    pub fn records(&self) -> Result<Vec<BookingRecord>, StoreError> {
        self.store.load()
    }

    /// Read the stored list, put the new record in front and write it back.
    pub fn emit(
        &self,
        booking: NewBooking,
        created_at: DateTime<Utc>,
    ) -> Result<BookingRecord, StoreError> {
        let record = BookingRecord {
            id: generate_booking_id(),
            station_id: booking.station_id,
            station_title: booking.station_title,
            chosen_slot: booking.chosen_slot,
            duration_minutes: booking.duration_minutes,
            breakdown: booking.breakdown,
            selected_amenities: booking.selected_amenities,
            payment_method: booking.payment_method,
            status: BookingStatus::Confirmed,
            created_at,
        };

        let mut records = self.store.load()?;
        records.insert(0, record.clone());
        self.store.save(&records)?;

        tracing::info!(
            "Emitted booking {} for station {} ({} stored)",
            record.id,
            record.station_id,
            records.len()
        );
        Ok(record)
    }
}
