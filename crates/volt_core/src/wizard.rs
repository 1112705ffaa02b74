use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    AmenityCatalog, AmenitySelection, BookingDraft, BookingError, BookingPolicy, ChargingStation,
    ChosenSlot, CostBreakdown, PaymentMethod, PaymentOption, payment_options, pricing,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingStep {
    SelectTime,
    ReviewDetails,
    PaymentAndAddons,
    /// Terminal, reached only through a successful submission
    Confirmed,
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStep::SelectTime => write!(f, "select-time"),
            BookingStep::ReviewDetails => write!(f, "review-details"),
            BookingStep::PaymentAndAddons => write!(f, "payment-and-addons"),
            BookingStep::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Exit guard of [`BookingStep::SelectTime`].
pub fn can_advance_from_select_time(draft: &BookingDraft) -> bool {
    draft.date.is_some() && draft.time.is_some()
}

/// Linear booking flow for one station: pick a slot, review it, then choose
/// add-ons and pay.
///
/// Going back never clears what was entered. Once confirmed, the wizard is
/// frozen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWizard {
    station: ChargingStation,
    policy: BookingPolicy,
    step: BookingStep,
    draft: BookingDraft,
    payment_method: PaymentMethod,
    booking_id: Option<String>,
}

impl BookingWizard {
    pub fn new(station: ChargingStation, policy: BookingPolicy) -> Self {
        let draft = BookingDraft::new(policy.duration.default_minutes);
        BookingWizard {
            station,
            policy,
            step: BookingStep::SelectTime,
            draft,
            payment_method: PaymentMethod::Wallet,
            booking_id: None,
        }
    }

    pub fn station(&self) -> &ChargingStation {
        &self.station
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Id of the record emitted when the booking was confirmed.
    pub fn booking_id(&self) -> Option<&str> {
        self.booking_id.as_deref()
    }

    fn ensure_step(&self, expected: BookingStep) -> Result<(), BookingError> {
        if self.step == BookingStep::Confirmed {
            return Err(BookingError::AlreadyConfirmed);
        }
        if self.step != expected {
            return Err(BookingError::StepMismatch {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn check_date(&self, date: NaiveDate, today: NaiveDate) -> Result<(), BookingError> {
        let earliest = self.policy.earliest_date(today);
        if date < earliest {
            return Err(BookingError::invalid_input(format!(
                "bookings open on {earliest}, got {date}"
            )));
        }
        Ok(())
    }

    fn check_time(&self, time: NaiveTime) -> Result<(), BookingError> {
        if !self.policy.slots.contains(time) {
            return Err(BookingError::invalid_input(format!(
                "{} is not an offered time slot",
                time.format("%H:%M")
            )));
        }
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::SelectTime)?;
        self.check_date(date, today)?;
        self.draft.date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, time: NaiveTime) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::SelectTime)?;
        self.check_time(time)?;
        self.draft.time = Some(time);
        Ok(())
    }

    pub fn set_duration(&mut self, minutes: u32) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::SelectTime)?;
        self.policy.duration.validate(minutes)?;
        self.draft.duration_minutes = minutes;
        Ok(())
    }

    /// Edit date, time and duration together. Fields left as `None` keep
    /// their value, and nothing is written unless every given field is valid.
    pub fn select_slot(
        &mut self,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        duration_minutes: Option<u32>,
        today: NaiveDate,
    ) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::SelectTime)?;
        if let Some(date) = date {
            self.check_date(date, today)?;
        }
        if let Some(time) = time {
            self.check_time(time)?;
        }
        if let Some(minutes) = duration_minutes {
            self.policy.duration.validate(minutes)?;
        }

        if date.is_some() {
            self.draft.date = date;
        }
        if time.is_some() {
            self.draft.time = time;
        }
        if let Some(minutes) = duration_minutes {
            self.draft.duration_minutes = minutes;
        }
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            BookingStep::SelectTime => can_advance_from_select_time(&self.draft),
            BookingStep::ReviewDetails => true,
            BookingStep::PaymentAndAddons | BookingStep::Confirmed => false,
        }
    }

    pub fn advance(&mut self) -> Result<BookingStep, BookingError> {
        let next = match self.step {
            BookingStep::SelectTime => {
                if !can_advance_from_select_time(&self.draft) {
                    return Err(BookingError::SlotIncomplete);
                }
                BookingStep::ReviewDetails
            }
            BookingStep::ReviewDetails => BookingStep::PaymentAndAddons,
            BookingStep::PaymentAndAddons => {
                return Err(BookingError::InvalidTransition { from: self.step });
            }
            BookingStep::Confirmed => return Err(BookingError::AlreadyConfirmed),
        };
        tracing::debug!("Booking at station {} advanced to {}", self.station.id, next);
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<BookingStep, BookingError> {
        let previous = match self.step {
            BookingStep::SelectTime | BookingStep::ReviewDetails => BookingStep::SelectTime,
            BookingStep::PaymentAndAddons => BookingStep::ReviewDetails,
            BookingStep::Confirmed => return Err(BookingError::AlreadyConfirmed),
        };
        self.step = previous;
        Ok(previous)
    }

    /// Toggle an add-on, refusing to add past its category cap.
    pub fn toggle_amenity(
        &mut self,
        id: &str,
        catalog: &AmenityCatalog,
    ) -> Result<&AmenitySelection, BookingError> {
        self.ensure_step(BookingStep::PaymentAndAddons)?;
        catalog.can_select(&self.draft.selected_amenities, id)?;
        self.draft.selected_amenities =
            AmenityCatalog::toggle_selection(&self.draft.selected_amenities, id);
        Ok(&self.draft.selected_amenities)
    }

    /// Breakdown of the current draft, recomputed on every call.
    pub fn quote(&self, catalog: &AmenityCatalog) -> Result<CostBreakdown, BookingError> {
        pricing::quote(
            &self.station,
            self.draft.duration_minutes,
            &self.draft.selected_amenities,
            catalog,
            &self.policy.fees,
        )
    }

    pub fn payment_options(
        &self,
        catalog: &AmenityCatalog,
        wallet_balance: u64,
    ) -> Result<Vec<PaymentOption>, BookingError> {
        let breakdown = self.quote(catalog)?;
        Ok(payment_options(breakdown.total, wallet_balance))
    }

    pub fn select_payment_method(
        &mut self,
        method: PaymentMethod,
        catalog: &AmenityCatalog,
        wallet_balance: u64,
    ) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::PaymentAndAddons)?;
        let breakdown = self.quote(catalog)?;
        method.ensure_available(breakdown.total, wallet_balance)?;
        self.payment_method = method;
        Ok(())
    }

    pub fn chosen_slot(&self) -> Result<ChosenSlot, BookingError> {
        match (self.draft.date, self.draft.time) {
            (Some(date), Some(time)) => Ok(ChosenSlot { date, time }),
            _ => Err(BookingError::SlotIncomplete),
        }
    }

    /// Close the flow after the booking record has been written.
    pub fn confirm(&mut self, booking_id: String) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::PaymentAndAddons)?;
        tracing::info!(
            "Booking {} confirmed at station {}",
            booking_id,
            self.station.id
        );
        self.booking_id = Some(booking_id);
        self.step = BookingStep::Confirmed;
        Ok(())
    }
}
