use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use volt_core::{
    AmenityCatalog, AmenityItem, BookingDraft, BookingError, BookingRecord, BookingStep,
    BookingWizard, ChargingStation, ChosenSlot, CostBreakdown, PaymentMethod, Wallet,
};

use crate::CheckoutError;
use crate::emitter::{BookingEmitter, NewBooking};
use crate::store::{BookingStore, StoreError};

pub trait PaymentGateway: Send + Sync {
    fn charge(&self, method: PaymentMethod, amount: u64) -> Result<(), BookingError>;
}

/// Stand-in for a payment provider that fails a share of the attempts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway {
    failure_rate: f64,
}

impl SimulatedGateway {
    /// `failure_rate` is clamped into `0.0..=1.0`, NaN counts as zero.
    pub fn new(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        SimulatedGateway { failure_rate }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, method: PaymentMethod, amount: u64) -> Result<(), BookingError> {
        if rand::thread_rng().gen_bool(self.failure_rate) {
            return Err(BookingError::SubmissionFailed {
                reason: format!("{} payment of {} was declined, please try again", method, amount),
            });
        }
        Ok(())
    }
}

/// A priced booking waiting for payment.
#[derive(Debug, Clone)]
pub struct Checkout {
    draft: BookingDraft,
    slot: ChosenSlot,
    breakdown: CostBreakdown,
    payment_method: PaymentMethod,
    amenities: Vec<AmenityItem>,
}

impl Checkout {
    pub fn breakdown(&self) -> &CostBreakdown {
        &self.breakdown
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}

/// What the confirmation view receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub booking: BookingRecord,
    pub station: ChargingStation,
}

fn ensure_payment_step(wizard: &BookingWizard) -> Result<(), BookingError> {
    match wizard.step() {
        BookingStep::PaymentAndAddons => Ok(()),
        BookingStep::Confirmed => Err(BookingError::AlreadyConfirmed),
        actual => Err(BookingError::StepMismatch {
            expected: BookingStep::PaymentAndAddons,
            actual,
        }),
    }
}

/// Takes a booking from the payment step to a stored record.
///
/// Submission is split in three so that callers sharing the wizard behind a
/// lock can release it while the payment is in flight: [`prepare`] and
/// [`finalize`] are synchronous, [`process`] waits.
///
/// [`prepare`]: BookingService::prepare
/// [`process`]: BookingService::process
/// [`finalize`]: BookingService::finalize
#[derive(Clone)]
pub struct BookingService {
    emitter: BookingEmitter,
    gateway: Arc<dyn PaymentGateway>,
    latency: Duration,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn BookingStore>,
        gateway: Arc<dyn PaymentGateway>,
        latency: Duration,
    ) -> Self {
        BookingService {
            emitter: BookingEmitter::new(store),
            gateway,
            latency,
        }
    }

    /// Stored bookings, newest first.
    pub fn bookings(&self) -> Result<Vec<BookingRecord>, StoreError> {
        self.emitter.records()
    }

    pub fn prepare(
        &self,
        wizard: &BookingWizard,
        catalog: &AmenityCatalog,
        wallet: &Wallet,
    ) -> Result<Checkout, BookingError> {
        ensure_payment_step(wizard)?;
        let slot = wizard.chosen_slot()?;
        let breakdown = wizard.quote(catalog)?;
        let payment_method = wizard.payment_method();
        payment_method.ensure_available(breakdown.total, wallet.balance())?;

        let draft = wizard.draft().clone();
        let amenities = catalog.selected_items(&draft.selected_amenities);
        Ok(Checkout {
            draft,
            slot,
            breakdown,
            payment_method,
            amenities,
        })
    }

    /// Simulated round trip to the payment provider.
    pub async fn process(&self, checkout: &Checkout) -> Result<(), BookingError> {
        tracing::info!(
            "Processing {} payment of {}",
            checkout.payment_method,
            checkout.breakdown.total
        );
        tokio::time::sleep(self.latency).await;
        if let Err(error) = self
            .gateway
            .charge(checkout.payment_method, checkout.breakdown.total)
        {
            tracing::warn!("Payment failed: {}", error);
            return Err(error);
        }
        Ok(())
    }

    /// Write the booking and close the wizard.
    ///
    /// The wizard must still hold the draft that was priced in `checkout`.
    pub fn finalize(
        &self,
        wizard: &mut BookingWizard,
        wallet: &mut Wallet,
        checkout: Checkout,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, CheckoutError> {
        ensure_payment_step(wizard)?;
        if wizard.draft() != &checkout.draft || wizard.payment_method() != checkout.payment_method
        {
            return Err(BookingError::SubmissionFailed {
                reason: "booking changed while the payment was processing".into(),
            }
            .into());
        }
        let total = checkout.breakdown.total;
        if checkout.payment_method == PaymentMethod::Wallet {
            checkout
                .payment_method
                .ensure_available(total, wallet.balance())?;
        }

        let station = wizard.station().clone();
        let record = self.emitter.emit(
            NewBooking {
                station_id: station.id.clone(),
                station_title: station.title.clone(),
                chosen_slot: checkout.slot,
                duration_minutes: checkout.draft.duration_minutes,
                breakdown: checkout.breakdown,
                selected_amenities: checkout.amenities,
                payment_method: checkout.payment_method,
            },
            now,
        )?;

        if checkout.payment_method == PaymentMethod::Wallet {
            wallet.debit(total)?;
        }
        wizard.confirm(record.id.clone())?;

        Ok(Confirmation {
            booking: record,
            station,
        })
    }

    /// Prepare, pay and finalize in one go for callers that own the wizard.
    ///
    /// A failed payment leaves the wizard at the payment step, ready for
    /// another attempt.
    pub async fn submit(
        &self,
        wizard: &mut BookingWizard,
        catalog: &AmenityCatalog,
        wallet: &mut Wallet,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, CheckoutError> {
        let checkout = self.prepare(wizard, catalog, wallet)?;
        self.process(&checkout).await?;
        self.finalize(wizard, wallet, checkout, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use volt_core::{BookingPolicy, BookingStatus, StationAvailability, StationPricing};

    struct DecliningGateway;

    impl PaymentGateway for DecliningGateway {
        fn charge(&self, _method: PaymentMethod, _amount: u64) -> Result<(), BookingError> {
            Err(BookingError::SubmissionFailed {
                reason: "declined".into(),
            })
        }
    }

    fn home_station() -> ChargingStation {
        ChargingStation {
            id: "1".into(),
            host_name: "Rajesh Kumar".into(),
            title: "FastCharge Home Station".into(),
            address: "Koramangala, Bangalore, Karnataka".into(),
            socket_type: "Type-2".into(),
            power_capacity: 3.3,
            pricing: StationPricing {
                per_minute: Some(2.0),
                per_kwh: Some(8.0),
            },
            availability: StationAvailability::Available,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn wizard_at_payment() -> BookingWizard {
        let mut wizard = BookingWizard::new(home_station(), BookingPolicy::default());
        wizard
            .select_date(
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            )
            .unwrap();
        wizard
            .select_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
            .unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard
    }

    fn service(store: Arc<MemoryStore>, gateway: Arc<dyn PaymentGateway>) -> BookingService {
        BookingService::new(store, gateway, Duration::from_secs(2))
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_with_wallet() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone(), Arc::new(SimulatedGateway::new(0.0)));
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(2500);
        let mut wizard = wizard_at_payment();
        wizard.toggle_amenity("food_1", &catalog).unwrap();

        let confirmation = service
            .submit(&mut wizard, &catalog, &mut wallet, now())
            .await
            .expect("Could not submit the booking");

        assert_eq!(confirmation.booking.breakdown.total, 112);
        assert_eq!(confirmation.booking.status, BookingStatus::Confirmed);
        assert_eq!(confirmation.booking.selected_amenities[0].id, "food_1");
        assert_eq!(confirmation.station.id, "1");
        assert_eq!(wallet.balance(), 2500 - 112);
        assert_eq!(wizard.step(), BookingStep::Confirmed);
        assert_eq!(wizard.booking_id(), Some(confirmation.booking.id.as_str()));
        assert_eq!(store.load().unwrap(), vec![confirmation.booking]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_card_payment_leaves_wallet_alone() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone(), Arc::new(SimulatedGateway::new(0.0)));
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(0);
        let mut wizard = wizard_at_payment();
        wizard
            .select_payment_method(PaymentMethod::Card, &catalog, wallet.balance())
            .unwrap();

        let confirmation = service
            .submit(&mut wizard, &catalog, &mut wallet, now())
            .await
            .unwrap();
        assert_eq!(confirmation.booking.payment_method, PaymentMethod::Card);
        assert_eq!(wallet.balance(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_wallet_never_reaches_the_store() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone(), Arc::new(SimulatedGateway::new(0.0)));
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(20);
        let mut wizard = wizard_at_payment();

        let result = service
            .submit(&mut wizard, &catalog, &mut wallet, now())
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::Booking(
                BookingError::PaymentMethodUnavailable { total: 32, balance: 20, .. }
            ))
        ));
        assert!(store.load().unwrap().is_empty());
        assert_eq!(wizard.step(), BookingStep::PaymentAndAddons);
        assert_eq!(wallet.balance(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_payment_can_be_retried() {
        let store = Arc::new(MemoryStore::new());
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(500);
        let mut wizard = wizard_at_payment();

        let failing = service(store.clone(), Arc::new(DecliningGateway));
        let result = failing
            .submit(&mut wizard, &catalog, &mut wallet, now())
            .await;
        assert!(matches!(
            result,
            Err(CheckoutError::Booking(BookingError::SubmissionFailed { .. }))
        ));
        assert_eq!(wizard.step(), BookingStep::PaymentAndAddons);
        assert_eq!(wallet.balance(), 500);
        assert!(store.load().unwrap().is_empty());

        let working = service(store.clone(), Arc::new(SimulatedGateway::new(0.0)));
        working
            .submit(&mut wizard, &catalog, &mut wallet, now())
            .await
            .unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(wallet.balance(), 500 - 32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_simulation() {
        let service = service(
            Arc::new(MemoryStore::new()),
            Arc::new(SimulatedGateway::new(1.0)),
        );
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(500);
        let mut wizard = wizard_at_payment();
        for _ in 0..3 {
            let result = service
                .submit(&mut wizard, &catalog, &mut wallet, now())
                .await;
            assert!(matches!(
                result,
                Err(CheckoutError::Booking(BookingError::SubmissionFailed { .. }))
            ));
        }
        assert_eq!(wizard.step(), BookingStep::PaymentAndAddons);
        assert!(service.bookings().unwrap().is_empty());
    }

    #[test]
    fn test_prepare_requires_payment_step() {
        let service = service(
            Arc::new(MemoryStore::new()),
            Arc::new(SimulatedGateway::new(0.0)),
        );
        let wizard = BookingWizard::new(home_station(), BookingPolicy::default());
        let result = service.prepare(&wizard, &AmenityCatalog::reference(), &Wallet::new(500));
        assert_eq!(
            result.err(),
            Some(BookingError::StepMismatch {
                expected: BookingStep::PaymentAndAddons,
                actual: BookingStep::SelectTime
            })
        );
    }

    #[test]
    fn test_finalize_rejects_changed_draft() {
        let service = service(
            Arc::new(MemoryStore::new()),
            Arc::new(SimulatedGateway::new(0.0)),
        );
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(5000);
        let mut wizard = wizard_at_payment();
        let checkout = service.prepare(&wizard, &catalog, &wallet).unwrap();

        wizard.toggle_amenity("stay_2", &catalog).unwrap();

        let result = service.finalize(&mut wizard, &mut wallet, checkout, now());
        assert!(matches!(
            result,
            Err(CheckoutError::Booking(BookingError::SubmissionFailed { .. }))
        ));
        assert_eq!(wallet.balance(), 5000);
        assert!(service.bookings().unwrap().is_empty());
    }

    #[test]
    fn test_finalize_after_confirmation_is_rejected() {
        let service = service(
            Arc::new(MemoryStore::new()),
            Arc::new(SimulatedGateway::new(0.0)),
        );
        let catalog = AmenityCatalog::reference();
        let mut wallet = Wallet::new(5000);
        let mut wizard = wizard_at_payment();
        let first = service.prepare(&wizard, &catalog, &wallet).unwrap();
        let second = first.clone();

        service.finalize(&mut wizard, &mut wallet, first, now()).unwrap();
        let result = service.finalize(&mut wizard, &mut wallet, second, now());
        assert!(matches!(
            result,
            Err(CheckoutError::Booking(BookingError::AlreadyConfirmed))
        ));
        assert_eq!(service.bookings().unwrap().len(), 1);
    }
}
