use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;
use volt_core::{AmenityCatalog, BookingPolicy, BookingWizard, ChargingStation, Wallet};
use volt_engine::{BookingService, BookingStore, JsonFileStore, MemoryStore, SimulatedGateway};

use crate::config::MarketplaceConfig;
use crate::error::ApiError;

/// A booking flow that has not been submitted yet
#[derive(Debug)]
pub struct OpenWizard {
    pub wizard: BookingWizard,
    pub started_at: DateTime<Utc>,
}

/// Mutable marketplace data, guarded by the lock in [`AppState`]
#[derive(Debug)]
pub struct Marketplace {
    pub stations: Vec<ChargingStation>,
    pub catalog: AmenityCatalog,
    pub policy: BookingPolicy,
    pub wizards: HashMap<Uuid, OpenWizard>,
    /// Wizards older than this are dropped when a new one starts
    pub wizard_ttl: TimeDelta,
    pub rider_name: String,
    pub wallet: Wallet,
    pub reward_points: u32,
}

impl Marketplace {
    pub fn station(&self, station_id: &str) -> Result<&ChargingStation, ApiError> {
        self.stations
            .iter()
            .find(|station| station.id == station_id)
            .ok_or_else(|| ApiError::StationNotFound {
                station_id: station_id.to_string(),
            })
    }

    pub fn wizard(&self, wizard_id: Uuid) -> Result<&BookingWizard, ApiError> {
        self.wizards
            .get(&wizard_id)
            .map(|open| &open.wizard)
            .ok_or(ApiError::WizardNotFound { wizard_id })
    }

    pub fn wizard_mut(&mut self, wizard_id: Uuid) -> Result<&mut BookingWizard, ApiError> {
        self.wizards
            .get_mut(&wizard_id)
            .map(|open| &mut open.wizard)
            .ok_or(ApiError::WizardNotFound { wizard_id })
    }

    /// Start a booking flow for `station_id`, dropping abandoned ones first.
    pub fn open_wizard(
        &mut self,
        station_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid, ApiError> {
        let station = self.station(station_id)?.clone();
        self.expire_wizards(now);

        let wizard_id = Uuid::new_v4();
        let wizard = BookingWizard::new(station, self.policy.clone());
        self.wizards.insert(
            wizard_id,
            OpenWizard {
                wizard,
                started_at: now,
            },
        );
        Ok(wizard_id)
    }

    /// Drop wizards started `wizard_ttl` or longer before `now`.
    pub fn expire_wizards(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.wizard_ttl;
        let before = self.wizards.len();
        self.wizards.retain(|_, open| now - open.started_at < ttl);
        let expired = before - self.wizards.len();
        if expired > 0 {
            tracing::info!("Dropped {} abandoned bookings", expired);
        }
        expired
    }

    /// Forget a wizard once its booking has been confirmed.
    pub fn close_wizard(&mut self, wizard_id: Uuid) -> Option<BookingWizard> {
        self.wizards.remove(&wizard_id).map(|open| open.wizard)
    }
}

/// Application state shared by every handler
pub struct AppState {
    marketplace: Mutex<Marketplace>,
    pub service: BookingService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: MarketplaceConfig) -> Self {
        let store: Arc<dyn BookingStore> = match &config.store.data_dir {
            Some(data_dir) => {
                let store = JsonFileStore::new(data_dir);
                tracing::info!("Storing bookings in {}", store.path().display());
                Arc::new(store)
            }
            None => {
                tracing::info!("Storing bookings in memory");
                Arc::new(MemoryStore::new())
            }
        };
        let service = BookingService::new(
            store,
            Arc::new(SimulatedGateway::new(config.gateway.failure_rate)),
            Duration::from_millis(config.gateway.latency_ms),
        );

        AppState {
            marketplace: Mutex::new(Marketplace {
                stations: config.stations,
                catalog: config.amenities,
                policy: config.policy,
                wizards: HashMap::new(),
                wizard_ttl: TimeDelta::minutes(i64::from(config.sessions.wizard_ttl_minutes)),
                rider_name: config.rider.name,
                wallet: Wallet::new(config.rider.wallet_balance),
                reward_points: config.rider.reward_points,
            }),
            service,
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Marketplace>, ApiError> {
        self.marketplace.lock().map_err(|_| ApiError::StatePoisoned)
    }
}
