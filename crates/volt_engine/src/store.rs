use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use volt_core::BookingRecord;

/// Name of the collection every booking record is written to.
pub const BOOKINGS_COLLECTION: &str = "bookings";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access booking store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Booking store at {path} holds invalid data: {source}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Booking store lock was poisoned")]
    Poisoned,
}

/// Persistence boundary for booking records.
///
/// The whole list is read and written at once. Callers own the ordering of
/// the list.
pub trait BookingStore: Send + Sync {
    fn load(&self) -> Result<Vec<BookingRecord>, StoreError>;
    fn save(&self, records: &[BookingRecord]) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<BookingRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for MemoryStore {
    fn load(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.clone())
    }

    fn save(&self, records: &[BookingRecord]) -> Result<(), StoreError> {
        let mut stored = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        *stored = records.to_vec();
        Ok(())
    }
}

/// Stores the `bookings` collection as a JSON array in `<data_dir>/bookings.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: data_dir
                .as_ref()
                .join(format!("{BOOKINGS_COLLECTION}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BookingStore for JsonFileStore {
    fn load(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            // Nothing was booked yet
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(self.io_error(error)),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupted {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, records: &[BookingRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }
        let content = serde_json::to_string_pretty(records).map_err(|source| {
            StoreError::Corrupted {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, content).map_err(|error| self.io_error(error))?;
        tracing::debug!("Wrote {} bookings to {}", records.len(), self.path.display());
        Ok(())
    }
}
