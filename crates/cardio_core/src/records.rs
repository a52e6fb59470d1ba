//! Record store adapter for vitals readings.
//!
//! Production code uses `FileRecordStore` over the JSON substrate. Tests
//! substitute deterministic fakes through the `RecordStore` trait.

use crate::error::StoreError;
use crate::storage::{JsonStore, RECORDS_KEY};
use crate::types::{NewReading, VitalsReading};
use uuid::Uuid;

/// Append/query boundary for persisted vitals readings.
pub trait RecordStore: Send + Sync {
    /// Assign a fresh id, append, and persist. Returns the full record.
    /// A persistence failure is a loud error, never a dropped write.
    fn add_record(&self, reading: NewReading) -> Result<VitalsReading, StoreError>;

    /// All readings for one user, most recent first. Empty when the user
    /// has no records.
    fn records_for(&self, user_id: &Uuid) -> Result<Vec<VitalsReading>, StoreError>;
}

/// Record store backed by a single JSON collection file.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    store: JsonStore,
}

impl FileRecordStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }
}

impl RecordStore for FileRecordStore {
    fn add_record(&self, reading: NewReading) -> Result<VitalsReading, StoreError> {
        let mut all: Vec<VitalsReading> = self.store.load(RECORDS_KEY)?;

        let record = VitalsReading {
            id: Uuid::new_v4(),
            user_id: reading.user_id,
            age: reading.age,
            gender: reading.gender,
            heart_rate: reading.heart_rate,
            systolic_bp: reading.systolic_bp,
            diastolic_bp: reading.diastolic_bp,
            timestamp: reading.timestamp,
        };

        all.push(record.clone());
        self.store.save(RECORDS_KEY, &all)?;
        Ok(record)
    }

    fn records_for(&self, user_id: &Uuid) -> Result<Vec<VitalsReading>, StoreError> {
        let all: Vec<VitalsReading> = self.store.load(RECORDS_KEY)?;
        let mut mine: Vec<VitalsReading> =
            all.into_iter().filter(|r| &r.user_id == user_id).collect();
        mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(mine)
    }
}
