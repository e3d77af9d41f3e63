use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{BookingStore, StoreError, StoreResult, Transition};
use crate::models::{Booking, NewBooking, StatusChange};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    bookings: Vec<Booking>,
    next_id: i64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            bookings: vec![],
            next_id: 1,
        }
    }
}

/// Bookings held in process memory, optionally mirrored to a JSON file after
/// every write.
pub struct MemoryStore {
    data: Mutex<Snapshot>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Snapshot::default()),
            path: None,
        }
    }

    pub fn with_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let raw = fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&raw)?;
            tracing::info!(count = snapshot.bookings.len(), "loaded bookings from data file");
            snapshot
        } else {
            Snapshot::default()
        };

        Ok(Self {
            data: Mutex::new(snapshot),
            path: Some(path),
        })
    }

    /// Writes `next` to disk (if file-backed) and only then makes it current,
    /// so a failed write leaves memory and disk in agreement.
    fn commit(&self, current: &mut Snapshot, next: Snapshot) -> StoreResult<()> {
        if let Some(path) = &self.path {
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, serde_json::to_vec_pretty(&next)?)?;
            fs::rename(&tmp, path)?;
        }
        *current = next;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore for MemoryStore {
    fn create(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = data.clone();
        let booking = booking.into_booking(next.next_id);
        next.next_id += 1;
        next.bookings.push(booking.clone());
        self.commit(&mut data, next)?;
        Ok(booking)
    }

    fn get(&self, id: i64) -> StoreResult<Option<Booking>> {
        let data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(data.bookings.iter().find(|b| b.id == id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<Booking>> {
        let data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(data.bookings.clone())
    }

    fn transition(&self, id: i64, change: &StatusChange) -> StoreResult<Transition> {
        let mut data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        let Some(index) = data.bookings.iter().position(|b| b.id == id) else {
            return Ok(Transition::NotFound);
        };
        if data.bookings[index].status.is_terminal() {
            return Ok(Transition::AlreadyFinal(data.bookings[index].clone()));
        }

        let mut next = data.clone();
        change.apply(&mut next.bookings[index]);
        let updated = next.bookings[index].clone();
        self.commit(&mut data, next)?;
        Ok(Transition::Applied(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::BookingStatus;

    fn new_booking(name: &str) -> NewBooking {
        NewBooking {
            name: name.to_string(),
            phone: "5551234567".to_string(),
            email: None,
            facility: "Marcy Correctional Facility".to_string(),
            visit_date: NaiveDate::from_ymd_opt(2025, 10, 4).unwrap(),
            pickup_location: "queens-jamaica".to_string(),
            guests: 1,
            notes: None,
            created_at: NaiveDate::from_ymd_opt(2025, 9, 30)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let store = MemoryStore::new();
        let a = store.create(new_booking("A")).unwrap();
        let b = store.create(new_booking("B")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_transition_is_compare_and_set() {
        let store = MemoryStore::new();
        let booking = store.create(new_booking("A")).unwrap();
        let reject = StatusChange::Reject {
            note: "Bus full".to_string(),
        };

        assert!(matches!(
            store.transition(booking.id, &reject).unwrap(),
            Transition::Applied(ref b) if b.status == BookingStatus::Rejected
        ));
        assert!(matches!(
            store.transition(booking.id, &reject).unwrap(),
            Transition::AlreadyFinal(_)
        ));
        assert_eq!(store.transition(99, &reject).unwrap(), Transition::NotFound);
    }

    #[test]
    fn test_file_backed_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");

        {
            let store = MemoryStore::with_file(&path).unwrap();
            store.create(new_booking("A")).unwrap();
            store.create(new_booking("B")).unwrap();
        }

        let reloaded = MemoryStore::with_file(&path).unwrap();
        let bookings = reloaded.list().unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[1].name, "B");

        let next = reloaded.create(new_booking("C")).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_corrupt_data_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            MemoryStore::with_file(&path),
            Err(StoreError::Json(_))
        ));
    }
}
