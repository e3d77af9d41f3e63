use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::{queries, BookingStore, StoreError, StoreResult, Transition};
use crate::models::{Booking, NewBooking, StatusChange};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::from_connection(super::init_db(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl BookingStore for SqliteStore {
    fn create(&self, booking: NewBooking) -> StoreResult<Booking> {
        let conn = self.lock()?;
        let id = queries::insert_booking(&conn, &booking)?;
        Ok(booking.into_booking(id))
    }

    fn get(&self, id: i64) -> StoreResult<Option<Booking>> {
        let conn = self.lock()?;
        queries::get_booking_by_id(&conn, id)
    }

    fn list(&self) -> StoreResult<Vec<Booking>> {
        let conn = self.lock()?;
        queries::get_all_bookings(&conn)
    }

    fn transition(&self, id: i64, change: &StatusChange) -> StoreResult<Transition> {
        // Update and re-read happen under one lock so no other writer can
        // slip in between.
        let conn = self.lock()?;
        let applied = queries::update_pending_booking(&conn, id, change)?;
        let outcome = match queries::get_booking_by_id(&conn, id)? {
            Some(booking) if applied => Transition::Applied(booking),
            Some(booking) => Transition::AlreadyFinal(booking),
            None => Transition::NotFound,
        };
        Ok(outcome)
    }
}
