use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreError, StoreResult};
use crate::models::{Booking, BookingStatus, NewBooking, StatusChange};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

const BOOKING_COLUMNS: &str = "id, name, phone, email, facility, visit_date, pickup_location, guests, status, notes, created_at, confirmed_at";

pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO bookings (name, phone, email, facility, visit_date, pickup_location, guests, status, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.name,
            booking.phone,
            booking.email,
            booking.facility,
            booking.visit_date.format(DATE_FORMAT).to_string(),
            booking.pickup_location,
            booking.guests,
            BookingStatus::Pending.as_str(),
            booking.notes,
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> StoreResult<Option<Booking>> {
    let row = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;

    row.transpose()
}

pub fn get_all_bookings(conn: &Connection) -> StoreResult<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id ASC"))?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Returns true when the row was still pending and has been updated.
pub fn update_pending_booking(conn: &Connection, id: i64, change: &StatusChange) -> StoreResult<bool> {
    let count = match change {
        StatusChange::Confirm { at } => conn.execute(
            "UPDATE bookings SET status = ?1, confirmed_at = ?2 WHERE id = ?3 AND status = 'pending'",
            params![
                change.target().as_str(),
                at.format(TIMESTAMP_FORMAT).to_string(),
                id
            ],
        )?,
        StatusChange::Reject { note } => conn.execute(
            "UPDATE bookings SET status = ?1, notes = ?2 WHERE id = ?3 AND status = 'pending'",
            params![change.target().as_str(), note, id],
        )?,
    };
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> StoreResult<Booking> {
    let id: i64 = row.get(0)?;
    let visit_date_str: String = row.get(5)?;
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(10)?;
    let confirmed_at_str: Option<String> = row.get(11)?;

    let corrupt = |reason: String| StoreError::Corrupt { id, reason };

    let visit_date = NaiveDate::parse_from_str(&visit_date_str, DATE_FORMAT)
        .map_err(|e| corrupt(format!("visit_date {visit_date_str:?}: {e}")))?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| corrupt(format!("unknown status {status_str:?}")))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| corrupt(format!("created_at {created_at_str:?}: {e}")))?;
    let confirmed_at = confirmed_at_str
        .map(|s| {
            NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
                .map_err(|e| corrupt(format!("confirmed_at {s:?}: {e}")))
        })
        .transpose()?;

    Ok(Booking {
        id,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        facility: row.get(4)?,
        visit_date,
        pickup_location: row.get(6)?,
        guests: row.get(7)?,
        status,
        notes: row.get(9)?,
        created_at,
        confirmed_at,
    })
}
