//! Booking lifecycle: creation, review, and reporting.
//!
//! A booking is created `pending` and moves exactly once, to `confirmed` or
//! `rejected`. Both end states are final. The status change is committed
//! before any customer notification goes out, and a failed notification
//! never undoes it.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::db::{BookingStore, StoreError, Transition};
use crate::models::booking::DEFAULT_REJECTION_NOTE;
use crate::models::{
    Booking, BookingRequest, BookingStatus, NewBooking, NotificationReport, NotifyAction,
    StatusChange,
};
use crate::services::eligibility::{self, DateRejection};
use crate::services::notify::NotificationDispatcher;
use crate::services::pickup;

pub const REQUIRED_FIELDS: [&str; 5] = ["name", "phone", "facility", "visit_date", "pickup_location"];

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Missing required fields")]
    MissingFields { missing: Vec<&'static str> },

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Date(#[from] DateRejection),

    #[error("Booking not found")]
    NotFound(i64),

    #[error("Booking already {}", .status.as_str())]
    AlreadyInState { id: i64, status: BookingStatus },

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// A booking after a committed status change, with what the customer was told.
#[derive(Debug, Clone, Serialize)]
pub struct Reviewed {
    pub booking: Booking,
    pub notifications: NotificationReport,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub rejected: usize,
    #[serde(rename = "thisMonth")]
    pub this_month: usize,
    pub today: usize,
}

/// Checks a raw request and turns it into a storable booking. `now` is local
/// wall-clock time; its date is "today" for the past-date rule.
pub fn validate_request(req: BookingRequest, now: NaiveDateTime) -> Result<NewBooking, LifecycleError> {
    let name = non_blank(req.name);
    let phone = non_blank(req.phone);
    let facility = non_blank(req.facility);
    let visit_date = non_blank(req.visit_date);
    let pickup_location = non_blank(req.pickup_location);

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .zip([&name, &phone, &facility, &visit_date, &pickup_location])
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| *field)
        .collect();

    let (Some(name), Some(phone), Some(facility), Some(visit_date), Some(pickup_location)) =
        (name, phone, facility, visit_date, pickup_location)
    else {
        return Err(LifecycleError::MissingFields { missing });
    };

    if phone.chars().filter(|c| c.is_ascii_digit()).count() < 10 {
        return Err(LifecycleError::Invalid("Please enter a valid phone number".to_string()));
    }

    let email = non_blank(req.email);
    if let Some(email) = &email {
        if !looks_like_email(email) {
            return Err(LifecycleError::Invalid("Please enter a valid email address".to_string()));
        }
    }

    let visit_date = NaiveDate::parse_from_str(&visit_date, "%Y-%m-%d").map_err(|_| {
        LifecycleError::Invalid("Invalid visit date format, expected YYYY-MM-DD".to_string())
    })?;
    eligibility::check_visit_date(visit_date, now.date())?;

    if !pickup::pickup_options_for(&facility).is_empty()
        && pickup::find_pickup(&facility, &pickup_location).is_none()
    {
        return Err(LifecycleError::Invalid(format!(
            "Pickup location {pickup_location:?} is not available for {facility}"
        )));
    }

    let guests = match req.guests {
        None => 1,
        Some(count) => count.positive().ok_or_else(|| {
            LifecycleError::Invalid("Number of guests must be a positive whole number".to_string())
        })?,
    };

    Ok(NewBooking {
        name,
        phone,
        email,
        facility,
        visit_date,
        pickup_location,
        guests,
        notes: non_blank(req.notes),
        created_at: now,
    })
}

pub fn create_booking(
    store: &dyn BookingStore,
    req: BookingRequest,
    now: NaiveDateTime,
) -> Result<Booking, LifecycleError> {
    let new_booking = validate_request(req, now)?;
    let booking = store.create(new_booking)?;
    tracing::info!(
        booking_id = booking.id,
        facility = %booking.facility,
        visit_date = %booking.visit_date,
        "new booking created"
    );
    Ok(booking)
}

pub fn get_booking(store: &dyn BookingStore, id: i64) -> Result<Booking, LifecycleError> {
    store.get(id)?.ok_or(LifecycleError::NotFound(id))
}

pub async fn confirm_booking(
    store: &dyn BookingStore,
    notifier: &NotificationDispatcher,
    id: i64,
    now: NaiveDateTime,
) -> Result<Reviewed, LifecycleError> {
    let booking = apply(store, id, &StatusChange::Confirm { at: now })?;
    tracing::info!(booking_id = id, "booking confirmed");

    let notifications = notifier.notify(&booking, NotifyAction::Confirmed, None).await;
    Ok(Reviewed {
        booking,
        notifications,
    })
}

pub async fn reject_booking(
    store: &dyn BookingStore,
    notifier: &NotificationDispatcher,
    id: i64,
    reason: Option<&str>,
) -> Result<Reviewed, LifecycleError> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    let note = reason.unwrap_or(DEFAULT_REJECTION_NOTE).to_string();
    let booking = apply(store, id, &StatusChange::Reject { note })?;
    tracing::info!(booking_id = id, "booking rejected");

    let notifications = notifier.notify(&booking, NotifyAction::Rejected, reason).await;
    Ok(Reviewed {
        booking,
        notifications,
    })
}

fn apply(store: &dyn BookingStore, id: i64, change: &StatusChange) -> Result<Booking, LifecycleError> {
    match store.transition(id, change)? {
        Transition::Applied(booking) => Ok(booking),
        Transition::AlreadyFinal(booking) => Err(LifecycleError::AlreadyInState {
            id,
            status: booking.status,
        }),
        Transition::NotFound => Err(LifecycleError::NotFound(id)),
    }
}

/// Bookings in review order: pending, confirmed, rejected; soonest visit
/// first within a status, newest request first for the same visit date.
pub fn list_bookings(
    store: &dyn BookingStore,
    filter: Option<BookingStatus>,
) -> Result<Vec<Booking>, LifecycleError> {
    let mut bookings = store.list()?;
    if let Some(status) = filter {
        bookings.retain(|b| b.status == status);
    }
    sort_for_review(&mut bookings);
    Ok(bookings)
}

pub fn sort_for_review(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then(a.visit_date.cmp(&b.visit_date))
            .then(b.created_at.cmp(&a.created_at))
    });
}

pub fn compute_stats(bookings: &[Booking], today: NaiveDate) -> BookingStats {
    let mut stats = BookingStats {
        total: bookings.len(),
        ..BookingStats::default()
    };
    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => stats.pending += 1,
            BookingStatus::Confirmed => stats.confirmed += 1,
            BookingStatus::Rejected => stats.rejected += 1,
        }
        let created = booking.created_at.date();
        if created.year() == today.year() && created.month() == today.month() {
            stats.this_month += 1;
        }
        if created == today {
            stats.today += 1;
        }
    }
    stats
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
