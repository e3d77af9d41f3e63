use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REJECTION_NOTE: &str = "Booking rejected by admin";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub facility: String,
    pub visit_date: NaiveDate,
    pub pickup_location: String,
    pub guests: u32,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub confirmed_at: Option<NaiveDateTime>,
}

/// Raw create-booking input as submitted by the booking form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub facility: Option<String>,
    pub visit_date: Option<String>,
    pub pickup_location: Option<String>,
    #[serde(alias = "visitors")]
    pub guests: Option<GuestCount>,
    pub notes: Option<String>,
}

/// Forms post the guest count as text, API clients as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GuestCount {
    Number(i64),
    Text(String),
}

impl GuestCount {
    pub fn positive(&self) -> Option<u32> {
        let n = match self {
            GuestCount::Number(n) => *n,
            GuestCount::Text(s) => s.trim().parse().ok()?,
        };
        u32::try_from(n).ok().filter(|n| *n > 0)
    }
}

/// A validated booking that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub facility: String,
    pub visit_date: NaiveDate,
    pub pickup_location: String,
    pub guests: u32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewBooking {
    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            facility: self.facility,
            visit_date: self.visit_date,
            pickup_location: self.pickup_location,
            guests: self.guests,
            status: BookingStatus::Pending,
            notes: self.notes,
            created_at: self.created_at,
            confirmed_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// Review order for the admin list: actionable items first.
    pub fn rank(&self) -> u8 {
        match self {
            BookingStatus::Pending => 0,
            BookingStatus::Confirmed => 1,
            BookingStatus::Rejected => 2,
        }
    }
}

/// The only two transitions a booking can take, both out of `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    Confirm { at: NaiveDateTime },
    Reject { note: String },
}

impl StatusChange {
    pub fn target(&self) -> BookingStatus {
        match self {
            StatusChange::Confirm { .. } => BookingStatus::Confirmed,
            StatusChange::Reject { .. } => BookingStatus::Rejected,
        }
    }

    pub fn apply(&self, booking: &mut Booking) {
        booking.status = self.target();
        match self {
            StatusChange::Confirm { at } => booking.confirmed_at = Some(*at),
            StatusChange::Reject { note } => booking.notes = Some(note.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Booking {
        NewBooking {
            name: "Sarah Johnson".to_string(),
            phone: "5551234567".to_string(),
            email: None,
            facility: "Clinton Correctional Facility".to_string(),
            visit_date: NaiveDate::from_ymd_opt(2025, 9, 27).unwrap(),
            pickup_location: "bronx-yankee".to_string(),
            guests: 2,
            notes: None,
            created_at: NaiveDate::from_ymd_opt(2025, 9, 20)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
        .into_booking(1)
    }

    #[test]
    fn test_new_booking_starts_pending() {
        let booking = sample();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.confirmed_at.is_none());
    }

    #[test]
    fn test_status_round_trip_and_unknown() {
        for status in BookingStatus::ALL {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_confirm_sets_confirmed_at() {
        let mut booking = sample();
        let at = booking.created_at + chrono::Duration::hours(1);
        StatusChange::Confirm { at }.apply(&mut booking);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.confirmed_at, Some(at));
    }

    #[test]
    fn test_reject_sets_note_only() {
        let mut booking = sample();
        StatusChange::Reject {
            note: "No space available".to_string(),
        }
        .apply(&mut booking);
        assert_eq!(booking.status, BookingStatus::Rejected);
        assert_eq!(booking.notes.as_deref(), Some("No space available"));
        assert!(booking.confirmed_at.is_none());
    }

    #[test]
    fn test_request_accepts_visitors_alias() {
        let req: BookingRequest =
            serde_json::from_str(r#"{"name":"A","visitors":"3"}"#).unwrap();
        assert_eq!(req.guests, Some(GuestCount::Text("3".to_string())));
        assert_eq!(req.guests.unwrap().positive(), Some(3));
    }

    #[test]
    fn test_guest_count_must_be_positive() {
        assert_eq!(GuestCount::Number(2).positive(), Some(2));
        assert_eq!(GuestCount::Number(0).positive(), None);
        assert_eq!(GuestCount::Number(-1).positive(), None);
        assert_eq!(GuestCount::Text("two".to_string()).positive(), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "confirmed");
    }
}
