pub mod booking;
pub mod notification;
pub mod pickup;
pub mod session;

pub use booking::{Booking, BookingRequest, BookingStatus, GuestCount, NewBooking, StatusChange};
pub use notification::{ChannelOutcome, NotificationReport, NotifyAction};
pub use pickup::{PickupLocationEntry, Region};
pub use session::AdminSession;
