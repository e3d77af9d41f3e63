//! Message text for booking notifications, kept apart from delivery so the
//! wording can be tested without any transport.

use chrono::NaiveDate;

use crate::models::{Booking, NotifyAction};

#[derive(Debug, Clone)]
pub struct Branding {
    pub org_name: String,
    pub contact_phone: String,
}

/// "Saturday, September 27, 2025"
pub fn format_visit_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn sms_body(booking: &Booking, action: NotifyAction, reason: Option<&str>, brand: &Branding) -> String {
    let visit_date = format_visit_date(booking.visit_date);
    match action {
        NotifyAction::Confirmed => format!(
            "BOOKING CONFIRMED - {org}\n\n\
             Your transportation to {facility} on {visit_date} has been CONFIRMED!\n\n\
             Pickup: {pickup}\n\
             Guests: {guests}\n\n\
             Questions? Call {phone}\n\
             Thank you for choosing {org}!",
            org = brand.org_name,
            facility = booking.facility,
            pickup = booking.pickup_location,
            guests = booking.guests,
            phone = brand.contact_phone,
        ),
        NotifyAction::Rejected => {
            let reason_line = reason
                .map(|r| format!("Reason: {r}\n\n"))
                .unwrap_or_default();
            format!(
                "BOOKING UPDATE - {org}\n\n\
                 Unfortunately, your transportation booking for {facility} on {visit_date} could not be confirmed.\n\n\
                 Pickup: {pickup}\n\
                 Guests: {guests}\n\n\
                 {reason_line}\
                 Please call {phone} to discuss alternatives or reschedule.\n\n\
                 Thank you for understanding.",
                org = brand.org_name,
                facility = booking.facility,
                pickup = booking.pickup_location,
                guests = booking.guests,
                phone = brand.contact_phone,
            )
        }
    }
}

pub fn email_subject(booking: &Booking, action: NotifyAction) -> String {
    let visit_date = format_visit_date(booking.visit_date);
    match action {
        NotifyAction::Confirmed => format!("Booking Confirmed - {} on {visit_date}", booking.facility),
        NotifyAction::Rejected => format!("Booking Update - {} on {visit_date}", booking.facility),
    }
}

pub fn email_html(booking: &Booking, action: NotifyAction, reason: Option<&str>, brand: &Branding) -> String {
    let name = escape_html(&booking.name);
    let facility = escape_html(&booking.facility);
    let pickup = escape_html(&booking.pickup_location);
    let visit_date = format_visit_date(booking.visit_date);
    let org = escape_html(&brand.org_name);
    let phone = escape_html(&brand.contact_phone);

    let (headline, intro, extra) = match action {
        NotifyAction::Confirmed => (
            "Booking Confirmed!",
            "Great news! Your transportation booking has been <strong>CONFIRMED</strong>.".to_string(),
            format!(
                "<li><strong>Number of Guests:</strong> {}</li></ul>\
                 <p><strong>Important:</strong> Please arrive 15 minutes early at your pickup location.</p>\
                 <p>Questions or need to make changes? Call us at <strong>{phone}</strong></p>",
                booking.guests
            ),
        ),
        NotifyAction::Rejected => (
            "Booking Update",
            "We regret to inform you that your transportation booking could not be confirmed at this time.".to_string(),
            format!(
                "<li><strong>Number of Guests:</strong> {}</li></ul>{}\
                 <p>Please call us at <strong>{phone}</strong> to discuss alternative dates, \
                 explore other pickup options, or join our waitlist for cancellations.</p>",
                booking.guests,
                reason
                    .map(|r| format!("<p><strong>Reason:</strong> {}</p>", escape_html(r)))
                    .unwrap_or_default()
            ),
        ),
    };

    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h1>{headline}</h1><p>{org} Transportation</p>\
         <h2>Hello {name},</h2><p>{intro}</p>\
         <h3>Booking Details:</h3><ul>\
         <li><strong>Facility:</strong> {facility}</li>\
         <li><strong>Date:</strong> {visit_date}</li>\
         <li><strong>Pickup Location:</strong> {pickup}</li>\
         {extra}\
         <p><strong>{org}</strong><br>{phone}</p>\
         </div>"
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
