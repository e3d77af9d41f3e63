use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::errors::AppError;
use crate::handlers::admin::require_session;
use crate::models::{Booking, BookingRequest, BookingStatus};
use crate::services::lifecycle;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    success: bool,
    booking_id: i64,
    message: &'static str,
    booking: BookingSummary,
}

#[derive(Serialize)]
pub struct BookingSummary {
    id: i64,
    name: String,
    phone: String,
    facility: String,
    visit_date: NaiveDate,
    status: BookingStatus,
}

impl From<Booking> for BookingSummary {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            name: b.name,
            phone: b.phone,
            facility: b.facility,
            visit_date: b.visit_date,
            status: b.status,
        }
    }
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(req) = body.map_err(|e| {
        tracing::warn!(error = %e, "unreadable booking request");
        AppError::validation("Invalid booking request body")
    })?;

    let booking = lifecycle::create_booking(state.store.as_ref(), req, Local::now().naive_local())?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            booking_id: booking.id,
            message: "Booking request submitted successfully. We will contact you to confirm your ride.",
            booking: booking.into(),
        }),
    ))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_session(&state, &headers)?;

    let id = parse_id(&id)?;
    let booking = lifecycle::get_booking(state.store.as_ref(), id)?;
    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}

/// Non-numeric ids cannot name a booking, so they read as not found.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Booking not found".to_string()))
}
