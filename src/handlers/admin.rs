use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::bookings::parse_id;
use crate::models::{AdminSession, Booking, BookingStatus};
use crate::services::lifecycle::{self, BookingStats, Reviewed};
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

pub(crate) fn require_session(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, AppError> {
    Ok(state.sessions.verify(bearer_token(headers), Utc::now())?)
}

/// The socket peer, or the first `X-Forwarded-For` hop when the deployment
/// sits behind a trusted proxy.
fn client_origin(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let forwarded = trust_proxy
        .then(|| headers.get("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    success: bool,
    session_token: String,
    expires_at: DateTime<Utc>,
    message: &'static str,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let origin = client_origin(
        &headers,
        peer.map(|ConnectInfo(addr)| addr),
        state.config.trust_proxy,
    );
    let password = body.ok().and_then(|Json(req)| req.password);

    let session = state
        .sessions
        .login(password.as_deref(), &origin, Utc::now())?;

    Ok(Json(LoginResponse {
        success: true,
        session_token: session.token,
        expires_at: session.expires_at,
        message: "Login successful",
    }))
}

// POST /api/admin/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    state.sessions.logout(bearer_token(&headers));
    Json(serde_json::json!({ "success": true, "message": "Logged out successfully" }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
}

#[derive(Serialize, Default)]
pub struct Grouped {
    pending: Vec<Booking>,
    confirmed: Vec<Booking>,
    rejected: Vec<Booking>,
}

#[derive(Serialize)]
pub struct StatusCounts {
    pending: usize,
    confirmed: usize,
    rejected: usize,
}

#[derive(Serialize)]
pub struct BookingsResponse {
    success: bool,
    bookings: Vec<Booking>,
    grouped: Grouped,
    total: usize,
    counts: StatusCounts,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsResponse>, AppError> {
    require_session(&state, &headers)?;

    let filter = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => Some(BookingStatus::parse(raw).ok_or_else(|| {
            AppError::validation("Invalid status filter, expected pending, confirmed or rejected")
        })?),
    };

    let bookings = lifecycle::list_bookings(state.store.as_ref(), filter)?;

    let mut grouped = Grouped::default();
    for booking in &bookings {
        let bucket = match booking.status {
            BookingStatus::Pending => &mut grouped.pending,
            BookingStatus::Confirmed => &mut grouped.confirmed,
            BookingStatus::Rejected => &mut grouped.rejected,
        };
        bucket.push(booking.clone());
    }
    let counts = StatusCounts {
        pending: grouped.pending.len(),
        confirmed: grouped.confirmed.len(),
        rejected: grouped.rejected.len(),
    };

    Ok(Json(BookingsResponse {
        success: true,
        total: bookings.len(),
        bookings,
        grouped,
        counts,
    }))
}

#[derive(Serialize)]
pub struct ReviewResponse {
    success: bool,
    message: &'static str,
    #[serde(flatten)]
    reviewed: Reviewed,
}

// POST /api/admin/bookings/:id/confirm
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ReviewResponse>, AppError> {
    require_session(&state, &headers)?;
    let id = parse_id(&id)?;

    let reviewed = lifecycle::confirm_booking(
        state.store.as_ref(),
        &state.notifier,
        id,
        Local::now().naive_local(),
    )
    .await?;

    Ok(Json(ReviewResponse {
        success: true,
        message: "Booking confirmed successfully",
        reviewed,
    }))
}

// POST /api/admin/bookings/:id/reject
#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// An empty body means "no reason". Anything else must parse, so a garbled
/// reason never turns into the default note.
fn parse_reject_body(body: &[u8]) -> Result<Option<String>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let req: RejectRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "unreadable reject request");
        AppError::validation("Invalid reject request body, expected {\"reason\": \"...\"}")
    })?;
    Ok(req.reason)
}

pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ReviewResponse>, AppError> {
    require_session(&state, &headers)?;
    let id = parse_id(&id)?;
    let reason = parse_reject_body(&body)?;

    let reviewed = lifecycle::reject_booking(
        state.store.as_ref(),
        &state.notifier,
        id,
        reason.as_deref(),
    )
    .await?;

    Ok(Json(ReviewResponse {
        success: true,
        message: "Booking rejected",
        reviewed,
    }))
}

// GET /api/admin/stats
#[derive(Serialize)]
pub struct StatsResponse {
    success: bool,
    stats: BookingStats,
    timestamp: DateTime<Utc>,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    require_session(&state, &headers)?;

    let bookings = state.store.list()?;
    let stats = lifecycle::compute_stats(&bookings, Local::now().date_naive());

    Ok(Json(StatsResponse {
        success: true,
        stats,
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_origin_uses_forwarded_hop_only_behind_trusted_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(client_origin(&headers, Some(peer), true), "203.0.113.9");
        assert_eq!(client_origin(&headers, Some(peer), false), "127.0.0.1");
        assert_eq!(client_origin(&headers, None, false), "unknown");
    }

    #[test]
    fn test_origin_falls_back_to_peer_then_unknown() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(client_origin(&headers, Some(peer), true), "127.0.0.1");
        assert_eq!(client_origin(&headers, None, true), "unknown");
    }

    #[test]
    fn test_reject_body_parsing() {
        assert_eq!(parse_reject_body(b"").unwrap(), None);
        assert_eq!(parse_reject_body(b"  \n").unwrap(), None);
        assert_eq!(parse_reject_body(b"{}").unwrap(), None);
        assert_eq!(
            parse_reject_body(br#"{"reason":"Bus is full"}"#).unwrap().as_deref(),
            Some("Bus is full")
        );
        assert!(parse_reject_body(br#"{"reason":"Bus is"#).is_err());
        assert!(parse_reject_body(br#"{"reason":42}"#).is_err());
        assert!(parse_reject_body(b"Bus is full").is_err());
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);
    }
}
