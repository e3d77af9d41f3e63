use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::AdminSession;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Password is required")]
    MissingPassword,

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Too many login attempts, please try again later.")]
    RateLimited,

    #[error("No session token provided")]
    MissingToken,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session expired")]
    Expired,
}

pub trait SessionStore: Send + Sync {
    fn get(&self, token: &str) -> Option<AdminSession>;
    fn set(&self, session: AdminSession);
    fn delete(&self, token: &str) -> bool;
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, AdminSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AdminSession>> {
        // A panic mid-insert cannot leave a HashMap half-written.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, token: &str) -> Option<AdminSession> {
        self.lock().get(token).cloned()
    }

    fn set(&self, session: AdminSession) {
        self.lock().insert(session.token.clone(), session);
    }

    fn delete(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }
}

/// Caps login attempts per origin over a rolling window.
pub struct LoginRateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Records an attempt and reports whether it is within the limit.
    pub fn check(&self, origin: &str, now: DateTime<Utc>) -> bool {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let cutoff = now - self.window;

        attempts.retain(|_, times| {
            while times.front().is_some_and(|t| *t <= cutoff) {
                times.pop_front();
            }
            !times.is_empty()
        });

        let times = attempts.entry(origin.to_string()).or_default();
        if times.len() >= self.max_attempts {
            return false;
        }
        times.push_back(now);
        true
    }
}

/// Issues and checks admin bearer tokens.
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    password: String,
    limiter: LoginRateLimiter,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>, password: String, limiter: LoginRateLimiter) -> Self {
        if password.is_empty() {
            tracing::warn!("ADMIN_PASSWORD not set, admin login is disabled");
        }
        Self {
            store,
            password,
            limiter,
        }
    }

    pub fn login(
        &self,
        password: Option<&str>,
        origin: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, AuthError> {
        if !self.limiter.check(origin, now) {
            tracing::warn!(origin, "admin login rate limit exceeded");
            return Err(AuthError::RateLimited);
        }

        let password = password.filter(|p| !p.is_empty()).ok_or(AuthError::MissingPassword)?;
        if self.password.is_empty() || !constant_time_eq(password.as_bytes(), self.password.as_bytes()) {
            tracing::warn!(origin, "failed admin login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let session = AdminSession::issue(new_token(), now);
        self.store.set(session.clone());
        tracing::info!(origin, expires_at = %session.expires_at, "admin logged in");
        Ok(session)
    }

    /// Expired sessions are removed here rather than by a background sweep.
    pub fn verify(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<AdminSession, AuthError> {
        let token = token.filter(|t| !t.is_empty()).ok_or(AuthError::MissingToken)?;
        let session = self.store.get(token).ok_or(AuthError::InvalidToken)?;
        if session.is_expired(now) {
            self.store.delete(token);
            return Err(AuthError::Expired);
        }
        Ok(session)
    }

    pub fn logout(&self, token: Option<&str>) -> bool {
        let removed = token.map(|t| self.store.delete(t)).unwrap_or(false);
        if removed {
            tracing::info!("admin logged out");
        }
        removed
    }
}

fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 20, 12, 0, 0).unwrap()
    }

    fn guard(max: usize) -> SessionGuard {
        SessionGuard::new(
            Arc::new(MemorySessionStore::new()),
            "hunter2".to_string(),
            LoginRateLimiter::new(max, Duration::minutes(15)),
        )
    }

    #[test]
    fn test_login_issues_24h_token() {
        let guard = guard(5);
        let session = guard.login(Some("hunter2"), "1.2.3.4", t0()).unwrap();
        assert_eq!(session.token.len(), 64);
        assert!(session.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(session.expires_at - session.created_at, Duration::hours(24));
        assert_eq!(guard.verify(Some(&session.token), t0()).unwrap(), session);
    }

    #[test]
    fn test_tokens_are_unique() {
        let guard = guard(5);
        let a = guard.login(Some("hunter2"), "1.2.3.4", t0()).unwrap();
        let b = guard.login(Some("hunter2"), "1.2.3.4", t0()).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_wrong_or_missing_password() {
        let guard = guard(5);
        assert_eq!(
            guard.login(Some("hunter3"), "1.2.3.4", t0()),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(guard.login(None, "1.2.3.4", t0()), Err(AuthError::MissingPassword));
    }

    #[test]
    fn test_unset_password_disables_login() {
        let guard = SessionGuard::new(
            Arc::new(MemorySessionStore::new()),
            String::new(),
            LoginRateLimiter::new(5, Duration::minutes(15)),
        );
        assert_eq!(
            guard.login(Some("anything"), "1.2.3.4", t0()),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_expired_session_is_purged_on_verify() {
        let guard = guard(5);
        let session = guard.login(Some("hunter2"), "1.2.3.4", t0()).unwrap();
        let later = t0() + Duration::hours(24) + Duration::seconds(1);

        assert_eq!(guard.verify(Some(&session.token), later), Err(AuthError::Expired));
        assert_eq!(guard.verify(Some(&session.token), t0()), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_rejects_missing_and_unknown_tokens() {
        let guard = guard(5);
        assert_eq!(guard.verify(None, t0()), Err(AuthError::MissingToken));
        assert_eq!(guard.verify(Some(""), t0()), Err(AuthError::MissingToken));
        assert_eq!(guard.verify(Some("nope"), t0()), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let guard = guard(5);
        let session = guard.login(Some("hunter2"), "1.2.3.4", t0()).unwrap();
        assert!(guard.logout(Some(&session.token)));
        assert!(!guard.logout(Some(&session.token)));
        assert!(!guard.logout(None));
        assert_eq!(guard.verify(Some(&session.token), t0()), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_rate_limit_fails_fast_even_with_right_password() {
        let guard = guard(2);
        assert!(guard.login(Some("bad"), "1.2.3.4", t0()).is_err());
        assert!(guard.login(Some("bad"), "1.2.3.4", t0()).is_err());
        assert_eq!(
            guard.login(Some("hunter2"), "1.2.3.4", t0()),
            Err(AuthError::RateLimited)
        );
        // Other origins are unaffected.
        assert!(guard.login(Some("hunter2"), "5.6.7.8", t0()).is_ok());
    }

    #[test]
    fn test_rate_limit_window_rolls() {
        let limiter = LoginRateLimiter::new(2, Duration::minutes(15));
        assert!(limiter.check("a", t0()));
        assert!(limiter.check("a", t0() + Duration::minutes(5)));
        assert!(!limiter.check("a", t0() + Duration::minutes(10)));
        // First attempt has aged out.
        assert!(limiter.check("a", t0() + Duration::minutes(15) + Duration::seconds(1)));
        assert!(!limiter.check("a", t0() + Duration::minutes(16)));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
