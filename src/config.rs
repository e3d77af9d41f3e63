use std::env;

const MAX_NOTIFY_TIMEOUT_SECS: u64 = 300;
const MAX_RATE_LIMIT_WINDOW_SECS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
    File,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" | "json" => StorageBackend::File,
            _ => StorageBackend::Sqlite,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub storage_backend: StorageBackend,
    pub data_file: String,
    pub admin_password: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub sendgrid_api_key: String,
    pub email_from: String,
    pub org_name: String,
    pub contact_phone: String,
    pub notify_timeout_secs: u64,
    pub login_rate_limit_max: usize,
    pub login_rate_limit_window_secs: i64,
    /// Take the client address from `X-Forwarded-For` instead of the socket
    /// peer. Only safe behind a proxy that overwrites the header.
    pub trust_proxy: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "ridebook.db".to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .map(|v| StorageBackend::parse(&v))
                .unwrap_or(StorageBackend::Sqlite),
            data_file: env::var("DATA_FILE").unwrap_or_else(|_| "bookings.json".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_default(),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            sendgrid_api_key: env::var("SENDGRID_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM").unwrap_or_default(),
            org_name: env::var("ORG_NAME").unwrap_or_else(|_| "WE Connect Families".to_string()),
            contact_phone: env::var("CONTACT_PHONE")
                .unwrap_or_else(|_| "(646) 226-2433".to_string()),
            notify_timeout_secs: env::var("NOTIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            login_rate_limit_max: env::var("LOGIN_RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            login_rate_limit_window_secs: env::var("LOGIN_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15 * 60),
            trust_proxy: env::var("TRUST_PROXY")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
        .clamped()
    }

    /// Pulls numeric settings back into ranges the runtime can use. A zero
    /// notification timeout would fail every send, and an oversized window
    /// overflows `chrono::Duration`.
    pub fn clamped(mut self) -> Self {
        let timeout = self.notify_timeout_secs.clamp(1, MAX_NOTIFY_TIMEOUT_SECS);
        if timeout != self.notify_timeout_secs {
            tracing::warn!(
                requested = self.notify_timeout_secs,
                using = timeout,
                "NOTIFY_TIMEOUT_SECS out of range"
            );
            self.notify_timeout_secs = timeout;
        }

        let window = self
            .login_rate_limit_window_secs
            .clamp(1, MAX_RATE_LIMIT_WINDOW_SECS);
        if window != self.login_rate_limit_window_secs {
            tracing::warn!(
                requested = self.login_rate_limit_window_secs,
                using = window,
                "LOGIN_RATE_LIMIT_WINDOW_SECS out of range"
            );
            self.login_rate_limit_window_secs = window;
        }

        if self.login_rate_limit_max == 0 {
            tracing::warn!("LOGIN_RATE_LIMIT_MAX is 0, using 1");
            self.login_rate_limit_max = 1;
        }
        self
    }

    /// Twilio account SIDs always start with "AC"; anything else is a placeholder.
    pub fn sms_enabled(&self) -> bool {
        self.twilio_account_sid.starts_with("AC")
            && !self.twilio_auth_token.is_empty()
            && !self.twilio_phone_number.is_empty()
    }

    pub fn email_enabled(&self) -> bool {
        !self.sendgrid_api_key.is_empty() && !self.email_from.is_empty()
    }
}
