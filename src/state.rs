use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::BookingStore;
use crate::services::notify::NotificationDispatcher;
use crate::services::session::SessionGuard;

pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub config: AppConfig,
    pub sessions: SessionGuard,
    pub notifier: NotificationDispatcher,
}
