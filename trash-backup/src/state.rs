use crate::config::AppConfig;
use crate::services::seen_set::SeenSet;
use crate::ws::hub::NotificationHub;
use crate::ws::observer::WsObserver;
use std::sync::Arc;

/// State shared by the HTTP handlers and the trash watcher.
pub struct AppState {
    pub config: AppConfig,
    pub seen: Arc<SeenSet>,
    pub hub: Arc<NotificationHub<WsObserver>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let send_timeout = config.observer_send_timeout();
        Self {
            config,
            seen: Arc::new(SeenSet::new()),
            hub: Arc::new(NotificationHub::new(send_timeout)),
        }
    }
}
