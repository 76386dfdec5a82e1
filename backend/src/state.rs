use crate::config::AppConfig;
use crate::db::Database;
use std::sync::Arc;

/// Shared application state, injected into every handler as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            db: Database::new(&config.database.path),
            config: Arc::new(config),
        }
    }
}
