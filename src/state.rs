use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::BookingError;

pub struct AppState {
    /// Single writer for the booking store; see `services::booking`.
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
        }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, BookingError> {
        self.db
            .lock()
            .map_err(|_| BookingError::StoreUnavailable("database lock poisoned".to_string()))
    }
}
