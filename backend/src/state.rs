use crate::bulk_sms::DispatchSettings;
use crate::config::AppConfig;
use crate::db;
use crate::error::ApiError;
use crate::gateway::SmsGateway;
use log::error;
use rusqlite::Connection;
use std::sync::Arc;

/// Shared application state, created once in `main` and injected as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn SmsGateway>,
}

impl AppState {
    pub fn new(config: AppConfig, gateway: Arc<dyn SmsGateway>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }

    /// Opens a fresh connection for the current request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        db::open(&self.config.database_path).map_err(|e| {
            error!("Failed to open database {}: {}", self.config.database_path, e);
            ApiError::Database(e)
        })
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            ack_base_url: self.config.ack_base_url.clone(),
            from_number: self.config.sms.from_number.clone(),
            contact_line: self.config.contact_line.clone(),
        }
    }
}
