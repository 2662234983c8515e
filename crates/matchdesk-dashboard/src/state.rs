//! Application state shared by every page and dialog

use matchdesk_core::Config;
use matchdesk_services::{AdminService, HttpAdminService, MockAdminService};
use std::sync::Arc;

/// Application state holding configuration and the admin backend
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Admin backend every page talks to
    pub service: Arc<dyn AdminService>,
}

impl AppState {
    /// Create state backed by the HTTP admin API named in `config`
    pub fn new(config: Config) -> crate::Result<Self> {
        let service = HttpAdminService::new(&config.service)?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    /// Create state backed by the in-memory sample data set
    pub fn offline(config: Config) -> Self {
        Self::with_service(config, Arc::new(MockAdminService::with_sample_data()))
    }

    /// Create state around an existing backend
    pub fn with_service(config: Config, service: Arc<dyn AdminService>) -> Self {
        Self {
            config: Arc::new(config),
            service,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("service", &self.service.name())
            .finish()
    }
}
