//! Services module
//!
//! This module contains the backend client and the services built on it

pub mod api;
pub mod catalog;
pub mod registration;

// Re-export commonly used services
pub use api::ApiClient;
pub use catalog::CatalogService;
pub use registration::{RegistrationService, RegistrationOutcome};

use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub api: ApiClient,
    pub catalog_service: CatalogService,
    pub registration_service: RegistrationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing one HTTP client
    pub fn new(settings: &Settings) -> Result<Self> {
        let api = ApiClient::new(settings)?;
        let catalog_service = CatalogService::new(api.clone());
        let registration_service = RegistrationService::new(api.clone(), settings);

        Ok(Self {
            api,
            catalog_service,
            registration_service,
        })
    }
}
