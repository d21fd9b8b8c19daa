//! Wiring of services and stores shared by every screen.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::remote::{AuthService, HttpTransport, JourneyService, Transport, UserService};
use crate::storage::{CredentialStore, FileCredentialStore, FilePreferences, Preferences};

/// Services handed to screen reactors.
///
/// Cloning is cheap; clones share the transport, the stores and the journey
/// event channel.
#[derive(Clone)]
pub struct ServiceProvider {
    pub users: UserService,
    pub journeys: JourneyService,
    pub auth: AuthService,
    pub credentials: Arc<dyn CredentialStore>,
    pub preferences: Arc<dyn Preferences>,
}

impl ServiceProvider {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        preferences: Arc<dyn Preferences>,
    ) -> Self {
        Self {
            users: UserService::new(transport.clone(), preferences.clone()),
            journeys: JourneyService::new(transport.clone()),
            auth: AuthService::new(transport, credentials.clone()),
            credentials,
            preferences,
        }
    }

    /// File-backed stores in the configured data directory and an HTTP
    /// transport to the configured API.
    pub fn from_config(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        tracing::debug!(data_dir = %data_dir.display(), "Opening local stores");

        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::open(&data_dir)?);
        let preferences: Arc<dyn Preferences> = Arc::new(FilePreferences::open(&data_dir)?);
        let transport = Arc::new(HttpTransport::from_config(config, credentials.clone())?);

        Ok(Self::new(transport, credentials, preferences))
    }
}
