//! Platform settings endpoint.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use crate::platform::{SettingsResponse, SettingsSource};

/// Settings endpoint, relative to the backend base URL
pub const SETTINGS_ENDPOINT: &str = "api/v1/settings";

impl ApiClient {
    /// Fetch the platform settings payload.
    pub async fn get_settings(&self) -> Result<SettingsResponse> {
        let response: SettingsResponse = self.get_json(SETTINGS_ENDPOINT).await?;
        debug!("Received {} platform settings", response.data.len());
        Ok(response)
    }
}

#[async_trait]
impl SettingsSource for ApiClient {
    async fn get_settings(&self) -> Result<SettingsResponse> {
        ApiClient::get_settings(self).await
    }
}
