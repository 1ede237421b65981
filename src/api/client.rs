use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::types::ApiError;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default client version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the User-Agent string
fn build_user_agent() -> String {
    std::env::var("PLATFORM_CONFIG_USER_AGENT")
        .unwrap_or_else(|_| format!("platform-config/{}", DEFAULT_VERSION))
}

/// HTTP client for the platform settings backend
pub struct ApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    user_agent: String,
    session_id: String,
}

impl ApiClient {
    /// Create a new API client for the given backend base URL
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let base_url = Self::normalize_base_url(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.is_empty()),
            user_agent: build_user_agent(),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parse the base URL and make sure relative endpoints join below it.
    fn normalize_base_url(base_url: &str) -> Result<Url> {
        let mut url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        if url.cannot_be_a_base() {
            anyhow::bail!("Invalid base URL: {}", base_url);
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn build_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .with_context(|| format!("Failed to build URL for endpoint: {}", endpoint))
    }

    pub(super) async fn get_api(&self, endpoint: &str) -> Result<reqwest::Response> {
        let url = self.build_url(endpoint)?;
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("URL: {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", &request_id)
            .header("x-request-session-id", &self.session_id);

        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))
    }

    /// GET an endpoint and decode its JSON body
    pub async fn get_json<R>(&self, endpoint: &str) -> Result<R>
    where
        R: for<'de> Deserialize<'de>,
    {
        let response = self.get_api(endpoint).await?;

        let status = response.status();
        debug!("=== API Response ===");
        debug!("Status: {}", status);

        if !status.is_success() {
            let request_id = response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let api_error = ApiError::from_http_response(status.as_u16(), error_text, request_id);
            error!("API request failed: {}", api_error);
            error!("   {}", api_error.user_hint());

            return Err(api_error.into());
        }

        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;
        serde_json::from_str(&response_text).context("Failed to parse API response")
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("session_id", &self.session_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent();
        assert!(ua.starts_with("platform-config/"));
    }

    #[test]
    fn test_build_url() {
        let client = ApiClient::new("https://settings.example.com", None, 5).unwrap();
        let url = client.build_url("api/v1/settings").unwrap();
        assert_eq!(url.as_str(), "https://settings.example.com/api/v1/settings");

        let client = ApiClient::new("https://example.com/platform", None, 5).unwrap();
        let url = client.build_url("api/v1/settings").unwrap();
        assert_eq!(url.as_str(), "https://example.com/platform/api/v1/settings");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url", None, 5).is_err());
        assert!(ApiClient::new("mailto:ops@example.com", None, 5).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = ApiClient::new(
            "https://settings.example.com",
            Some("secret-key-123".to_string()),
            5,
        )
        .unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret-key-123"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_api_key_is_dropped() {
        let client = ApiClient::new("https://settings.example.com", Some(String::new()), 5).unwrap();
        assert!(client.api_key.is_none());
    }
}
