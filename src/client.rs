//! CRM API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Entity operations are implemented via traits on model types and only
//! see this client through the [`Transport`] trait.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

use crate::config::PluginConfig;
use crate::error::{CrmError, Result};
use crate::transport::{ApiRequest, Transport};

const DEFAULT_API_URL: &str = "http://localhost/api/v1.0";
const USER_AGENT: &str = concat!("crm-plugin-sdk/", env!("CARGO_PKG_VERSION"));

/// Header carrying the plugin's app key.
pub const APP_KEY_HEADER: &str = "X-Auth-App-Key";

/// Low-level CRM API client.
///
/// Handles authentication and HTTP requests. The client is immutable after
/// construction; anything that varies per call (query, body, relayed
/// cookies) is carried by the [`ApiRequest`].
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use crm_plugin_sdk::CrmClient;
///
/// # fn example() -> crm_plugin_sdk::Result<()> {
/// // Create from environment variables
/// let client = CrmClient::from_env()?;
///
/// // Or configure manually
/// let client = CrmClient::new("app-key", "https://crm.example.com/api/v1.0")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CrmClient {
    http: Client,
    base_url: Arc<Url>,
    app_key: String,
}

impl std::fmt::Debug for CrmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CrmClient {
    /// Create a client from environment variables.
    ///
    /// Uses `CRM_APP_KEY` for authentication and optionally `CRM_API_URL`
    /// for the base URL (defaults to `http://localhost/api/v1.0`).
    ///
    /// # Errors
    ///
    /// Returns an error if `CRM_APP_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let app_key = env::var("CRM_APP_KEY").map_err(|_| {
            CrmError::ConfigMissing("CRM_APP_KEY environment variable not set".to_string())
        })?;

        let base_url = env::var("CRM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&app_key, &base_url)
    }

    /// Create a client from the host-provisioned plugin configuration.
    pub fn from_config(config: &PluginConfig) -> Result<Self> {
        let api_url = config.api_url()?;
        Self::new(config.app_key()?, api_url.as_str())
    }

    /// Create a new client with the provided app key and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(app_key: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(CrmError::Transport)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            app_key: app_key.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP {status}"));

        Err(CrmError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Decode a successful response; an empty body is JSON `null`.
    async fn decode(response: Response) -> Result<Value> {
        let bytes = response.bytes().await.map_err(CrmError::Transport)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for CrmClient {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.base_url.join(&request.path)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(APP_KEY_HEADER, &self.app_key);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(cookie) = request.cookie_header() {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(CrmError::Transport)?;
        let response = Self::check_response(response).await?;
        let value = Self::decode(response).await?;

        tracing::debug!("request completed");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = CrmClient::new("test-key", "https://crm.example.com/api/v1.0").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("CrmClient"));
        assert!(debug.contains("base_url"));
        // App key should not be in debug output
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = CrmClient::new("key", "https://crm.example.com/api/v1.0").unwrap();
        let client2 = CrmClient::new("key", "https://crm.example.com/api/v1.0/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_from_config() {
        let config = PluginConfig::from_json(
            r#"{"ucrmLocalUrl": "http://localhost:8080", "pluginAppKey": "k"}"#,
        )
        .unwrap();
        let client = CrmClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/v1.0/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = CrmClient::new("key", "not a url");
        assert!(matches!(result, Err(CrmError::Url(_))));
    }
}
