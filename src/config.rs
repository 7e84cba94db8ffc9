//! Plugin runtime configuration.
//!
//! The host provisions every installed plugin with a `ucrm.json` file in the
//! plugin's root directory. It names the host URLs and the app key the plugin
//! must present on every API call.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{CrmError, Result};

/// File name of the host-provisioned plugin configuration.
pub const PLUGIN_CONFIG_FILE: &str = "ucrm.json";

/// API prefix appended to the host URL.
pub const API_PREFIX: &str = "api/v1.0/";

/// Configuration provided by the host to an installed plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Public URL of the host, as seen by browsers.
    #[serde(default)]
    pub ucrm_public_url: Option<String>,

    /// URL the plugin should use to reach the host from the same machine.
    #[serde(default)]
    pub ucrm_local_url: Option<String>,

    /// App key issued to this plugin.
    #[serde(default)]
    pub plugin_app_key: Option<String>,

    /// Public URL of the plugin's own page.
    #[serde(default)]
    pub plugin_public_url: Option<String>,

    /// Numeric plugin ID on the host.
    #[serde(default)]
    pub plugin_id: Option<i64>,
}

impl PluginConfig {
    /// Parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Load `ucrm.json` from a plugin root directory.
    pub fn from_plugin_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_file(dir.as_ref().join(PLUGIN_CONFIG_FILE))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// App key, required for any API call.
    pub fn app_key(&self) -> Result<&str> {
        self.plugin_app_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CrmError::ConfigMissing("pluginAppKey is not set".to_string()))
    }

    /// Base URL of the REST API.
    ///
    /// Prefers the local URL and falls back to the public one.
    pub fn api_url(&self) -> Result<Url> {
        let host = self
            .ucrm_local_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.ucrm_public_url.as_deref().filter(|u| !u.is_empty()))
            .ok_or_else(|| {
                CrmError::ConfigMissing("neither ucrmLocalUrl nor ucrmPublicUrl is set".to_string())
            })?;

        let host = if host.ends_with('/') {
            host.to_string()
        } else {
            format!("{host}/")
        };

        Ok(Url::parse(&host)?.join(API_PREFIX)?)
    }
}
