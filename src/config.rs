//! Configuration Management
//!
//! Org and credential settings, read from a JSON file and overridden by
//! `OKTA_*` environment variables and then by command-line flags.

use crate::error::{Error, Result};
use crate::okta::Authorization;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Domain appended to `org_name` when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "okta.com";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Org subdomain, e.g. `dev-123456`
    #[serde(default)]
    pub org_name: Option<String>,
    /// Okta domain, e.g. `okta.com` or `oktapreview.com`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Full org URL; takes precedence over `org_name` and `base_url`
    #[serde(default)]
    pub org_url: Option<String>,
    /// API token (SSWS)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// OAuth 2.0 access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("okta-lookup").join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Self {
        let config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Load configuration from a file; missing or unreadable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Apply `OKTA_*` variables looked up through `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(v) = get("OKTA_ORG_NAME") {
            self.org_name = Some(v);
        }
        if let Some(v) = get("OKTA_BASE_URL") {
            self.base_url = Some(v);
        }
        if let Some(v) = get("OKTA_ORG_URL") {
            self.org_url = Some(v);
        }
        if let Some(v) = get("OKTA_API_TOKEN") {
            self.api_token = Some(v);
        }
        if let Some(v) = get("OKTA_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        self
    }

    /// Save configuration to disk, without credentials
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let persisted = Config {
            api_token: None,
            access_token: None,
            ..self.clone()
        };
        let content = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Org URL (org_url > https://org_name.base_url)
    pub fn effective_org_url(&self) -> Result<Url> {
        if let Some(org_url) = self.org_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(Url::parse(org_url)?);
        }

        let Some(org_name) = self.org_name.as_deref().filter(|o| !o.is_empty()) else {
            return Err(Error::config(
                "no Okta org configured. Set OKTA_ORG_NAME or OKTA_ORG_URL",
            ));
        };
        let base_url = self
            .base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Ok(Url::parse(&format!("https://{}.{}", org_name, base_url))?)
    }

    /// Credentials (API token > access token)
    pub fn authorization(&self) -> Result<Authorization> {
        if let Some(token) = self.api_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Authorization::ApiToken(token.to_string()));
        }
        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Authorization::AccessToken(token.to_string()));
        }
        Err(Error::config(
            "no credentials configured. Set OKTA_API_TOKEN or OKTA_ACCESS_TOKEN",
        ))
    }
}
