//
//  codeship-rs
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Optional file-based defaults for [`CodeshipClient`](crate::CodeshipClient).
//! Everything here is a convenience layer over [`ClientBuilder`]: a client
//! can always be built without a configuration file.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/codeship/config.toml`
//! - **macOS**: `~/Library/Application Support/codeship/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\codeship\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! base_url = "https://api.codeship.com/v2"
//! username = "ci-bot@example.com"
//! organization = "my-org"
//! timeout_secs = 15
//! verbose = false
//!
//! [headers]
//! X-Request-Source = "deploy-scripts"
//! ```
//!
//! Passwords are never read from the file; they come from the caller or
//! `CODESHIP_PASSWORD`.
//!
//! ## Environment
//!
//! `CODESHIP_USERNAME` and `CODESHIP_ORGANIZATION` fill in values the file
//! leaves empty.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use codeship::config::Config;
//!
//! # async fn example() -> codeship::Result<()> {
//! let config = Config::load()?;
//! let organization = config.organization.clone().unwrap_or_default();
//! let credential = config.credential("")?;
//! let client = config.into_builder(credential)?.build()?;
//! let org = client.scope(&organization).await?;
//! # Ok(())
//! # }
//! ```

mod file;

pub use file::*;

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::ClientBuilder;
use crate::api::common::{ApiError, Result};
use crate::auth::{AuthCredential, USERNAME_ENV};

/// Environment variable consulted when no organization is configured.
pub const ORGANIZATION_ENV: &str = "CODESHIP_ORGANIZATION";

/// Client defaults loaded from `config.toml`.
///
/// All fields are optional; an empty file and a missing file both produce
/// [`Config::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Account username (usually an email address).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Organization name to scope to by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Dump requests and responses through `tracing`.
    #[serde(default)]
    pub verbose: bool,

    /// Extra headers sent with every API request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file is not an error; defaults are used. Environment
    /// fallbacks are applied either way.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, applying environment fallbacks.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if config_exists(path) {
            debug!(path = %path.display(), "Loading configuration");
            Self::from_toml_str(&read_config_file(path)?)?
        } else {
            Self::default()
        };
        Ok(config.with_env_fallback())
    }

    /// Parses a configuration document. No environment fallbacks are applied.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ApiError::Config(format!("invalid configuration: {}", e)))
    }

    /// Writes the configuration to `path` as TOML.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ApiError::Config(format!("unable to serialize configuration: {}", e)))?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "codeship")
            .ok_or_else(|| ApiError::Config("could not determine config directory".to_string()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Fills empty `username` and `organization` from the environment.
    pub fn with_env_fallback(mut self) -> Self {
        fill_from_env(&mut self.username, USERNAME_ENV);
        fill_from_env(&mut self.organization, ORGANIZATION_ENV);
        self
    }

    /// Builds Basic credentials from the configured username and `password`.
    ///
    /// Empty values fall back to `CODESHIP_USERNAME` / `CODESHIP_PASSWORD`.
    pub fn credential(&self, password: &str) -> Result<AuthCredential> {
        AuthCredential::basic_with_env_fallback(self.username.as_deref().unwrap_or_default(), password)
    }

    /// Converts the configuration into a [`ClientBuilder`] for `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if a configured header name or value is
    /// not a valid HTTP header.
    pub fn into_builder(self, credential: AuthCredential) -> Result<ClientBuilder> {
        let mut builder = ClientBuilder::new(credential).verbose(self.verbose);

        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::Config(format!("invalid header name '{}'", name)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::Config(format!("invalid value for header '{}'", name)))?;
            builder = builder.header(header_name, header_value);
        }

        Ok(builder)
    }
}

fn fill_from_env(value: &mut Option<String>, var: &str) {
    if value.as_deref().unwrap_or_default().is_empty() {
        *value = env::var(var).ok().filter(|v| !v.is_empty());
    }
}
