// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the saltant client.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SdkError};

/// Environment variable holding the base API URL.
pub const API_URL_ENV: &str = "SALTANT_API_URL";
/// Environment variable holding the user's auth token.
pub const AUTH_TOKEN_ENV: &str = "SALTANT_AUTH_TOKEN";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "SALTANT_TIMEOUT_SECS";
/// Environment variable disabling the startup authentication check.
pub const SKIP_AUTH_CHECK_ENV: &str = "SALTANT_SKIP_AUTH_CHECK";

/// How long to wait for any single request to complete.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Configuration for the SaltantClient.
#[derive(Clone)]
pub struct SdkConfig {
    /// URL of the saltant API, e.g. `https://shahlabjobs.ca/api/`.
    pub base_api_url: String,
    /// The registered user's authentication token.
    pub auth_token: String,
    /// Request timeout applied to every call.
    pub request_timeout: Duration,
    /// Request an authenticated read-only endpoint when the client is built.
    pub test_if_authenticated: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_api_url: "http://localhost:8000/api/".to_string(),
            auth_token: String::new(),
            request_timeout: DEFAULT_TIMEOUT,
            test_if_authenticated: true,
        }
    }
}

// The token never ends up in logs.
impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("base_api_url", &self.base_api_url)
            .field("auth_token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("test_if_authenticated", &self.test_if_authenticated)
            .finish()
    }
}

impl SdkConfig {
    /// Create a configuration for the given server and token.
    pub fn new(base_api_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_api_url: base_api_url.into(),
            auth_token: auth_token.into(),
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SALTANT_API_URL`: URL of the saltant API (required)
    /// - `SALTANT_AUTH_TOKEN`: authentication token (required)
    /// - `SALTANT_TIMEOUT_SECS`: request timeout in seconds (default: 90)
    /// - `SALTANT_SKIP_AUTH_CHECK`: skip the startup auth check (default: "false")
    pub fn from_env() -> Result<Self> {
        let base_api_url = std::env::var(API_URL_ENV)
            .map_err(|_| SdkError::Config(format!("{} not defined", API_URL_ENV)))?;

        let auth_token = std::env::var(AUTH_TOKEN_ENV)
            .map_err(|_| SdkError::Config(format!("{} not defined", AUTH_TOKEN_ENV)))?;

        let request_timeout = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| SdkError::Config(format!("invalid {}: {}", TIMEOUT_ENV, e)))?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        let skip_auth_check = std::env::var(SKIP_AUTH_CHECK_ENV)
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            base_api_url,
            auth_token,
            request_timeout,
            test_if_authenticated: !skip_auth_check,
        })
    }

    /// Check that the values can be used to build a client.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_api_url.starts_with("http://") || self.base_api_url.starts_with("https://"))
        {
            return Err(SdkError::Config(format!(
                "base API URL must be http(s), got {:?}",
                self.base_api_url
            )));
        }
        if self.auth_token.trim().is_empty() {
            return Err(SdkError::Config("auth token is empty".to_string()));
        }
        Ok(())
    }

    /// Set the base API URL.
    pub fn with_base_api_url(mut self, url: impl Into<String>) -> Self {
        self.base_api_url = url.into();
        self
    }

    /// Set the authentication token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = token.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable the startup authentication check.
    pub fn with_test_if_authenticated(mut self, test: bool) -> Self {
        self.test_if_authenticated = test;
        self
    }
}
