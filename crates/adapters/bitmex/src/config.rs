// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Configuration for the BitMEX REST client.

use std::{fmt::Debug, time::Duration};

use bitmex_rest_core::env::{get_env_flag, get_env_var, get_or_env_var_opt};
use bitmex_rest_network::retry::RetryPolicy;
use serde::Deserialize;

use crate::{
    common::consts::{
        BITMEX_DEFAULT_SYMBOL, BITMEX_HTTP_TESTNET_URL, BITMEX_HTTP_URL,
        DEFAULT_EXPIRES_OFFSET_SECS, DEFAULT_ORDER_ID_PREFIX, DEFAULT_TIMEOUT_SECS,
        MAX_ORDER_ID_PREFIX_LEN,
    },
    error::BitmexConfigError,
};

pub const ENV_API_KEY: &str = "BITMEX_API_KEY";
pub const ENV_API_SECRET: &str = "BITMEX_API_SECRET";
pub const ENV_BASE_URL: &str = "BITMEX_BASE_URL";
pub const ENV_TESTNET: &str = "BITMEX_TESTNET";
pub const ENV_SYMBOL: &str = "BITMEX_SYMBOL";

/// Configuration for the BitMEX HTTP client.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct BitmexHttpConfig {
    /// Override for the REST base URL, including the API path (e.g. `/api/v1`).
    pub base_url: Option<String>,
    /// When true the client will use the BitMEX testnet endpoints.
    pub testnet: bool,
    /// The default symbol for symbol scoped requests.
    pub symbol: String,
    /// The public API key.
    pub api_key: Option<String>,
    /// The API secret.
    pub api_secret: Option<String>,
    /// Prefix prepended to generated client order ids.
    pub order_id_prefix: String,
    /// Per-attempt timeout in seconds (connect and read).
    pub timeout_secs: u64,
    /// Seconds a signature stays valid for.
    pub expires_offset_secs: i64,
    /// Retry budget for reads and cancels.
    pub max_retries_idempotent: u32,
    /// Retry budget for order creation and amendment.
    pub max_retries_mutating: u32,
    /// Delay before retrying a maintenance (HTTP 503) response, in milliseconds.
    pub retry_delay_maintenance_ms: u64,
    /// Delay before retrying a connection failure, in milliseconds.
    pub retry_delay_connection_ms: u64,
}

impl Default for BitmexHttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            testnet: false,
            symbol: BITMEX_DEFAULT_SYMBOL.to_string(),
            api_key: None,
            api_secret: None,
            order_id_prefix: DEFAULT_ORDER_ID_PREFIX.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            expires_offset_secs: DEFAULT_EXPIRES_OFFSET_SECS,
            max_retries_idempotent: 3,
            max_retries_mutating: 0,
            retry_delay_maintenance_ms: 2_500,
            retry_delay_connection_ms: 1_000,
        }
    }
}

impl Debug for BitmexHttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BitmexHttpConfig))
            .field("base_url", &self.http_url())
            .field("testnet", &self.testnet)
            .field("symbol", &self.symbol)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("order_id_prefix", &self.order_id_prefix)
            .field("timeout_secs", &self.timeout_secs)
            .field("expires_offset_secs", &self.expires_offset_secs)
            .field("max_retries_idempotent", &self.max_retries_idempotent)
            .field("max_retries_mutating", &self.max_retries_mutating)
            .field("retry_delay_maintenance_ms", &self.retry_delay_maintenance_ms)
            .field("retry_delay_connection_ms", &self.retry_delay_connection_ms)
            .finish()
    }
}

impl BitmexHttpConfig {
    /// Creates a new configuration with the given credentials and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Self::default()
        }
    }

    /// Creates a new configuration from the environment.
    ///
    /// Reads `BITMEX_API_KEY`, `BITMEX_API_SECRET`, `BITMEX_BASE_URL`, `BITMEX_TESTNET` and
    /// `BITMEX_SYMBOL`; everything else takes its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid, for example when either
    /// credential is missing.
    pub fn from_env() -> Result<Self, BitmexConfigError> {
        Self::with_credentials(None, None)
    }

    /// Creates a new configuration from the environment with explicit credentials.
    ///
    /// If `api_key` or `api_secret` are `None`, they will be sourced from the
    /// `BITMEX_API_KEY` and `BITMEX_API_SECRET` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn with_credentials(
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Result<Self, BitmexConfigError> {
        let config = Self {
            base_url: get_env_var(ENV_BASE_URL).ok(),
            testnet: get_env_flag(ENV_TESTNET),
            symbol: get_env_var(ENV_SYMBOL).unwrap_or_else(|_| BITMEX_DEFAULT_SYMBOL.to_string()),
            api_key: get_or_env_var_opt(api_key, ENV_API_KEY),
            api_secret: get_or_env_var_opt(api_secret, ENV_API_SECRET),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns `true` when both credentials are populated.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.api_secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns the HTTP base URL, respecting the testnet flag and overrides.
    #[must_use]
    pub fn http_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            if self.testnet {
                BITMEX_HTTP_TESTNET_URL.to_string()
            } else {
                BITMEX_HTTP_URL.to_string()
            }
        })
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the retry delays derived from this configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.retry_delay_maintenance_ms),
            Duration::from_millis(self.retry_delay_connection_ms),
        )
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key or secret is missing or empty.
    /// - The order id prefix is longer than 13 characters.
    /// - The expires offset is less than 1 second.
    /// - The request timeout is zero.
    /// - The base URL is not an absolute `http` or `https` URL.
    pub fn validate(&self) -> Result<(), BitmexConfigError> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(BitmexConfigError::MissingApiKey);
        }
        if self.api_secret.as_deref().is_none_or(str::is_empty) {
            return Err(BitmexConfigError::MissingApiSecret);
        }

        let prefix_len = self.order_id_prefix.chars().count();
        if prefix_len > MAX_ORDER_ID_PREFIX_LEN {
            return Err(BitmexConfigError::OrderIdPrefixTooLong {
                len: prefix_len,
                max: MAX_ORDER_ID_PREFIX_LEN,
            });
        }

        if self.expires_offset_secs < 1 {
            return Err(BitmexConfigError::InvalidExpiresOffset(
                self.expires_offset_secs,
            ));
        }

        if self.timeout_secs == 0 {
            return Err(BitmexConfigError::InvalidTimeout(self.timeout_secs));
        }

        let base_url = self.http_url();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| BitmexConfigError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BitmexConfigError::InvalidBaseUrl(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
