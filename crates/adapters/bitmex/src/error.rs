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

//! Unified error handling for the BitMEX adapter.
//!
//! Responses and transport failures are classified into retryable, non-retryable and fatal
//! errors. The request engine acts on the classification: retryable errors are retried
//! within the call's budget, non-retryable errors are surfaced immediately, and fatal
//! errors tear the session down before being surfaced.

use std::time::Duration;

use bitmex_rest_core::datetime::{duration_until_unix_secs, unix_millis_now};
use bitmex_rest_network::http::HttpClientError;
use reqwest::StatusCode;
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::{common::consts::INSUFFICIENT_BALANCE_MESSAGE, http::error::BitmexErrorResponse};

/// Configuration errors detected synchronously, before any request is issued.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BitmexConfigError {
    /// No API key was configured.
    #[error("Missing API key")]
    MissingApiKey,
    /// No API secret was configured.
    #[error("Missing API secret")]
    MissingApiSecret,
    /// The client order id prefix exceeds the allowed length.
    #[error("Order id prefix length {len} exceeds maximum of {max}")]
    OrderIdPrefixTooLong { len: usize, max: usize },
    /// The signature expiry offset must be at least one second.
    #[error("Invalid expires offset {0}: must be at least 1 second")]
    InvalidExpiresOffset(i64),
    /// The request timeout must be at least one second.
    #[error("Invalid timeout {0}s: must be at least 1 second")]
    InvalidTimeout(u64),
    /// The base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// The HTTP session could not be built.
    #[error("Failed to build HTTP session: {0}")]
    Session(String),
}

/// The classification of a failed BitMEX request.
#[derive(Clone, Debug, Error)]
pub enum BitmexError {
    /// Errors that should be retried.
    #[error("Retryable error: {source}")]
    Retryable {
        #[source]
        source: BitmexRetryableError,
        /// Suggested retry after duration, if provided by the server.
        retry_after: Option<Duration>,
    },

    /// Errors that should not be retried.
    #[error("Non-retryable error: {source}")]
    NonRetryable {
        #[source]
        source: BitmexNonRetryableError,
    },

    /// Fatal errors which terminate the session.
    #[error("Fatal error: {source}")]
    Fatal {
        #[source]
        source: BitmexFatalError,
    },
}

/// Errors that should be retried.
#[derive(Clone, Debug, Error)]
pub enum BitmexRetryableError {
    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limit exceeded (remaining: {remaining:?}, reset: {reset_at:?})")]
    RateLimit {
        remaining: Option<u32>,
        reset_at: Option<Duration>,
    },

    /// Service unavailable, typically a maintenance window (HTTP 503).
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    /// Transport timeout.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Connection could not be established or was dropped.
    #[error("Temporary network error: {message}")]
    TemporaryNetwork { message: String },
}

/// Errors that should not be retried.
#[derive(Clone, Debug, Error)]
pub enum BitmexNonRetryableError {
    /// Bad request (HTTP 400).
    #[error("Bad request: {error_name}: {message}")]
    BadRequest { error_name: String, message: String },

    /// Not found (HTTP 404).
    #[error("Resource not found: {message}")]
    NotFound { error_name: String, message: String },

    /// Any other client error (HTTP 4xx).
    #[error("Request rejected ({status}): {error_name}: {message}")]
    Rejected {
        status: StatusCode,
        error_name: String,
        message: String,
    },

    /// A status the client has no handling for.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// A transport failure which is neither a timeout nor a connection failure.
    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Fatal errors which require the session to be terminated.
#[derive(Clone, Debug, Error)]
pub enum BitmexFatalError {
    /// Authentication failed (HTTP 401).
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The account balance cannot cover the request (HTTP 400).
    #[error("Insufficient balance: {message}")]
    InsufficientBalance { message: String },
}

/// The kind of fatal condition which terminated a session.
#[derive(Clone, Copy, Debug, Display, AsRefStr, PartialEq, Eq, Hash)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BitmexFatalKind {
    /// Credentials were rejected.
    Authentication,
    /// The account balance is exhausted.
    InsufficientBalance,
}

impl BitmexFatalError {
    /// Returns the kind of this fatal error.
    #[must_use]
    pub const fn kind(&self) -> BitmexFatalKind {
        match self {
            Self::AuthenticationFailed { .. } => BitmexFatalKind::Authentication,
            Self::InsufficientBalance { .. } => BitmexFatalKind::InsufficientBalance,
        }
    }

    /// Returns the HTTP status which carried this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            Self::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the server supplied message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed { message } | Self::InsufficientBalance { message } => {
                message
            }
        }
    }
}

/// Returns `true` if `message` reports an exhausted account balance.
///
/// BitMEX error bodies carry no stable error code for this condition, only a `name` and a
/// free text `message`, so the match is a case-insensitive substring check.
#[must_use]
pub fn is_insufficient_balance(message: &str) -> bool {
    message
        .to_ascii_lowercase()
        .contains(INSUFFICIENT_BALANCE_MESSAGE)
}

impl BitmexError {
    /// Creates a new rate limit error from HTTP headers.
    ///
    /// # Parameters
    ///
    /// - `remaining`: X-RateLimit-Remaining header value
    /// - `reset`: X-RateLimit-Reset header value (UNIX timestamp in seconds)
    /// - `retry_after`: Retry-After header value (seconds to wait)
    ///
    /// The reset timestamp takes precedence; `Retry-After` is used only when no usable reset
    /// is present. A reset in the past yields a zero wait.
    #[must_use]
    pub fn from_rate_limit_headers(
        remaining: Option<&str>,
        reset: Option<&str>,
        retry_after: Option<&str>,
    ) -> Self {
        let remaining = remaining.and_then(|s| s.trim().parse().ok());

        let reset_at = reset
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|timestamp| duration_until_unix_secs(timestamp, unix_millis_now()));

        let retry_duration = reset_at.or_else(|| {
            retry_after.and_then(|s| s.trim().parse::<u64>().ok().map(Duration::from_secs))
        });

        Self::Retryable {
            source: BitmexRetryableError::RateLimit {
                remaining,
                reset_at,
            },
            retry_after: retry_duration,
        }
    }

    /// Creates an error from a non-success HTTP status and its raw body.
    ///
    /// The body is parsed as a BitMEX error response when possible, otherwise its text is
    /// used as the message. Rate limit headers are not inspected here, see
    /// [`Self::from_rate_limit_headers`].
    #[must_use]
    pub fn from_http_status(status: StatusCode, body: &[u8]) -> Self {
        let (error_name, message) = match serde_json::from_slice::<BitmexErrorResponse>(body) {
            Ok(response) => (response.error.name, response.error.message),
            Err(_) => (
                status.canonical_reason().unwrap_or_default().to_string(),
                String::from_utf8_lossy(body).into_owned(),
            ),
        };

        match status {
            StatusCode::BAD_REQUEST if is_insufficient_balance(&message) => Self::Fatal {
                source: BitmexFatalError::InsufficientBalance { message },
            },
            StatusCode::BAD_REQUEST => Self::NonRetryable {
                source: BitmexNonRetryableError::BadRequest {
                    error_name,
                    message,
                },
            },
            StatusCode::UNAUTHORIZED => Self::Fatal {
                source: BitmexFatalError::AuthenticationFailed { message },
            },
            StatusCode::NOT_FOUND => Self::NonRetryable {
                source: BitmexNonRetryableError::NotFound {
                    error_name,
                    message,
                },
            },
            StatusCode::TOO_MANY_REQUESTS => Self::from_rate_limit_headers(None, None, None),
            StatusCode::SERVICE_UNAVAILABLE => Self::Retryable {
                source: BitmexRetryableError::ServiceUnavailable,
                retry_after: None,
            },
            s if s.is_client_error() => Self::NonRetryable {
                source: BitmexNonRetryableError::Rejected {
                    status,
                    error_name,
                    message,
                },
            },
            _ => Self::NonRetryable {
                source: BitmexNonRetryableError::UnexpectedStatus {
                    status,
                    body: String::from_utf8_lossy(body).into_owned(),
                },
            },
        }
    }

    /// Checks if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }

    /// Checks if this error is fatal.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// Checks if this error is a rate limit.
    #[must_use]
    pub const fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            Self::Retryable {
                source: BitmexRetryableError::RateLimit { .. },
                ..
            }
        )
    }

    /// Gets the suggested retry duration if available.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Retryable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<HttpClientError> for BitmexError {
    fn from(error: HttpClientError) -> Self {
        match error {
            HttpClientError::TimeoutError(message) => Self::Retryable {
                source: BitmexRetryableError::Timeout { message },
                retry_after: None,
            },
            HttpClientError::ConnectionError(message) => Self::Retryable {
                source: BitmexRetryableError::TemporaryNetwork { message },
                retry_after: None,
            },
            HttpClientError::Error(message) => Self::NonRetryable {
                source: BitmexNonRetryableError::Transport { message },
            },
            HttpClientError::SessionClosed => Self::NonRetryable {
                source: BitmexNonRetryableError::Transport {
                    message: HttpClientError::SessionClosed.to_string(),
                },
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
