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

//! Error structures and enumerations for the BitMEX HTTP client.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{
    BitmexConfigError, BitmexError, BitmexFatalError, BitmexFatalKind, BitmexNonRetryableError,
};

/// Build error for request parameter validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BitmexBuildError {
    /// Invalid count value.
    #[error("Invalid count: must be between 1 and 500")]
    InvalidCount,
    /// Both orderID and origClOrdID specified.
    #[error("Cannot specify both 'orderID' and 'origClOrdID'")]
    BothOrderIds,
    /// Missing required order identifier.
    #[error("Missing required order identifier (orderID or origClOrdID)")]
    MissingOrderId,
    /// A builder field was not set.
    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl From<derive_builder::UninitializedFieldError> for BitmexBuildError {
    fn from(error: derive_builder::UninitializedFieldError) -> Self {
        Self::MissingField(error.field_name().to_string())
    }
}

/// Represents the JSON structure of an error response returned by the BitMEX API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BitmexErrorResponse {
    /// The top-level error object included in the BitMEX error response.
    pub error: BitmexErrorMessage,
}

/// Contains the specific error details provided by the BitMEX API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BitmexErrorMessage {
    /// A human-readable explanation of the error condition.
    pub message: String,
    /// A short identifier or category for the error, as returned by BitMEX.
    pub name: String,
}

/// A typed error enumeration for the BitMEX HTTP client.
#[derive(Clone, Debug, Error)]
pub enum BitmexHttpError {
    /// The client configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(#[from] BitmexConfigError),
    /// BitMEX rejected the request (HTTP 4xx); the request should not be retried as is.
    #[error("BitMEX rejected request ({status}) {error_name}: {message}")]
    ClientRequest {
        status: StatusCode,
        error_name: String,
        message: String,
    },
    /// An unrecoverable condition; the session was terminated before this was returned.
    #[error("Fatal {kind} error ({status}), session terminated: {message}")]
    FatalSession {
        kind: BitmexFatalKind,
        status: StatusCode,
        message: String,
    },
    /// Transient failures persisted beyond the retry budget of the call.
    ///
    /// `attempts` counts the charged retries, so it equals the budget.
    #[error("Retry budget exceeded for {method} {path} after {attempts} retries: {source}")]
    RetryBudgetExceeded {
        method: Method,
        path: String,
        attempts: u32,
        #[source]
        source: Box<BitmexError>,
    },
    /// The session was closed before the request was issued.
    #[error("Session closed")]
    SessionClosed,
    /// Failure during JSON serialization/deserialization.
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Failure encoding query parameters.
    #[error("Query encoding error: {0}")]
    QueryError(String),
    /// Build error for request parameters.
    #[error("Build error: {0}")]
    BuildError(#[from] BitmexBuildError),
    /// Any unknown HTTP status or unexpected response from BitMEX.
    #[error("Unexpected HTTP status code {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    /// A transport failure which is neither a timeout nor a connection failure.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl BitmexHttpError {
    /// Returns `true` if the session was terminated by this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalSession { .. })
    }

    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ClientRequest { status, .. }
            | Self::FatalSession { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<BitmexFatalError> for BitmexHttpError {
    fn from(error: BitmexFatalError) -> Self {
        Self::FatalSession {
            kind: error.kind(),
            status: error.status(),
            message: error.message().to_string(),
        }
    }
}

impl From<BitmexNonRetryableError> for BitmexHttpError {
    fn from(error: BitmexNonRetryableError) -> Self {
        match error {
            BitmexNonRetryableError::BadRequest {
                error_name,
                message,
            } => Self::ClientRequest {
                status: StatusCode::BAD_REQUEST,
                error_name,
                message,
            },
            BitmexNonRetryableError::NotFound {
                error_name,
                message,
            } => Self::ClientRequest {
                status: StatusCode::NOT_FOUND,
                error_name,
                message,
            },
            BitmexNonRetryableError::Rejected {
                status,
                error_name,
                message,
            } => Self::ClientRequest {
                status,
                error_name,
                message,
            },
            BitmexNonRetryableError::UnexpectedStatus { status, body } => {
                Self::UnexpectedStatus { status, body }
            }
            BitmexNonRetryableError::Transport { message } => Self::Transport(message),
        }
    }
}

// Allow use of the `?` operator on `serde_json` results inside the HTTP
// client implementation by converting them into our typed error.
impl From<serde_json::Error> for BitmexHttpError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonError(error.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for BitmexHttpError {
    fn from(error: serde_urlencoded::ser::Error) -> Self {
        Self::QueryError(error.to_string())
    }
}
