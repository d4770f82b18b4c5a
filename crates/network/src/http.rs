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

//! A closable HTTP session built on [`reqwest`].
//!
//! An [`HttpSession`] owns the underlying connection pool for one client instance. The pool
//! is shared by every in-flight request and can be torn down exactly once through
//! [`HttpSession::close`]; after that every request fails fast with
//! [`HttpClientError::SessionClosed`] and no new connection is ever opened.

use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use thiserror::Error;

/// Represents the HTTP response of a single request.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The raw response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns the value of the header `key` as a string slice, if present and valid UTF-8.
    #[must_use]
    pub fn header_str(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|value| value.to_str().ok())
    }
}

/// Transport level errors raised by [`HttpSession`].
#[derive(Clone, Debug, Error)]
pub enum HttpClientError {
    /// The request could not be built or the response could not be read.
    #[error("HTTP error occurred: {0}")]
    Error(String),
    /// The request did not complete within its timeout.
    #[error("HTTP request timed out: {0}")]
    TimeoutError(String),
    /// The connection could not be established or was dropped mid-request.
    #[error("HTTP connection error: {0}")]
    ConnectionError(String),
    /// The session was closed before the request was constructed.
    #[error("HTTP session closed")]
    SessionClosed,
}

impl HttpClientError {
    /// Returns `true` if the error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutError(_))
    }

    /// Returns `true` if the error is a connection failure.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl From<reqwest::Error> for HttpClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::TimeoutError(error.to_string())
        } else if error.is_connect() || error.is_request() || error.is_body() {
            Self::ConnectionError(error.to_string())
        } else {
            Self::Error(error.to_string())
        }
    }
}

/// A shared, closable HTTP session.
///
/// Cloning the session is not supported; share it behind an [`Arc`] instead so that a
/// close is observed by every holder.
pub struct HttpSession {
    client: ArcSwapOption<reqwest::Client>,
}

impl Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(HttpSession))
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl HttpSession {
    /// Creates a new [`HttpSession`] which sends `default_headers` with every request.
    ///
    /// `timeout` is applied to requests which do not carry their own timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is invalid or the underlying client cannot be built.
    pub fn new(
        default_headers: &HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self, HttpClientError> {
        let mut builder =
            reqwest::Client::builder().default_headers(to_header_map(default_headers)?);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: ArcSwapOption::from_pointee(client),
        })
    }

    /// Returns `true` once the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.client.load().is_none()
    }

    /// Closes the session, releasing the connection pool.
    ///
    /// Returns `true` if this call closed the session and `false` if it was already closed.
    /// Requests already in flight run to completion; no request is constructed afterwards.
    pub fn close(&self) -> bool {
        let closed = self.client.swap(None).is_some();
        if closed {
            tracing::debug!("HTTP session closed");
        }
        closed
    }

    /// Sends a single HTTP request and reads the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::SessionClosed`] if the session is closed, otherwise a
    /// classified transport error if the request fails.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<Vec<u8>>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, HttpClientError> {
        let client: Arc<reqwest::Client> = self
            .client
            .load_full()
            .ok_or(HttpClientError::SessionClosed)?;

        let mut request = client.request(method, url).headers(to_header_map(headers)?);
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, HttpClientError> {
    let mut header_map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| HttpClientError::Error(format!("Invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HttpClientError::Error(format!("Invalid header value for '{key}': {e}")))?;
        header_map.insert(name, value);
    }
    Ok(header_map)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
