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

//! Provides the HTTP client integration for the [BitMEX](https://bitmex.com) REST API.
//!
//! This module defines the request execution engine ([`BitmexHttpInnerClient`]) and the
//! endpoint surface built on it ([`BitmexHttpClient`]). Every attempt is signed afresh,
//! its outcome classified, and transient failures retried within the call's own budget:
//!
//! | Outcome                          | Action                                              |
//! |----------------------------------|-----------------------------------------------------|
//! | 2xx                              | Return the decoded body.                            |
//! | 400 insufficient balance, 401   | Terminate the session, then return the error.       |
//! | Other 4xx                        | Return the error, no retry.                         |
//! | 429                              | Wait until the rate limit resets, retry (uncharged).|
//! | 503                              | Wait the maintenance delay, retry (charged).        |
//! | Timeout                          | Retry immediately (charged).                        |
//! | Connection failure               | Wait the connection delay, retry (charged).         |
//! | Other 5xx                        | Return the error, no retry.                         |
//!
//! # Quick links to official docs
//! | Domain                               | BitMEX reference                                                          |
//! |--------------------------------------|---------------------------------------------------------------------------|
//! | Authentication                       | <https://www.bitmex.com/app/apiKeysUsage>                                 |
//! | Rate limits                          | <https://www.bitmex.com/app/restAPI#Limits>                               |
//! | Endpoints                            | <https://www.bitmex.com/api/explorer/>                                    |

use std::{collections::HashMap, sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use bitmex_rest_core::consts::BITMEX_REST_USER_AGENT;
use bitmex_rest_network::{
    http::{HttpClientError, HttpSession},
    retry::{RetryPolicy, RetryState},
};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{
    error::BitmexHttpError,
    query::{
        DeleteAllOrdersParams, DeleteOrderParams, GetOrderParams, GetPositionParams,
        PostOrderParams, PutOrderParams,
    },
};
use crate::{
    common::{
        consts::{HEADER_RATELIMIT_REMAINING, HEADER_RATELIMIT_RESET, HEADER_RETRY_AFTER},
        credential::Credential,
        signing::generate_expires,
    },
    config::BitmexHttpConfig,
    error::{BitmexConfigError, BitmexError, BitmexRetryableError},
};

/// Per-call execution options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Per-attempt timeout, overriding the client-wide timeout.
    pub timeout: Option<Duration>,
    /// Number of charged retries allowed for transient failures.
    pub max_retries: u32,
}

impl RequestOptions {
    /// Creates options with the client-wide timeout and no retries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            max_retries: 0,
        }
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The decoded body of a successful call along with its retry accounting.
#[derive(Clone, Debug)]
pub struct BitmexResponse {
    /// The decoded JSON body (`null` for an empty body).
    pub body: Value,
    /// The number of HTTP requests issued for the call, including rate limit retries.
    pub requests_issued: u32,
    /// The retry state of the call, reset by the successful response.
    pub retry_state: RetryState,
}

/// Provides the request execution engine for the [BitMEX](https://bitmex.com) REST API.
///
/// The engine owns the session, the credential and the retry policy. Retry accounting is
/// local to each call, so concurrent calls never share or consume each other's budget.
#[derive(Debug)]
pub struct BitmexHttpInnerClient {
    base_url: String,
    session: HttpSession,
    credential: Credential,
    expires_offset_secs: i64,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl BitmexHttpInnerClient {
    /// Creates a new [`BitmexHttpInnerClient`] from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the session cannot be built.
    pub fn new(config: &BitmexHttpConfig) -> Result<Self, BitmexHttpError> {
        config.validate()?;

        let api_key = config
            .api_key
            .clone()
            .ok_or(BitmexConfigError::MissingApiKey)?;
        let api_secret = config
            .api_secret
            .clone()
            .ok_or(BitmexConfigError::MissingApiSecret)?;

        let session = HttpSession::new(&Self::default_headers(), Some(config.timeout()))
            .map_err(|e| BitmexConfigError::Session(e.to_string()))?;

        Ok(Self {
            base_url: config.http_url().trim_end_matches('/').to_string(),
            session,
            credential: Credential::new(api_key, api_secret),
            expires_offset_secs: config.expires_offset_secs,
            timeout: config.timeout(),
            retry_policy: config.retry_policy(),
        })
    }

    fn default_headers() -> HashMap<String, String> {
        HashMap::from([
            ("user-agent".to_string(), BITMEX_REST_USER_AGENT.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ])
    }

    /// Returns the base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the credential used for signing.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Returns `true` once the session has been terminated.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Terminates the session; every later call fails with [`BitmexHttpError::SessionClosed`].
    ///
    /// Returns `true` if this call closed the session.
    pub fn close(&self) -> bool {
        self.session.close()
    }

    /// Joins the base URL, the API-relative `path` and the encoded `query`.
    fn build_url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = String::with_capacity(self.base_url.len() + path.len() + 1);
        url.push_str(&self.base_url);
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Executes one logical API call to completion and returns the decoded body.
    ///
    /// See [`Self::execute_with_outcome`].
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails, see [`Self::execute_with_outcome`].
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Value, BitmexHttpError> {
        self.execute_with_outcome(method, path, query, body, options)
            .await
            .map(|response| response.body)
    }

    /// Executes one logical API call to completion.
    ///
    /// `path` is relative to the base URL (e.g. `/order`) and `query` is an already
    /// form-urlencoded query string which is appended and signed verbatim. The body is
    /// serialized once; the same bytes are signed and sent on every attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is closed ([`BitmexHttpError::SessionClosed`]).
    /// - BitMEX rejects the request ([`BitmexHttpError::ClientRequest`]).
    /// - A fatal condition terminated the session ([`BitmexHttpError::FatalSession`]).
    /// - Transient failures outlast the budget ([`BitmexHttpError::RetryBudgetExceeded`]).
    /// - The response body is not valid JSON ([`BitmexHttpError::JsonError`]).
    pub async fn execute_with_outcome(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<BitmexResponse, BitmexHttpError> {
        let url = self.build_url(path, query);
        let body = body.map(serde_json::to_string).transpose()?;
        let body_text = body.as_deref().unwrap_or_default();
        let timeout = options.timeout.unwrap_or(self.timeout);
        let mut state = RetryState::new(options.max_retries);

        loop {
            if self.session.is_closed() {
                return Err(BitmexHttpError::SessionClosed);
            }

            let expires = generate_expires(Some(self.expires_offset_secs))?;
            let headers = self
                .credential
                .auth_headers(method.as_str(), &url, expires, body_text)
                .to_map();

            tracing::debug!(
                method = %method,
                path,
                attempt = state.requests_issued(),
                expires,
                "Sending request"
            );

            let result = self
                .session
                .request(
                    method.clone(),
                    &url,
                    &headers,
                    body.clone().map(String::into_bytes),
                    Some(timeout),
                )
                .await;

            let error = match result {
                Ok(response) if response.status.is_success() => {
                    let requests_issued = state.requests_issued();
                    state.reset();
                    return Ok(BitmexResponse {
                        body: parse_body(&response.body)?,
                        requests_issued,
                        retry_state: state,
                    });
                }
                Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS => {
                    BitmexError::from_rate_limit_headers(
                        response.header_str(HEADER_RATELIMIT_REMAINING),
                        response.header_str(HEADER_RATELIMIT_RESET),
                        response.header_str(HEADER_RETRY_AFTER),
                    )
                }
                Ok(response) => BitmexError::from_http_status(response.status, &response.body),
                Err(HttpClientError::SessionClosed) => return Err(BitmexHttpError::SessionClosed),
                Err(e) => BitmexError::from(e),
            };

            let delay = match error {
                BitmexError::Fatal { source } => {
                    tracing::error!(
                        method = %method,
                        path,
                        kind = %source.kind(),
                        "{source}, terminating session"
                    );
                    self.session.close();
                    return Err(source.into());
                }
                BitmexError::NonRetryable { source } => {
                    tracing::debug!(method = %method, path, "Request failed: {source}");
                    return Err(source.into());
                }
                BitmexError::Retryable {
                    source: BitmexRetryableError::RateLimit { .. },
                    retry_after,
                } => {
                    state.record_rate_limit_wait();
                    let delay = retry_after.unwrap_or(self.retry_policy.rate_limit_fallback_delay);
                    tracing::warn!(
                        method = %method,
                        path,
                        delay = ?delay,
                        "Rate limited, waiting for reset"
                    );
                    delay
                }
                BitmexError::Retryable { ref source, .. } => {
                    if !state.record_retry() {
                        tracing::warn!(
                            method = %method,
                            path,
                            attempts = state.attempts(),
                            "Retry budget exhausted: {source}"
                        );
                        return Err(BitmexHttpError::RetryBudgetExceeded {
                            method,
                            path: path.to_string(),
                            attempts: state.attempts(),
                            source: Box::new(error),
                        });
                    }

                    let delay = self.retry_delay(source);
                    tracing::warn!(
                        method = %method,
                        path,
                        attempt = state.attempts(),
                        max_retries = state.max_retries(),
                        delay = ?delay,
                        "Retrying request: {source}"
                    );
                    delay
                }
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    fn retry_delay(&self, source: &BitmexRetryableError) -> Duration {
        match source {
            BitmexRetryableError::RateLimit { .. } => self.retry_policy.rate_limit_fallback_delay,
            BitmexRetryableError::ServiceUnavailable => self.retry_policy.maintenance_delay,
            BitmexRetryableError::Timeout { .. } => self.retry_policy.timeout_delay,
            BitmexRetryableError::TemporaryNetwork { .. } => self.retry_policy.connection_delay,
        }
    }
}

fn parse_body(body: &[u8]) -> Result<Value, BitmexHttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(Into::into)
}

fn encode_query<T: Serialize + ?Sized>(params: &T) -> Result<String, BitmexHttpError> {
    serde_urlencoded::to_string(params).map_err(Into::into)
}

/// Generates a client order id: `prefix` followed by an unpadded base64 encoded UUIDv4.
///
/// The random part is 22 characters long.
#[must_use]
pub fn generate_cl_ord_id(prefix: &str) -> String {
    let random = STANDARD_NO_PAD.encode(Uuid::new_v4().as_bytes());
    format!("{prefix}{random}")
}

/// Provides a HTTP client for connecting to the [BitMEX](https://bitmex.com) REST API.
///
/// Cheap to clone; clones share the engine and therefore the session.
#[derive(Clone, Debug)]
pub struct BitmexHttpClient {
    inner: Arc<BitmexHttpInnerClient>,
    symbol: String,
    order_id_prefix: String,
    max_retries_idempotent: u32,
    max_retries_mutating: u32,
}

impl BitmexHttpClient {
    /// Creates a new [`BitmexHttpClient`] from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the session cannot be built.
    pub fn new(config: &BitmexHttpConfig) -> Result<Self, BitmexHttpError> {
        let inner = BitmexHttpInnerClient::new(config)?;

        tracing::debug!(
            base_url = inner.base_url(),
            "Created BitMEX HTTP client"
        );

        Ok(Self {
            inner: Arc::new(inner),
            symbol: config.symbol.clone(),
            order_id_prefix: config.order_id_prefix.clone(),
            max_retries_idempotent: config.max_retries_idempotent,
            max_retries_mutating: config.max_retries_mutating,
        })
    }

    /// Creates a new [`BitmexHttpClient`] configured from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are not set or invalid.
    pub fn from_env() -> Result<Self, BitmexHttpError> {
        let config = BitmexHttpConfig::from_env()?;
        Self::new(&config)
    }

    /// Returns the request execution engine.
    #[must_use]
    pub fn inner(&self) -> &BitmexHttpInnerClient {
        &self.inner
    }

    /// Returns the base url being used by the client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Returns the public API key being used by the client.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.inner.credential().api_key().as_str()
    }

    /// Returns the default symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns `true` once the session has been terminated.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Terminates the session for this client and all its clones.
    ///
    /// Returns `true` if this call closed the session; closing again is a no-op.
    pub fn close(&self) -> bool {
        let closed = self.inner.close();
        if closed {
            tracing::info!("BitMEX HTTP session closed");
        }
        closed
    }

    /// Generates a client order id using the configured prefix.
    #[must_use]
    pub fn generate_cl_ord_id(&self) -> String {
        generate_cl_ord_id(&self.order_id_prefix)
    }

    const fn idempotent(&self) -> RequestOptions {
        RequestOptions::new().with_max_retries(self.max_retries_idempotent)
    }

    const fn mutating(&self) -> RequestOptions {
        RequestOptions::new().with_max_retries(self.max_retries_mutating)
    }

    /// Executes an arbitrary call, see [`BitmexHttpInnerClient::execute`].
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Value, BitmexHttpError> {
        self.inner.execute(method, path, query, body, options).await
    }

    /// Requests API and server information.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_api_info(&self) -> Result<Value, BitmexHttpError> {
        self.execute(Method::GET, "/", None, None, self.idempotent())
            .await
    }

    /// Requests site announcements.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_announcements(&self) -> Result<Value, BitmexHttpError> {
        self.execute(Method::GET, "/announcement", None, None, self.idempotent())
            .await
    }

    /// Requests the instrument for `symbol`, or the default symbol when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_instrument(&self, symbol: Option<&str>) -> Result<Value, BitmexHttpError> {
        let symbol = symbol.unwrap_or(&self.symbol);
        let query = encode_query(&[("symbol", symbol)])?;
        self.execute(
            Method::GET,
            "/instrument",
            Some(&query),
            None,
            self.idempotent(),
        )
        .await
    }

    /// Requests all active instruments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_active_instruments(&self) -> Result<Value, BitmexHttpError> {
        self.execute(
            Method::GET,
            "/instrument/active",
            None,
            None,
            self.idempotent(),
        )
        .await
    }

    /// Requests the wallet for `currency` (e.g. `XBt`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_wallet(&self, currency: &str) -> Result<Value, BitmexHttpError> {
        let query = encode_query(&[("currency", currency)])?;
        self.execute(
            Method::GET,
            "/user/wallet",
            Some(&query),
            None,
            self.idempotent(),
        )
        .await
    }

    /// Requests the margin status for `currency` (e.g. `XBt`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_margin(&self, currency: &str) -> Result<Value, BitmexHttpError> {
        let query = encode_query(&[("currency", currency)])?;
        self.execute(
            Method::GET,
            "/user/margin",
            Some(&query),
            None,
            self.idempotent(),
        )
        .await
    }

    /// Requests positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_positions(&self, params: GetPositionParams) -> Result<Value, BitmexHttpError> {
        let query = encode_query(&params)?;
        self.execute(Method::GET, "/position", Some(&query), None, self.idempotent())
            .await
    }

    /// Requests orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_orders(&self, params: GetOrderParams) -> Result<Value, BitmexHttpError> {
        let query = encode_query(&params)?;
        self.execute(Method::GET, "/order", Some(&query), None, self.idempotent())
            .await
    }

    /// Requests open orders for `symbol`, or the default symbol when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_open_orders(&self, symbol: Option<&str>) -> Result<Value, BitmexHttpError> {
        let params = GetOrderParams {
            symbol: Some(symbol.unwrap_or(&self.symbol).to_string()),
            filter: Some(json!({ "open": true })),
            ..GetOrderParams::default()
        };
        self.get_orders(params).await
    }

    /// Places a new order.
    ///
    /// An empty symbol is replaced with the default symbol and a client order id is
    /// generated when none is given. Order creation is not retried unless the mutating
    /// retry budget is raised.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn place_order(&self, mut params: PostOrderParams) -> Result<Value, BitmexHttpError> {
        if params.symbol.is_empty() {
            params.symbol.clone_from(&self.symbol);
        }
        if params.cl_ord_id.is_none() {
            params.cl_ord_id = Some(self.generate_cl_ord_id());
        }

        let body = serde_json::to_value(&params)?;
        self.execute(Method::POST, "/order", None, Some(&body), self.mutating())
            .await
    }

    /// Amends an existing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn amend_order(&self, params: PutOrderParams) -> Result<Value, BitmexHttpError> {
        let body = serde_json::to_value(&params)?;
        self.execute(Method::PUT, "/order", None, Some(&body), self.mutating())
            .await
    }

    /// Cancels orders by order id or client order id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn cancel_orders(&self, params: DeleteOrderParams) -> Result<Value, BitmexHttpError> {
        let body = serde_json::to_value(&params)?;
        self.execute(Method::DELETE, "/order", None, Some(&body), self.idempotent())
            .await
    }

    /// Cancels all orders, optionally narrowed by symbol and filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn cancel_all_orders(
        &self,
        params: DeleteAllOrdersParams,
    ) -> Result<Value, BitmexHttpError> {
        let body = serde_json::to_value(&params)?;
        self.execute(
            Method::DELETE,
            "/order/all",
            None,
            Some(&body),
            self.idempotent(),
        )
        .await
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::common::consts::MAX_ORDER_ID_PREFIX_LEN;

    fn test_config() -> BitmexHttpConfig {
        BitmexHttpConfig {
            base_url: Some("http://127.0.0.1:1/api/v1/".to_string()),
            ..BitmexHttpConfig::new("key", "secret")
        }
    }

    #[rstest]
    fn test_new_rejects_invalid_config() {
        let config = BitmexHttpConfig::default();
        let result = BitmexHttpClient::new(&config);
        assert!(matches!(
            result,
            Err(BitmexHttpError::Configuration(
                BitmexConfigError::MissingApiKey
            ))
        ));

        let config = BitmexHttpConfig {
            order_id_prefix: "a_much_too_long_prefix".to_string(),
            ..test_config()
        };
        let result = BitmexHttpClient::new(&config);
        assert!(matches!(
            result,
            Err(BitmexHttpError::Configuration(
                BitmexConfigError::OrderIdPrefixTooLong { .. }
            ))
        ));
    }

    #[rstest]
    #[case("/order", None, "http://127.0.0.1:1/api/v1/order")]
    #[case("order", None, "http://127.0.0.1:1/api/v1/order")]
    #[case("/order", Some(""), "http://127.0.0.1:1/api/v1/order")]
    #[case(
        "/order",
        Some("symbol=XBTUSD&count=5"),
        "http://127.0.0.1:1/api/v1/order?symbol=XBTUSD&count=5"
    )]
    #[case("/", None, "http://127.0.0.1:1/api/v1/")]
    fn test_build_url(#[case] path: &str, #[case] query: Option<&str>, #[case] expected: &str) {
        let client = BitmexHttpInnerClient::new(&test_config()).unwrap();
        assert_eq!(client.build_url(path, query), expected);
    }

    #[rstest]
    fn test_generate_cl_ord_id() {
        let prefix = "mm_bitmex_";
        let id = generate_cl_ord_id(prefix);

        assert!(id.starts_with(prefix));
        assert_eq!(id.len(), prefix.len() + 22);
        assert!(!id.ends_with('='));
        assert_ne!(id, generate_cl_ord_id(prefix));
    }

    #[rstest]
    fn test_generate_cl_ord_id_fits_bitmex_limit() {
        let prefix = "x".repeat(MAX_ORDER_ID_PREFIX_LEN);
        let id = generate_cl_ord_id(&prefix);
        assert!(id.len() <= 36);
    }

    #[rstest]
    #[case(b"", Value::Null)]
    #[case(b"  \n", Value::Null)]
    #[case(b"[]", json!([]))]
    #[case(br#"{"a":1}"#, json!({"a": 1}))]
    fn test_parse_body(#[case] body: &[u8], #[case] expected: Value) {
        assert_eq!(parse_body(body).unwrap(), expected);
    }

    #[rstest]
    fn test_parse_body_malformed() {
        assert!(matches!(
            parse_body(b"{not json"),
            Err(BitmexHttpError::JsonError(_))
        ));
    }

    #[rstest]
    fn test_request_options() {
        let options = RequestOptions::default();
        assert_eq!(options.max_retries, 0);
        assert_eq!(options.timeout, None);

        let options = RequestOptions::new()
            .with_max_retries(3)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_shared_by_clones() {
        let client = BitmexHttpClient::new(&test_config()).unwrap();
        let clone = client.clone();

        assert!(!client.is_closed());
        assert!(clone.close());
        assert!(!client.close());
        assert!(client.is_closed());

        let result = client.get_announcements().await;
        assert!(matches!(result, Err(BitmexHttpError::SessionClosed)));
    }
}
