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

//! Integration tests for the BitMEX HTTP client using a mock server.

use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use bitmex_rest::{
    common::{
        consts::{
            HEADER_API_EXPIRES, HEADER_API_KEY, HEADER_API_SIGNATURE, HEADER_RATELIMIT_REMAINING,
            HEADER_RATELIMIT_RESET, HEADER_RETRY_AFTER,
        },
        credential::Credential,
        enums::{BitmexOrderType, BitmexSide},
    },
    config::BitmexHttpConfig,
    error::{BitmexError, BitmexFatalKind, BitmexRetryableError},
    http::{
        client::{BitmexHttpClient, RequestOptions},
        error::BitmexHttpError,
        query::{GetOrderParamsBuilder, PostOrderParamsBuilder, PutOrderParamsBuilder},
    },
};
use bitmex_rest_core::{consts::BITMEX_REST_USER_AGENT, datetime::unix_secs_now};
use rstest::rstest;
use serde_json::{Value, json};
use tokio::sync::Mutex;

const API_KEY: &str = "test_api_key";
const API_SECRET: &str = "test_api_secret";
const API_PREFIX: &str = "/api/v1";

#[derive(Clone, Debug)]
struct RecordedRequest {
    method: Method,
    path_and_query: String,
    expires: i64,
    signature: String,
    signature_valid: bool,
    user_agent: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct TestServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServerState {
    async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    async fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let full_path = format!("{API_PREFIX}{path}");
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.path_and_query.split('?').next() == Some(full_path.as_str()))
            .collect()
    }
}

fn header(headers: &HeaderMap, key: &str) -> Option<String> {
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn error_response(status: StatusCode, name: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "message": message, "name": name } })),
    )
        .into_response()
}

async fn handle_request(
    State(state): State<TestServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    let expires = header(&headers, HEADER_API_EXPIRES)
        .and_then(|e| e.parse::<i64>().ok())
        .unwrap_or_default();
    let signature = header(&headers, HEADER_API_SIGNATURE).unwrap_or_default();

    let expected_signature = Credential::new(API_KEY, API_SECRET).sign(
        method.as_str(),
        &path_and_query,
        expires,
        &body,
    );
    let signature_valid = header(&headers, HEADER_API_KEY).as_deref() == Some(API_KEY)
        && signature == expected_signature;

    let call_count = {
        let mut requests = state.requests.lock().await;
        requests.push(RecordedRequest {
            method: method.clone(),
            path_and_query: path_and_query.clone(),
            expires,
            signature,
            signature_valid,
            user_agent: header(&headers, "user-agent"),
            content_type: header(&headers, "content-type"),
            body: body.clone(),
        });
        requests
            .iter()
            .filter(|r| {
                r.method == method
                    && r.path_and_query.split('?').next().unwrap_or_default() == uri.path()
            })
            .count()
    };

    if !signature_valid {
        return error_response(StatusCode::UNAUTHORIZED, "HTTPError", "Signature not valid.");
    }

    let path = uri.path().strip_prefix(API_PREFIX).unwrap_or_default();
    let query = uri.query().unwrap_or_default().to_string();

    match (method, path) {
        (Method::GET, "/") => {
            Json(json!({ "name": "BitMEX API", "version": "1.2.0" })).into_response()
        }
        (Method::GET, "/announcement") => Json(json!([
            { "id": 1, "title": "Maintenance", "content": "Scheduled maintenance", "date": "2025-01-05T17:50:00.000Z" },
            { "id": 2, "title": "New contract", "content": "Listing", "date": "2025-01-06T09:00:00.000Z" }
        ]))
        .into_response(),
        (Method::GET, "/instrument" | "/order" | "/position" | "/user/wallet" | "/user/margin") => {
            Json(json!([{ "path": path, "query": query }])).into_response()
        }
        (Method::GET, "/instrument/active") => {
            Json(json!([{ "symbol": "XBTUSD" }])).into_response()
        }
        (Method::GET, "/rate-limited") if call_count == 1 => (
            StatusCode::TOO_MANY_REQUESTS,
            [
                (HEADER_RATELIMIT_RESET, (unix_secs_now() + 2).to_string()),
                (HEADER_RATELIMIT_REMAINING, "0".to_string()),
            ],
            Json(json!({
                "error": { "message": "Rate limit exceeded, retry in 1 seconds.", "name": "RateLimitError" }
            })),
        )
            .into_response(),
        (Method::GET, "/retry-after") if call_count == 1 => (
            StatusCode::TOO_MANY_REQUESTS,
            [(HEADER_RETRY_AFTER, "1".to_string())],
            Json(json!({
                "error": { "message": "Rate limit exceeded", "name": "RateLimitError" }
            })),
        )
            .into_response(),
        (Method::GET, "/rate-limited" | "/retry-after") => Json(json!([])).into_response(),
        (Method::GET, "/maintenance") if call_count <= 2 => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "HTTPError",
            "The system is currently overloaded. Please try again later.",
        ),
        (Method::GET, "/maintenance") => Json(json!({ "ok": true })).into_response(),
        (Method::GET, "/slow") => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({ "ok": true })).into_response()
        }
        (Method::GET, "/unauthorized") => {
            error_response(StatusCode::UNAUTHORIZED, "HTTPError", "Invalid API Key.")
        }
        (Method::GET, "/forbidden") => {
            error_response(StatusCode::FORBIDDEN, "HTTPError", "Access Denied")
        }
        (Method::GET, "/server-error") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream failure").into_response()
        }
        (Method::GET, "/empty") => StatusCode::OK.into_response(),
        (Method::GET, "/malformed") => (StatusCode::OK, "not json").into_response(),
        (Method::POST, "/order") => {
            let order: Value = serde_json::from_str(&body).unwrap_or_default();
            if order["symbol"] == "XBTBROKE" {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "ValidationError",
                    "Account has insufficient Available Balance, 1000 XBt required",
                );
            }
            if order.get("orderQty").is_none() {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "ValidationError",
                    "orderQty is required",
                );
            }
            Json(json!({
                "orderID": "new-order-id-12345",
                "clOrdID": order["clOrdID"],
                "symbol": order["symbol"],
                "orderQty": order["orderQty"],
                "ordStatus": "New",
            }))
            .into_response()
        }
        (Method::PUT, "/order") | (Method::DELETE, "/order" | "/order/all") => {
            let request: Value = serde_json::from_str(&body).unwrap_or_default();
            Json(json!([{ "request": request, "ordStatus": "Canceled" }])).into_response()
        }
        _ => error_response(StatusCode::NOT_FOUND, "HTTPError", "Not Found"),
    }
}

async fn start_test_server() -> (SocketAddr, TestServerState) {
    // Bind to port 0 to let the OS assign an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = TestServerState::default();
    let router = Router::new()
        .fallback(handle_request)
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, state)
}

fn test_config(addr: SocketAddr) -> BitmexHttpConfig {
    BitmexHttpConfig {
        base_url: Some(format!("http://{addr}{API_PREFIX}")),
        order_id_prefix: "test_".to_string(),
        retry_delay_maintenance_ms: 10,
        retry_delay_connection_ms: 10,
        ..BitmexHttpConfig::new(API_KEY, API_SECRET)
    }
}

async fn test_client() -> (BitmexHttpClient, TestServerState) {
    let (addr, state) = start_test_server().await;
    let client = BitmexHttpClient::new(&test_config(addr)).unwrap();
    (client, state)
}

#[rstest]
#[tokio::test]
async fn test_get_announcements() {
    let (client, state) = test_client().await;

    let response = client
        .inner()
        .execute_with_outcome(
            Method::GET,
            "/announcement",
            None,
            None,
            RequestOptions::new(),
        )
        .await
        .unwrap();

    let announcements = response.body.as_array().unwrap();
    assert_eq!(announcements.len(), 2);
    assert_eq!(announcements[0]["title"], "Maintenance");
    assert_eq!(response.requests_issued, 1);
    assert_eq!(response.retry_state.attempts(), 0);
    assert_eq!(response.retry_state.rate_limit_waits(), 0);

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].signature_valid);
    assert_eq!(requests[0].body, "");
    assert_eq!(
        requests[0].user_agent.as_deref(),
        Some(BITMEX_REST_USER_AGENT)
    );
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json")
    );
}

#[rstest]
#[tokio::test]
async fn test_expires_uses_configured_offset() {
    let (client, state) = test_client().await;
    let before = unix_secs_now();

    client.get_api_info().await.unwrap();

    let requests = state.requests().await;
    assert!(requests[0].expires >= before + 60);
    assert!(requests[0].expires <= unix_secs_now() + 60);
}

#[rstest]
#[tokio::test]
async fn test_rate_limit_waits_for_reset_and_resigns() {
    let (client, state) = test_client().await;
    let start = Instant::now();

    // A zero budget still allows rate limit waits
    let response = client
        .inner()
        .execute_with_outcome(
            Method::GET,
            "/rate-limited",
            None,
            None,
            RequestOptions::new(),
        )
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(900));
    assert_eq!(response.body, json!([]));
    assert_eq!(response.requests_issued, 2);
    assert_eq!(response.retry_state.attempts(), 0);

    let requests = state.requests_to("/rate-limited").await;
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.signature_valid));
    assert!(requests[1].expires > requests[0].expires);
    assert_ne!(requests[0].signature, requests[1].signature);
}

#[rstest]
#[tokio::test]
async fn test_rate_limit_falls_back_to_retry_after() {
    let (client, state) = test_client().await;
    let start = Instant::now();

    let value = client
        .execute(
            Method::GET,
            "/retry-after",
            None,
            None,
            RequestOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(value, json!([]));
    assert!(start.elapsed() >= Duration::from_millis(950));
    assert_eq!(state.requests_to("/retry-after").await.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_unauthorized_terminates_session() {
    let (client, state) = test_client().await;

    let result = client
        .execute(
            Method::GET,
            "/unauthorized",
            None,
            None,
            RequestOptions::new().with_max_retries(3),
        )
        .await;

    match result {
        Err(BitmexHttpError::FatalSession {
            kind,
            status,
            message,
        }) => {
            assert_eq!(kind, BitmexFatalKind::Authentication);
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid API Key.");
        }
        other => panic!("Expected fatal session error, was {other:?}"),
    }
    assert!(client.is_closed());

    // An endpoint which would succeed now fails fast without touching the network
    let result = client.get_announcements().await;
    assert!(matches!(result, Err(BitmexHttpError::SessionClosed)));

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_forbidden_is_client_error_and_keeps_session() {
    let (client, state) = test_client().await;

    let result = client
        .execute(Method::GET, "/forbidden", None, None, RequestOptions::new())
        .await;

    match result {
        Err(BitmexHttpError::ClientRequest {
            status, message, ..
        }) => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(message, "Access Denied");
        }
        other => panic!("Expected client request error, was {other:?}"),
    }
    assert!(!client.is_closed());

    // The session stays usable for later calls
    let announcements = client.get_announcements().await.unwrap();
    assert!(announcements.is_array());

    let requests = state.requests().await;
    assert_eq!(requests.len(), 2);
}

#[rstest]
#[case(0, 1)]
#[case(3, 4)]
#[tokio::test]
async fn test_timeout_retries_within_budget(
    #[case] max_retries: u32,
    #[case] expected_requests: usize,
) {
    let (client, state) = test_client().await;

    let options = RequestOptions::new()
        .with_max_retries(max_retries)
        .with_timeout(Duration::from_millis(50));
    let result = client
        .execute(Method::GET, "/slow", None, None, options)
        .await;

    match result {
        Err(BitmexHttpError::RetryBudgetExceeded {
            method,
            path,
            attempts,
            source,
        }) => {
            assert_eq!(method, Method::GET);
            assert_eq!(path, "/slow");
            assert_eq!(attempts, max_retries);
            assert!(matches!(
                *source,
                BitmexError::Retryable {
                    source: BitmexRetryableError::Timeout { .. },
                    ..
                }
            ));
        }
        other => panic!("Expected retry budget exceeded, was {other:?}"),
    }

    assert_eq!(state.requests_to("/slow").await.len(), expected_requests);
    assert!(!client.is_closed());
}

#[rstest]
#[tokio::test]
async fn test_maintenance_is_retried() {
    let (client, state) = test_client().await;

    let response = client
        .inner()
        .execute_with_outcome(
            Method::GET,
            "/maintenance",
            None,
            None,
            RequestOptions::new().with_max_retries(3),
        )
        .await
        .unwrap();

    assert_eq!(response.body, json!({ "ok": true }));
    assert_eq!(response.requests_issued, 3);
    assert_eq!(response.retry_state.attempts(), 0);

    let requests = state.requests_to("/maintenance").await;
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.signature_valid));
}

#[rstest]
#[tokio::test]
async fn test_maintenance_exhausts_budget() {
    let (client, state) = test_client().await;

    let result = client
        .execute(
            Method::GET,
            "/maintenance",
            None,
            None,
            RequestOptions::new().with_max_retries(1),
        )
        .await;

    assert!(matches!(
        result,
        Err(BitmexHttpError::RetryBudgetExceeded { attempts: 1, .. })
    ));
    assert_eq!(state.requests_to("/maintenance").await.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_connection_refused_exhausts_budget() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BitmexHttpClient::new(&test_config(addr)).unwrap();
    let result = client
        .execute(
            Method::GET,
            "/announcement",
            None,
            None,
            RequestOptions::new().with_max_retries(2),
        )
        .await;

    match result {
        Err(BitmexHttpError::RetryBudgetExceeded {
            attempts, source, ..
        }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(
                *source,
                BitmexError::Retryable {
                    source: BitmexRetryableError::TemporaryNetwork { .. },
                    ..
                }
            ));
        }
        other => panic!("Expected retry budget exceeded, was {other:?}"),
    }
    assert!(!client.is_closed());
}

#[rstest]
#[tokio::test]
async fn test_server_error_is_not_retried() {
    let (client, state) = test_client().await;

    let result = client
        .execute(
            Method::GET,
            "/server-error",
            None,
            None,
            RequestOptions::new().with_max_retries(3),
        )
        .await;

    match result {
        Err(BitmexHttpError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "upstream failure");
        }
        other => panic!("Expected unexpected status, was {other:?}"),
    }
    assert_eq!(state.requests_to("/server-error").await.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_not_found_is_client_error() {
    let (client, state) = test_client().await;

    let result = client
        .execute(
            Method::GET,
            "/no-such-endpoint",
            None,
            None,
            RequestOptions::new().with_max_retries(3),
        )
        .await;

    assert!(matches!(
        result,
        Err(BitmexHttpError::ClientRequest {
            status: StatusCode::NOT_FOUND,
            ..
        })
    ));
    assert_eq!(state.requests().await.len(), 1);
    assert!(!client.is_closed());
}

#[rstest]
#[tokio::test]
async fn test_empty_and_malformed_bodies() {
    let (client, _state) = test_client().await;

    let value = client
        .execute(Method::GET, "/empty", None, None, RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(value, Value::Null);

    let result = client
        .execute(Method::GET, "/malformed", None, None, RequestOptions::new())
        .await;
    assert!(matches!(result, Err(BitmexHttpError::JsonError(_))));
}

#[rstest]
#[tokio::test]
async fn test_place_order_generates_client_order_id() {
    let (client, state) = test_client().await;

    let params = PostOrderParamsBuilder::default()
        .side(BitmexSide::Buy)
        .order_qty(100u32)
        .price(50_000.0)
        .ord_type(BitmexOrderType::Limit)
        .build()
        .unwrap();
    let order = client.place_order(params).await.unwrap();

    assert_eq!(order["orderID"], "new-order-id-12345");
    assert_eq!(order["symbol"], "XBTUSD");
    let cl_ord_id = order["clOrdID"].as_str().unwrap();
    assert!(cl_ord_id.starts_with("test_"));
    assert_eq!(cl_ord_id.len(), "test_".len() + 22);

    // The signed body is exactly the transmitted body
    let requests = state.requests_to("/order").await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].signature_valid);
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["clOrdID"], cl_ord_id);
    assert_eq!(sent["ordType"], "Limit");
}

#[rstest]
#[tokio::test]
async fn test_place_order_keeps_client_order_id() {
    let (client, _state) = test_client().await;

    let params = PostOrderParamsBuilder::default()
        .symbol("ETHUSD")
        .order_qty(1u32)
        .cl_ord_id("my-id")
        .build()
        .unwrap();
    let order = client.place_order(params).await.unwrap();

    assert_eq!(order["clOrdID"], "my-id");
    assert_eq!(order["symbol"], "ETHUSD");
}

#[rstest]
#[tokio::test]
async fn test_place_order_insufficient_balance_is_fatal() {
    let (client, state) = test_client().await;

    let params = PostOrderParamsBuilder::default()
        .symbol("XBTBROKE")
        .order_qty(1_000u32)
        .build()
        .unwrap();
    let result = client.place_order(params).await;

    match result {
        Err(BitmexHttpError::FatalSession { kind, status, .. }) => {
            assert_eq!(kind, BitmexFatalKind::InsufficientBalance);
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        other => panic!("Expected fatal session error, was {other:?}"),
    }
    assert!(client.is_closed());
    assert_eq!(state.requests().await.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_place_order_validation_error_is_client_error() {
    let (client, _state) = test_client().await;

    let params = PostOrderParamsBuilder::default()
        .symbol("XBTUSD")
        .build()
        .unwrap();
    let result = client.place_order(params).await;

    match result {
        Err(BitmexHttpError::ClientRequest {
            status,
            error_name,
            message,
        }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(error_name, "ValidationError");
            assert_eq!(message, "orderQty is required");
        }
        other => panic!("Expected client request error, was {other:?}"),
    }
    assert!(!client.is_closed());
}

#[rstest]
#[tokio::test]
async fn test_signed_path_includes_query() {
    let (client, state) = test_client().await;

    let params = GetOrderParamsBuilder::default()
        .symbol("XBTUSD")
        .count(10u32)
        .build()
        .unwrap();
    let orders = client.get_orders(params).await.unwrap();
    assert_eq!(orders[0]["query"], "symbol=XBTUSD&count=10");

    let requests = state.requests_to("/order").await;
    assert_eq!(requests[0].path_and_query, "/api/v1/order?symbol=XBTUSD&count=10");
    assert!(requests[0].signature_valid);
}

#[rstest]
#[tokio::test]
async fn test_get_open_orders_filter() {
    let (client, state) = test_client().await;

    let orders = client.get_open_orders(None).await.unwrap();
    assert_eq!(
        orders[0]["query"],
        "symbol=XBTUSD&filter=%7B%22open%22%3Atrue%7D"
    );
    assert!(state.requests().await[0].signature_valid);
}

#[rstest]
#[case("/instrument", "symbol=XBTUSD")]
#[case("/user/wallet", "currency=XBt")]
#[case("/user/margin", "currency=XBt")]
#[tokio::test]
async fn test_read_endpoints(#[case] path: &str, #[case] expected_query: &str) {
    let (client, _state) = test_client().await;

    let value = match path {
        "/instrument" => client.get_instrument(None).await,
        "/user/wallet" => client.get_wallet("XBt").await,
        _ => client.get_margin("XBt").await,
    }
    .unwrap();

    assert_eq!(value[0]["path"], path);
    assert_eq!(value[0]["query"], expected_query);
}

#[rstest]
#[tokio::test]
async fn test_amend_and_cancel_orders() {
    let (client, state) = test_client().await;

    let params = PutOrderParamsBuilder::default()
        .order_id("abc")
        .price(51_000.0)
        .build()
        .unwrap();
    let amended = client.amend_order(params).await.unwrap();
    assert_eq!(amended[0]["request"]["orderID"], "abc");

    let params = bitmex_rest::http::query::DeleteOrderParamsBuilder::default()
        .cl_ord_id(vec!["test_1".to_string()])
        .build()
        .unwrap();
    let canceled = client.cancel_orders(params).await.unwrap();
    assert_eq!(canceled[0]["request"]["clOrdID"], json!(["test_1"]));

    let params = bitmex_rest::http::query::DeleteAllOrdersParamsBuilder::default()
        .symbol("XBTUSD")
        .build()
        .unwrap();
    client.cancel_all_orders(params).await.unwrap();

    let requests = state.requests().await;
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.signature_valid));
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[2].path_and_query, "/api/v1/order/all");
}

#[rstest]
#[tokio::test]
async fn test_concurrent_calls_have_independent_budgets() {
    let (client, state) = test_client().await;

    let slow = client.execute(
        Method::GET,
        "/slow",
        None,
        None,
        RequestOptions::new()
            .with_max_retries(1)
            .with_timeout(Duration::from_millis(50)),
    );
    let announcements = client.get_announcements();
    let active = client.get_active_instruments();

    let (slow, announcements, active) = tokio::join!(slow, announcements, active);

    assert!(matches!(
        slow,
        Err(BitmexHttpError::RetryBudgetExceeded { attempts: 1, .. })
    ));
    assert!(announcements.is_ok());
    assert_eq!(active.unwrap()[0]["symbol"], "XBTUSD");
    assert_eq!(state.requests_to("/slow").await.len(), 2);
}
