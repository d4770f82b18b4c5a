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

//! Core constants shared across the BitMEX client components.

pub const BITMEX_HTTP_URL: &str = "https://www.bitmex.com/api/v1";
pub const BITMEX_HTTP_TESTNET_URL: &str = "https://testnet.bitmex.com/api/v1";

pub const BITMEX_DEFAULT_SYMBOL: &str = "XBTUSD";

/// Authentication header carrying the request expiry (UNIX seconds).
pub const HEADER_API_EXPIRES: &str = "api-expires";
/// Authentication header carrying the public API key.
pub const HEADER_API_KEY: &str = "api-key";
/// Authentication header carrying the hex encoded HMAC-SHA256 signature.
pub const HEADER_API_SIGNATURE: &str = "api-signature";

/// Rate limit header carrying the UNIX second at which the limit resets.
pub const HEADER_RATELIMIT_RESET: &str = "x-ratelimit-reset";
/// Rate limit header carrying the number of requests left in the window.
pub const HEADER_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
/// Standard header carrying the number of seconds to wait before retrying.
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Default number of seconds a signed request stays valid for.
pub const DEFAULT_EXPIRES_OFFSET_SECS: i64 = 60;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Maximum length of the client order id prefix.
///
/// BitMEX accepts client order ids of up to 36 characters and the generated suffix is
/// 22 characters long.
pub const MAX_ORDER_ID_PREFIX_LEN: usize = 13;

pub const DEFAULT_ORDER_ID_PREFIX: &str = "bitmex_rest";

/// Fallback marker for balance exhaustion rejections.
///
/// BitMEX error bodies carry no stable error code, so this case-insensitive substring is
/// matched against the error message instead.
pub const INSUFFICIENT_BALANCE_MESSAGE: &str = "insufficient available balance";
