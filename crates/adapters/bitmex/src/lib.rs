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

//! Authenticated REST client for the [BitMEX](https://bitmex.com) derivatives exchange.
//!
//! The `bitmex-rest` crate signs, executes and classifies requests against the BitMEX REST
//! API. Its core is the request execution engine in [`http::client`], which:
//!
//! - Signs every attempt afresh with the `api-expires`, `api-key` and `api-signature` headers.
//! - Waits out rate limits (HTTP 429) for as long as the server asks.
//! - Retries maintenance windows, timeouts and connection failures within a per-call budget.
//! - Tears the session down on unrecoverable failures (HTTP 401, balance exhaustion).
//!
//! The official BitMEX API reference can be found at <https://www.bitmex.com/api/explorer/>.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod error;
pub mod http;

// Re-exports
pub use crate::{
    common::credential::Credential,
    config::BitmexHttpConfig,
    error::BitmexConfigError,
    http::{
        client::{BitmexHttpClient, BitmexHttpInnerClient, BitmexResponse, RequestOptions},
        error::BitmexHttpError,
    },
};
