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

//! BitMEX request signing primitives.
//!
//! A signature is `HEX(HMAC_SHA256(secret, verb + path + expires + data))` where `path` is
//! the URL path plus the literal query string (scheme, host and fragment removed) and
//! `data` is the exact request body sent over the wire.
//!
//! For example:
//!
//! ```text
//! verb=POST
//! url=/api/v1/order
//! expires=1518064238
//! data={"symbol":"XBTM15","price":219.0,"clOrdID":"mm_bitmex_1a/oemUeQ4CAJZgP3fjHsA","orderQty":98}
//! signature=HEX(HMAC_SHA256(secret, 'POST/api/v1/order1518064238{"symbol":"XBTM15",...}'))
//! ```

use std::collections::HashMap;

use aws_lc_rs::hmac;
use bitmex_rest_core::datetime::unix_secs_now;

use super::{
    consts::{
        DEFAULT_EXPIRES_OFFSET_SECS, HEADER_API_EXPIRES, HEADER_API_KEY, HEADER_API_SIGNATURE,
    },
    credential::Credential,
};
use crate::error::BitmexConfigError;

/// Returns a UNIX timestamp `offset_secs` seconds in the future.
///
/// `offset_secs` defaults to [`DEFAULT_EXPIRES_OFFSET_SECS`].
///
/// # Errors
///
/// Returns [`BitmexConfigError::InvalidExpiresOffset`] if `offset_secs` is less than 1.
pub fn generate_expires(offset_secs: Option<i64>) -> Result<i64, BitmexConfigError> {
    let offset = offset_secs.unwrap_or(DEFAULT_EXPIRES_OFFSET_SECS);
    if offset < 1 {
        return Err(BitmexConfigError::InvalidExpiresOffset(offset));
    }
    Ok(unix_secs_now() + offset)
}

/// Returns the portion of `url` which participates in signing.
///
/// Absolute URLs lose their scheme and host, the fragment is always dropped, and the query
/// string is kept exactly as given. A dangling `?` with no query is dropped.
#[must_use]
pub fn signing_path(url: &str) -> &str {
    let url = url.split_once('#').map_or(url, |(head, _)| head);

    let path = match url.find("://") {
        Some(idx) => {
            let authority_and_path = &url[idx + 3..];
            authority_and_path
                .find(['/', '?'])
                .map_or("", |pos| &authority_and_path[pos..])
        }
        None => url,
    };

    path.strip_suffix('?').unwrap_or(path)
}

/// Generates the hex encoded HMAC-SHA256 signature for a BitMEX request.
///
/// `verb` must be uppercase and `data` must be the exact body text which will be sent
/// (empty for requests without a body); no normalization is applied.
#[must_use]
pub fn generate_signature(secret: &[u8], verb: &str, url: &str, expires: i64, data: &str) -> String {
    let path = signing_path(url);
    let expires = expires.to_string();

    let mut message = Vec::with_capacity(verb.len() + path.len() + expires.len() + data.len());
    message.extend_from_slice(verb.as_bytes());
    message.extend_from_slice(path.as_bytes());
    message.extend_from_slice(expires.as_bytes());
    message.extend_from_slice(data.as_bytes());

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    let tag = hmac::sign(&key, &message);
    hex::encode(tag.as_ref())
}

/// The three authentication headers attached to every signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthHeaders {
    /// UNIX second after which the request is rejected.
    pub expires: i64,
    /// The public API key.
    pub api_key: String,
    /// The hex encoded request signature.
    pub signature: String,
}

impl AuthHeaders {
    /// Inserts the authentication headers into `headers`.
    pub fn insert_into(&self, headers: &mut HashMap<String, String>) {
        headers.insert(HEADER_API_EXPIRES.to_string(), self.expires.to_string());
        headers.insert(HEADER_API_KEY.to_string(), self.api_key.clone());
        headers.insert(HEADER_API_SIGNATURE.to_string(), self.signature.clone());
    }

    /// Returns the authentication headers as a map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut headers = HashMap::with_capacity(3);
        self.insert_into(&mut headers);
        headers
    }
}

/// Generates ready-to-use authentication headers with a fresh expiry.
///
/// # Errors
///
/// Returns [`BitmexConfigError::InvalidExpiresOffset`] if `offset_secs` is less than 1.
pub fn generate_auth_headers(
    credential: &Credential,
    verb: &str,
    url: &str,
    data: &str,
    offset_secs: Option<i64>,
) -> Result<AuthHeaders, BitmexConfigError> {
    let expires = generate_expires(offset_secs)?;
    Ok(credential.auth_headers(verb, url, expires, data))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
