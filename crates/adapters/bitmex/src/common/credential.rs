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

//! BitMEX API credential storage.

#![allow(unused_assignments)] // Fields are used in methods, false positive from nightly

use std::fmt::Debug;

use ustr::Ustr;
use zeroize::ZeroizeOnDrop;

use super::signing::{AuthHeaders, generate_signature};

/// API credentials required for signing BitMEX REST requests.
///
/// The secret is zeroized on drop, and neither the key nor the secret is printed.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credential {
    #[zeroize(skip)]
    api_key: Ustr,
    api_secret: Box<[u8]>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credential))
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credential {
    /// Creates a new [`Credential`] instance from the API key and secret.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let api_secret_bytes = api_secret.into().into_bytes();

        Self {
            api_key: Ustr::from(api_key.as_str()),
            api_secret: api_secret_bytes.into_boxed_slice(),
        }
    }

    /// Returns the API key associated with this credential.
    #[must_use]
    pub fn api_key(&self) -> &Ustr {
        &self.api_key
    }

    /// Signs a request with the stored secret.
    ///
    /// See [`generate_signature`] for the message layout.
    #[must_use]
    pub fn sign(&self, verb: &str, url: &str, expires: i64, body: &str) -> String {
        generate_signature(&self.api_secret, verb, url, expires, body)
    }

    /// Builds the authentication headers for a request expiring at `expires`.
    #[must_use]
    pub fn auth_headers(&self, verb: &str, url: &str, expires: i64, body: &str) -> AuthHeaders {
        AuthHeaders {
            expires,
            api_key: self.api_key.to_string(),
            signature: self.sign(verb, url, expires, body),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
