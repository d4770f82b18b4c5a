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

//! Call-scoped retry accounting and fixed backoff delays.
//!
//! Every logical call owns its own [`RetryState`]; nothing here is shared between calls, so
//! one call's failures can never consume another call's retry budget.

use std::time::Duration;

/// Fixed delays applied between attempts, by transient condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after a transport timeout (default: retry immediately).
    pub timeout_delay: Duration,
    /// Delay after the upstream reports maintenance (HTTP 503).
    pub maintenance_delay: Duration,
    /// Delay after a connection failure.
    pub connection_delay: Duration,
    /// Delay after a rate limit response which carries no usable reset hint.
    pub rate_limit_fallback_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_delay: Duration::ZERO,
            maintenance_delay: Duration::from_millis(2_500),
            connection_delay: Duration::from_millis(1_000),
            rate_limit_fallback_delay: Duration::from_millis(1_000),
        }
    }
}

impl RetryPolicy {
    /// Creates a new [`RetryPolicy`] with the given maintenance and connection delays.
    #[must_use]
    pub fn new(maintenance_delay: Duration, connection_delay: Duration) -> Self {
        Self {
            maintenance_delay,
            connection_delay,
            ..Self::default()
        }
    }
}

/// Retry accounting for a single logical call.
///
/// `attempts` counts retries charged to the caller's budget. Rate limit waits are tracked
/// separately because the server dictates them and they are never charged to the budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    max_retries: u32,
    rate_limit_waits: u32,
}

impl RetryState {
    /// Creates a new [`RetryState`] allowing up to `max_retries` charged retries.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            attempts: 0,
            max_retries,
            rate_limit_waits: 0,
        }
    }

    /// Returns the number of retries charged so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the number of rate limit waits so far.
    #[must_use]
    pub const fn rate_limit_waits(&self) -> u32 {
        self.rate_limit_waits
    }

    /// Returns the total number of requests issued so far, counting the initial one.
    #[must_use]
    pub const fn requests_issued(&self) -> u32 {
        1 + self.attempts + self.rate_limit_waits
    }

    /// Returns `true` if another charged retry is permitted.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        self.attempts < self.max_retries
    }

    /// Charges one retry against the budget.
    ///
    /// Returns `false` without charging when the budget is exhausted.
    pub const fn record_retry(&mut self) -> bool {
        if !self.can_retry() {
            return false;
        }
        self.attempts += 1;
        true
    }

    /// Records a server-mandated rate limit wait.
    pub const fn record_rate_limit_wait(&mut self) {
        self.rate_limit_waits += 1;
    }

    /// Resets the counters, keeping the budget.
    pub const fn reset(&mut self) {
        self.attempts = 0;
        self.rate_limit_waits = 0;
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
