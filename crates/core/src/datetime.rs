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

//! Wall-clock helpers expressed in UNIX time.

use std::time::Duration;

use chrono::Utc;

/// Number of milliseconds in one second.
pub const MILLISECONDS_IN_SECOND: i64 = 1_000;

/// Returns the current UNIX timestamp in whole seconds.
#[must_use]
pub fn unix_secs_now() -> i64 {
    Utc::now().timestamp()
}

/// Returns the current UNIX timestamp in milliseconds.
#[must_use]
pub fn unix_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns the duration from `now_millis` until the UNIX second `target_secs`.
///
/// Targets in the past yield [`Duration::ZERO`].
#[must_use]
pub fn duration_until_unix_secs(target_secs: i64, now_millis: i64) -> Duration {
    let target_millis = target_secs.saturating_mul(MILLISECONDS_IN_SECOND);
    let remaining = target_millis.saturating_sub(now_millis);
    Duration::from_millis(u64::try_from(remaining).unwrap_or(0))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
