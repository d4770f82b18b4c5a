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

//! Environment variable helpers.

/// Returns the environment variable for the given `key`.
///
/// # Errors
///
/// Returns an error if the environment variable is not set.
pub fn get_env_var(key: &str) -> anyhow::Result<String> {
    match std::env::var(key) {
        Ok(var) => Ok(var),
        Err(_) => anyhow::bail!("environment variable '{key}' must be set"),
    }
}

/// Returns the provided `value` if `Some`, otherwise falls back to the environment variable `key`.
///
/// Returns `None` when neither source yields a value.
#[must_use]
pub fn get_or_env_var_opt(value: Option<String>, key: &str) -> Option<String> {
    value.or_else(|| std::env::var(key).ok())
}

/// Parses an optional boolean flag from the environment variable `key`.
///
/// Accepts `1`, `true` and `yes` (case-insensitive) as true; anything else, including
/// an unset variable, is false.
#[must_use]
pub fn get_env_flag(key: &str) -> bool {
    std::env::var(key)
        .is_ok_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_get_env_var_missing() {
        let result = get_env_var("BITMEX_REST_TEST_DEFINITELY_UNSET_VAR");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "environment variable 'BITMEX_REST_TEST_DEFINITELY_UNSET_VAR' must be set"
        );
    }

    #[rstest]
    fn test_get_env_var_present() {
        // PATH is set in every supported test environment
        assert!(get_env_var("PATH").is_ok());
    }

    #[rstest]
    fn test_get_or_env_var_opt_prefers_value() {
        let result = get_or_env_var_opt(Some("explicit".to_string()), "PATH");
        assert_eq!(result.as_deref(), Some("explicit"));
    }

    #[rstest]
    fn test_get_or_env_var_opt_none_when_unset() {
        let result = get_or_env_var_opt(None, "BITMEX_REST_TEST_DEFINITELY_UNSET_VAR");
        assert!(result.is_none());
    }

    #[rstest]
    fn test_get_env_flag_unset_is_false() {
        assert!(!get_env_flag("BITMEX_REST_TEST_DEFINITELY_UNSET_VAR"));
    }
}
