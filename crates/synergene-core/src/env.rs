// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;
use tracing::warn;

#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

/// Reads `name` through `parse`. Unset falls back silently; a set value that fails to
/// parse falls back with a warning.
fn env_parsed<T, F>(name: &str, default: T, parse: F) -> T
where
    T: std::fmt::Debug,
    F: FnOnce(&str) -> Option<T>,
{
    let Ok(raw) = env::var(name) else {
        return default;
    };
    match parse(&raw) {
        Some(value) => value,
        None => {
            warn!(
                variable = name,
                value = %raw,
                default = ?default,
                "ignoring unparseable environment value"
            );
            default
        }
    }
}

#[must_use]
pub fn env_bool(name: &str, default: bool) -> bool {
    env_parsed(name, default, parse_bool)
}

#[must_use]
pub fn env_u64(name: &str, default: u64) -> u64 {
    env_parsed(name, default, |v| v.trim().parse::<u64>().ok())
}

#[must_use]
pub fn env_usize(name: &str, default: usize) -> usize {
    env_parsed(name, default, |v| v.trim().parse::<usize>().ok())
}

/// Blank values fall back to `default`.
#[must_use]
pub fn env_path(name: &str, default: &str) -> PathBuf {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => PathBuf::from(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{env_bool, env_path, env_u64, env_usize, parse_bool};

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" yes "), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn unset_variables_use_defaults() {
        assert_eq!(env_u64("SYNERGENE_TEST_UNSET_NUMBER", 42), 42);
        assert_eq!(
            env_path("SYNERGENE_TEST_UNSET_PATH", "synergene.sqlite"),
            std::path::PathBuf::from("synergene.sqlite")
        );
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        std::env::set_var("SYNERGENE_TEST_BAD_BATCH_SIZE", "abc");
        std::env::set_var("SYNERGENE_TEST_BAD_DELAY", "-5");
        std::env::set_var("SYNERGENE_TEST_BAD_FLAG", "maybe");
        assert_eq!(env_usize("SYNERGENE_TEST_BAD_BATCH_SIZE", 100), 100);
        assert_eq!(env_u64("SYNERGENE_TEST_BAD_DELAY", 1000), 1000);
        assert!(!env_bool("SYNERGENE_TEST_BAD_FLAG", false));
    }

    #[test]
    fn set_values_are_trimmed_and_parsed() {
        std::env::set_var("SYNERGENE_TEST_GOOD_BATCH_SIZE", " 250 ");
        assert_eq!(env_usize("SYNERGENE_TEST_GOOD_BATCH_SIZE", 100), 250);
    }
}
