// SPDX-License-Identifier: AGPL-3.0-or-later
//! Invoking-user lookups

use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

const USER_VAR: &str = "USER";

/// Name of the invoking user, taken from `$USER`
pub fn get_username() -> Result<String> {
    username_from(std::env::var(USER_VAR).ok())
}

fn username_from(value: Option<String>) -> Result<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(SetupError::EnvironmentMissing {
            var: USER_VAR.to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// Home directory for `username` under `/home`.
///
/// Leading and trailing separators are dropped so the result always starts
/// with `/home/`. The name is otherwise joined as-is; `..` is not rejected.
pub fn get_home_path(username: &str) -> PathBuf {
    Path::new("/").join("home").join(username.trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_missing() {
        assert!(matches!(
            username_from(None),
            Err(SetupError::EnvironmentMissing { .. })
        ));
    }

    #[test]
    fn test_username_empty_or_blank() {
        assert!(username_from(Some(String::new())).is_err());
        assert!(username_from(Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_username_trimmed() {
        assert_eq!(username_from(Some("  alice ".to_string())).unwrap(), "alice");
    }

    #[test]
    fn test_home_path() {
        assert_eq!(get_home_path("alice"), PathBuf::from("/home/alice"));
        assert_eq!(get_home_path("alice").to_str(), Some("/home/alice"));
    }

    #[test]
    fn test_home_path_stays_under_home() {
        assert_eq!(get_home_path("/root").to_str(), Some("/home/root"));
        assert_eq!(get_home_path("alice/").to_str(), Some("/home/alice"));
        assert_eq!(get_home_path("//alice//").to_str(), Some("/home/alice"));
        assert!(get_home_path("/root").starts_with("/home"));
    }

    #[test]
    fn test_home_path_does_not_resolve_parent() {
        // known gap: traversal is passed through untouched
        assert_eq!(get_home_path("..").to_str(), Some("/home/.."));
    }
}
