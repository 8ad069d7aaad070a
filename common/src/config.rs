//! Environment variable parsing helpers
//!
//! Provides ergonomic helpers for reading configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGOSH_BIN: &str = "mongosh";

/// Extension trait for parsing environment variables.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let uri = String::env_or("MONGO_URI", "mongodb://localhost:27017");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get a required environment variable, returning an error if not set.
    fn env_required(name: &str) -> Result<String> {
        env::var(name).context(format!("{} must be set", name))
    }

    /// Returns `true` if the value is "true" or "1" (case-insensitive),
    /// `false` for any other set value, otherwise `default`.
    fn env_bool(name: &str, default: bool) -> bool {
        env::var(name)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(default)
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

impl<T> ConfigExt for T {}

/// Connection settings for the target MongoDB server.
pub struct MongoEnv;

impl MongoEnv {
    /// Connection string handed to the shell.
    pub fn uri() -> String {
        String::env_or("MONGO_URI", DEFAULT_MONGO_URI)
    }

    /// Shell executable, `mongosh` unless overridden.
    pub fn shell_bin() -> String {
        String::env_or("MONGOSH_BIN", DEFAULT_MONGOSH_BIN)
    }

    /// Whether created users are read back and checked after the run.
    pub fn verify_enabled() -> bool {
        bool::env_bool("MONGO_INIT_VERIFY", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_to_default() {
        assert_eq!(
            String::env_or("MONGO_INIT_TEST_UNSET_VAR", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_env_required_names_missing_variable() {
        let err = String::env_required("MONGO_INIT_TEST_REQUIRED_VAR").unwrap_err();
        assert!(err.to_string().contains("MONGO_INIT_TEST_REQUIRED_VAR must be set"));
    }

    #[test]
    fn test_env_bool_accepts_true_and_one() {
        env::set_var("MONGO_INIT_TEST_BOOL_TRUE", "TRUE");
        env::set_var("MONGO_INIT_TEST_BOOL_ONE", "1");
        env::set_var("MONGO_INIT_TEST_BOOL_NO", "no");

        assert!(bool::env_bool("MONGO_INIT_TEST_BOOL_TRUE", false));
        assert!(bool::env_bool("MONGO_INIT_TEST_BOOL_ONE", false));
        assert!(!bool::env_bool("MONGO_INIT_TEST_BOOL_NO", true));
        assert!(bool::env_bool("MONGO_INIT_TEST_BOOL_UNSET", true));
    }

    #[test]
    fn test_env_parse_ignores_garbage() {
        env::set_var("MONGO_INIT_TEST_PARSE", "not-a-number");
        assert_eq!(u64::env_parse("MONGO_INIT_TEST_PARSE", 7), 7);
    }
}
