use std::env;
use std::str::FromStr;

use super::types::{ConfigError, Environment};

/// Trimmed value of `key`; unset and blank are the same.
pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

/// Parses `key` as `T`, falling back to `default` when unset.
pub(super) fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env_optional(key) {
        Some(value) => {
            value.parse::<T>().map_err(|_| ConfigError::InvalidValue { field: key, value })
        }
        None => Ok(default),
    }
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub(super) fn env_flag(key: &str, default: bool) -> bool {
    env_optional(key).map(|value| parse_bool(&value)).unwrap_or(default)
}

pub(super) fn environment_from(value: Option<&str>) -> Environment {
    let Some(value) = value else {
        return Environment::Development;
    };
    match value.to_ascii_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "staging" => Environment::Staging,
        "test" | "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_common_truthy_spellings() {
        for truthy in ["1", "true", "TRUE", "Yes", "on"] {
            assert!(parse_bool(truthy), "{truthy}");
        }
        for falsy in ["0", "false", "off", "nope"] {
            assert!(!parse_bool(falsy), "{falsy}");
        }
    }

    #[test]
    fn environment_aliases() {
        assert_eq!(environment_from(Some("prod")), Environment::Production);
        assert_eq!(environment_from(Some("Production")), Environment::Production);
        assert_eq!(environment_from(Some("staging")), Environment::Staging);
        assert_eq!(environment_from(Some("testing")), Environment::Test);
        assert_eq!(environment_from(Some("laptop")), Environment::Development);
        assert_eq!(environment_from(None), Environment::Development);
    }

    #[tokio::test]
    async fn env_parse_reports_field_and_uses_default() {
        let _guard = crate::test_support::env_lock().await;
        std::env::set_var("QUIZ_SWEEP_PARSE_PROBE", "soon");
        let err = env_parse::<u64>("QUIZ_SWEEP_PARSE_PROBE", 60).unwrap_err();
        std::env::remove_var("QUIZ_SWEEP_PARSE_PROBE");

        assert_eq!(err.to_string(), "invalid value for QUIZ_SWEEP_PARSE_PROBE: soon");
        assert_eq!(env_parse::<u64>("QUIZ_SWEEP_PARSE_PROBE", 60).unwrap(), 60);
    }
}
