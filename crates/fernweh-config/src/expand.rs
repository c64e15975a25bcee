//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (errors when unset) and `${VAR:-default}` (falls back
//! to the default when unset). Text outside `${...}` passes through
//! unchanged; a `$` without a following `{` is literal.

use crate::ConfigError;

/// Expand all `${...}` references in `value`.
///
/// `field` names the config field for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("unterminated ${{...}} in \"{value}\""),
            });
        };

        let expr = &after[..end];
        let expanded = match expr.split_once(":-") {
            Some((name, default)) => {
                std::env::var(name).unwrap_or_else(|_| default.to_owned())
            }
            None => std::env::var(expr).map_err(|_| ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{expr}}} not set"),
            })?,
        };

        result.push_str(&expanded);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            expand_env("http://127.0.0.1:8055", "api.base_url").unwrap(),
            "http://127.0.0.1:8055"
        );
    }

    #[test]
    fn test_default_used_when_unset() {
        assert_eq!(
            expand_env("${FERNWEH_TEST_UNSET_0:-http://fallback}", "api.base_url").unwrap(),
            "http://fallback"
        );
    }

    #[test]
    fn test_set_variable_expands() {
        // set_var is unsafe in edition 2024; the test var name is unique to
        // this test so other threads never read it.
        unsafe { std::env::set_var("FERNWEH_TEST_SET_1", "http://cms.example.com") };
        assert_eq!(
            expand_env("${FERNWEH_TEST_SET_1}/directus", "api.base_url").unwrap(),
            "http://cms.example.com/directus"
        );
    }

    #[test]
    fn test_unset_variable_without_default_errors() {
        let err = expand_env("${FERNWEH_TEST_UNSET_2}", "api.base_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_unterminated_reference_errors() {
        let err = expand_env("${FERNWEH_TEST", "api.base_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_literal_dollar_passes_through() {
        assert_eq!(expand_env("cost: $5", "api.base_url").unwrap(), "cost: $5");
    }
}
