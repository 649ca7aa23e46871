//! Environment variable utilities
//!
//! Small helpers shared by the logging and configuration layers.

/// Read a boolean environment variable.
///
/// `1`, `true`, `yes`, `on` (case-insensitive) are truthy; anything else,
/// including an unset variable, yields `default`.
pub fn env_get_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Read a numeric environment variable, falling back to `default` when the
/// variable is unset or unparseable.
pub fn env_get_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string environment variable.
pub fn env_get_str(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_default() {
        assert!(!env_get_bool("QPRI_TEST_UNSET_VAR", false));
        assert!(env_get_bool("QPRI_TEST_UNSET_VAR", true));
    }

    #[test]
    fn test_bool_parse() {
        std::env::set_var("QPRI_TEST_BOOL", "yes");
        assert!(env_get_bool("QPRI_TEST_BOOL", false));
        std::env::set_var("QPRI_TEST_BOOL", "0");
        assert!(!env_get_bool("QPRI_TEST_BOOL", true));
        std::env::remove_var("QPRI_TEST_BOOL");
    }

    #[test]
    fn test_u64() {
        std::env::set_var("QPRI_TEST_U64", "1500");
        assert_eq!(env_get_u64("QPRI_TEST_U64", 7), 1500);
        std::env::set_var("QPRI_TEST_U64", "bogus");
        assert_eq!(env_get_u64("QPRI_TEST_U64", 7), 7);
        std::env::remove_var("QPRI_TEST_U64");
    }
}
