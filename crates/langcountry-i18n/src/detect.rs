//! Host environment locale detection.
//!
//! Feeds the "derive fallback from the host's current language" toggle: the
//! detected value is only ever a hint and still goes through [`crate::resolve`].

use std::env;

/// Environment variables consulted, highest priority first.
pub const HOST_LOCALE_VARS: [&str; 4] = ["LANGCOUNTRY_LOCALE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Detect the host's current language setting.
pub fn detect_host_locale() -> Option<String> {
    HOST_LOCALE_VARS.iter().find_map(|var| from_env(var))
}

/// Read one variable and normalize it, skipping unset or meaningless values.
fn from_env(var: &str) -> Option<String> {
    env::var(var).ok().and_then(|v| normalize_posix_locale(&v))
}

/// Strip POSIX decorations from a locale value.
///
/// `nl_BE.UTF-8@euro` becomes `nl_BE`; `C`, `POSIX` and empty values yield
/// `None` since they carry no language.
pub fn normalize_posix_locale(value: &str) -> Option<String> {
    let value = value.trim();
    let value = value.split(['.', '@']).next().unwrap_or_default();

    match value {
        "" | "C" | "POSIX" => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cleared_env<F: FnOnce()>(f: F) {
        let original: Vec<_> = HOST_LOCALE_VARS
            .iter()
            .map(|var| (*var, env::var(var).ok()))
            .collect();

        for var in HOST_LOCALE_VARS {
            env::remove_var(var);
        }

        f();

        for (var, value) in original {
            env::remove_var(var);
            if let Some(val) = value {
                env::set_var(var, val);
            }
        }
    }

    #[test]
    fn test_normalize_posix_locale() {
        assert_eq!(normalize_posix_locale("nl_BE.UTF-8"), Some("nl_BE".to_string()));
        assert_eq!(normalize_posix_locale("de_DE@euro"), Some("de_DE".to_string()));
        assert_eq!(normalize_posix_locale("es_CO.UTF-8@x"), Some("es_CO".to_string()));
        assert_eq!(normalize_posix_locale(" en "), Some("en".to_string()));
        assert_eq!(normalize_posix_locale("C"), None);
        assert_eq!(normalize_posix_locale("C.UTF-8"), None);
        assert_eq!(normalize_posix_locale("POSIX"), None);
        assert_eq!(normalize_posix_locale(""), None);
    }

    // Env mutation is kept inside one test so parallel tests cannot interleave.
    #[test]
    fn test_host_locale_priority() {
        with_cleared_env(|| {
            assert_eq!(detect_host_locale(), None);

            env::set_var("LANG", "de_DE.UTF-8");
            assert_eq!(detect_host_locale(), Some("de_DE".to_string()));

            env::set_var("LC_MESSAGES", "es_CO");
            assert_eq!(detect_host_locale(), Some("es_CO".to_string()));

            env::set_var("LC_ALL", "fr_FR");
            assert_eq!(detect_host_locale(), Some("fr_FR".to_string()));

            env::set_var("LANGCOUNTRY_LOCALE", "nl");
            assert_eq!(detect_host_locale(), Some("nl".to_string()));

            // Meaningless values fall through to the next variable.
            env::set_var("LANGCOUNTRY_LOCALE", "C");
            env::set_var("LC_ALL", "");
            assert_eq!(detect_host_locale(), Some("es_CO".to_string()));
        });
    }
}
