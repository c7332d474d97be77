//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default HTTP port for the app shell server.
pub const DEFAULT_PORT: u16 = 8080;

/// Maximum interest categories the interests screen accepts.
pub const DEFAULT_MAX_INTERESTS: usize = 5;

/// Hosted backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub api_key: SecretString,
}

/// App shell configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP/WebSocket surface listens on.
    pub port: u16,
    /// Hosted backend. `None` runs against the in-memory fixture backend.
    pub backend: Option<BackendConfig>,
    /// Simulated latency of the calendar sync collaborator.
    pub calendar_sync_delay: Duration,
    /// Maximum interest categories per user.
    pub max_interests: usize,
    /// Minimum password length accepted by the sign-up form.
    pub min_password_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend: None,
            calendar_sync_delay: Duration::from_millis(1500),
            max_interests: DEFAULT_MAX_INTERESTS,
            min_password_len: 6,
        }
    }
}

impl AppConfig {
    /// Build from `GATHER_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_or(&lookup, "GATHER_PORT", defaults.port)?;
        let max_interests = parse_or(&lookup, "GATHER_MAX_INTERESTS", defaults.max_interests)?;
        if max_interests == 0 {
            return Err(ConfigError::InvalidValue {
                key: "GATHER_MAX_INTERESTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let min_password_len =
            parse_or(&lookup, "GATHER_MIN_PASSWORD_LEN", defaults.min_password_len)?;
        let calendar_sync_delay = parse_or(
            &lookup,
            "GATHER_CALENDAR_SYNC_DELAY_MS",
            defaults.calendar_sync_delay.as_millis() as u64,
        )
        .map(Duration::from_millis)?;

        let backend = match lookup("GATHER_BACKEND_URL").filter(|s| !s.trim().is_empty()) {
            Some(url) => {
                let api_key = lookup("GATHER_BACKEND_KEY").ok_or_else(|| {
                    ConfigError::InvalidValue {
                        key: "GATHER_BACKEND_KEY".to_string(),
                        message: "required when GATHER_BACKEND_URL is set".to_string(),
                    }
                })?;
                Some(BackendConfig {
                    url: url.trim_end_matches('/').to_string(),
                    api_key: SecretString::from(api_key),
                })
            }
            None => None,
        };

        Ok(Self {
            port,
            backend,
            calendar_sync_delay,
            max_interests,
            min_password_len,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.backend.is_none());
        assert_eq!(config.max_interests, 5);
        assert_eq!(config.min_password_len, 6);
    }

    #[test]
    fn reads_backend_and_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GATHER_PORT", "9090"),
            ("GATHER_BACKEND_URL", "https://example.supabase.co/"),
            ("GATHER_BACKEND_KEY", "anon-key"),
            ("GATHER_CALENDAR_SYNC_DELAY_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.calendar_sync_delay, Duration::ZERO);
        let backend = config.backend.unwrap();
        assert_eq!(backend.url, "https://example.supabase.co");
        assert_eq!(backend.api_key.expose_secret(), "anon-key");
    }

    #[test]
    fn backend_url_without_key_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "GATHER_BACKEND_URL",
            "https://example.supabase.co",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("GATHER_BACKEND_KEY"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("GATHER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "GATHER_PORT"));
    }

    #[test]
    fn zero_max_interests_is_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("GATHER_MAX_INTERESTS", "0")])).is_err());
    }
}
