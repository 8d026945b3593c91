use std::fmt;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub locales: LocaleSettings,
    pub geocoding: GeocodingSettings,
}

/// Locales the admin forms accept. `default` is always in `available`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    pub default: String,
    pub available: Vec<String>,
}

/// Address lookup used by the meeting form to fill latitude and longitude.
///
/// The endpoint receives the address as `q` and answers with a JSON list of
/// `{"lat": ..., "lon": ...}` results. Without one, the coordinates stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodingSettings {
    pub endpoint: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{var} must be set"),
            ConfigError::Invalid(var, reason) => write!(f, "{var} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let session_key = lookup("SESSION_KEY").filter(|v| !v.is_empty());

        let default_locale = lookup("DEFAULT_LOCALE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "en".to_string());
        if default_locale.is_empty() {
            return Err(ConfigError::Invalid("DEFAULT_LOCALE", "empty".to_string()));
        }

        let mut available_locales: Vec<String> = lookup("AVAILABLE_LOCALES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !available_locales.contains(&default_locale) {
            available_locales.insert(0, default_locale.clone());
        }

        let geocoding_endpoint = match lookup("GEOCODING_URL").map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => match url::Url::parse(&v) {
                Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Some(v),
                Ok(u) => {
                    return Err(ConfigError::Invalid(
                        "GEOCODING_URL",
                        format!("unsupported scheme {}", u.scheme()),
                    ));
                }
                Err(e) => return Err(ConfigError::Invalid("GEOCODING_URL", e.to_string())),
            },
            _ => None,
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_key,
            locales: LocaleSettings {
                default: default_locale,
                available: available_locales,
            },
            geocoding: GeocodingSettings {
                endpoint: geocoding_endpoint,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/m")])).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.locales.default, "en");
        assert_eq!(cfg.locales.available, vec!["en".to_string()]);
        assert!(cfg.session_key.is_none());
        assert_eq!(cfg.geocoding, GeocodingSettings::default());
    }

    #[test]
    fn geocoding_url_must_be_http() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/m"),
            ("GEOCODING_URL", "https://geocode.example.org/search?format=json"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.geocoding.endpoint.as_deref(),
            Some("https://geocode.example.org/search?format=json")
        );

        for bad in ["ftp://geocode.example.org", "not a url"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://localhost/m"),
                ("GEOCODING_URL", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid("GEOCODING_URL", _)), "{bad}");
        }
    }

    #[test]
    fn default_locale_is_always_available() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/m"),
            ("DEFAULT_LOCALE", "ca"),
            ("AVAILABLE_LOCALES", "en, es"),
        ]))
        .unwrap();
        assert_eq!(cfg.locales.available, vec!["ca", "en", "es"]);
    }
}
