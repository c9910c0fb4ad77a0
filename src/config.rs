use std::time::Duration;

use crate::error::{ConvertError, Result};

pub const BOC_BASE_URL: &str = "https://www.bankofcanada.ca/valet";

const BASE_URL_VAR: &str = "BOC_VALET_URL";
const TIMEOUT_VAR: &str = "BOC_VALET_TIMEOUT_SECS";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// `None` leaves the HTTP client's default in place
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BOC_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = var(BASE_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| BOC_BASE_URL.to_string());

        let timeout = match var(TIMEOUT_VAR) {
            None => None,
            Some(secs) => Some(secs.trim().parse().map(Duration::from_secs).map_err(|e| {
                ConvertError::usage(format!("{TIMEOUT_VAR} must be a whole number of seconds: {e}"))
            })?),
        };

        Ok(Self { base_url, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::{BOC_BASE_URL, Config};
    use std::collections::HashMap;
    use std::time::Duration;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, crate::ConvertError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]).unwrap(), Config::default());
        assert_eq!(Config::default().base_url, BOC_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BOC_VALET_URL", "http://localhost:8080/valet/"),
            ("BOC_VALET_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/valet");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_bad_timeout_is_usage_error() {
        let err = config_from(&[("BOC_VALET_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.is_usage());
    }
}
