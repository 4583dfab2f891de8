//! Provider configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `CLOUDFLARE_API_URL` | `https://api.cloudflare.com/client/v4` |
//! | `POLL_INTERVAL_SECS` | `60` |
//! | `MAX_RECONCILE_RATE` | `10` |
//! | `METRICS_ADDR` | `0.0.0.0:8080` |
//! | `HTTP_TIMEOUT_SECS` | `30` |
//! | `LOG_FORMAT` | `text` (or `json`) |

use crate::error::ControllerError;
use cloudflare_client::DEFAULT_BASE_URL;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Runtime settings of the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Cloudflare API base URL
    pub api_url: String,
    /// Requeue interval after a successful pass
    pub poll_interval: Duration,
    /// Maximum concurrent reconciliations
    pub max_reconcile_rate: u16,
    /// Bind address of the metrics and probe server
    pub metrics_addr: SocketAddr,
    /// Timeout for each Cloudflare API request
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl ProviderSettings {
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("CLOUDFLARE_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let poll_interval = Duration::from_secs(parse_or(&lookup, "POLL_INTERVAL_SECS", 60)?);
        let max_reconcile_rate = parse_or(&lookup, "MAX_RECONCILE_RATE", 10)?;
        let metrics_addr = parse_or(&lookup, "METRICS_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?;
        let http_timeout = Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?);

        let log_format = match lookup("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ControllerError::InvalidConfig(format!(
                    "LOG_FORMAT must be text or json, got {}",
                    other
                )));
            }
        };

        if max_reconcile_rate == 0 {
            return Err(ControllerError::InvalidConfig(
                "MAX_RECONCILE_RATE must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            poll_interval,
            max_reconcile_rate,
            metrics_addr,
            http_timeout,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ControllerError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ControllerError::InvalidConfig(format!("{} ({}): {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<ProviderSettings, ControllerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProviderSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.api_url, DEFAULT_BASE_URL);
        assert_eq!(settings.poll_interval, Duration::from_secs(60));
        assert_eq!(settings.max_reconcile_rate, 10);
        assert_eq!(settings.metrics_addr.port(), 8080);
        assert_eq!(settings.http_timeout, Duration::from_secs(30));
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("CLOUDFLARE_API_URL", "http://localhost:9000"),
            ("POLL_INTERVAL_SECS", "300"),
            ("MAX_RECONCILE_RATE", "2"),
            ("METRICS_ADDR", "127.0.0.1:9090"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(settings.api_url, "http://localhost:9000");
        assert_eq!(settings.poll_interval, Duration::from_secs(300));
        assert_eq!(settings.max_reconcile_rate, 2);
        assert_eq!(settings.metrics_addr, "127.0.0.1:9090".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            settings_from(&[("POLL_INTERVAL_SECS", "soon")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            settings_from(&[("MAX_RECONCILE_RATE", "0")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            settings_from(&[("LOG_FORMAT", "xml")]),
            Err(ControllerError::InvalidConfig(_))
        ));
    }
}
