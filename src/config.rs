//! Configuration types.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Gemini model used for classification.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Service configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the LLM service.
    pub api_key: SecretString,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Host the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Transport timeout for each LLM request.
    pub llm_timeout: Duration,
    /// Maximum accepted body size for file uploads.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// Fails if `GEMINI_API_KEY` is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model = lookup("CLASSIFIER_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let host = lookup("CLASSIFIER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = parse_or(&lookup, "CLASSIFIER_PORT", 8000)?;
        let timeout_secs: u64 = parse_or(&lookup, "CLASSIFIER_LLM_TIMEOUT_SECS", 60)?;
        let max_upload_bytes: usize =
            parse_or(&lookup, "CLASSIFIER_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            model,
            host,
            port,
            llm_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes,
        })
    }

    /// Resolve the bind address. `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|e| ConfigError::InvalidValue {
            key: "CLASSIFIER_HOST".to_string(),
            message: format!("{e}"),
        })?;

        Ok(SocketAddr::new(ip, self.port))
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
            message: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "GEMINI_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k-123")])).unwrap();
        assert_eq!(config.api_key.expose_secret(), "k-123");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, 8000);
        assert_eq!(config.llm_timeout, Duration::from_secs(60));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("CLASSIFIER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "CLASSIFIER_PORT"));
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("CLASSIFIER_HOST", "localhost"),
            ("CLASSIFIER_PORT", "9001"),
        ]))
        .unwrap();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 9001));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "super-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
