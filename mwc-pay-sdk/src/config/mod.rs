//! Client configuration.
//!
//! A [`ClientConfig`] is read once, turned into a client, and never changed
//! afterwards. It can be built in code, parsed from TOML, or taken from the
//! environment.

mod scheme;

pub use scheme::TransportScheme;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Private server used when none is configured.
pub const DEFAULT_PRIVATE_SERVER: &str = "http://localhost:9010";

/// Environment variable read by [`ClientConfig::from_env`].
pub const PRIVATE_SERVER_ENV: &str = "MWC_PAY_PRIVATE_SERVER";

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

/// Settings for an [`MwcPayClient`](crate::client::MwcPayClient).
///
/// ```toml
/// private_server = "https://pay.example.com:9010"
/// request_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base endpoint (scheme and host) of the private server. Paths are
    /// appended to it verbatim.
    #[serde(default = "default_private_server")]
    pub private_server: String,
    /// Transport timeout for a whole request, in milliseconds. `None` waits
    /// indefinitely. Zero is rejected.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_private_server() -> String {
    DEFAULT_PRIVATE_SERVER.to_owned()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            private_server: default_private_server(),
            request_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn new(private_server: impl Into<String>) -> Self {
        Self {
            private_server: private_server.into(),
            ..Self::default()
        }
    }

    /// Sub-millisecond timeouts round up to one millisecond.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        let ms = match timeout.as_millis() {
            0 if !timeout.is_zero() => 1,
            ms => u64::try_from(ms).unwrap_or(u64::MAX),
        };
        self.request_timeout_ms = Some(ms);
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "request_timeout_ms must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Take the private server from [`PRIVATE_SERVER_ENV`], falling back to
    /// [`DEFAULT_PRIVATE_SERVER`] when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(PRIVATE_SERVER_ENV) {
            Ok(private_server) => Ok(Self::new(private_server)),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidConfig(format!(
                "{PRIVATE_SERVER_ENV} is not a valid string"
            ))),
        }
    }

    pub fn scheme(&self) -> TransportScheme {
        TransportScheme::from_endpoint(&self.private_server)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.private_server, "http://localhost:9010");
        assert_eq!(config.scheme(), TransportScheme::Plain);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_config_parsing() {
        let config = ClientConfig::from_toml_str(
            r#"
private_server = "https://pay.example.com"
request_timeout_ms = 30000
"#,
        )
        .unwrap();
        assert_eq!(config.private_server, "https://pay.example.com");
        assert_eq!(config.scheme(), TransportScheme::Tls);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_missing_private_server_uses_default() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_non_string_private_server_is_invalid() {
        let err = ClientConfig::from_toml_str("private_server = 9010").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = ClientConfig::default().with_request_timeout(Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(500)));
        assert!(config.validate().is_ok());

        let config = ClientConfig::default().with_request_timeout(Duration::from_micros(10));
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let err = ClientConfig::from_toml_str("request_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));

        let config = ClientConfig::default().with_request_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    // The only test touching PRIVATE_SERVER_ENV; all cases run in sequence.
    #[test]
    fn test_from_env() {
        unsafe { std::env::remove_var(PRIVATE_SERVER_ENV) };
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());

        unsafe { std::env::set_var(PRIVATE_SERVER_ENV, "https://pay.example.com") };
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.private_server, "https://pay.example.com");
        assert_eq!(config.scheme(), TransportScheme::Tls);

        #[cfg(unix)]
        {
            use std::ffi::OsString;
            use std::os::unix::ffi::OsStringExt;

            let not_utf8 = OsString::from_vec(vec![0x68, 0x74, 0xff, 0xfe]);
            unsafe { std::env::set_var(PRIVATE_SERVER_ENV, &not_utf8) };
            let err = ClientConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidConfig(_)));
        }

        unsafe { std::env::remove_var(PRIVATE_SERVER_ENV) };
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load("/nonexistent/mwc-pay.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
