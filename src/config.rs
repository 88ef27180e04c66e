//! Configuration
//!
//! Startup configuration loaded from a YAML file whose path is given by the
//! `IIKOSERVER_CONFIG` environment variable. Any failure here is fatal: a
//! process with unreadable credentials must not start.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::core::Credentials;
use crate::error::{ConfigError, IikoServerError};

/// Environment variable naming the YAML configuration file.
pub const CONFIG_ENV_VAR: &str = "IIKOSERVER_CONFIG";

#[derive(Deserialize)]
struct ConfigFile {
    iikoserver: ServerSection,
}

#[derive(Deserialize)]
struct ServerSection {
    host: String,
    login: String,
    password: String,
}

/// Connection settings for one iiko server account.
pub struct IikoServerConfig {
    pub host: String,
    pub login: String,
    password: SecretString,
}

impl IikoServerConfig {
    pub fn new(
        host: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            login: login.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Load from the file named by `IIKOSERVER_CONFIG`. A `.env` file in the
    /// working directory is honored if present.
    pub fn load() -> Result<Self, IikoServerError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_ENV_VAR).map_err(|_| {
            IikoServerError::Config(ConfigError::MissingEnvVar {
                name: CONFIG_ENV_VAR.to_string(),
            })
        })?;
        Self::from_path(&path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IikoServerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IikoServerError::Config(ConfigError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let file: ConfigFile = serde_yaml::from_str(&raw).map_err(|e| {
            IikoServerError::Config(ConfigError::ParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let section = file.iikoserver;
        for (field, value) in [
            ("iikoserver.host", &section.host),
            ("iikoserver.login", &section.login),
            ("iikoserver.password", &section.password),
        ] {
            if value.trim().is_empty() {
                return Err(IikoServerError::Config(ConfigError::MissingKey {
                    key: field.to_string(),
                }));
            }
        }

        Ok(Self::new(section.host, section.login, section.password))
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.host.clone(),
            self.login.clone(),
            self.password.expose_secret().clone(),
        )
    }
}

impl std::fmt::Debug for IikoServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IikoServerConfig")
            .field("host", &self.host)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_path_parses_yaml() {
        let file = write_config(
            "iikoserver:\n  host: https://srv.example\n  login: admin\n  password: hunter2\n",
        );
        let config = IikoServerConfig::from_path(file.path()).unwrap();
        assert_eq!(config.host, "https://srv.example");
        assert_eq!(config.login, "admin");

        let credentials = config.credentials();
        assert_eq!(credentials.key().as_str(), "https://srv.example:admin");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = IikoServerConfig::from_path("/nonexistent/config.yml").unwrap_err();
        assert!(matches!(
            err,
            IikoServerError::Config(ConfigError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let file = write_config("other:\n  host: x\n");
        let err = IikoServerConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IikoServerError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_blank_value_is_missing_key() {
        let file = write_config(
            "iikoserver:\n  host: https://srv.example\n  login: \"\"\n  password: hunter2\n",
        );
        let err = IikoServerConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IikoServerError::Config(ConfigError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = IikoServerConfig::new("https://srv.example", "admin", "hunter2");
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
