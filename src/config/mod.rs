// Required external crates for configuration management and serialization
use serde::Deserialize;
use std::path::{Path, PathBuf};
use config::{Config, ConfigError, Environment, File};

/// Configuration for the HTTP server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to listen on
    pub port: u16,
    /// Deadline for a single tokenize request, fetch included
    pub request_timeout_secs: u64,
    /// Report failures with 4xx/5xx statuses instead of in-band 200 bodies
    #[serde(default)]
    pub error_status_codes: bool,
}

/// Configuration for the model repository tokenizers are fetched from
#[derive(Debug, Deserialize, Clone)]
pub struct HubConfig {
    /// Base URL of the hub, e.g. https://huggingface.co
    pub endpoint: String,
    /// Git revision to resolve artifacts at
    pub revision: String,
    /// Environment variable holding the access token
    pub token_env: String,
    /// TCP connect timeout for hub requests
    pub connect_timeout_secs: u64,
    /// Total timeout for downloading one tokenizer artifact
    pub fetch_timeout_secs: u64,
}

/// Configuration for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Optional directory for daily rolling log files; stderr when unset
    pub directory: Option<PathBuf>,
}

/// Main settings struct that contains all configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Server-related settings
    pub server: ServerConfig,
    /// Hub-related settings
    pub hub: HubConfig,
    /// Logging-related settings
    pub logging: LoggingConfig,
}

/// Implementation for loading and parsing configuration
impl Settings {
    /// Creates a new Settings instance by loading config from multiple sources
    /// in the following order of precedence (highest to lowest):
    /// 1. Environment variables such as TOKENWIZ_SERVER__PORT
    /// 2. Local config file (local.toml) if present
    /// 3. Default config file (default.toml)
    pub fn from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        // Check if config directory exists
        if !config_dir.exists() {
            return Err(ConfigError::Message(
                format!("Config directory not found at: {}", config_dir.display())
            ));
        }

        // Check if default.toml exists
        let default_config = config_dir.join("default.toml");
        if !default_config.exists() {
            return Err(ConfigError::Message(
                format!("Default configuration file not found at: {}", default_config.display())
            ));
        }

        let local_config = config_dir.join("local.toml");

        // Convert paths to strings and keep them alive
        let default_config_path = default_config.to_string_lossy();
        let local_config_path = local_config.to_string_lossy();

        // Load and validate configuration
        let settings = Config::builder()
            .add_source(File::with_name(&default_config_path))
            .add_source(File::with_name(&local_config_path).required(false))
            .add_source(
                Environment::with_prefix("TOKENWIZ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message(
                "Port must be between 1 and 65535, got: 0".to_string()
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "request_timeout_secs must be greater than 0".to_string()
            ));
        }

        if !(self.hub.endpoint.starts_with("http://") || self.hub.endpoint.starts_with("https://")) {
            return Err(ConfigError::Message(
                format!("Hub endpoint must be an http(s) URL, got: {}", self.hub.endpoint)
            ));
        }

        if self.hub.connect_timeout_secs == 0 || self.hub.fetch_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Hub timeouts must be greater than 0".to_string()
            ));
        }

        if self.hub.token_env.trim().is_empty() {
            return Err(ConfigError::Message(
                "token_env must name an environment variable".to_string()
            ));
        }

        // Validate logging level
        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ConfigError::Message(
                format!("Invalid logging level: {}. Must be one of: error, warn, info, debug, trace",
                    self.logging.level)
            )),
        }?;

        // Create log directory if configured and doesn't exist
        if let Some(log_dir) = &self.logging.directory {
            if !log_dir.exists() {
                std::fs::create_dir_all(log_dir).map_err(|e| {
                    ConfigError::Message(format!(
                        "Failed to create log directory at {}: {}",
                        log_dir.display(), e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DEFAULT_TOML: &str = r#"
[server]
host = "0.0.0.0"
port = 8000
request_timeout_secs = 1200

[hub]
endpoint = "https://huggingface.co"
revision = "main"
token_env = "HUGGINGFACE_TOKEN"
connect_timeout_secs = 10
fetch_timeout_secs = 300

[logging]
level = "info"
"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tokenwiz-config-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_loads_default_file() {
        let dir = scratch_dir("default");
        fs::write(dir.join("default.toml"), DEFAULT_TOML).unwrap();

        let settings = Settings::from_dir(&dir).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert!(!settings.server.error_status_codes);
        assert_eq!(settings.hub.token_env, "HUGGINGFACE_TOKEN");
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn test_local_file_overrides_default() {
        let dir = scratch_dir("local");
        fs::write(dir.join("default.toml"), DEFAULT_TOML).unwrap();
        fs::write(dir.join("local.toml"), "[server]\nport = 9100\nerror_status_codes = true\n").unwrap();

        let settings = Settings::from_dir(&dir).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert!(settings.server.error_status_codes);
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_default_file_is_rejected() {
        let dir = scratch_dir("missing");
        let err = Settings::from_dir(&dir).unwrap_err();
        assert!(err.to_string().contains("default.toml"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = scratch_dir("validate");
        fs::write(dir.join("default.toml"), DEFAULT_TOML).unwrap();
        let settings = Settings::from_dir(&dir).unwrap();

        let mut bad_level = settings.clone();
        bad_level.logging.level = "verbose".to_string();
        assert!(bad_level.validate().is_err());

        let mut bad_endpoint = settings.clone();
        bad_endpoint.hub.endpoint = "huggingface.co".to_string();
        assert!(bad_endpoint.validate().is_err());

        let mut bad_timeout = settings;
        bad_timeout.server.request_timeout_secs = 0;
        assert!(bad_timeout.validate().is_err());
    }
}
