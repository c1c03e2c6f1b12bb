use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::mutation::ServiceOptions;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    backend: BackendConfig,
    #[serde(default)]
    mutation: MutationConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Deserialize, Default)]
struct BackendConfig {
    address: Option<String>,
    client_name: Option<String>,
}

#[derive(Deserialize, Default)]
struct MutationConfig {
    pending_timeout_ms: Option<u64>,
    strict_enumerations: Option<bool>,
}

#[derive(Deserialize, Default)]
struct LoggingConfig {
    level: Option<String>,
}

pub struct Config {
    backend: BackendConfig,
    mutation: MutationConfig,
    logging: LoggingConfig,
}

impl Config {
    /// Embedded defaults overlaid with the user's config file, if any.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::embedded(),
        }
    }

    /// Embedded defaults overlaid with the file at `path`. Unreadable or
    /// malformed files are logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e);
                    Self::embedded()
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
                Self::embedded()
            }
        }
    }

    /// Embedded defaults overlaid with `contents`.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let user: ConfigFile = toml::from_str(contents)?;
        let mut base = embedded_file();
        merge_backend(&mut base.backend, user.backend);
        merge_mutation(&mut base.mutation, user.mutation);
        merge_logging(&mut base.logging, user.logging);
        Ok(base.into())
    }

    fn embedded() -> Self {
        embedded_file().into()
    }

    pub fn backend_address(&self) -> String {
        self.backend
            .address
            .clone()
            .unwrap_or_else(|| "127.0.0.1:7321".to_string())
    }

    pub fn client_name(&self) -> String {
        self.backend
            .client_name
            .clone()
            .unwrap_or_else(|| "lpedit".to_string())
    }

    /// Echo timeout for optimistic edits (clamped to 100ms..60s).
    pub fn pending_timeout(&self) -> Duration {
        let ms = self
            .mutation
            .pending_timeout_ms
            .unwrap_or(3000)
            .clamp(100, 60_000);
        Duration::from_millis(ms)
    }

    pub fn strict_enumerations(&self) -> bool {
        self.mutation.strict_enumerations.unwrap_or(false)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            pending_timeout: self.pending_timeout(),
            strict_enumerations: self.strict_enumerations(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.logging
            .level
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::Warn)
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Config {
            backend: file.backend,
            mutation: file.mutation,
            logging: file.logging,
        }
    }
}

fn embedded_file() -> ConfigFile {
    toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!(target: "config", "embedded config.toml is invalid: {}", e);
        ConfigFile::default()
    })
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lpedit").join("config.toml"))
}

fn merge_backend(base: &mut BackendConfig, user: BackendConfig) {
    if user.address.is_some() {
        base.address = user.address;
    }
    if user.client_name.is_some() {
        base.client_name = user.client_name;
    }
}

fn merge_mutation(base: &mut MutationConfig, user: MutationConfig) {
    if user.pending_timeout_ms.is_some() {
        base.pending_timeout_ms = user.pending_timeout_ms;
    }
    if user.strict_enumerations.is_some() {
        base.strict_enumerations = user.strict_enumerations;
    }
}

fn merge_logging(base: &mut LoggingConfig, user: LoggingConfig) {
    if user.level.is_some() {
        base.level = user.level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults() {
        let config = Config::embedded();
        assert_eq!(config.backend_address(), "127.0.0.1:7321");
        assert_eq!(config.client_name(), "lpedit");
        assert_eq!(config.pending_timeout(), Duration::from_millis(3000));
        assert!(!config.strict_enumerations());
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_user_values_override_only_what_they_set() {
        let config = Config::from_toml_str(
            r#"
            [backend]
            address = "10.0.0.5:9000"

            [mutation]
            strict_enumerations = true
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_address(), "10.0.0.5:9000");
        assert_eq!(config.client_name(), "lpedit");
        assert!(config.strict_enumerations());
        assert_eq!(config.pending_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_timeout_is_clamped() {
        let config = Config::from_toml_str("[mutation]\npending_timeout_ms = 5").unwrap();
        assert_eq!(config.pending_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_log_level_parsing() {
        let config = Config::from_toml_str("[logging]\nlevel = \"debug\"").unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        let config = Config::from_toml_str("[logging]\nlevel = \"chatty\"").unwrap();
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nclient_name = \"bench\"").unwrap();
        let config = Config::load_from(file.path());
        assert_eq!(config.client_name(), "bench");
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\naddress = ").unwrap();
        let config = Config::load_from(file.path());
        assert_eq!(config.backend_address(), "127.0.0.1:7321");
    }
}
