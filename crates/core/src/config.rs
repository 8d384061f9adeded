//! Service configuration.
//!
//! Sources are applied in order, later ones winning: built-in defaults, an
//! optional TOML file (`${VAR}` references expanded), `CATALOG_*` environment
//! variables, then [`ConfigOverrides`]. The merged value is validated last.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

const MAX_EXTRA_LATENCY_MS: u64 = 60_000;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Files searched, relative to the working directory, when no explicit path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["catalog.toml", "config/catalog.toml"];

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    /// Artificial delay added to every RPC, for latency fault injection.
    pub extra_latency_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub extra_latency_ms: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("config file references unset environment variable `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("config file has a `${{` reference without a closing `}}`")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("data/products.json") }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3550,
            graceful_shutdown_secs: 15,
            extra_latency_ms: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported log format `{other}`")),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = match locate_config_file(&options)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim().to_ascii_lowercase();
        let rules = [
            (
                self.catalog.path.as_os_str().is_empty(),
                "catalog.path must point at the product catalog JSON file",
            ),
            (self.server.bind_address.trim().is_empty(), "server.bind_address must not be empty"),
            (self.server.port == 0, "server.port must be greater than zero"),
            (
                self.server.graceful_shutdown_secs == 0,
                "server.graceful_shutdown_secs must be greater than zero",
            ),
            (
                self.server.extra_latency_ms > MAX_EXTRA_LATENCY_MS,
                "server.extra_latency_ms must not exceed 60000",
            ),
            (
                !LOG_LEVELS.contains(&level.as_str()),
                "logging.level must be one of trace|debug|info|warn|error",
            ),
        ];

        match rules.into_iter().find(|(broken, _)| *broken) {
            Some((_, message)) => Err(ConfigError::Validation(message.to_string())),
            None => Ok(()),
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        let expanded = expand_env_refs(&raw)?;

        toml::from_str(&expanded)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = env_value(&["CATALOG_CATALOG_PATH"])? {
            self.catalog.path = path;
        }
        if let Some(bind_address) = env_value(&["CATALOG_SERVER_BIND_ADDRESS"])? {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = env_value(&["CATALOG_SERVER_PORT"])? {
            self.server.port = port;
        }
        if let Some(secs) = env_value(&["CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS"])? {
            self.server.graceful_shutdown_secs = secs;
        }
        if let Some(latency) = env_value(&["CATALOG_SERVER_EXTRA_LATENCY_MS"])? {
            self.server.extra_latency_ms = latency;
        }
        if let Some(level) = env_value(&["CATALOG_LOGGING_LEVEL", "CATALOG_LOG_LEVEL"])? {
            self.logging.level = level;
        }
        if let Some(format) = env_value(&["CATALOG_LOGGING_FORMAT", "CATALOG_LOG_FORMAT"])? {
            self.logging.format = format;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides { catalog_path, bind_address, port, extra_latency_ms, log_level } =
            overrides;

        if let Some(path) = catalog_path {
            self.catalog.path = path;
        }
        if let Some(bind_address) = bind_address {
            self.server.bind_address = bind_address;
        }
        self.server.port = port.unwrap_or(self.server.port);
        self.server.extra_latency_ms = extra_latency_ms.unwrap_or(self.server.extra_latency_ms);
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }
}

/// Resolves which config file, if any, [`AppConfig::load`] reads.
pub fn locate_config_file(options: &LoadOptions) -> Result<Option<PathBuf>, ConfigError> {
    let found = match &options.config_path {
        Some(path) => path.is_file().then(|| path.clone()),
        None => DEFAULT_CONFIG_FILES.into_iter().map(PathBuf::from).find(|path| path.is_file()),
    };

    if found.is_none() && options.require_file {
        let expected =
            options.config_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));
        return Err(ConfigError::MissingConfigFile(expected));
    }
    Ok(found)
}

/// First of `keys` set to a non-blank value. Blank variables count as unset.
pub fn first_env<'k>(keys: &[&'k str]) -> Option<(&'k str, String)> {
    keys.iter().find_map(|key| {
        env::var(key).ok().filter(|value| !value.trim().is_empty()).map(|value| (*key, value))
    })
}

fn env_value<T: FromStr>(keys: &[&str]) -> Result<Option<T>, ConfigError> {
    let Some((key, raw)) = first_env(keys) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: raw })
}

fn expand_env_refs(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let reference = &rest[start + 2..];
        let end = reference.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &reference[..end];

        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &reference[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
