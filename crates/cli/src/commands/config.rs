//! `catalog config`: effective settings and where each one came from.

use std::fs;
use std::path::Path;

use catalog_core::config::{first_env, locate_config_file, AppConfig, LoadOptions, LogFormat};
use toml::Table;

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let options = LoadOptions::default();
    let file = locate_config_file(&options).ok().flatten();
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };
    let table = file.as_deref().and_then(read_table);

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = match (first_env(field.env_keys), &file, &table) {
            (Some((env_key, _)), _, _) => format!("env ({env_key})"),
            (None, Some(path), Some(table)) if set_in(table, field.key) => {
                format!("file ({})", path.display())
            }
            _ => "default".to_string(),
        };
        lines.push(format!("- {} = {} (source: {source})", field.key, field.value));
    }
    lines.join("\n")
}

fn fields(config: &AppConfig) -> [Field; 7] {
    let server = &config.server;
    [
        Field {
            key: "catalog.path",
            env_keys: &["CATALOG_CATALOG_PATH"],
            value: config.catalog.path.display().to_string(),
        },
        Field {
            key: "server.bind_address",
            env_keys: &["CATALOG_SERVER_BIND_ADDRESS"],
            value: server.bind_address.clone(),
        },
        Field {
            key: "server.port",
            env_keys: &["CATALOG_SERVER_PORT"],
            value: server.port.to_string(),
        },
        Field {
            key: "server.graceful_shutdown_secs",
            env_keys: &["CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            value: server.graceful_shutdown_secs.to_string(),
        },
        Field {
            key: "server.extra_latency_ms",
            env_keys: &["CATALOG_SERVER_EXTRA_LATENCY_MS"],
            value: server.extra_latency_ms.to_string(),
        },
        Field {
            key: "logging.level",
            env_keys: &["CATALOG_LOGGING_LEVEL", "CATALOG_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["CATALOG_LOGGING_FORMAT", "CATALOG_LOG_FORMAT"],
            value: match config.logging.format {
                LogFormat::Compact => "compact",
                LogFormat::Pretty => "pretty",
                LogFormat::Json => "json",
            }
            .to_string(),
        },
    ]
}

fn read_table(path: &Path) -> Option<Table> {
    fs::read_to_string(path).ok()?.parse().ok()
}

fn set_in(table: &Table, dotted_key: &str) -> bool {
    let Some((section, key)) = dotted_key.split_once('.') else {
        return false;
    };
    table
        .get(section)
        .and_then(|value| value.as_table())
        .is_some_and(|section| section.contains_key(key))
}
