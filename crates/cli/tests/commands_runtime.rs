use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use catalog_cli::commands::{config, doctor, query};
use serde_json::Value;
use tempfile::TempDir;

fn bundled_catalog() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data/products.json")
        .display()
        .to_string()
}

#[test]
fn list_returns_catalog_in_file_order() {
    let catalog = bundled_catalog();
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let result = query::list();
        assert_eq!(result.exit_code, 0, "expected successful list");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "list");
        assert_eq!(payload["status"], "ok");
        let products = payload["data"].as_array().expect("product array");
        assert_eq!(products.len(), 9);
        assert_eq!(products[0]["id"], "OLJCESPC7Z");
        assert_eq!(products[8]["id"], "6E92ZMYYFZ");
    });
}

#[test]
fn get_returns_product_with_discounted_price() {
    let catalog = bundled_catalog();
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let result = query::get("OLJCESPC7Z");
        assert_eq!(result.exit_code, 0, "expected successful get");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["name"], "Vintage Typewriter");
        assert_eq!(payload["data"]["discounted_price"], "67.99 USD");
    });
}

#[test]
fn get_unknown_id_returns_not_found() {
    let catalog = bundled_catalog();
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let result = query::get("N/A");
        assert_eq!(result.exit_code, query::EXIT_NOT_FOUND, "expected not-found exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "get");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "not_found");
    });
}

#[test]
fn search_matches_case_insensitively() {
    let catalog = bundled_catalog();
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let result = query::search("TypeWriter");
        assert_eq!(result.exit_code, 0, "expected successful search");

        let payload = parse_payload(&result.output);
        let results = payload["data"].as_array().expect("result array");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], "OLJCESPC7Z");

        let everything = parse_payload(&query::search("").output);
        assert_eq!(everything["data"].as_array().map(Vec::len), Some(9));
    });
}

#[test]
fn query_commands_report_config_failures() {
    with_env(&[("CATALOG_LOG_LEVEL", "verbose")], || {
        let result = query::list();
        assert_eq!(result.exit_code, query::EXIT_CONFIG, "expected config validation failure");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn query_commands_report_catalog_load_failures() {
    with_env(&[("CATALOG_CATALOG_PATH", "/nonexistent/catalog/products.json")], || {
        let result = query::search("anything");
        assert_eq!(result.exit_code, query::EXIT_CATALOG_LOAD, "expected catalog load failure");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "search");
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

#[test]
fn doctor_passes_with_bundled_catalog() {
    let catalog = bundled_catalog();
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "pass");

        let checks = payload["checks"].as_array().expect("check array");
        let names: Vec<&str> = checks.iter().filter_map(|check| check["name"].as_str()).collect();
        assert_eq!(
            names,
            ["config", "listen_address", "catalog_file", "catalog_records", "product_count"]
        );
        assert!(checks.iter().all(|check| check["status"] == "pass"));
        assert_eq!(checks[4]["details"], "9 products");
    });
}

#[test]
fn doctor_skips_downstream_checks_when_config_invalid() {
    with_env(&[("CATALOG_SERVER_PORT", "0")], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        let checks = payload["checks"].as_array().expect("check array");
        assert_eq!(checks.len(), 5);
        assert!(checks[1..].iter().all(|check| check["status"] == "skipped"));

        let human = doctor::run(false);
        assert!(human.starts_with("doctor: 5 of 5 checks did not pass"));
        assert!(human.contains("- [skip] catalog_file"));
    });
}

#[test]
fn doctor_reports_missing_catalog_file() {
    with_env(&[("CATALOG_CATALOG_PATH", "/nonexistent/catalog/products.json")], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["checks"][2]["name"], "catalog_file");
        assert_eq!(payload["checks"][2]["status"], "fail");
        assert_eq!(payload["checks"][3]["status"], "skipped");
        assert_eq!(payload["checks"][4]["status"], "skipped");
    });
}

#[test]
fn doctor_names_duplicate_product_ids() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(
        &dir,
        r#"{"products": [{"id": "A1", "name": "Lamp"}, {"id": "A1", "name": "Desk"}]}"#,
    );
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][2]["status"], "pass");
        assert_eq!(payload["checks"][3]["name"], "catalog_records");
        assert_eq!(payload["checks"][3]["status"], "fail");
        assert_eq!(payload["checks"][3]["details"], "duplicate product id `A1`");
        assert_eq!(payload["checks"][4]["status"], "skipped");
    });
}

#[test]
fn doctor_fails_an_empty_catalog() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir, r#"{"products": []}"#);
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][3]["status"], "pass");
        assert_eq!(payload["checks"][4]["name"], "product_count");
        assert_eq!(payload["checks"][4]["status"], "fail");
    });
}

#[test]
fn successful_commands_emit_a_null_error_class() {
    let catalog = bundled_catalog();
    with_env(&[("CATALOG_CATALOG_PATH", catalog.as_str())], || {
        let payload = parse_payload(&query::search("camera").output);
        assert_eq!(payload["status"], "ok");
        assert!(payload["error_class"].is_null());
        assert_eq!(payload["message"], "2 products match `camera`");
    });
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("CATALOG_SERVER_PORT", "4100")], || {
        let output = config::run();
        assert!(output.contains("- server.port = 4100 (source: env (CATALOG_SERVER_PORT))"));
        assert!(output.contains("- logging.level = info (source: default)"));
    });
}

#[test]
fn config_treats_blank_env_values_as_unset() {
    with_env(&[("CATALOG_SERVER_PORT", ""), ("CATALOG_LOG_LEVEL", "  ")], || {
        let output = config::run();
        assert!(output.contains("- server.port = 3550 (source: default)"));
        assert!(output.contains("- logging.level = info (source: default)"));
    });
}

fn write_catalog(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("products.json");
    fs::write(&path, body).expect("write catalog");
    path.display().to_string()
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CATALOG_CATALOG_PATH",
        "CATALOG_SERVER_BIND_ADDRESS",
        "CATALOG_SERVER_PORT",
        "CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CATALOG_SERVER_EXTRA_LATENCY_MS",
        "CATALOG_LOGGING_LEVEL",
        "CATALOG_LOGGING_FORMAT",
        "CATALOG_LOG_LEVEL",
        "CATALOG_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
