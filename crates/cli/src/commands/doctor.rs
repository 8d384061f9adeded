//! Pre-flight checks for running the catalog server with the current configuration.

use std::net::ToSocketAddrs;
use std::path::Path;

use catalog_core::config::{AppConfig, LoadOptions};
use catalog_core::{CatalogLoader, LoadError};
use serde_json::json;

const AFTER_CONFIG: [&str; 4] =
    ["listen_address", "catalog_file", "catalog_records", "product_count"];
const AFTER_FILE: [&str; 2] = ["catalog_records", "product_count"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Pass,
    Fail,
    Skipped,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug)]
struct Check {
    name: &'static str,
    outcome: Outcome,
    details: String,
}

impl Check {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, outcome: Outcome::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, outcome: Outcome::Fail, details: details.into() }
    }

    fn skipped(names: &[&'static str], cause: &str) -> Vec<Self> {
        names
            .iter()
            .map(|name| Self {
                name: *name,
                outcome: Outcome::Skipped,
                details: format!("skipped: {cause}"),
            })
            .collect()
    }
}

pub fn run(json_output: bool) -> String {
    let checks = run_checks();
    let failed = checks.iter().filter(|check| check.outcome != Outcome::Pass).count();

    if json_output {
        let overall_status = if failed == 0 { "pass" } else { "fail" };
        let report = json!({
            "overall_status": overall_status,
            "checks": checks
                .iter()
                .map(|check| json!({
                    "name": check.name,
                    "status": check.outcome.label(),
                    "details": check.details,
                }))
                .collect::<Vec<_>>(),
        });
        return format!("{report:#}");
    }

    let headline = if failed == 0 {
        "doctor: catalog server is ready to start".to_string()
    } else {
        format!("doctor: {failed} of {} checks did not pass", checks.len())
    };
    let mut lines = vec![headline];
    lines.extend(checks.iter().map(|check| {
        let marker = match check.outcome {
            Outcome::Pass => "ok",
            Outcome::Fail => "fail",
            Outcome::Skipped => "skip",
        };
        format!("- [{marker}] {}: {}", check.name, check.details)
    }));
    lines.join("\n")
}

fn run_checks() -> Vec<Check> {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let mut checks = vec![Check::fail("config", error.to_string())];
            checks.extend(Check::skipped(&AFTER_CONFIG, "configuration did not load"));
            return checks;
        }
    };

    let mut checks = vec![Check::pass("config", "configuration loaded and validated")];
    checks.push(check_listen_address(&config));
    checks.extend(check_catalog(&config.catalog.path));
    checks
}

fn check_listen_address(config: &AppConfig) -> Check {
    let address = config.listen_address();
    let bind = (config.server.bind_address.as_str(), config.server.port);

    match bind.to_socket_addrs().map(|mut resolved| resolved.next()) {
        Ok(Some(resolved)) => Check::pass("listen_address", format!("`{address}` -> {resolved}")),
        Ok(None) => Check::fail("listen_address", format!("`{address}` resolves to nothing")),
        Err(error) => Check::fail("listen_address", format!("`{address}`: {error}")),
    }
}

fn check_catalog(path: &Path) -> Vec<Check> {
    if !path.is_file() {
        let mut checks = vec![Check::fail(
            "catalog_file",
            format!("`{}` does not exist or is not a regular file", path.display()),
        )];
        checks.extend(Check::skipped(&AFTER_FILE, "catalog file is missing"));
        return checks;
    }

    let file = Check::pass("catalog_file", format!("found `{}`", path.display()));
    match CatalogLoader::new(path).load() {
        Ok(store) => {
            let records = Check::pass("catalog_records", "every record parsed and validated");
            let count = if store.is_empty() {
                Check::fail("product_count", "catalog has no products; every lookup would miss")
            } else {
                Check::pass("product_count", format!("{} products", store.len()))
            };
            vec![file, records, count]
        }
        Err(error) => {
            let records = Check::fail("catalog_records", describe_load_error(&error));
            let mut checks = vec![file, records];
            checks.extend(Check::skipped(&AFTER_FILE[1..], "catalog records did not load"));
            checks
        }
    }
}

fn describe_load_error(error: &LoadError) -> String {
    match error {
        LoadError::Read { source, .. } => format!("unreadable: {source}"),
        LoadError::Parse { source, .. } => format!("malformed JSON: {source}"),
        LoadError::DuplicateId { id } => format!("duplicate product id `{id}`"),
        LoadError::Invalid { id, reason } => format!("invalid record `{id}`: {reason}"),
    }
}
