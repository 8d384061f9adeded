pub mod config;
pub mod doctor;
pub mod query;

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: &impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => return Self::failure(command, "serialization", error.to_string(), 1),
        };
        let message: String = message.into();
        let envelope = json!({
            "command": command,
            "status": "ok",
            "error_class": Value::Null,
            "message": message,
            "data": data,
        });
        Self { exit_code: 0, output: envelope.to_string() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let message: String = message.into();
        let envelope = json!({
            "command": command,
            "status": "error",
            "error_class": error_class,
            "message": message,
        });
        Self { exit_code, output: envelope.to_string() }
    }
}
