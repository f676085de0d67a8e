use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "scanner": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "engine_url": { "type": "string", "minLength": 1 },
                    "navigation_timeout_secs": { "type": "integer", "minimum": 1 },
                    "engine_timeout_secs": { "type": "integer", "minimum": 1 },
                    "node_binary": { "type": "string", "minLength": 1 },
                    "driver_dir": { "type": "string" },
                    "headless": { "type": "boolean" },
                    "tags": { "type": "array", "items": { "type": "string" } }
                }
            },
            "reports": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "root": { "type": "string", "minLength": 1 },
                    "screenshots": { "type": "boolean" }
                }
            }
        }
    })
});
