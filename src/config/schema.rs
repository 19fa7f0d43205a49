use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "api": {
                "type": "object",
                "properties": {
                    "base_url": { "type": "string", "format": "uri" },
                    "token": { "type": "string" },
                    "application_name": { "type": "string", "minLength": 1 }
                },
                "additionalProperties": false
            },
            "pagination": {
                "type": "object",
                "properties": {
                    "items_per_page": { "type": "integer", "minimum": 1 },
                    "sort": { "type": "string", "pattern": "^[A-Za-z_]+(,(asc|desc))?$" }
                },
                "additionalProperties": false
            },
            "output": {
                "type": "object",
                "properties": {
                    "format": { "type": "string", "enum": ["table", "json"] }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
});
