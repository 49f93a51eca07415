//! Validation of plugin options against their JSON schema

use serde_json::{Value as JsonValue, json};

use crate::error::{ReleaseError, Result};

/// Name the plugin registers under
pub const PLUGIN_NAME: &str = "helm";

/// Whether a configuration entry addresses this plugin
pub fn matches_plugin_name(name: &str) -> bool {
    name == PLUGIN_NAME || name == format!("@auto-it/{}", PLUGIN_NAME)
}

/// JSON schema for the options object
pub fn options_schema() -> JsonValue {
    let boolean = json!({ "type": "boolean" });
    let string = json!({ "type": "string" });

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "path": string,
            "recursive": boolean,
            "push": boolean,
            "forcePush": boolean,
            "enableCanary": boolean,
            "enablePreleases": boolean,
            "replaceVersionString": boolean,
            "replaceVersionToken": boolean,
            "replaceFileWithRepository": boolean,
            "repository": string,
            "versionString": string,
            "versionToken": string,
            "useHelmDocs": boolean,
            "publishPath": string,
            "publishRepository": string,
        }
    })
}

/// Compiled options validator
pub struct OptionsValidator {
    compiled: jsonschema::Validator,
}

impl OptionsValidator {
    pub fn new() -> Result<Self> {
        let compiled =
            jsonschema::validator_for(&options_schema()).map_err(|e| ReleaseError::InvalidSchema {
                message: format!("Invalid schema: {}", e),
            })?;

        Ok(Self { compiled })
    }

    /// Describe every schema violation (empty when valid)
    pub fn validate(&self, options: &JsonValue) -> Vec<String> {
        self.compiled
            .iter_errors(options)
            .map(|e| {
                let path = e.instance_path.to_string();
                let path = if path.is_empty() {
                    "(root)".to_string()
                } else {
                    path
                };
                format!("{}: {}", path, e.to_string().replace('"', "'"))
            })
            .collect()
    }
}
