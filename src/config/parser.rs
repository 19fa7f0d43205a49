use std::path::Path;
use crate::errors::AdminError;
use super::credentials::resolve_credential;
use super::schema::CONFIG_SCHEMA;
use super::types::AdminConfig;
use tracing::{debug, warn};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "snipptor-admin.yaml";

pub const ENV_API_URL: &str = "SNIPPTOR_API_URL";
pub const ENV_API_TOKEN: &str = "SNIPPTOR_API_TOKEN";

pub async fn parse_config(path: &Path) -> Result<AdminConfig, AdminError> {
    if !path.exists() {
        return Err(AdminError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(AdminError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(AdminConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: AdminConfig = serde_yaml::from_value(yaml)?;

    validate_values(&config)?;

    Ok(config)
}

/// Resolve the effective configuration: explicit file, else the default
/// file when present, else built-in defaults; then environment overrides.
pub async fn load_config(path: Option<&Path>) -> Result<AdminConfig, AdminError> {
    let mut config = match path {
        Some(path) => parse_config(path).await?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                debug!(path = %default_path.display(), "Using default config file");
                parse_config(default_path).await?
            } else {
                AdminConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Environment values win over the file; `$VAR` tokens are resolved last.
pub fn apply_env_overrides<F>(config: &mut AdminConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
        config.api_mut().base_url = Some(url);
    }
    if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
        config.api_mut().token = Some(token);
    }
    if let Some(api) = config.api.as_mut() {
        api.token = api.token.as_deref().map(resolve_credential);
    }
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), AdminError> {
    // Convert YAML value to JSON for schema validation
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| AdminError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| AdminError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: typed parsing below is the hard check
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

fn validate_values(config: &AdminConfig) -> Result<(), AdminError> {
    if config.items_per_page() == 0 {
        return Err(AdminError::Config("pagination.items_per_page must be at least 1".into()));
    }

    let url = config.base_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AdminError::Config(format!(
            "api.base_url must be an http(s) URL, got '{}'",
            url
        )));
    }

    Ok(())
}
