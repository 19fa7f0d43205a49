use std::path::Path;

use crate::config::credentials::redact_token;
use crate::config::{parse_config, AdminConfig};
use crate::errors::AdminError;
use super::commands::{ConfigCommand, GlobalArgs};
use super::context::effective_config;
use super::render::{render_json, Output};

pub async fn handle_config(global: &GlobalArgs, output: Output, action: ConfigCommand) -> Result<(), AdminError> {
    match action {
        ConfigCommand::Validate { path } => {
            parse_config(Path::new(&path)).await?;
            output.success(&format!("Configuration is valid: {}", path));
            Ok(())
        }
        ConfigCommand::Show => {
            let config = redacted(effective_config(global).await?);
            if output.json {
                println!("{}", render_json(&config)?);
            } else {
                print!("{}", serde_yaml::to_string(&config)?);
            }
            Ok(())
        }
    }
}

/// The config with its token masked and every default filled in.
fn redacted(config: AdminConfig) -> AdminConfig {
    let mut shown = AdminConfig::default();
    {
        let api = shown.api_mut();
        api.base_url = Some(config.base_url().to_string());
        api.token = config.token().map(redact_token);
        api.application_name = Some(config.application_name().to_string());
    }
    shown.pagination = Some(crate::config::PaginationConfig {
        items_per_page: Some(config.items_per_page()),
        sort: Some(config.sort().to_string()),
    });
    shown.output = Some(crate::config::OutputConfig { format: Some(config.output_format()) });
    shown
}
