use std::path::Path;

use crate::client::{ApiClient, QueryParams};
use crate::config::credentials::resolve_credential;
use crate::config::{load_config, AdminConfig, OutputFormat};
use crate::errors::AdminError;
use crate::store::AdminStore;
use super::commands::{GlobalArgs, ListArgs};
use super::render::Output;

/// Everything a command needs: the effective config, the store every
/// command in a process (or shell session) shares, and the output mode.
pub struct AppContext {
    pub config: AdminConfig,
    pub store: AdminStore,
    pub output: Output,
}

impl AppContext {
    pub fn new(config: AdminConfig, output: Output) -> Result<Self, AdminError> {
        let client = ApiClient::new(config.base_url(), config.token())?
            .with_application_name(config.application_name());
        Ok(Self { store: AdminStore::new(client), config, output })
    }

    /// Load config for `global` and open a store against it.
    pub async fn from_args(global: &GlobalArgs) -> Result<Self, AdminError> {
        let config = effective_config(global).await?;
        let output = Output {
            json: global.json || config.output_format() == OutputFormat::Json,
            quiet: global.quiet,
        };
        Self::new(config, output)
    }

    /// List query from command flags, defaulting to the configured paging.
    pub fn query(&self, args: &ListArgs) -> QueryParams {
        QueryParams::page(
            args.page,
            args.size.unwrap_or_else(|| self.config.items_per_page()),
            args.sort.clone().unwrap_or_else(|| self.config.sort().to_string()),
        )
    }
}

/// Config file and environment, then command-line flags on top.
pub async fn effective_config(global: &GlobalArgs) -> Result<AdminConfig, AdminError> {
    let mut config = load_config(global.config.as_deref().map(Path::new)).await?;
    if let Some(url) = &global.api_url {
        config.api_mut().base_url = Some(url.clone());
    }
    if let Some(token) = &global.token {
        config.api_mut().token = Some(resolve_credential(token));
    }
    Ok(config)
}
