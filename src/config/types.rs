use serde::{Deserialize, Serialize};
use crate::client::alert::DEFAULT_APPLICATION_NAME;
use crate::client::query::ITEMS_PER_PAGE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SORT: &str = "id,asc";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AdminConfig {
    pub api: Option<ApiConfig>,
    pub pagination: Option<PaginationConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    /// Bearer token; `$NAME` reads the environment variable `NAME`.
    pub token: Option<String>,
    /// Prefix of the service's alert headers.
    pub application_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PaginationConfig {
    pub items_per_page: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

impl AdminConfig {
    pub fn base_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|a| a.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn token(&self) -> Option<&str> {
        self.api.as_ref().and_then(|a| a.token.as_deref())
    }

    pub fn application_name(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|a| a.application_name.as_deref())
            .unwrap_or(DEFAULT_APPLICATION_NAME)
    }

    pub fn items_per_page(&self) -> u32 {
        self.pagination
            .as_ref()
            .and_then(|p| p.items_per_page)
            .unwrap_or(ITEMS_PER_PAGE)
    }

    pub fn sort(&self) -> &str {
        self.pagination
            .as_ref()
            .and_then(|p| p.sort.as_deref())
            .unwrap_or(DEFAULT_SORT)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.as_ref().and_then(|o| o.format).unwrap_or_default()
    }

    pub fn api_mut(&mut self) -> &mut ApiConfig {
        self.api.get_or_insert_with(ApiConfig::default)
    }
}
