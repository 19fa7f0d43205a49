use reqwest::{Client, Method, RequestBuilder, Response, Url};
use tracing::{debug, info, warn};
use crate::errors::{AdminError, Problem};
use super::alert::{Alert, DEFAULT_APPLICATION_NAME};

/// Shared HTTP plumbing for every entity resource.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    application_name: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, AdminError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| AdminError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AdminError::Config(format!(
                "Unsupported API URL scheme '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
        })
    }

    pub fn with_application_name(mut self, name: &str) -> Self {
        self.application_name = name.to_string();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/api/<path>`, keeping any path prefix of the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, AdminError> {
        self.base_url
            .join(&format!("api/{}", path.trim_start_matches('/')))
            .map_err(|e| AdminError::Internal(format!("Cannot build URL for '{}': {}", path, e)))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "REST request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request, turning transport failures and non-success statuses
    /// into errors and logging any alert the service attached.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, AdminError> {
        let resp = request
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;

        if let Some(alert) = Alert::from_headers(resp.headers(), &self.application_name) {
            if alert.is_error {
                warn!(key = %alert.key, param = ?alert.param, "Service error alert");
            } else {
                info!(key = %alert.key, param = ?alert.param, "Service alert");
            }
        }

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let problem = resp.json::<Problem>().await.ok();
        warn!(
            status = status.as_u16(),
            detail = problem.as_ref().and_then(|p| p.summary()).unwrap_or(""),
            "Request failed"
        );
        Err(AdminError::Status { status: status.as_u16(), problem })
    }
}
