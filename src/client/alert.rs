use reqwest::header::HeaderMap;

/// Default client application name used in alert header names.
pub const DEFAULT_APPLICATION_NAME: &str = "snipptorApp";

/// Notification the service attaches to a response through headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Translation key, e.g. `snipptorApp.engine.created`.
    pub key: String,
    /// Usually the affected entity id.
    pub param: Option<String>,
    pub is_error: bool,
}

impl Alert {
    /// Read the alert headers for `application_name` if present.
    pub fn from_headers(headers: &HeaderMap, application_name: &str) -> Option<Self> {
        let prefix = format!("x-{}", application_name.to_lowercase());
        let header = |suffix: &str| {
            headers
                .get(format!("{}-{}", prefix, suffix).as_str())
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let param = header("params");
        if let Some(key) = header("error") {
            return Some(Self { key, param, is_error: true });
        }
        header("alert").map(|key| Self { key, param, is_error: false })
    }

    /// The action part of the key (`created`, `updated`, `deleted`, ...).
    pub fn action(&self) -> &str {
        self.key.rsplit('.').next().unwrap_or(&self.key)
    }
}
