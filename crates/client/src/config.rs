use bharatbit_core::ApiError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the desk backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of the backend. Endpoints are resolved under `{base_url}/api`.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Parse and check `base_url`, returning the `/api` root without a trailing slash.
    pub fn api_root(&self) -> Result<String, ApiError> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| ApiError::Config(format!("invalid backend url {:?}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ApiError::Config(format!(
                    "unsupported backend url scheme: {other}"
                )))
            }
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::Config(
                "backend url must not carry a query or fragment".to_string(),
            ));
        }
        Ok(format!("{}/api", url.as_str().trim_end_matches('/')))
    }
}
