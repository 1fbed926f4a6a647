//! HTTP adapter for the BharatBit desk backend.
//!
//! Owns transport details only: bearer authentication, request correlation,
//! mapping of error bodies into [`ApiError`], and JSON decoding.

pub mod config;
mod endpoints;

pub use config::BackendConfig;

use bharatbit_core::{ApiError, ApiResult};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Implements every API trait of `bharatbit-core` over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_root: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let api_root = config.api_root()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { client, api_root })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let request = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        debug!(%method, %path, %request_id, "Sending request");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| {
                warn!(%method, %path, %request_id, error = %e, "Request failed");
                ApiError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = map_status_error(status, &body);
            warn!(%method, %path, %request_id, status = status.as_u16(), error = %err, "Backend rejected request");
            return Err(err);
        }

        debug!(%method, %path, %request_id, status = status.as_u16(), "Request completed");
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Decode(format!("{method} {path}: {e}")))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ApiResult<T> {
        self.execute(self.request(Method::GET, path, token)).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &Q,
    ) -> ApiResult<T> {
        self.execute(self.request(Method::GET, path, token).query(query))
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(self.request(Method::POST, path, token).json(body))
            .await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let builder = self.request(Method::PUT, path, token);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.execute(builder).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ApiResult<T> {
        self.execute(self.request(Method::DELETE, path, token)).await
    }
}

/// Build an [`ApiError::Api`] from an error response. The backend puts its
/// message in `detail`, either as a string or as a list of validation errors.
fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| detail_message(&value))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}

fn detail_message(value: &serde_json::Value) -> Option<String> {
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}
