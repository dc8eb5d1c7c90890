use std::time::Duration;

use reqwest::multipart;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::models::{Report, User, UserRole};
use crate::upload::PendingFile;

use super::types::{ApiError, BackendApi, GENERIC_FAILURE_REASON};

/// Connect timeout for all requests.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Overall request timeout. Uploads trigger server-side extraction, which
/// can take a while on large scans.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP client for the clinic backend.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given API configuration.
    pub fn new(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url().to_string(),
            client,
        }
    }

    /// Client for the base URL resolved from the environment.
    pub fn from_env() -> Self {
        Self::new(&ApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Error body shape for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_connect() {
        ApiError::transport(format!("connect failed: {e}"))
    } else if e.is_timeout() {
        ApiError::transport(format!("timed out: {e}"))
    } else {
        ApiError::transport(e.to_string())
    }
}

/// Decode a response. Non-2xx becomes `ApiError::Api` carrying the JSON
/// body's `detail` when parseable, the generic reason otherwise.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| GENERIC_FAILURE_REASON.to_string());
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::transport(format!("malformed response body: {e}")))
}

impl BackendApi for ApiClient {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self
            .client
            .get(self.url("/users/"))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn list_reports(&self) -> Result<Vec<Report>, ApiError> {
        let response = self
            .client
            .get(self.url("/reports/"))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn list_user_reports(&self, user_id: &str) -> Result<Vec<Report>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/user/{user_id}/reports/")))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn login(&self, mobile_number: &str) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/login/"))
            .form(&[("mobile_number", mobile_number)])
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn register(
        &self,
        name: &str,
        mobile_number: &str,
        role: UserRole,
    ) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/register-user/"))
            .form(&[
                ("name", name),
                ("mobile_number", mobile_number),
                ("role", role.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn upload_report(&self, user_id: &str, file: &PendingFile) -> Result<Report, ApiError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| ApiError::transport(format!("invalid media type: {e}")))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("user_id", user_id.to_string());

        let response = self
            .client
            .post(self.url("/upload-report/"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}
