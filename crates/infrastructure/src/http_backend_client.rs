//! reqwest-backed adapter for the backend REST API.

use std::time::Duration;

use async_trait::async_trait;
use chronopay_application::{ImportGateway, ReferenceGateway, SetupGateway};
use chronopay_core::{AppError, AppResult};
use chronopay_domain::{ImportFile, ImportKind, ImportParameters, ReferenceKind};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

const TEMPLATE_DOWNLOAD_PATH: &str = "/Utilities/Download";
const UPLOAD_FIELD_NAME: &str = "file";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

/// HTTP client implementing the setup, reference and import gateways.
#[derive(Clone)]
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    /// Creates a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http_client,
            base_url,
        }
    }

    /// Builds the underlying reqwest client with a request timeout.
    pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
    }

    /// Returns the API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        Url::parse(format!("{}{path}", self.base_url).as_str()).map_err(|error| {
            AppError::Internal(format!("invalid endpoint '{}{path}': {error}", self.base_url))
        })
    }

    fn record_endpoint(&self, path: &str, record_key: &str) -> AppResult<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| AppError::Internal(format!("endpoint '{path}' cannot take a key")))?
            .push(record_key);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, target: &str) -> AppResult<Response> {
        let response = request.send().await.map_err(|error| {
            warn!(target_path = target, error = %error, "backend request failed");
            AppError::Transport(format!("request to {target} failed: {error}"))
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(target_path = target, status = status.as_u16(), "backend request succeeded");
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        warn!(
            target_path = target,
            status = status.as_u16(),
            "backend returned status {}: {body}",
            status.as_u16()
        );
        Err(status_error(status, body.as_str()))
    }

    async fn read_json(response: Response, target: &str) -> AppResult<Value> {
        let body = response.text().await.map_err(|error| {
            AppError::Transport(format!("failed to read response from {target}: {error}"))
        })?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(body.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid JSON returned by {target}: {error}"))
        })
    }

    async fn get_rows(&self, path: &str) -> AppResult<Vec<Value>> {
        let url = self.endpoint(path)?;
        let response = self.send(self.http_client.get(url), path).await?;
        list_rows(Self::read_json(response, path).await?, path)
    }
}

#[async_trait]
impl SetupGateway for HttpBackendClient {
    async fn list(&self, resource_path: &str) -> AppResult<Vec<Value>> {
        self.get_rows(resource_path).await
    }

    async fn create(&self, resource_path: &str, payload: Value) -> AppResult<()> {
        let url = self.endpoint(resource_path)?;
        self.send(self.http_client.post(url).json(&payload), resource_path)
            .await?;
        Ok(())
    }

    async fn update(&self, resource_path: &str, record_key: &str, payload: Value) -> AppResult<()> {
        let url = self.record_endpoint(resource_path, record_key)?;
        self.send(self.http_client.put(url).json(&payload), resource_path)
            .await?;
        Ok(())
    }

    async fn delete(&self, resource_path: &str, record_key: &str) -> AppResult<()> {
        let url = self.record_endpoint(resource_path, record_key)?;
        self.send(self.http_client.delete(url), resource_path)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReferenceGateway for HttpBackendClient {
    async fn list_reference(&self, kind: ReferenceKind) -> AppResult<Vec<Value>> {
        self.get_rows(kind.resource_path()).await
    }
}

#[async_trait]
impl ImportGateway for HttpBackendClient {
    async fn stage(
        &self,
        kind: ImportKind,
        file: &ImportFile,
        parameters: &ImportParameters,
    ) -> AppResult<Value> {
        let path = kind.stage_path();
        let url = self.endpoint(path)?;
        let form = upload_form(file, parameters);
        let response = self
            .send(self.http_client.post(url).multipart(form), path)
            .await?;
        Self::read_json(response, path).await
    }

    async fn commit(&self, kind: ImportKind, body: Value) -> AppResult<Value> {
        let path = kind.commit_path();
        let url = self.endpoint(path.as_str())?;
        let response = self
            .send(self.http_client.post(url).json(&body), path.as_str())
            .await?;
        Self::read_json(response, path.as_str()).await
    }

    async fn download_template(&self, file_name: &str) -> AppResult<Vec<u8>> {
        let url = self.record_endpoint(TEMPLATE_DOWNLOAD_PATH, file_name)?;
        let response = self
            .send(self.http_client.get(url), TEMPLATE_DOWNLOAD_PATH)
            .await?;
        let bytes = response.bytes().await.map_err(|error| {
            AppError::Transport(format!("failed to download template '{file_name}': {error}"))
        })?;
        Ok(bytes.to_vec())
    }
}

fn upload_form(file: &ImportFile, parameters: &ImportParameters) -> Form {
    let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    parameters
        .to_form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
        .part(UPLOAD_FIELD_NAME, part)
}

/// Maps a non-success response to a server error, preferring the body's
/// `message` member.
fn status_error(status: StatusCode, body: &str) -> AppError {
    AppError::Server {
        status: status.as_u16(),
        message: server_message(body),
    }
}

fn server_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
    parsed
        .message
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty())
}

/// Accepts a bare array or an object wrapping the rows in `data`.
fn list_rows(body: Value, path: &str) -> AppResult<Vec<Value>> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(AppError::Internal(format!(
                "{path} did not return a list"
            ))),
        },
        _ => Err(AppError::Internal(format!(
            "{path} did not return a list"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chronopay_core::{AppError, AppResult};
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{HttpBackendClient, list_rows, server_message, status_error};

    fn client() -> AppResult<HttpBackendClient> {
        let http_client = HttpBackendClient::build_http_client(Duration::from_secs(5))?;
        Ok(HttpBackendClient::new(http_client, "https://payroll.example.com/api/"))
    }

    #[test]
    fn server_message_prefers_json_message() {
        assert_eq!(
            server_message(r#"{"message":"Department code already exists."}"#).as_deref(),
            Some("Department code already exists.")
        );
        assert_eq!(
            server_message(r#"{"Message":"Invalid sheet"}"#).as_deref(),
            Some("Invalid sheet")
        );
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
        assert_eq!(server_message("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn status_error_carries_status_and_message() {
        let error = status_error(StatusCode::BAD_REQUEST, r#"{"message":"Bad date range"}"#);
        assert!(matches!(
            &error,
            AppError::Server {
                status: 400,
                message: Some(message),
            } if message == "Bad date range"
        ));
        assert_eq!(error.user_message(), "Bad date range");
    }

    #[test]
    fn list_rows_accepts_bare_and_wrapped_arrays() -> AppResult<()> {
        let bare = list_rows(json!([{"deptCode": "HR"}]), "/Fs/Employment/Department")?;
        let wrapped = list_rows(
            json!({"data": [{"deptCode": "HR"}, {"deptCode": "IT"}]}),
            "/Fs/Employment/Department",
        )?;
        assert_eq!(bare.len(), 1);
        assert_eq!(wrapped.len(), 2);
        assert!(list_rows(json!({"total": 3}), "/Fs/Employment/Department").is_err());
        Ok(())
    }

    #[test]
    fn record_endpoint_appends_escaped_key() -> AppResult<()> {
        let client = client()?;
        assert_eq!(client.base_url(), "https://payroll.example.com/api");

        let url = client.record_endpoint("/Fs/Employment/Department", "HR 01")?;
        assert_eq!(
            url.as_str(),
            "https://payroll.example.com/api/Fs/Employment/Department/HR%2001"
        );

        let template = client.record_endpoint("/Utilities/Download", "Employee Masterfile.xlsx")?;
        assert_eq!(
            template.path(),
            "/api/Utilities/Download/Employee%20Masterfile.xlsx"
        );
        Ok(())
    }
}
