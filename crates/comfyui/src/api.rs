//! REST API client for the ComfyUI HTTP endpoints.
//!
//! Wraps image upload and workflow submission using [`reqwest`]. Every
//! request shares one client configured with a fixed timeout; nothing is
//! retried.

use std::time::Duration;

use base64::Engine;
use serde::Deserialize;

use comfyq_core::document::WorkflowDocument;

/// Request timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Upload type requested for images that workflows read as inputs.
const UPLOAD_TYPE_INPUT: &str = "input";

/// HTTP client for a single ComfyUI instance.
pub struct ComfyUIApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by the ComfyUI `/prompt` endpoint after
/// successfully queuing a workflow.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the queued prompt.
    pub prompt_id: String,
    /// Position in the execution queue, when the server reports it.
    #[serde(default)]
    pub number: Option<i64>,
}

/// Response returned by `/upload/image`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Filename the server stored the image under. Workflows reference
    /// the upload by this name.
    pub name: String,
    #[serde(default)]
    pub subfolder: Option<String>,
}

/// Errors from the ComfyUI REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// response body did not have the expected shape.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ComfyUI returned a non-2xx status code.
    #[error("ComfyUI API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ComfyUIApi {
    /// Create a new API client with the default request timeout.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8188`.
    pub fn new(api_url: impl Into<String>) -> Result<Self, ComfyUIApiError> {
        Self::with_timeout(api_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a new API client whose requests fail after `timeout`.
    pub fn with_timeout(
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ComfyUIApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Base HTTP URL this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Upload an image for use as a workflow input.
    ///
    /// Sends a `POST /upload/image` request whose JSON body carries the
    /// base64-encoded bytes. Returns the server-assigned filename.
    pub async fn upload_image(&self, bytes: &[u8]) -> Result<UploadResponse, ComfyUIApiError> {
        let body = serde_json::json!({
            "type": UPLOAD_TYPE_INPUT,
            "image": base64::engine::general_purpose::STANDARD.encode(bytes),
        });

        let response = self
            .client
            .post(format!("{}/upload/image", self.api_url))
            .json(&body)
            .send()
            .await?;

        let upload: UploadResponse = Self::parse_response(response).await?;
        tracing::debug!(name = %upload.name, size = bytes.len(), "Uploaded image to ComfyUI");
        Ok(upload)
    }

    /// Submit a workflow for execution under a fresh client ID.
    ///
    /// A new UUID v4 client ID is generated for every call.
    pub async fn submit_workflow(
        &self,
        workflow: &WorkflowDocument,
    ) -> Result<SubmitResponse, ComfyUIApiError> {
        let client_id = uuid::Uuid::new_v4().to_string();
        self.submit_workflow_as(workflow, &client_id).await
    }

    /// Submit a workflow for execution.
    ///
    /// Sends a `POST /prompt` request with the given workflow JSON and
    /// client ID. Returns the server-assigned `prompt_id`.
    pub async fn submit_workflow_as(
        &self,
        workflow: &WorkflowDocument,
        client_id: &str,
    ) -> Result<SubmitResponse, ComfyUIApiError> {
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": client_id,
        });

        let response = self
            .client
            .post(format!("{}/prompt", self.api_url))
            .json(&body)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::parse_response(response).await?;
        tracing::debug!(
            prompt_id = %submitted.prompt_id,
            client_id = %client_id,
            "Workflow queued on ComfyUI",
        );
        Ok(submitted)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ComfyUIApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ComfyUIApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ComfyUIApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ComfyUIApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
