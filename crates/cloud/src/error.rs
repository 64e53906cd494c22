use std::time::Duration;

/// Errors from the hosted queue client.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The HTTP request failed or the response had an unexpected shape.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The queue returned a non-2xx status code.
    #[error("fal API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The request did not complete within the configured wait.
    #[error("Request {request_id} did not complete within {waited:?}")]
    Timeout {
        request_id: String,
        waited: Duration,
    },
}
