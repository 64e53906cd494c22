//! fal.ai queue API client.
//!
//! A request goes through three endpoints:
//!
//! 1. `POST {queue_url}/{app_id}` with the arguments as the JSON body,
//!    returning a [`QueueHandle`] with status and response URLs.
//! 2. `GET {status_url}?logs=1`, polled until the status is `COMPLETED`.
//! 3. `GET {response_url}` for the final output.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

use crate::config::FalConfig;
use crate::error::CloudError;

/// Handle returned when a request is accepted onto the queue.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueHandle {
    pub request_id: String,
    pub status_url: String,
    pub response_url: String,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// One log line emitted by the running application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    pub message: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Queue status of a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    /// Waiting for a runner.
    InQueue {
        #[serde(default)]
        queue_position: Option<u64>,
    },
    /// Running; `logs` is cumulative when requested.
    InProgress {
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
    },
    /// Finished; the result can be fetched.
    Completed {
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
    },
}

impl QueueStatus {
    /// Logs carried by this status, empty when none were returned.
    pub fn logs(&self) -> &[LogEntry] {
        match self {
            Self::InQueue { .. } => &[],
            Self::InProgress { logs } | Self::Completed { logs } => logs.as_deref().unwrap_or(&[]),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Tracks how many cumulative log lines have already been reported.
#[derive(Debug, Default)]
pub struct LogCursor {
    seen: usize,
}

impl LogCursor {
    /// Return the entries not seen by a previous call.
    ///
    /// If the server returns fewer lines than already seen, the log was
    /// reset and everything is treated as new.
    pub fn advance<'a>(&mut self, logs: &'a [LogEntry]) -> &'a [LogEntry] {
        if logs.len() < self.seen {
            self.seen = 0;
        }
        let fresh = &logs[self.seen..];
        self.seen = logs.len();
        fresh
    }
}

/// HTTP client for the fal queue.
pub struct FalClient {
    client: reqwest::Client,
    queue_url: String,
    auth_header: String,
    poll_interval: Duration,
    max_wait: Duration,
}

impl FalClient {
    pub fn new(config: &FalConfig) -> Result<Self, CloudError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            queue_url: config.queue_url.trim_end_matches('/').to_string(),
            auth_header: format!("Key {}", config.api_key),
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
        })
    }

    /// Put a request for `app_id` (e.g. `fal-ai/recraft/v3/image-to-image`)
    /// on the queue.
    pub async fn submit(
        &self,
        app_id: &str,
        arguments: &serde_json::Value,
    ) -> Result<QueueHandle, CloudError> {
        let response = self
            .client
            .post(format!("{}/{}", self.queue_url, app_id.trim_matches('/')))
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(arguments)
            .send()
            .await?;

        let handle: QueueHandle = parse_response(response).await?;
        tracing::info!(app_id, request_id = %handle.request_id, "Submitted request to fal queue");
        Ok(handle)
    }

    /// Fetch the current status, optionally including logs.
    pub async fn status(
        &self,
        handle: &QueueHandle,
        with_logs: bool,
    ) -> Result<QueueStatus, CloudError> {
        let mut request = self
            .client
            .get(&handle.status_url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header);
        if with_logs {
            request = request.query(&[("logs", "1")]);
        }

        parse_response(request.send().await?).await
    }

    /// Fetch the output of a completed request.
    pub async fn result(&self, handle: &QueueHandle) -> Result<serde_json::Value, CloudError> {
        let response = self
            .client
            .get(&handle.response_url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Submit a request, poll it to completion, and return its output.
    ///
    /// `on_update` receives every polled status, including the final
    /// `COMPLETED` one.
    pub async fn subscribe<F>(
        &self,
        app_id: &str,
        arguments: &serde_json::Value,
        mut on_update: F,
    ) -> Result<serde_json::Value, CloudError>
    where
        F: FnMut(&QueueStatus),
    {
        let handle = self.submit(app_id, arguments).await?;
        let started = Instant::now();

        loop {
            let status = self.status(&handle, true).await?;
            tracing::debug!(request_id = %handle.request_id, ?status, "Polled fal queue");
            on_update(&status);

            if status.is_completed() {
                break;
            }

            let waited = started.elapsed();
            if waited >= self.max_wait {
                return Err(CloudError::Timeout {
                    request_id: handle.request_id,
                    waited,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        self.result(&handle).await
    }
}

/// Check the status code and decode the JSON body.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CloudError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(CloudError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
