use std::time::Duration;

use comfyq_core::config::{positive_u64, required, ConfigError};

/// Default fal queue endpoint.
pub const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run";

/// Default delay between status polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default upper bound on how long `subscribe` waits for completion.
pub const DEFAULT_MAX_WAIT_SECS: u64 = 600;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Hosted queue configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FalConfig {
    /// API key sent as `Authorization: Key <key>`.
    pub api_key: String,
    /// Queue base URL.
    pub queue_url: String,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Give up waiting after this long.
    pub max_wait: Duration,
    /// Fixed timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl FalConfig {
    /// Build a config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            queue_url: DEFAULT_QUEUE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `FAL_KEY`              | required                 |
    /// | `FAL_QUEUE_URL`        | `https://queue.fal.run`  |
    /// | `FAL_POLL_INTERVAL_MS` | `500`                    |
    /// | `FAL_MAX_WAIT_SECS`    | `600`                    |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "FAL_KEY")?;
        let queue_url = lookup("FAL_QUEUE_URL").unwrap_or_else(|| DEFAULT_QUEUE_URL.to_string());

        Ok(Self {
            api_key,
            queue_url,
            poll_interval: Duration::from_millis(positive_u64(
                &lookup,
                "FAL_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            max_wait: Duration::from_secs(positive_u64(
                &lookup,
                "FAL_MAX_WAIT_SECS",
                DEFAULT_MAX_WAIT_SECS,
            )?),
            request_timeout: Duration::from_secs(positive_u64(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn key_is_required() {
        let result = FalConfig::from_lookup(|_| None);
        assert_matches!(result, Err(ConfigError::Missing { name: "FAL_KEY" }));
    }

    #[test]
    fn defaults_fill_the_rest() {
        let config = FalConfig::from_lookup(|name| (name == "FAL_KEY").then(|| "k".to_string()))
            .unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.queue_url, "https://queue.fal.run");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.max_wait, Duration::from_secs(600));
    }

    #[test]
    fn bad_poll_interval_is_rejected() {
        let result = FalConfig::from_lookup(|name| match name {
            "FAL_KEY" => Some("k".to_string()),
            "FAL_POLL_INTERVAL_MS" => Some("fast".to_string()),
            _ => None,
        });
        assert_matches!(
            result,
            Err(ConfigError::Invalid { name: "FAL_POLL_INTERVAL_MS", .. })
        );
    }
}
