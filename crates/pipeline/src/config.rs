use std::path::PathBuf;
use std::time::Duration;

use comfyq_core::config::{positive_u64, ConfigError};

/// Default ComfyUI HTTP endpoint.
pub const DEFAULT_COMFYUI_URL: &str = "http://127.0.0.1:8188";

/// Default template directory, relative to the working directory.
pub const DEFAULT_TEMPLATE_DIR: &str = "comfyui_templates";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Batch configuration loaded from environment variables.
///
/// These are process-wide settings rather than per-run arguments; the
/// prompt and image are supplied separately on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// ComfyUI base HTTP URL.
    pub comfyui_url: String,
    /// Directory scanned for `*.json` workflow templates.
    pub template_dir: PathBuf,
    /// Fixed timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            comfyui_url: DEFAULT_COMFYUI_URL.to_string(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl BatchConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `COMFYUI_URL`          | `http://127.0.0.1:8188`  |
    /// | `TEMPLATE_DIR`         | `comfyui_templates`      |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let comfyui_url = lookup("COMFYUI_URL").unwrap_or(defaults.comfyui_url);

        let template_dir = lookup("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.template_dir);

        let request_timeout = Duration::from_secs(positive_u64(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        Ok(Self {
            comfyui_url,
            template_dir,
            request_timeout,
        })
    }
}
