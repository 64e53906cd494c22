//! Command-line arguments.
//!
//! Only per-run input lives here. Endpoints, directories and timeouts are
//! environment configuration (see `BatchConfig` and `FalConfig`).

use std::path::PathBuf;

use clap::Parser;

/// Default hosted application for `comfyq-fal`.
pub const DEFAULT_FAL_APP: &str = "fal-ai/recraft/v3/image-to-image";

/// Queue every workflow template on ComfyUI with one prompt.
#[derive(Debug, Clone, Parser)]
#[command(name = "comfyq-queue")]
#[command(version)]
pub struct QueueArgs {
    /// Text prompt for every workflow.
    #[arg(long)]
    pub prompt: String,

    /// Optional image file uploaded once and used by every workflow.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl QueueArgs {
    /// The image to upload with `~` expanded. An empty `--image ""` counts
    /// as no image.
    pub fn image_path(&self) -> Option<PathBuf> {
        self.image
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| expand_home(path.clone()))
    }
}

/// Run one request on the fal hosted queue and stream its logs.
#[derive(Debug, Clone, Parser)]
#[command(name = "comfyq-fal")]
#[command(version)]
pub struct FalArgs {
    /// Text prompt passed to the application.
    #[arg(long)]
    pub prompt: String,

    /// Optional input image URL.
    #[arg(long)]
    pub image_url: Option<String>,

    /// Hosted application ID.
    #[arg(long, default_value = DEFAULT_FAL_APP)]
    pub app: String,
}

impl FalArgs {
    /// Request arguments sent to the application.
    pub fn arguments(&self) -> serde_json::Value {
        let mut arguments = serde_json::json!({ "prompt": self.prompt });
        if let Some(url) = &self.image_url {
            arguments["image_url"] = serde_json::Value::String(url.clone());
        }
        arguments
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths are returned unchanged when no home directory can be determined.
pub fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path,
    }
}
