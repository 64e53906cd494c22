//! `comfyq-queue` -- queue every workflow template on ComfyUI.
//!
//! Patches each `*.json` template in the template directory with the
//! given prompt (and optional uploaded image) and submits it, printing
//! one prompt ID per template.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                    |
//! |------------------------|----------|-------------------------|--------------------------------|
//! | `COMFYUI_URL`          | no       | `http://127.0.0.1:8188` | ComfyUI HTTP endpoint          |
//! | `TEMPLATE_DIR`         | no       | `comfyui_templates`     | Directory of `*.json` templates |
//! | `REQUEST_TIMEOUT_SECS` | no       | `60`                    | Per-request timeout            |

use clap::Parser;

use comfyq_cli::args::QueueArgs;
use comfyq_cli::{logging, output};
use comfyq_comfyui::api::ComfyUIApi;
use comfyq_pipeline::batch::{run_batch, BatchRequest};
use comfyq_pipeline::config::BatchConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    let args = QueueArgs::parse();

    logging::init("comfyq_cli=info,comfyq_pipeline=info");

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "Batch aborted");
        std::process::exit(1);
    }
}

async fn run(args: QueueArgs) -> anyhow::Result<()> {
    let config = BatchConfig::from_env()?;
    tracing::info!(
        comfyui_url = %config.comfyui_url,
        template_dir = %config.template_dir.display(),
        timeout_secs = config.request_timeout.as_secs(),
        "Loaded batch configuration",
    );

    let api = ComfyUIApi::with_timeout(config.comfyui_url.clone(), config.request_timeout)?;

    let request = BatchRequest {
        image_path: args.image_path(),
        prompt: args.prompt,
    };

    let report = run_batch(&api, &config.template_dir, &request, |event| {
        println!("{}", output::batch_event_line(event));
    })
    .await?;

    println!("{}", output::batch_summary(&report, api.api_url()));
    Ok(())
}
