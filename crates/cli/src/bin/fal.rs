//! `comfyq-fal` -- run one request on the fal hosted queue.
//!
//! Submits the prompt (and optional image URL) to a hosted application,
//! prints each new log line while the request runs, then prints the
//! result JSON.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description              |
//! |------------------------|----------|-------------------------|--------------------------|
//! | `FAL_KEY`              | yes      | --                      | fal API key              |
//! | `FAL_QUEUE_URL`        | no       | `https://queue.fal.run` | Queue endpoint           |
//! | `FAL_POLL_INTERVAL_MS` | no       | `500`                   | Delay between polls      |
//! | `FAL_MAX_WAIT_SECS`    | no       | `600`                   | Give up after this long  |
//! | `REQUEST_TIMEOUT_SECS` | no       | `60`                    | Per-request timeout      |

use clap::Parser;

use comfyq_cli::args::FalArgs;
use comfyq_cli::logging;
use comfyq_cloud::config::FalConfig;
use comfyq_cloud::fal::{FalClient, LogCursor, QueueStatus};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    let args = FalArgs::parse();

    logging::init("comfyq_cli=info,comfyq_cloud=info");

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "Request failed");
        std::process::exit(1);
    }
}

async fn run(args: FalArgs) -> anyhow::Result<()> {
    let config = FalConfig::from_env()?;
    let client = FalClient::new(&config)?;

    let mut cursor = LogCursor::default();
    let result = client
        .subscribe(&args.app, &args.arguments(), |status| {
            if let QueueStatus::InQueue { queue_position } = status {
                tracing::info!(?queue_position, "Waiting in queue");
            }
            for entry in cursor.advance(status.logs()) {
                println!("{}", entry.message);
            }
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
