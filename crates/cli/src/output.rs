//! Lines printed to stdout.

use comfyq_pipeline::batch::{BatchEvent, BatchReport};

/// Format a batch progress event for the terminal.
pub fn batch_event_line(event: &BatchEvent) -> String {
    match event {
        BatchEvent::ImageUploaded { name } => {
            format!("Uploaded image → ComfyUI filename: {name}")
        }
        BatchEvent::Started { templates } => format!("Queuing {templates} workflows …"),
        BatchEvent::Queued(queued) => {
            format!("• {:<30} → prompt_id {}", queued.template, queued.job_id)
        }
    }
}

/// Closing line after a successful batch.
pub fn batch_summary(report: &BatchReport, comfyui_url: &str) -> String {
    format!(
        "\nAll {} workflows queued. Monitor progress in ComfyUI or poll {comfyui_url}/history/<prompt_id>.",
        report.queued.len()
    )
}
