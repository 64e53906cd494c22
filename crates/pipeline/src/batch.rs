//! Sequential batch driver.
//!
//! One run discovers every template in the configured directory, uploads
//! the optional image once, then loads, patches and submits each template
//! in file-name order. The first failure aborts the run; templates already
//! submitted stay queued on the server.

use std::path::{Path, PathBuf};

use comfyq_comfyui::api::ComfyUIApiError;
use comfyq_core::document::WorkflowDocument;
use comfyq_core::error::CoreError;
use comfyq_core::patch::patch_in_place;
use comfyq_core::templates::{discover_templates, template_name};

use crate::queue::WorkflowQueue;

/// Per-run user input.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Prompt injected into every prompt-bearing input.
    pub prompt: String,
    /// Optional local image uploaded once and referenced by every
    /// image-bearing input.
    pub image_path: Option<PathBuf>,
}

/// One successfully queued template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedWorkflow {
    /// Template file name, e.g. `portrait.json`.
    pub template: String,
    /// Job identifier returned by the server.
    pub job_id: String,
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// The image was uploaded under this server-side name.
    ImageUploaded { name: String },
    /// Templates were discovered and submission is starting.
    Started { templates: usize },
    /// One template was queued.
    Queued(QueuedWorkflow),
}

/// Outcome of a fully successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Server-side name of the uploaded image, if one was given.
    pub uploaded_image: Option<String>,
    /// Queued templates in submission order.
    pub queued: Vec<QueuedWorkflow>,
}

/// Errors that abort a batch. Each names the file or request that failed.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No *.json files found in {}", dir.display())]
    NoTemplates { dir: PathBuf },

    #[error("Failed to list templates in {}: {source}", dir.display())]
    TemplateDir {
        dir: PathBuf,
        #[source]
        source: CoreError,
    },

    #[error("Failed to read image {}: {source}", path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload image {}: {source}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: ComfyUIApiError,
    },

    #[error("Invalid template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    #[error("Failed to queue template {}: {source}", path.display())]
    Submit {
        path: PathBuf,
        #[source]
        source: ComfyUIApiError,
    },
}

/// List the templates a batch would process, failing when there are none.
pub async fn batch_templates(template_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let templates = discover_templates(template_dir)
        .await
        .map_err(|source| BatchError::TemplateDir {
            dir: template_dir.to_path_buf(),
            source,
        })?;

    if templates.is_empty() {
        return Err(BatchError::NoTemplates {
            dir: template_dir.to_path_buf(),
        });
    }
    Ok(templates)
}

/// Run one batch against `queue`.
///
/// Templates are discovered before anything is sent, so an empty template
/// directory fails without touching the network. `on_event` observes
/// progress in order: upload, start, then one event per queued template.
pub async fn run_batch<Q, F>(
    queue: &Q,
    template_dir: &Path,
    request: &BatchRequest,
    mut on_event: F,
) -> Result<BatchReport, BatchError>
where
    Q: WorkflowQueue + ?Sized,
    F: FnMut(&BatchEvent),
{
    let templates = batch_templates(template_dir).await?;

    let uploaded_image = match &request.image_path {
        Some(path) => {
            let name = upload_image(queue, path).await?;
            on_event(&BatchEvent::ImageUploaded { name: name.clone() });
            Some(name)
        }
        None => None,
    };

    tracing::info!(
        count = templates.len(),
        dir = %template_dir.display(),
        image = uploaded_image.as_deref().unwrap_or("-"),
        "Queuing workflows",
    );
    on_event(&BatchEvent::Started {
        templates: templates.len(),
    });

    let mut report = BatchReport {
        uploaded_image,
        queued: Vec::with_capacity(templates.len()),
    };

    for path in &templates {
        let job_id = queue_template(
            queue,
            path,
            &request.prompt,
            report.uploaded_image.as_deref(),
        )
        .await?;

        let queued = QueuedWorkflow {
            template: template_name(path),
            job_id,
        };
        report.queued.push(queued.clone());
        on_event(&BatchEvent::Queued(queued));
    }

    Ok(report)
}

/// Read the image at `path` and upload it, returning the server-side name.
async fn upload_image<Q>(queue: &Q, path: &Path) -> Result<String, BatchError>
where
    Q: WorkflowQueue + ?Sized,
{
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| BatchError::ReadImage {
            path: path.to_path_buf(),
            source,
        })?;

    let name = queue
        .upload_image(&bytes)
        .await
        .map_err(|source| BatchError::Upload {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), name = %name, "Uploaded image");
    Ok(name)
}

/// Load, patch and submit a single template.
async fn queue_template<Q>(
    queue: &Q,
    path: &Path,
    prompt: &str,
    image_reference: Option<&str>,
) -> Result<String, BatchError>
where
    Q: WorkflowQueue + ?Sized,
{
    let template_error = |source: CoreError| BatchError::Template {
        path: path.to_path_buf(),
        source,
    };

    let mut workflow = WorkflowDocument::load(path).await.map_err(template_error)?;
    let summary = patch_in_place(&mut workflow, prompt, image_reference).map_err(template_error)?;

    tracing::debug!(
        template = %path.display(),
        prompt_fields = summary.prompt_fields,
        image_fields = summary.image_fields,
        "Patched template",
    );

    let job_id = queue
        .submit(&workflow)
        .await
        .map_err(|source| BatchError::Submit {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(template = %path.display(), job_id = %job_id, "Workflow queued");
    Ok(job_id)
}
