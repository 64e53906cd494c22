//! The seam between the batch driver and the image-generation server.

use async_trait::async_trait;

use comfyq_comfyui::api::{ComfyUIApi, ComfyUIApiError};
use comfyq_core::document::WorkflowDocument;

/// A server that accepts image uploads and queues workflows.
#[async_trait]
pub trait WorkflowQueue: Send + Sync {
    /// Upload image bytes; returns the server-side filename to reference
    /// from workflow inputs.
    async fn upload_image(&self, bytes: &[u8]) -> Result<String, ComfyUIApiError>;

    /// Queue one workflow; returns its job identifier.
    async fn submit(&self, workflow: &WorkflowDocument) -> Result<String, ComfyUIApiError>;
}

#[async_trait]
impl WorkflowQueue for ComfyUIApi {
    async fn upload_image(&self, bytes: &[u8]) -> Result<String, ComfyUIApiError> {
        Ok(ComfyUIApi::upload_image(self, bytes).await?.name)
    }

    async fn submit(&self, workflow: &WorkflowDocument) -> Result<String, ComfyUIApiError> {
        Ok(self.submit_workflow(workflow).await?.prompt_id)
    }
}
