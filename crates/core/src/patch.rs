//! Prompt and image injection for workflow templates.
//!
//! Templates are authored against arbitrary node types, so patching is
//! driven by input names rather than `class_type`. Every input whose name
//! is prompt-bearing receives the user prompt; when an uploaded image is
//! available, every image-bearing input receives its server-side name.

use serde_json::{Map, Value};

use crate::document::{WorkflowDocument, INPUTS_KEY};
use crate::error::CoreError;

/// Input names that carry a text prompt.
pub const PROMPT_INPUT_NAMES: [&str; 4] = ["text", "prompt", "positive", "negative"];

/// Input names that carry an image reference.
pub const IMAGE_INPUT_NAMES: [&str; 2] = ["image", "filename"];

/// Counts of fields overwritten by one patch application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchSummary {
    /// Prompt-bearing inputs that were overwritten.
    pub prompt_fields: usize,
    /// Image-bearing inputs that were overwritten.
    pub image_fields: usize,
}

/// Return a patched copy of `document`, leaving the original untouched.
pub fn patch(
    document: &WorkflowDocument,
    prompt: &str,
    image_reference: Option<&str>,
) -> Result<WorkflowDocument, CoreError> {
    let mut patched = document.clone();
    patch_in_place(&mut patched, prompt, image_reference)?;
    Ok(patched)
}

/// Patch `document` in place.
pub fn patch_in_place(
    document: &mut WorkflowDocument,
    prompt: &str,
    image_reference: Option<&str>,
) -> Result<PatchSummary, CoreError> {
    let nodes = document.nodes_mut().ok_or(CoreError::MissingNodes)?;
    Ok(patch_nodes(nodes, prompt, image_reference))
}

/// Overwrite prompt- and image-bearing inputs across a node collection.
///
/// Prompt inputs are always replaced, including ones that currently hold a
/// node link such as `["6", 0]`. Image inputs are replaced only when
/// `image_reference` is a non-empty string. Nodes that are not objects, or
/// whose `inputs` is missing or not an object, are skipped.
pub fn patch_nodes(
    nodes: &mut Map<String, Value>,
    prompt: &str,
    image_reference: Option<&str>,
) -> PatchSummary {
    let image_reference = image_reference.filter(|name| !name.is_empty());
    let mut summary = PatchSummary::default();

    for node in nodes.values_mut() {
        let Some(inputs) = node.get_mut(INPUTS_KEY).and_then(Value::as_object_mut) else {
            continue;
        };

        for name in PROMPT_INPUT_NAMES {
            if let Some(value) = inputs.get_mut(name) {
                *value = Value::String(prompt.to_string());
                summary.prompt_fields += 1;
            }
        }

        if let Some(image) = image_reference {
            // LoadImage-style nodes use `image`; some custom loaders keep the
            // name in `filename`. Both are set when both are present.
            for name in IMAGE_INPUT_NAMES {
                if let Some(value) = inputs.get_mut(name) {
                    *value = Value::String(image.to_string());
                    summary.image_fields += 1;
                }
            }
        }
    }

    summary
}
