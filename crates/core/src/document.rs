//! Workflow template documents.
//!
//! A template file is a JSON object with a top-level `"nodes"` object
//! mapping node IDs to node definitions:
//!
//! ```json
//! {
//!   "nodes": {
//!     "6": {
//!       "class_type": "CLIPTextEncode",
//!       "inputs": { "text": "a beautiful landscape", "clip": ["4", 1] }
//!     }
//!   }
//! }
//! ```
//!
//! Node definitions are kept as open JSON maps so that unknown node
//! schemas and extra top-level keys survive a load/submit cycle untouched.

use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Top-level key holding the node collection.
pub const NODES_KEY: &str = "nodes";

/// Key inside a node definition holding its named input values.
pub const INPUTS_KEY: &str = "inputs";

/// One node in a workflow: an open map that normally carries `class_type`
/// and `inputs`.
pub type NodeDefinition = Map<String, Value>;

/// A workflow template, validated to contain a `"nodes"` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct WorkflowDocument(Map<String, Value>);

impl WorkflowDocument {
    /// Build a document from an arbitrary JSON value.
    ///
    /// Fails unless the value is an object whose `"nodes"` entry is
    /// itself an object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Self::try_from(map),
            _ => Err(CoreError::Validation(
                "Workflow JSON must be an object".to_string(),
            )),
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Read and parse a template file.
    pub async fn load(path: &Path) -> Result<Self, CoreError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&text)
    }

    /// The node collection (node ID → definition).
    pub fn nodes(&self) -> Option<&Map<String, Value>> {
        self.0.get(NODES_KEY).and_then(Value::as_object)
    }

    /// Mutable access to the node collection.
    pub fn nodes_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.0.get_mut(NODES_KEY).and_then(Value::as_object_mut)
    }

    /// Look up a single node by ID.
    pub fn node(&self, node_id: &str) -> Option<&NodeDefinition> {
        self.nodes()?.get(node_id)?.as_object()
    }

    /// Look up one input value of one node.
    pub fn input(&self, node_id: &str, input_name: &str) -> Option<&Value> {
        self.node(node_id)?.get(INPUTS_KEY)?.get(input_name)
    }

    /// The full document as a JSON map, including non-node keys.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a plain JSON value for submission.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Map<String, Value>> for WorkflowDocument {
    type Error = CoreError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        match map.get(NODES_KEY) {
            Some(Value::Object(_)) => Ok(Self(map)),
            _ => Err(CoreError::MissingNodes),
        }
    }
}

impl Serialize for WorkflowDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
