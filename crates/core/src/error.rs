#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed workflow JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Workflow document has no \"nodes\" object")]
    MissingNodes,

    #[error("Validation failed: {0}")]
    Validation(String),
}
