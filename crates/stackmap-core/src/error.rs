#[derive(Debug, thiserror::Error)]
pub enum StackmapError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("bad cost table: {0}")]
    CostTable(String),

    #[error("bad stack file: {0}")]
    StackFile(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown stack file format: {0} (expected .json or .toml)")]
    UnknownFormat(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StackmapError>;
