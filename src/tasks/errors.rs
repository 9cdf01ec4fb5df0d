use crate::shared::errors::StorageError;
use thiserror::Error;

/// Errors surfaced by task operations.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task text cannot be empty")]
    EmptyText,
    #[error("Tasks are still loading")]
    NotReady,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors from handing a snapshot to an export sink.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write export: {0}")]
    Write(#[from] std::io::Error),
}
