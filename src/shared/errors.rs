use thiserror::Error;

/// Storage-related errors shared by the persistence bridge and its providers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read stored data: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("Failed to parse stored data: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to write stored data: {0}")]
    WriteError(String),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),

    #[error("Save queue is no longer running")]
    WriterGone,
}

impl StorageError {
    pub fn directory(msg: impl Into<String>) -> Self {
        StorageError::DirectoryError(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        StorageError::WriteError(msg.into())
    }
}
