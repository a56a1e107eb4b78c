use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("cannot extract a record from an absent or empty message")]
    EmptyMessage,
    #[error("coordinate table is empty")]
    NoCoordinates,
    #[error("failed to format record timestamp")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create log directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open message log {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write to message log {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to flush message log {path}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
