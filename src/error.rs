use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a snapshot could not be read or written.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed task snapshot: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TaskListError {
    #[error("failed to load tasks: {0}")]
    LoadFailure(#[source] SnapshotError),
    #[error("failed to save tasks: {0}")]
    SaveFailure(#[source] SnapshotError),
}

impl TaskListError {
    pub fn title(&self) -> &'static str {
        "Error"
    }

    /// Text shown to the user in the alert popup.
    pub fn message(&self) -> &'static str {
        match self {
            TaskListError::LoadFailure(_) => "Failed to load the tasks.",
            TaskListError::SaveFailure(_) => "Failed to save the tasks.",
        }
    }
}
