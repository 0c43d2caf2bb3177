use std::path::PathBuf;

use ohcr_transcription::TranscriptionError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transcription failed: {0}")]
    TranscriptionFailure(#[from] TranscriptionError),

    #[error("failed to persist {}: {source}", .path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl PipelineError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}
