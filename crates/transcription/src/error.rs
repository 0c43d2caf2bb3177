use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed transcript '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("No transcript found at '{}'", .0.display())]
    MissingTranscript(PathBuf),
    #[error("Unsupported audio: {0}")]
    UnsupportedAudio(String),
    #[error("Unknown transcription backend: {0}")]
    UnknownBackend(String),
    #[error("ASR backend failed: {0}")]
    Backend(String),
}

impl TranscriptionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::MissingTranscript(path);
        }
        Self::Io { path, source }
    }
}
