#[cfg(feature = "local-whisper")]
pub mod local_whisper;

pub mod sidecar;

pub use sidecar::SidecarTranscriber;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ohcr_config::TranscriptionSettings;
use tracing::info;

use crate::reader::TranscriptFormat;
use crate::{Fragment, TranscriptionError};

/// Trait for pluggable speech-to-text backends.
///
/// Implementations turn an audio resource into fragments ordered by start time.
/// They are treated as black boxes by the analysis pipeline.
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    /// Transcribes a complete recording.
    async fn transcribe(&self, audio: &Path) -> Result<Vec<Fragment>, TranscriptionError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// Builds the backend named by `settings.backend`.
pub fn build_transcriber(
    settings: &TranscriptionSettings,
) -> Result<Arc<dyn Transcriber>, TranscriptionError> {
    let backend: Arc<dyn Transcriber> = match settings.backend.as_str() {
        "local_whisper" => build_whisper(settings)?,
        other => match TranscriptFormat::from_name(other) {
            Some(format) => Arc::new(SidecarTranscriber::new(format)),
            None => return Err(TranscriptionError::UnknownBackend(other.to_string())),
        },
    };
    info!(backend = %backend.name(), "Transcription backend ready");
    Ok(backend)
}

#[cfg(feature = "local-whisper")]
fn build_whisper(settings: &TranscriptionSettings) -> Result<Arc<dyn Transcriber>, TranscriptionError> {
    let model_path = settings.whisper_model_path.as_deref().ok_or_else(|| {
        TranscriptionError::Backend("transcription.whisper_model_path is not set".to_string())
    })?;
    Ok(Arc::new(local_whisper::LocalWhisperBackend::new(
        model_path,
        settings.language.clone(),
    )?))
}

#[cfg(not(feature = "local-whisper"))]
fn build_whisper(_settings: &TranscriptionSettings) -> Result<Arc<dyn Transcriber>, TranscriptionError> {
    Err(TranscriptionError::UnknownBackend(
        "local_whisper (built without the `local-whisper` feature)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: &str) -> TranscriptionSettings {
        TranscriptionSettings {
            backend: backend.to_string(),
            ..TranscriptionSettings::default()
        }
    }

    #[test]
    fn test_build_sidecar_backends() {
        assert_eq!(build_transcriber(&settings("srt")).unwrap().name(), "sidecar_srt");
        assert_eq!(build_transcriber(&settings("TXT")).unwrap().name(), "sidecar_txt");
        assert_eq!(build_transcriber(&settings("json")).unwrap().name(), "sidecar_json");
    }

    #[test]
    fn test_build_unknown_backend() {
        assert!(matches!(
            build_transcriber(&settings("deepgram")),
            Err(TranscriptionError::UnknownBackend(_))
        ));
    }
}
