use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::Transcriber;
use crate::reader::TranscriptFormat;
use crate::{Fragment, TranscriptionError};

/// Replays a pre-made transcript stored next to the audio file.
///
/// For `lesson.wav` and [`TranscriptFormat::Srt`] the fragments come from
/// `lesson.srt`. Passing the transcript path itself also works.
pub struct SidecarTranscriber {
    format: TranscriptFormat,
    name: String,
}

impl SidecarTranscriber {
    pub fn new(format: TranscriptFormat) -> Self {
        Self {
            format,
            name: format!("sidecar_{}", format.extension()),
        }
    }

    pub fn format(&self) -> TranscriptFormat {
        self.format
    }
}

#[async_trait]
impl Transcriber for SidecarTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
        let transcript = audio.with_extension(self.format.extension());
        let format = self.format;
        let path = transcript.clone();
        let fragments = tokio::task::spawn_blocking(move || format.read(&path))
            .await
            .map_err(|e| TranscriptionError::Backend(format!("transcript reader task failed: {e}")))??;

        debug!(
            transcript = %transcript.display(),
            fragments = fragments.len(),
            "Sidecar transcript loaded"
        );
        Ok(fragments)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
