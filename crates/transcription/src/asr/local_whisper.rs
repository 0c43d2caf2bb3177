use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::Transcriber;
use crate::reader::read_wav_16k_mono;
use crate::{Fragment, TranscriptionError};

/// Whisper reports segment timestamps in centiseconds.
const CENTIS_PER_SEC: f64 = 100.0;

/// Local Whisper ASR backend using whisper.cpp via whisper-rs.
pub struct LocalWhisperBackend {
    ctx: Arc<WhisperContext>,
    default_language: Option<String>,
}

impl LocalWhisperBackend {
    /// Creates a new Whisper backend, loading the model from disk.
    ///
    /// `model_path` should point to a GGML Whisper model file (e.g. ggml-small.bin).
    pub fn new(model_path: &str, default_language: Option<String>) -> Result<Self, TranscriptionError> {
        info!(model_path, "Loading Whisper model");
        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .map_err(|e| {
                TranscriptionError::Backend(format!("Failed to load Whisper model '{model_path}': {e}"))
            })?;
        info!("Whisper model loaded");
        Ok(Self {
            ctx: Arc::new(ctx),
            default_language,
        })
    }
}

#[async_trait]
impl Transcriber for LocalWhisperBackend {
    async fn transcribe(&self, audio: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
        let audio_path = audio.to_path_buf();
        let ctx = Arc::clone(&self.ctx);
        let lang = self.default_language.clone();

        // whisper-rs is CPU-bound; run on blocking thread pool
        tokio::task::spawn_blocking(move || -> Result<Vec<Fragment>, TranscriptionError> {
            let pcm = read_wav_16k_mono(&audio_path)?;

            let mut state = ctx
                .create_state()
                .map_err(|e| TranscriptionError::Backend(format!("Failed to create Whisper state: {e}")))?;

            let mut params = FullParams::new(SamplingStrategy::BeamSearch {
                beam_size: 5,
                patience: 1.0,
            });

            if let Some(ref lang) = lang {
                params.set_language(Some(lang));
            } else {
                params.set_detect_language(true);
            }

            // Always transcribe in the source language (never translate to English)
            params.set_translate(false);

            params.set_print_progress(false);
            params.set_print_special(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            params.set_single_segment(false);
            params.set_no_speech_thold(0.6);
            params.set_suppress_blank(true);

            state
                .full(params, &pcm)
                .map_err(|e| TranscriptionError::Backend(format!("Whisper transcription failed: {e}")))?;

            let n_segments = state.full_n_segments();
            let mut fragments = Vec::new();
            for i in 0..n_segments {
                let Some(segment) = state.get_segment(i) else {
                    continue;
                };
                let Ok(text) = segment.to_str() else {
                    continue;
                };
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                fragments.push(Fragment::new(
                    segment.start_timestamp() as f64 / CENTIS_PER_SEC,
                    segment.end_timestamp() as f64 / CENTIS_PER_SEC,
                    text,
                ));
            }

            debug!(segments = n_segments, fragments = fragments.len(), "Whisper transcription complete");
            crate::sort_by_start(&mut fragments);
            Ok(fragments)
        })
        .await
        .map_err(|e| TranscriptionError::Backend(format!("Whisper task join error: {e}")))?
    }

    fn name(&self) -> &str {
        "local_whisper"
    }
}
