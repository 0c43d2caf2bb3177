pub mod asr;
pub mod error;
pub mod reader;

pub use asr::{SidecarTranscriber, Transcriber, build_transcriber};
pub use error::TranscriptionError;
pub use reader::TranscriptFormat;

use serde::{Deserialize, Serialize};

/// A timestamped piece of recognised speech, as produced by an ASR backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Seconds since the start of the recording.
    pub start: f64,
    /// Seconds since the start of the recording.
    pub end: f64,
    pub text: String,
}

impl Fragment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Sorts fragments by start time, keeping the relative order of equal starts.
pub fn sort_by_start(fragments: &mut [Fragment]) {
    fragments.sort_by(|a, b| a.start.total_cmp(&b.start));
}
