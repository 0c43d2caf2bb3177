pub mod srt_parser;
pub mod txt_parser;
pub mod wav_reader;

pub use srt_parser::{SrtEntry, parse_srt};
pub use txt_parser::{TxtEntry, parse_txt};
pub use wav_reader::read_wav_16k_mono;

use std::path::Path;

use crate::{Fragment, TranscriptionError, sort_by_start};

/// On-disk transcript formats that can be replayed as fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Srt,
    Txt,
    /// A JSON array of `{"start", "end", "text"}` objects (the `words.json` artifact).
    Json,
}

impl TranscriptFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TranscriptFormat::Srt => "srt",
            TranscriptFormat::Txt => "txt",
            TranscriptFormat::Json => "json",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "srt" => Some(TranscriptFormat::Srt),
            "txt" => Some(TranscriptFormat::Txt),
            "json" => Some(TranscriptFormat::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// Reads a transcript file and returns its fragments ordered by start time.
    pub fn read(self, path: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
        let mut fragments = match self {
            TranscriptFormat::Srt => parse_srt(path)?
                .into_iter()
                .map(|e| Fragment::new(e.start_secs, e.end_secs, e.text))
                .collect(),
            TranscriptFormat::Txt => parse_txt(path)?
                .into_iter()
                .map(|e| Fragment::new(e.start_secs, e.end_secs, e.text))
                .collect(),
            TranscriptFormat::Json => read_fragments_json(path)?,
        };
        sort_by_start(&mut fragments);
        Ok(fragments)
    }
}

/// Reads a transcript file, picking the format from its extension.
pub fn read_transcript(path: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
    let format = TranscriptFormat::from_path(path).ok_or_else(|| TranscriptionError::Parse {
        path: path.to_path_buf(),
        reason: "unrecognised transcript extension (expected .srt, .txt or .json)".to_string(),
    })?;
    format.read(path)
}

fn read_fragments_json(path: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
    let content = std::fs::read_to_string(path).map_err(|e| TranscriptionError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| TranscriptionError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
