use std::path::Path;

use crate::TranscriptionError;

/// Fallback duration for the final entry, which has no successor to bound it.
const LAST_ENTRY_SECS: f64 = 5.0;

/// A single transcript entry parsed from a .txt file.
///
/// Format per entry:
/// ```text
/// SPK_N
/// M:SS
/// Transcript text here.
///
/// ```
#[derive(Debug, Clone)]
pub struct TxtEntry {
    pub speaker: String,
    pub start_secs: f64,
    /// Estimated end time (start of next entry, or start + 5s for last entry).
    pub end_secs: f64,
    pub text: String,
}

/// Parses a speaker-blocked transcript .txt file.
pub fn parse_txt(path: impl AsRef<Path>) -> Result<Vec<TxtEntry>, TranscriptionError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| TranscriptionError::io(path, e))?;
    Ok(parse_txt_str(&content))
}

/// Parses transcript content: blocks of (speaker, timestamp M:SS, text) separated by blank lines.
/// Entries are returned in start-time order.
pub fn parse_txt_str(content: &str) -> Vec<TxtEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines().peekable();

    while lines.peek().is_some() {
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        // Speaker line (e.g. "SPK_1")
        let speaker = match lines.next() {
            Some(l) if l.trim().starts_with("SPK_") => l.trim().to_string(),
            Some(_) => continue,
            None => break,
        };

        // Timestamp line (e.g. "0:49" or "25:07")
        let start_secs = match lines.next().and_then(|l| parse_mm_ss(l.trim())) {
            Some(s) => s,
            None => continue,
        };

        let mut text_parts = Vec::new();
        while let Some(line) =
            lines.next_if(|l| !l.trim().is_empty() && !l.trim().starts_with("SPK_"))
        {
            text_parts.push(line.trim());
        }
        let text = text_parts.join(" ");

        if !text.is_empty() {
            entries.push(TxtEntry {
                speaker,
                start_secs,
                end_secs: 0.0, // filled in below
                text,
            });
        }
    }

    // End times come from the next entry in time, not in file order.
    entries.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));
    let next_starts: Vec<Option<f64>> = entries
        .iter()
        .skip(1)
        .map(|e| Some(e.start_secs))
        .chain(std::iter::once(None))
        .collect();
    for (entry, next_start) in entries.iter_mut().zip(next_starts) {
        entry.end_secs = next_start.unwrap_or(entry.start_secs + LAST_ENTRY_SECS);
    }

    entries
}

/// Parses "M:SS" timestamp to seconds (e.g. "1:06" -> 66.0, "25:07" -> 1507.0).
fn parse_mm_ss(s: &str) -> Option<f64> {
    let (minutes, seconds) = s.split_once(':')?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    Some(minutes * 60.0 + seconds)
}
