use std::collections::HashSet;
use std::path::Path;

use crate::TranscriptionError;

/// A single SRT subtitle entry.
#[derive(Debug, Clone)]
pub struct SrtEntry {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    /// Speaker label from a "Speaker: text" cue, stripped from `text`.
    pub speaker: Option<String>,
    pub text: String,
}

/// Parses an SRT file, deduplicates by (start_time, text), and sorts by time.
pub fn parse_srt(path: impl AsRef<Path>) -> Result<Vec<SrtEntry>, TranscriptionError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| TranscriptionError::io(path, e))?;
    Ok(parse_srt_str(&content))
}

/// Parses SRT content already loaded into memory. Malformed cues are skipped.
pub fn parse_srt_str(content: &str) -> Vec<SrtEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines().peekable();

    while lines.peek().is_some() {
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        let index: usize = match lines.next() {
            Some(l) => match l.trim().trim_start_matches('\u{feff}').parse() {
                Ok(i) => i,
                Err(_) => continue,
            },
            None => break,
        };

        // "HH:MM:SS,mmm --> HH:MM:SS,mmm"
        let (start_secs, end_secs) = match lines.next().and_then(|l| parse_timestamp_line(l.trim())) {
            Some(t) => t,
            None => continue,
        };

        let mut text_parts = Vec::new();
        while let Some(line) = lines.next_if(|l| !l.trim().is_empty()) {
            text_parts.push(line.trim());
        }
        let raw_text = text_parts.join(" ");
        let (speaker, text) = split_speaker(&raw_text);

        if text.is_empty() {
            continue;
        }

        entries.push(SrtEntry {
            index,
            start_secs,
            end_secs,
            speaker,
            text,
        });
    }

    // Deduplicate by (start_time rounded to ms, text)
    let mut seen = HashSet::new();
    let mut deduped: Vec<SrtEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(((e.start_secs * 1000.0).round() as i64, e.text.clone())))
        .collect();

    deduped.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

    for (i, entry) in deduped.iter_mut().enumerate() {
        entry.index = i + 1;
    }

    deduped
}

/// Splits a "Speaker: text" cue. Long or double-spaced prefixes are treated as text.
fn split_speaker(raw_text: &str) -> (Option<String>, String) {
    if let Some(colon_pos) = raw_text.find(": ") {
        let candidate = &raw_text[..colon_pos];
        if candidate.len() < 50 && !candidate.contains("  ") && !candidate.contains('?') {
            return (
                Some(candidate.to_string()),
                raw_text[colon_pos + 2..].trim().to_string(),
            );
        }
    }
    (None, raw_text.trim().to_string())
}

/// Parses a timestamp line like "00:00:02,965 --> 00:00:04,277"
fn parse_timestamp_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    let start = parse_srt_time(start.trim())?;
    let end = parse_srt_time(end.trim())?;
    Some((start, end))
}

/// Parses SRT time format "HH:MM:SS,mmm" to seconds.
fn parse_srt_time(s: &str) -> Option<f64> {
    // Handle both comma and dot separators
    let s = s.replace(',', ".");
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}
