use ohcr_transcription::Fragment;
use serde::{Deserialize, Serialize};

use crate::utterance::Utterance;

/// Default pause (seconds) that separates two utterances.
pub const DEFAULT_PAUSE_THRESHOLD_SECS: f64 = 0.6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// A gap strictly greater than this starts a new utterance.
    pub pause_threshold_secs: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            pause_threshold_secs: DEFAULT_PAUSE_THRESHOLD_SECS,
        }
    }
}

/// Merges timestamped fragments into utterances on pauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

/// Utterance being accumulated before it is closed.
struct OpenUtterance {
    t_start: f64,
    t_end: f64,
    text: String,
}

impl OpenUtterance {
    fn from_fragment(fragment: &Fragment) -> Self {
        Self {
            t_start: fragment.start,
            t_end: fragment.end,
            text: fragment.text.clone(),
        }
    }

    fn extend(&mut self, fragment: &Fragment) {
        self.t_end = fragment.end.max(self.t_start);
        self.text.push(' ');
        self.text.push_str(&fragment.text);
    }

    fn close(self, id: usize) -> Utterance {
        Utterance::new(id, self.t_start, self.t_end, self.text)
    }
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn with_pause_threshold(pause_threshold_secs: f64) -> Self {
        Self::new(SegmenterConfig { pause_threshold_secs })
    }

    pub fn config(&self) -> SegmenterConfig {
        self.config
    }

    /// Segments fragments (ordered by start time) into utterances with
    /// contiguous zero-based ids. Empty input yields no utterances.
    ///
    /// Fragments with non-finite times or ending before they start are
    /// skipped, so every utterance has `t_end >= t_start`.
    pub fn segment(&self, fragments: &[Fragment]) -> Vec<Utterance> {
        let mut valid = fragments.iter().filter(|f| is_well_formed(f));
        let Some(first) = valid.next() else {
            return Vec::new();
        };

        let mut utterances = Vec::new();
        let mut current = OpenUtterance::from_fragment(first);

        for fragment in valid {
            let gap = fragment.start - current.t_end;
            if gap > self.config.pause_threshold_secs {
                let closed = std::mem::replace(&mut current, OpenUtterance::from_fragment(fragment));
                utterances.push(closed.close(utterances.len()));
            } else {
                current.extend(fragment);
            }
        }
        utterances.push(current.close(utterances.len()));

        utterances
    }
}

fn is_well_formed(fragment: &Fragment) -> bool {
    fragment.start.is_finite() && fragment.end.is_finite() && fragment.end >= fragment.start
}
