use serde::{Deserialize, Serialize};

use crate::utterance::{OhcrLabel, Role, Utterance};

/// Synthesis/application cues used as the Level-5 discourse proxy.
pub const LEVEL5_CUES: &[&str] = &["therefore", "apply"];

/// Depth at which the HC term of the composite score saturates.
pub const MAX_USEFUL_HC_DEPTH: f64 = 3.0;

/// Session-level statistics, recomputed from scratch on every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Share of utterances labelled O, H, C or R.
    pub ohcr_index: f64,
    pub avg_hc_depth: f64,
    pub max_hc_depth: u32,
    pub student_talk_pct: f64,
    pub level5_pct: f64,
    /// Composite knowledge-construction score in `[0, 1]`.
    pub kc_score: f64,
}

impl SessionMetrics {
    pub fn compute(utterances: &[Utterance]) -> Self {
        let ohcr_index = share(utterances, |u| u.ohcr.is_some_and(OhcrLabel::is_ohcr));
        let student_talk_pct = share(utterances, |u| u.role == Some(Role::Student));
        let level5_pct = share(utterances, |u| {
            let text = u.text.to_lowercase();
            LEVEL5_CUES.iter().any(|cue| text.contains(cue))
        });

        let depths = hc_depths(utterances);
        let avg_hc_depth = if depths.is_empty() {
            0.0
        } else {
            depths.iter().sum::<u32>() as f64 / depths.len() as f64
        };
        let max_hc_depth = depths.iter().copied().max().unwrap_or(0);

        let kc = kc_score(ohcr_index, avg_hc_depth, student_talk_pct, level5_pct);

        Self {
            ohcr_index: round3(ohcr_index),
            avg_hc_depth: round3(avg_hc_depth),
            max_hc_depth,
            student_talk_pct: round3(student_talk_pct),
            level5_pct: round3(level5_pct),
            kc_score: round3(kc),
        }
    }
}

/// Fraction of utterances matching `pred`; the denominator is at least one.
fn share(utterances: &[Utterance], pred: impl Fn(&Utterance) -> bool) -> f64 {
    let n = utterances.len().max(1) as f64;
    utterances.iter().filter(|u| pred(u)).count() as f64 / n
}

/// Depth of every closed Hypothesize/Challenge cycle, in order.
///
/// H and C moves increment a counter; each R records `counter / 2` and resets
/// it. Moves after the last R are never recorded.
pub fn hc_depths(utterances: &[Utterance]) -> Vec<u32> {
    let mut depths = Vec::new();
    let mut d = 0u32;
    for label in utterances.iter().filter_map(|u| u.ohcr) {
        if label.is_hc() {
            d += 1;
        }
        if label == OhcrLabel::R {
            depths.push(d / 2);
            d = 0;
        }
    }
    depths
}

/// Equal-weight composite of the four components, clamped to `[0, 1]`.
pub fn kc_score(ohcr_index: f64, avg_hc_depth: f64, student_talk_pct: f64, level5_pct: f64) -> f64 {
    let kc = 0.25 * ohcr_index
        + 0.25 * (avg_hc_depth / MAX_USEFUL_HC_DEPTH)
        + 0.25 * student_talk_pct
        + 0.25 * level5_pct;
    if kc.is_nan() { 0.0 } else { kc.clamp(0.0, 1.0) }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
