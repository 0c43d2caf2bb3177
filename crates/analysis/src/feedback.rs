use serde::{Deserialize, Serialize};

use crate::metrics::SessionMetrics;

/// A prescriptive recommendation shown to the instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCard {
    pub title: String,
    pub why: String,
    pub how: Vec<String>,
}

/// One threshold rule: fires when `metric(m) < threshold`.
pub struct FeedbackRule {
    pub metric: fn(&SessionMetrics) -> f64,
    pub threshold: f64,
    pub title: &'static str,
    pub why: &'static str,
    pub how: [&'static str; 3],
}

impl FeedbackRule {
    pub fn fires(&self, metrics: &SessionMetrics) -> bool {
        (self.metric)(metrics) < self.threshold
    }

    pub fn card(&self) -> FeedbackCard {
        FeedbackCard {
            title: self.title.to_string(),
            why: self.why.to_string(),
            how: self.how.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Evaluated in order; every rule is independent of the others.
pub static FEEDBACK_RULES: [FeedbackRule; 3] = [
    FeedbackRule {
        metric: |m| m.kc_score,
        threshold: 0.4,
        title: "Encourage Deeper Concept Linking",
        why: "Knowledge construction score is low, meaning teacher and student dialogue didn’t go deep enough.",
        how: [
            "Prompt students with open-ended ‘why’ or ‘how’ questions.",
            "Ask follow-ups that connect current discussion to prior knowledge.",
            "Encourage peer-to-peer questioning.",
        ],
    },
    FeedbackRule {
        metric: |m| m.student_talk_pct,
        threshold: 0.25,
        title: "Increase Student Talk Ratio",
        why: "Students spoke less than 25% of the total discourse.",
        how: [
            "Include student-led reflection rounds.",
            "Ask for multiple viewpoints before summarizing yourself.",
            "Give students short prompts to summarize what was discussed.",
        ],
    },
    FeedbackRule {
        metric: |m| m.level5_pct,
        threshold: 0.15,
        title: "Promote Level-5 Discourse",
        why: "Very few moments reached evaluative or reflective discourse (Level 5).",
        how: [
            "Ask learners to critique an idea or offer alternative perspectives.",
            "Use metacognitive questions like ‘What led you to that conclusion?’",
            "Encourage summarizing and contrasting multiple solutions.",
        ],
    },
];

pub fn generate(metrics: &SessionMetrics) -> Vec<FeedbackCard> {
    FEEDBACK_RULES
        .iter()
        .filter(|rule| rule.fires(metrics))
        .map(FeedbackRule::card)
        .collect()
}
