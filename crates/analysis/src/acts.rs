use std::sync::LazyLock;

use regex::Regex;

use crate::rules::{CueContext, Predicate, Rule, RuleSet};
use crate::utterance::{DiscourseAct, Utterance};

/// Classroom-management phrases.
pub const REGULATORY_CUES: &[&str] = &[
    "open your",
    "submit",
    "turn to",
    "raise your",
    "deadline",
    "attendance",
];

/// Interrogative opener somewhere in the text, ending in a question mark.
pub const QUESTION_PATTERN: &str =
    r"(?i)(who|what|why|how|when|where|do|does|did|can|could|would|should|is|are|will)\b.*\?$";

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(QUESTION_PATTERN).unwrap());

/// Tags each utterance as question, statement or regulatory.
#[derive(Debug, Clone)]
pub struct ActTagger {
    rules: RuleSet<DiscourseAct>,
}

impl Default for ActTagger {
    fn default() -> Self {
        Self::with_rules(default_rules())
    }
}

impl ActTagger {
    pub fn with_rules(rules: RuleSet<DiscourseAct>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, index: usize, utterance: &Utterance) -> DiscourseAct {
        self.rules.classify(&CueContext::new(index, utterance))
    }

    /// Returns the utterances with `disc_act` set. Each utterance is judged on its own.
    pub fn tag(&self, utterances: Vec<Utterance>) -> Vec<Utterance> {
        utterances
            .into_iter()
            .enumerate()
            .map(|(i, u)| Utterance {
                disc_act: Some(self.classify(i, &u)),
                ..u
            })
            .collect()
    }
}

pub fn default_rules() -> RuleSet<DiscourseAct> {
    RuleSet::new(
        vec![
            Rule::new(Predicate::contains_any(REGULATORY_CUES), DiscourseAct::Regulatory),
            Rule::new(
                Predicate::Any(vec![
                    Predicate::contains_any(&["?"]),
                    Predicate::Matches(QUESTION_RE.clone()),
                ]),
                DiscourseAct::Question,
            ),
        ],
        DiscourseAct::Statement,
    )
}
