//! Observe / Hypothesize / Challenge / Resolve labelling.
//!
//! Observe and Resolve are instructor moves and need a teacher role;
//! Hypothesize and Challenge may come from anyone.

use crate::rules::{CueContext, Predicate, Rule, RuleSet};
use crate::utterance::{OhcrLabel, Role, Utterance};

pub const OBSERVE_CUES: &[&str] = &["observe", "look at", "consider", "example", "video", "see this"];

pub const HYPOTHESIZE_CUES: &[&str] = &["maybe", "i think", "could be", "because", "suppose", "if we"];

pub const CHALLENGE_CUES: &[&str] = &[
    "but does",
    "what if",
    "how do we",
    "does that hold",
    "is it always",
    "however",
    "not always",
];

pub const RESOLVE_CUES: &[&str] = &[
    "so",
    "therefore",
    "we can say",
    "this means",
    "by definition",
    "in summary",
];

#[derive(Debug, Clone)]
pub struct OhcrLabeler {
    rules: RuleSet<OhcrLabel>,
}

impl Default for OhcrLabeler {
    fn default() -> Self {
        Self::with_rules(default_rules())
    }
}

impl OhcrLabeler {
    pub fn with_rules(rules: RuleSet<OhcrLabel>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, index: usize, utterance: &Utterance) -> OhcrLabel {
        self.rules.classify(&CueContext::new(index, utterance))
    }

    /// Returns the utterances with `ohcr` set. Reads the role assigned earlier;
    /// an utterance without a role can only be labelled H, C or unknown.
    pub fn label(&self, utterances: Vec<Utterance>) -> Vec<Utterance> {
        utterances
            .into_iter()
            .enumerate()
            .map(|(i, u)| Utterance {
                ohcr: Some(self.classify(i, &u)),
                ..u
            })
            .collect()
    }
}

pub fn default_rules() -> RuleSet<OhcrLabel> {
    let teacher_and = |cues: &[&str]| {
        Predicate::All(vec![Predicate::RoleIs(Role::Teacher), Predicate::contains_any(cues)])
    };
    RuleSet::new(
        vec![
            Rule::new(teacher_and(OBSERVE_CUES), OhcrLabel::O),
            Rule::new(Predicate::contains_any(HYPOTHESIZE_CUES), OhcrLabel::H),
            Rule::new(Predicate::contains_any(CHALLENGE_CUES), OhcrLabel::C),
            Rule::new(teacher_and(RESOLVE_CUES), OhcrLabel::R),
        ],
        OhcrLabel::Unknown,
    )
}
