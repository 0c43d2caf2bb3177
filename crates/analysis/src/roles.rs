use crate::rules::{CueContext, Predicate, Rule, RuleSet};
use crate::utterance::{Role, Utterance};

/// Lesson-opening and orienting phrases.
pub const TEACHER_CUES: &[&str] = &[
    "welcome",
    "today",
    "let’s",
    "let's",
    "now",
    "observe",
    "look at",
    "see this",
];

/// Tentative and hedging phrases.
pub const STUDENT_CUES: &[&str] = &["i think", "maybe", "could be", "because", "i feel", "i guess"];

/// Turns shorter than this many words are attributed to students.
pub const SHORT_TURN_WORDS: usize = 7;

/// Coarse teacher/student attribution. The first utterance is always the teacher.
#[derive(Debug, Clone)]
pub struct RoleInferrer {
    rules: RuleSet<Role>,
}

impl Default for RoleInferrer {
    fn default() -> Self {
        Self::with_rules(default_rules())
    }
}

impl RoleInferrer {
    pub fn with_rules(rules: RuleSet<Role>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, index: usize, utterance: &Utterance) -> Role {
        self.rules.classify(&CueContext::new(index, utterance))
    }

    pub fn infer(&self, utterances: Vec<Utterance>) -> Vec<Utterance> {
        utterances
            .into_iter()
            .enumerate()
            .map(|(i, u)| Utterance {
                role: Some(self.classify(i, &u)),
                ..u
            })
            .collect()
    }
}

pub fn default_rules() -> RuleSet<Role> {
    RuleSet::new(
        vec![
            Rule::new(
                Predicate::Any(vec![
                    Predicate::FirstUtterance,
                    Predicate::contains_any(TEACHER_CUES),
                ]),
                Role::Teacher,
            ),
            Rule::new(
                Predicate::Any(vec![
                    Predicate::contains_any(STUDENT_CUES),
                    Predicate::FewerWordsThan(SHORT_TURN_WORDS),
                ]),
                Role::Student,
            ),
        ],
        Role::Teacher,
    )
}
