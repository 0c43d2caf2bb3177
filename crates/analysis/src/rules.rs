//! Ordered, first-match-wins lexical rule tables.
//!
//! Every classifier in the pipeline is a [`RuleSet`]: a list of
//! `(predicate, label)` pairs plus a fallback label. Keeping the rules as
//! data lets callers swap cue lists and test each table on its own.

use regex::Regex;

use crate::utterance::{Role, Utterance};

/// What a predicate can see about one utterance.
#[derive(Debug, Clone)]
pub struct CueContext {
    /// Position of the utterance in the session.
    pub index: usize,
    /// Lower-cased, trimmed utterance text.
    pub text: String,
    /// Role assigned by an earlier stage, if any.
    pub role: Option<Role>,
}

impl CueContext {
    pub fn new(index: usize, utterance: &Utterance) -> Self {
        Self {
            index,
            text: utterance.text.trim().to_lowercase(),
            role: utterance.role,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    /// Text contains at least one of the cues as a plain substring.
    ContainsAny(Vec<String>),
    /// Regex search anywhere in the text.
    Matches(Regex),
    /// The utterance opens the session.
    FirstUtterance,
    /// Fewer than `n` whitespace-separated words.
    FewerWordsThan(usize),
    /// The role assigned by an earlier stage equals this one.
    RoleIs(Role),
    Any(Vec<Predicate>),
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn contains_any(cues: &[&str]) -> Self {
        Predicate::ContainsAny(cues.iter().map(|c| c.to_lowercase()).collect())
    }

    pub fn evaluate(&self, ctx: &CueContext) -> bool {
        match self {
            Predicate::ContainsAny(cues) => cues.iter().any(|c| ctx.text.contains(c.as_str())),
            Predicate::Matches(re) => re.is_match(&ctx.text),
            Predicate::FirstUtterance => ctx.index == 0,
            Predicate::FewerWordsThan(n) => ctx.word_count() < *n,
            Predicate::RoleIs(role) => ctx.role == Some(*role),
            Predicate::Any(preds) => preds.iter().any(|p| p.evaluate(ctx)),
            Predicate::All(preds) => preds.iter().all(|p| p.evaluate(ctx)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule<L> {
    pub predicate: Predicate,
    pub label: L,
}

impl<L> Rule<L> {
    pub fn new(predicate: Predicate, label: L) -> Self {
        Self { predicate, label }
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet<L> {
    rules: Vec<Rule<L>>,
    fallback: L,
}

impl<L: Copy> RuleSet<L> {
    pub fn new(rules: Vec<Rule<L>>, fallback: L) -> Self {
        Self { rules, fallback }
    }

    /// Label of the first matching rule, or the fallback.
    pub fn classify(&self, ctx: &CueContext) -> L {
        self.rules
            .iter()
            .find(|rule| rule.predicate.evaluate(ctx))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }

    pub fn rules(&self) -> &[Rule<L>] {
        &self.rules
    }

    pub fn fallback(&self) -> L {
        self.fallback
    }
}
