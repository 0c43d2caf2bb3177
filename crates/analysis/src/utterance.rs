use serde::{Deserialize, Serialize};

/// Pragmatic function of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscourseAct {
    Question,
    Statement,
    Regulatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// Observe / Hypothesize / Challenge / Resolve reasoning move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OhcrLabel {
    O,
    H,
    C,
    R,
    #[serde(rename = "?", alias = "unknown")]
    Unknown,
}

impl OhcrLabel {
    /// True for the four named moves; false for `Unknown`.
    pub fn is_ohcr(self) -> bool {
        !matches!(self, OhcrLabel::Unknown)
    }

    pub fn is_hc(self) -> bool {
        matches!(self, OhcrLabel::H | OhcrLabel::C)
    }
}

/// One conversational turn, merged from consecutive transcript fragments.
///
/// The label fields stay `None` until the corresponding stage has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(rename = "u_id")]
    pub id: usize,
    pub t_start: f64,
    pub t_end: f64,
    pub duration: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_act: Option<DiscourseAct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ohcr: Option<OhcrLabel>,
}

impl Utterance {
    pub fn new(id: usize, t_start: f64, t_end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            t_start,
            t_end,
            duration: t_end - t_start,
            text: text.into(),
            disc_act: None,
            role: None,
            ohcr: None,
        }
    }

    /// Whether every stage has attached its label.
    pub fn is_fully_labeled(&self) -> bool {
        self.disc_act.is_some() && self.role.is_some() && self.ohcr.is_some()
    }
}

/// Manually reassigns the role of the utterance with `id`, leaving every other
/// field untouched. Returns `false` when no utterance has that id.
///
/// Metrics are not updated; recompute them from the corrected sequence.
pub fn reassign_role(utterances: &mut [Utterance], id: usize, role: Role) -> bool {
    match utterances.iter_mut().find(|u| u.id == id) {
        Some(u) => {
            u.role = Some(role);
            true
        }
        None => false,
    }
}
