//! Classroom discourse analytics: fragments in, labelled utterances,
//! session metrics and feedback cards out.

pub mod acts;
pub mod error;
pub mod feedback;
pub mod metrics;
pub mod ohcr;
pub mod pipeline;
pub mod roles;
pub mod rules;
pub mod segmenter;
pub mod store;
pub mod utterance;

pub use acts::ActTagger;
pub use error::PipelineError;
pub use feedback::FeedbackCard;
pub use metrics::SessionMetrics;
pub use ohcr::OhcrLabeler;
pub use pipeline::{AnalysisOutcome, Analyzer, SessionSummary, analyze_fragments, run_pipeline};
pub use roles::RoleInferrer;
pub use segmenter::{Segmenter, SegmenterConfig};
pub use store::{SessionId, SessionStore, write_session};
pub use utterance::{DiscourseAct, OhcrLabel, Role, Utterance};
