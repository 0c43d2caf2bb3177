use std::path::Path;

use ohcr_transcription::{Fragment, Transcriber};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::acts::ActTagger;
use crate::error::PipelineError;
use crate::feedback::{self, FeedbackCard};
use crate::metrics::SessionMetrics;
use crate::ohcr::OhcrLabeler;
use crate::roles::RoleInferrer;
use crate::segmenter::Segmenter;
use crate::store;
use crate::utterance::Utterance;

/// What a caller gets back for one session; persisted as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub metrics: SessionMetrics,
    pub feedback: Vec<FeedbackCard>,
}

/// Result of running the six stages over one fragment sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub utterances: Vec<Utterance>,
    pub summary: SessionSummary,
}

/// The synchronous part of the pipeline, from fragments to feedback.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    segmenter: Segmenter,
    tagger: ActTagger,
    roles: RoleInferrer,
    labeler: OhcrLabeler,
}

impl Analyzer {
    pub fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            ..Self::default()
        }
    }

    pub fn with_stages(segmenter: Segmenter, tagger: ActTagger, roles: RoleInferrer, labeler: OhcrLabeler) -> Self {
        Self {
            segmenter,
            tagger,
            roles,
            labeler,
        }
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn analyze(&self, fragments: &[Fragment]) -> AnalysisOutcome {
        let utterances = self.segmenter.segment(fragments);
        debug!(fragments = fragments.len(), utterances = utterances.len(), "Segmented");

        let utterances = self.label(utterances);
        debug!(
            labelled = utterances.iter().filter(|u| u.ohcr.is_some_and(|l| l.is_ohcr())).count(),
            "Utterances labelled"
        );

        let metrics = SessionMetrics::compute(&utterances);
        let feedback = feedback::generate(&metrics);
        debug!(cards = feedback.len(), "Feedback generated");

        AnalysisOutcome {
            utterances,
            summary: SessionSummary { metrics, feedback },
        }
    }

    /// Runs the three per-utterance labelling stages. Any labels already
    /// present are recomputed from the text.
    pub fn label(&self, utterances: Vec<Utterance>) -> Vec<Utterance> {
        let utterances = self.tagger.tag(utterances);
        let utterances = self.roles.infer(utterances);
        self.labeler.label(utterances)
    }
}

/// Runs the core over fragments without touching the filesystem.
pub fn analyze_fragments(fragments: &[Fragment], segmenter: Segmenter) -> AnalysisOutcome {
    Analyzer::new(segmenter).analyze(fragments)
}

/// Transcribes `audio`, analyses it and persists the four artifacts into
/// `out_dir`, which must not exist yet.
pub async fn run_pipeline(
    transcriber: &dyn Transcriber,
    analyzer: &Analyzer,
    audio: &Path,
    out_dir: &Path,
) -> Result<SessionSummary, PipelineError> {
    let fragments = transcriber.transcribe(audio).await?;
    debug!(
        backend = transcriber.name(),
        audio = %audio.display(),
        fragments = fragments.len(),
        "Transcription complete"
    );

    let outcome = analyzer.analyze(&fragments);
    let metrics = outcome.summary.metrics;

    let dir = out_dir.to_path_buf();
    let summary = tokio::task::spawn_blocking(move || {
        store::write_session(&dir, &fragments, &outcome.utterances, &outcome.summary)?;
        Ok::<_, PipelineError>(outcome.summary)
    })
    .await
    .map_err(|e| PipelineError::persistence(out_dir, std::io::Error::other(e)))??;

    info!(
        out_dir = %out_dir.display(),
        kc_score = metrics.kc_score,
        ohcr_index = metrics.ohcr_index,
        student_talk_pct = metrics.student_talk_pct,
        cards = summary.feedback.len(),
        "Session analysed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SUMMARY_FILE, SessionStore, SessionId};
    use crate::utterance::{DiscourseAct, OhcrLabel, Role};
    use async_trait::async_trait;
    use ohcr_transcription::TranscriptionError;

    struct FixedTranscriber(Vec<Fragment>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _audio: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingTranscriber;

    #[async_trait]
    impl Transcriber for FailingTranscriber {
        async fn transcribe(&self, audio: &Path) -> Result<Vec<Fragment>, TranscriptionError> {
            Err(TranscriptionError::MissingTranscript(audio.to_path_buf()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn lesson() -> Vec<Fragment> {
        vec![
            Fragment::new(0.0, 2.0, "Welcome everyone, today we observe a falling ball."),
            Fragment::new(3.0, 4.0, "Maybe the heavy one is faster"),
            Fragment::new(5.0, 7.0, "But does that hold if we drop a feather in a vacuum?"),
            Fragment::new(8.0, 9.5, "Open your notebooks please and write this down now"),
            Fragment::new(10.5, 13.0, "So therefore we can say both fall at the same rate in a vacuum."),
            Fragment::new(14.0, 15.0, "I think we can apply it"),
        ]
    }

    #[test]
    fn analyze_labels_every_utterance() {
        let outcome = analyze_fragments(&lesson(), Segmenter::default());
        assert_eq!(outcome.utterances.len(), 6);
        assert!(outcome.utterances.iter().all(Utterance::is_fully_labeled));

        let u = &outcome.utterances;
        assert_eq!(u[0].role, Some(Role::Teacher));
        assert_eq!(u[0].ohcr, Some(OhcrLabel::O));
        assert_eq!(u[1].role, Some(Role::Student));
        assert_eq!(u[1].ohcr, Some(OhcrLabel::H));
        assert_eq!(u[2].disc_act, Some(DiscourseAct::Question));
        assert_eq!(u[3].disc_act, Some(DiscourseAct::Regulatory));
        assert_eq!(u[4].ohcr, Some(OhcrLabel::R));
        assert_eq!(u[5].role, Some(Role::Student));

        let metrics = outcome.summary.metrics;
        assert_eq!(metrics.max_hc_depth, 1);
        assert!((metrics.level5_pct - 0.333).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&metrics.kc_score));
    }

    #[test]
    fn empty_fragments_give_zero_metrics() {
        let outcome = analyze_fragments(&[], Segmenter::default());
        assert!(outcome.utterances.is_empty());
        assert_eq!(outcome.summary.metrics, SessionMetrics::default());
        assert_eq!(outcome.summary.feedback.len(), 3);
    }

    #[test]
    fn inverted_fragment_degrades_to_empty_session() {
        let outcome = analyze_fragments(&[Fragment::new(5.0, 3.0, "hello")], Segmenter::default());
        assert!(outcome.utterances.is_empty());
        assert_eq!(outcome.summary.metrics, SessionMetrics::default());
    }

    #[test]
    fn relabelling_is_idempotent() {
        let analyzer = Analyzer::default();
        let first = analyzer.analyze(&lesson()).utterances;
        let second = analyzer.label(first.clone());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn run_pipeline_persists_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        let id = SessionId::generate();
        let out_dir = store.session_dir(&id);

        let summary = run_pipeline(
            &FixedTranscriber(lesson()),
            &Analyzer::default(),
            Path::new("lesson.wav"),
            &out_dir,
        )
        .await
        .unwrap();

        assert!(out_dir.join(SUMMARY_FILE).is_file());
        assert_eq!(store.load_summary(&id).unwrap().feedback, summary.feedback);
        assert_eq!(store.load_utterances(&id).unwrap().len(), 6);
    }

    #[tokio::test]
    async fn transcription_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("abcd1234");

        let err = run_pipeline(&FailingTranscriber, &Analyzer::default(), Path::new("x.wav"), &out_dir)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::TranscriptionFailure(_)));
        assert!(!out_dir.exists());
    }
}
