use std::sync::Arc;

use ohcr_analysis::{Analyzer, Segmenter, SessionStore};
use ohcr_config::Settings;
use ohcr_transcription::Transcriber;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub transcriber: Arc<dyn Transcriber>,
    pub analyzer: Arc<Analyzer>,
    pub store: SessionStore,
}

impl AppState {
    pub fn new(settings: Settings, transcriber: Arc<dyn Transcriber>) -> Self {
        let analyzer = Analyzer::new(Segmenter::with_pause_threshold(
            settings.analysis.pause_threshold_secs,
        ));
        let store = SessionStore::new(settings.storage.results_dir.clone());
        Self {
            settings: Arc::new(settings),
            transcriber,
            analyzer: Arc::new(analyzer),
            store,
        }
    }
}
