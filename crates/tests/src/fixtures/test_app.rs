use std::path::PathBuf;
use std::sync::Arc;

use ohcr_api::{build_router, state::AppState};
use ohcr_config::Settings;
use ohcr_transcription::{SidecarTranscriber, TranscriptFormat};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;

/// A running API server on an ephemeral port, backed by throwaway storage.
pub struct TestApp {
    pub addr: String,
    pub client: reqwest::Client,
    pub settings: Settings,
    _data_dir: TempDir,
}

impl TestApp {
    /// Spawns a server whose transcriber replays uploaded SRT transcripts.
    pub async fn spawn() -> Self {
        Self::spawn_with_format(TranscriptFormat::Srt).await
    }

    pub async fn spawn_with_format(format: TranscriptFormat) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut settings = Settings::default();
        settings.server.host = "127.0.0.1".to_string();
        settings.server.port = 0;
        settings.storage.uploads_dir = data_dir.path().join("uploads");
        settings.storage.results_dir = data_dir.path().join("results");
        settings.transcription.backend = format.extension().to_string();

        let state = AppState::new(settings.clone(), Arc::new(SidecarTranscriber::new(format)));
        let router = build_router(state);

        let listener = tokio::net::TcpListener::bind(settings.server.bind_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            settings,
            _data_dir: data_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }

    /// Posts `audio_name` (with dummy bytes) and, optionally, a transcript
    /// `(file_name, content)` to `/api/upload`.
    pub async fn upload(&self, audio_name: &str, transcript: Option<(&str, &str)>) -> reqwest::Response {
        let mut form = Form::new().part(
            "file",
            Part::bytes(b"RIFF-not-really-audio".to_vec()).file_name(audio_name.to_string()),
        );
        if let Some((name, content)) = transcript {
            form = form.part(
                "transcript",
                Part::bytes(content.as_bytes().to_vec()).file_name(name.to_string()),
            );
        }

        self.client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send upload")
    }

    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.settings.storage.results_dir.join(session_id)
    }
}
