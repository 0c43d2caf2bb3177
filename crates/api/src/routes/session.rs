use std::path::{Path as FsPath, PathBuf};

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
};
use ohcr_analysis::{PipelineError, SessionId, SessionSummary, Utterance, run_pipeline};
use ohcr_transcription::TranscriptFormat;
use serde::Serialize;
use tracing::{info, warn};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub summary: SessionSummary,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub summary: SessionSummary,
    pub utterances: Vec<Utterance>,
}

/// A file part of the multipart body.
struct UploadedFile {
    file_name: String,
    data: Bytes,
}

impl UploadedFile {
    fn extension(&self) -> Option<String> {
        FsPath::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Accepts an audio recording (`file`) plus an optional pre-made transcript
/// (`transcript`), runs the whole pipeline and returns the session summary.
/// When the pipeline fails the uploaded files are deleted again.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut audio: Option<UploadedFile> = None;
    let mut transcript: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != "file" && name != "transcript" {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read `{name}`: {e}")))?;
        let part = UploadedFile { file_name, data };
        if name == "file" {
            audio = Some(part);
        } else {
            transcript = Some(part);
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("Missing `file` field".to_string()))?;
    let storage = &state.settings.storage;
    let audio_ext = match audio.extension() {
        Some(ext) if storage.accepts(&audio.file_name) => ext,
        _ => {
            return Err(ApiError::BadRequest(format!(
                "Please upload a file with one of these extensions: {}",
                storage.accepted_extensions.join(", ")
            )));
        }
    };
    let transcript_ext = match &transcript {
        Some(t) => Some(
            t.extension()
                .filter(|ext| TranscriptFormat::from_name(ext).is_some())
                .ok_or_else(|| ApiError::BadRequest("Transcript must be .srt, .txt or .json".to_string()))?,
        ),
        None => None,
    };

    let session_id = SessionId::generate();
    tokio::fs::create_dir_all(&storage.uploads_dir).await?;
    let audio_path = storage.uploads_dir.join(format!("{session_id}.{audio_ext}"));
    tokio::fs::write(&audio_path, &audio.data).await?;
    let mut saved = vec![audio_path.clone()];
    if let (Some(t), Some(ext)) = (&transcript, &transcript_ext) {
        let transcript_path = storage.uploads_dir.join(format!("{session_id}.{ext}"));
        tokio::fs::write(&transcript_path, &t.data).await?;
        saved.push(transcript_path);
    }

    info!(
        %session_id,
        file = %audio.file_name,
        bytes = audio.data.len(),
        transcript = transcript.is_some(),
        "Upload received"
    );

    let out_dir = state.store.session_dir(&session_id);
    let summary = match run_pipeline(state.transcriber.as_ref(), &state.analyzer, &audio_path, &out_dir).await {
        Ok(summary) => summary,
        Err(e) => {
            remove_uploads(&saved).await;
            return Err(e.into());
        }
    };

    Ok(Json(UploadResponse {
        session_id: session_id.to_string(),
        summary,
    }))
}

/// Deletes the stored upload files of a session whose pipeline failed.
async fn remove_uploads(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove upload");
        }
    }
}

pub async fn results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let id = SessionId::parse(&session_id)
        .ok_or_else(|| ApiError::BadRequest("Invalid session_id".to_string()))?;

    let store = state.store.clone();
    let (summary, utterances) = tokio::task::spawn_blocking(move || {
        Ok::<_, PipelineError>((store.load_summary(&id)?, store.load_utterances(&id)?))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(ResultsResponse { summary, utterances }))
}
