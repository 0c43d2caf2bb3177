//! Write-once, all-or-nothing persistence of session artifacts.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ohcr_transcription::Fragment;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::PipelineError;
use crate::pipeline::SessionSummary;
use crate::utterance::Utterance;

pub const WORDS_FILE: &str = "words.json";
pub const UTTERANCES_FILE: &str = "utterances.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const SUMMARY_FILE: &str = "summary.json";

const SESSION_ID_LEN: usize = 8;

/// Short opaque session key: eight lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..SESSION_ID_LEN].to_string())
    }

    /// Accepts only ids of the shape produced by [`SessionId::generate`], so a
    /// parsed id can never escape the results directory.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == SESSION_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writes the four artifacts into `out_dir`.
///
/// Files are staged in a hidden sibling directory and renamed into place
/// once all of them are on disk. Fails with [`PipelineError::AlreadyExists`]
/// if `out_dir` is already present; on any error nothing is left behind.
///
/// The existence check and the rename are not one atomic step: on Unix an
/// empty directory created at `out_dir` in between is replaced by the rename.
/// A non-empty one makes the rename fail with `AlreadyExists`.
///
/// The session directory is made world-readable (`0o755` on Unix) instead of
/// keeping the private mode of the staging directory.
pub fn write_session(
    out_dir: &Path,
    words: &[Fragment],
    utterances: &[Utterance],
    summary: &SessionSummary,
) -> Result<(), PipelineError> {
    if out_dir.exists() {
        return Err(PipelineError::AlreadyExists(out_dir.to_path_buf()));
    }
    let parent = match out_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| PipelineError::persistence(parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent)
        .map_err(|e| PipelineError::persistence(parent, e))?;

    write_json(&staging.path().join(WORDS_FILE), &words)?;
    write_json(&staging.path().join(UTTERANCES_FILE), &utterances)?;
    write_json(&staging.path().join(METRICS_FILE), &summary.metrics)?;
    write_json(&staging.path().join(SUMMARY_FILE), summary)?;

    set_session_permissions(staging.path())?;
    fs::rename(staging.path(), out_dir).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists | ErrorKind::DirectoryNotEmpty => {
            PipelineError::AlreadyExists(out_dir.to_path_buf())
        }
        _ => PipelineError::persistence(out_dir, e),
    })?;

    debug!(
        out_dir = %out_dir.display(),
        words = words.len(),
        utterances = utterances.len(),
        "Session artifacts written"
    );
    Ok(())
}

/// Mode applied to a finished session directory.
#[cfg(unix)]
pub const SESSION_DIR_MODE: u32 = 0o755;

#[cfg(unix)]
fn set_session_permissions(dir: &Path) -> Result<(), PipelineError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(SESSION_DIR_MODE))
        .map_err(|e| PipelineError::persistence(dir, e))
}

#[cfg(not(unix))]
fn set_session_permissions(_dir: &Path) -> Result<(), PipelineError> {
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes).map_err(|e| PipelineError::persistence(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let bytes = fs::read(path).map_err(|e| PipelineError::persistence(path, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Session directories under one results root, keyed by [`SessionId`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_dir(&self, id: &SessionId) -> PathBuf {
        self.root.join(id.as_str())
    }

    pub fn load_summary(&self, id: &SessionId) -> Result<SessionSummary, PipelineError> {
        read_json(&self.existing_artifact(id, SUMMARY_FILE)?)
    }

    pub fn load_utterances(&self, id: &SessionId) -> Result<Vec<Utterance>, PipelineError> {
        // A session without a summary is treated as absent even if other files exist.
        self.existing_artifact(id, SUMMARY_FILE)?;
        read_json(&self.existing_artifact(id, UTTERANCES_FILE)?)
    }

    fn existing_artifact(&self, id: &SessionId, file: &str) -> Result<PathBuf, PipelineError> {
        let path = self.session_dir(id).join(file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(PipelineError::NotFound(id.to_string()))
        }
    }
}
