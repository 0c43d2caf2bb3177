use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default config file looked up (optionally) relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Environment prefix, e.g. `OHCR__SERVER__PORT=8080`.
const ENV_PREFIX: &str = "OHCR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub analysis: AnalysisSettings,
    pub transcription: TranscriptionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where uploads and per-session result directories live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub uploads_dir: PathBuf,
    pub results_dir: PathBuf,
    /// Lowercase file extensions (without the dot) accepted by the upload endpoint.
    pub accepted_extensions: Vec<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("data/uploads"),
            results_dir: PathBuf::from("data/results"),
            accepted_extensions: vec!["wav".to_string(), "mp3".to_string()],
        }
    }
}

impl StorageSettings {
    pub fn accepts(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.accepted_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Silence between fragments (seconds) above which a new utterance starts.
    pub pause_threshold_secs: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            pause_threshold_secs: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Backend to use: "srt", "txt", "json" (sidecar transcripts) or "local_whisper".
    pub backend: String,
    /// Path to the GGML Whisper model file (for local_whisper backend).
    pub whisper_model_path: Option<String>,
    /// Language hint for ASR (e.g. "en"). None = auto-detect.
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            backend: "srt".to_string(),
            whisper_model_path: None,
            language: None,
        }
    }
}

impl Settings {
    /// Loads settings: built-in defaults, then the optional config file, then
    /// `OHCR__*` environment variables.
    ///
    /// When `path` is `None`, `config/default.{toml,json,yaml}` is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("storage.accepted_extensions"),
            )
            .build()?
            .try_deserialize()
    }
}
