//! # Attachment Relay
//!
//! Files and voice notes never go to the completion provider directly. They
//! are uploaded to object storage first, and only their public URL travels
//! on from there.
//!
//! ```text
//! attach:   file ──upload──▶ AttachmentStore ──▶ Attachment { url, .. }
//! dictate:  audio ──upload──▶ AttachmentStore ──url──▶ TranscriptionRelay ──▶ text
//! ```
//!
//! Both flows run on a tokio task. Their results come back to the reducer as
//! `AttachmentReady` / `TranscriptReady` (or the matching failure action).

pub mod storage;
pub mod transcribe;

pub use storage::{AttachmentStore, SupabaseStore};
pub use transcribe::{HttpTranscriptionRelay, TranscriptionRelay};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::core::config::ResolvedConfig;

/// A file that has been uploaded and can be referenced by URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Original file name as picked by the user.
    pub name: String,
    /// Public URL in object storage.
    pub url: String,
    pub mime: String,
    pub size: u64,
}

impl Attachment {
    /// Line appended to the user's message when the attachment is sent.
    pub fn message_line(&self) -> String {
        format!("📎 {} ({}) {}", self.name, format_size(self.size), self.url)
    }
}

#[derive(Debug)]
pub enum RelayError {
    /// Reading the local file failed.
    Io(std::io::Error),
    /// Network-level failure.
    Network(String),
    /// Storage or relay returned an error response.
    Api { status: u16, message: String },
    /// Response body did not have the expected shape.
    Parse(String),
    /// No storage URL/key configured.
    NotConfigured,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Io(e) => write!(f, "file error: {e}"),
            RelayError::Network(msg) => write!(f, "network error: {msg}"),
            RelayError::Api { status, message } => {
                write!(f, "relay error (HTTP {status}): {message}")
            }
            RelayError::Parse(msg) => write!(f, "parse error: {msg}"),
            RelayError::NotConfigured => write!(
                f,
                "attachments are not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)"
            ),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        RelayError::Io(e)
    }
}

/// Storage and transcription clients, built together from the `[relay]` config.
#[derive(Clone)]
pub struct Relay {
    pub store: Arc<dyn AttachmentStore>,
    pub transcriber: Arc<dyn TranscriptionRelay>,
}

impl Relay {
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, RelayError> {
        let settings = config.relay.as_ref().ok_or(RelayError::NotConfigured)?;
        Ok(Self {
            store: Arc::new(SupabaseStore::new(
                settings.url.clone(),
                settings.anon_key.clone(),
                settings.bucket.clone(),
            )),
            transcriber: Arc::new(HttpTranscriptionRelay::new(
                settings.url.clone(),
                settings.anon_key.clone(),
                &settings.transcribe_function,
            )),
        })
    }
}

/// Uploads a local file under a random name and returns its attachment record.
pub async fn upload_attachment(
    store: &dyn AttachmentStore,
    path: &Path,
) -> Result<Attachment, RelayError> {
    let bytes = tokio::fs::read(path).await?;
    let name = display_name(path);
    let mime = guess_mime(path);
    let object_name = match extension(path) {
        Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
        None => uuid::Uuid::new_v4().to_string(),
    };
    let size = bytes.len() as u64;

    info!("Uploading attachment {} ({} bytes) as {}", name, size, object_name);
    let url = store.upload(&object_name, bytes, mime).await?;

    Ok(Attachment {
        name,
        url,
        mime: mime.to_string(),
        size,
    })
}

/// Uploads an audio file and returns its transcript.
pub async fn dictate(relay: &Relay, path: &Path) -> Result<String, RelayError> {
    let bytes = tokio::fs::read(path).await?;
    let ext = extension(path).unwrap_or_else(|| "webm".to_string());
    let object_name = format!("recording-{}.{}", Utc::now().timestamp_millis(), ext);

    info!("Uploading recording {} ({} bytes)", object_name, bytes.len());
    let url = relay
        .store
        .upload(&object_name, bytes, guess_mime(path))
        .await?;

    let text = relay.transcriber.transcribe(&url).await?;
    info!("Transcription returned {} chars", text.len());
    Ok(text)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
}

/// Content type from the file extension; unknown types upload as octet-stream.
pub fn guess_mime(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("txt" | "log") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("html" | "htm") => "text/html",
        Some("webm") => "audio/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg" | "oga") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        Some("mp4") => "video/mp4",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
