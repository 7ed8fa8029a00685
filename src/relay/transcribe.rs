use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::RelayError;

/// Turns an uploaded audio file into text.
#[async_trait]
pub trait TranscriptionRelay: Send + Sync {
    async fn transcribe(&self, audio_url: &str) -> Result<String, RelayError>;
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TranscribeRequest<'a> {
    audio_url: &'a str,
}

#[derive(Deserialize, Debug)]
struct TranscribeResponse {
    text: Option<String>,
    error: Option<String>,
}

/// Calls an edge function at `{base}/functions/v1/{function}` with
/// `{"audioUrl": ...}` and reads `{"text": ...}` back.
pub struct HttpTranscriptionRelay {
    client: reqwest::Client,
    endpoint: String,
    anon_key: String,
}

impl HttpTranscriptionRelay {
    pub fn new(base_url: String, anon_key: String, function: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/functions/v1/{}",
                base_url.trim_end_matches('/'),
                function
            ),
            anon_key,
        }
    }
}

fn parse_transcript(status: u16, body: &str) -> Result<String, RelayError> {
    let parsed: Option<TranscribeResponse> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .and_then(|r| r.error)
            .unwrap_or_else(|| body.to_string());
        return Err(RelayError::Api { status, message });
    }

    match parsed {
        Some(TranscribeResponse {
            text: Some(text), ..
        }) => Ok(text.trim().to_string()),
        Some(TranscribeResponse {
            error: Some(error), ..
        }) => Err(RelayError::Api {
            status,
            message: error,
        }),
        _ => Err(RelayError::Parse(format!(
            "transcription response has no text: {body}"
        ))),
    }
}

#[async_trait]
impl TranscriptionRelay for HttpTranscriptionRelay {
    async fn transcribe(&self, audio_url: &str) -> Result<String, RelayError> {
        debug!("Requesting transcription for {}", audio_url);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .json(&TranscribeRequest { audio_url })
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let result = parse_transcript(status, &body);
        if let Err(ref e) = result {
            warn!("Transcription failed: {}", e);
        }
        result
    }
}
