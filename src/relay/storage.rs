use async_trait::async_trait;
use log::{debug, warn};

use super::RelayError;

/// Object storage that hands back a publicly readable URL for each upload.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Stores `bytes` under `name` and returns the object's public URL.
    async fn upload(&self, name: &str, bytes: Vec<u8>, mime: &str) -> Result<String, RelayError>;
}

/// Supabase Storage over its REST API.
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(base_url: String, anon_key: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            bucket,
        }
    }

    pub fn public_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, name
        )
    }
}

/// Storage errors look like `{"statusCode":"409","error":"Duplicate","message":"..."}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[async_trait]
impl AttachmentStore for SupabaseStore {
    async fn upload(&self, name: &str, bytes: Vec<u8>, mime: &str) -> Result<String, RelayError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, name
        );
        debug!("Uploading {} bytes to bucket {}", bytes.len(), self.bucket);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .header("Content-Type", mime)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Storage upload failed: {} - {}", status, body);
            return Err(RelayError::Api {
                status,
                message: error_message(&body).unwrap_or(body),
            });
        }

        Ok(self.public_url(name))
    }
}
