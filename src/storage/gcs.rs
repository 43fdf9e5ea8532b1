// Google Cloud Storage client using the JSON media-upload REST API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::errors::AppError;
use crate::storage::BlobStore;

#[derive(Clone)]
pub struct GcsBlobStore {
    reqwest_client: ReqwestClient,
    config: Arc<Config>,
}

impl GcsBlobStore {
    fn bucket(&self) -> Result<&str, AppError> {
        self.config.storage_bucket.as_deref().ok_or_else(|| {
            error!("STORAGE_BUCKET not configured");
            AppError::ConfigError("STORAGE_BUCKET not configured".to_string())
        })
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    #[instrument(skip(self, bytes), fields(key, size = bytes.len()), err)]
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let bucket = self.bucket()?;
        let base = &self.config.storage_api_base_url;

        let upload_url = format!("{base}/upload/storage/v1/b/{bucket}/o");
        let mut request = self
            .reqwest_client
            .post(&upload_url)
            .query(&[("uploadType", "media"), ("name", key)])
            .header("Content-Type", content_type)
            .body(bytes);

        // Public buckets accept unauthenticated writes only in emulators;
        // production deployments supply a pre-issued OAuth access token.
        if let Some(token) = &self.config.storage_access_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "HTTP request to storage API failed");
            AppError::StorageError(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "storage API returned error status");
            return Err(AppError::StorageError(format!(
                "storage API error ({status}): {body}"
            )));
        }

        let public_url = format!("{base}/{bucket}/{key}");
        info!(%public_url, "image uploaded");
        Ok(public_url)
    }
}

pub fn build_gcs_blob_store(config: Arc<Config>) -> Result<GcsBlobStore, AppError> {
    let reqwest_client = ReqwestClient::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| {
            AppError::InternalServerError(format!("Failed to build Reqwest client: {e}"))
        })?;

    Ok(GcsBlobStore {
        reqwest_client,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_without_bucket_is_config_error() {
        let store = build_gcs_blob_store(Arc::new(Config::default())).unwrap();
        let result = store
            .upload("output/test.png", vec![1, 2, 3], "image/png")
            .await;
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
