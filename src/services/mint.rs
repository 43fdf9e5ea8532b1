// src/services/mint.rs
//
// Best-effort NFT minting. The call runs on a detached task after the image
// is persisted; its outcome is logged and never surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::errors::AppError;

/// Fixed description attached to every minted persona.
pub const MINT_DESCRIPTION: &str =
    "A one-of-a-kind racehorse persona generated from a personality quiz.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MintMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub to_address: String,
    pub metadata: MintMetadata,
    pub chain: String,
}

impl MintRequest {
    pub fn new(to_address: &str, chain: &str, name: &str, image_url: &str) -> Self {
        Self {
            to_address: to_address.to_string(),
            metadata: MintMetadata {
                name: name.to_string(),
                description: MINT_DESCRIPTION.to_string(),
                image: image_url.to_string(),
            },
            chain: chain.to_string(),
        }
    }
}

/// Raw minting-endpoint reply; logged, never parsed beyond the HTTP status.
#[derive(Debug, Clone)]
pub struct MintReceipt {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait MintClient: Send + Sync {
    async fn mint(&self, request: MintRequest) -> Result<MintReceipt, AppError>;
}

#[derive(Clone)]
pub struct CrossmintClient {
    reqwest_client: ReqwestClient,
    config: Arc<Config>,
}

#[async_trait]
impl MintClient for CrossmintClient {
    #[instrument(skip(self, request), fields(chain = %request.chain), err)]
    async fn mint(&self, request: MintRequest) -> Result<MintReceipt, AppError> {
        let api_key = self.config.mint_api_key.as_ref().ok_or_else(|| {
            error!("MINT_API_KEY not configured");
            AppError::ConfigError("MINT_API_KEY not configured".to_string())
        })?;

        let url = format!(
            "{}/api/2022-06-09/collections/default/nfts",
            self.config.mint_api_base_url
        );

        let response = self
            .reqwest_client
            .post(&url)
            .header("x-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request to minting API failed");
                AppError::MintError(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(MintReceipt { status, body })
    }
}

pub fn build_crossmint_client(config: Arc<Config>) -> Result<CrossmintClient, AppError> {
    let reqwest_client = ReqwestClient::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| {
            AppError::InternalServerError(format!("Failed to build Reqwest client: {e}"))
        })?;

    Ok(CrossmintClient {
        reqwest_client,
        config,
    })
}

/// Fires the mint call on a detached task. Failures are logged only; the
/// request that triggered the mint has already moved on.
pub fn spawn_mint(client: Arc<dyn MintClient>, request: MintRequest) {
    tokio::spawn(async move {
        match client.mint(request).await {
            Ok(receipt) => {
                info!(status = receipt.status, body = %receipt.body, "mint response received");
            }
            Err(err) => {
                error!(error = %err, "mint call failed");
            }
        }
    });
}
