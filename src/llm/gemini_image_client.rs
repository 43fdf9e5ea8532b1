// Gemini image-generation client using the REST API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::{ImageModelClient, ImageReply, ReplyPart};

// --- Request Structs ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    // The image-capable models refuse image output unless both modalities
    // are requested.
    #[serde(rename = "responseModalities")]
    response_modalities: [&'static str; 2],
}

// --- Response Structs ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug)]
struct GeminiApiErrorResponse {
    error: GeminiApiError,
}

#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct GeminiApiError {
    code: i32,
    message: String,
    status: String,
}

#[derive(Clone)]
pub struct RestGeminiImageClient {
    reqwest_client: ReqwestClient,
    config: Arc<Config>,
}

#[async_trait]
impl ImageModelClient for RestGeminiImageClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.image_model), err)]
    async fn generate_image(&self, prompt: &str) -> Result<ImageReply, AppError> {
        let api_key = self.config.gemini_api_key.as_ref().ok_or_else(|| {
            error!("GEMINI_API_KEY not configured");
            AppError::ConfigError("GEMINI_API_KEY not configured".to_string())
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.gemini_api_base_url, self.config.image_model, api_key
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
            },
        };

        let response = self
            .reqwest_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request to Gemini image API failed");
                AppError::ImageGenerationError(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.json::<GeminiApiErrorResponse>().await;
            error!(status = %status, error_details = ?error_body, "Gemini image API returned error status");
            let error_message = error_body
                .map(|b| b.error.message)
                .unwrap_or_else(|e| format!("Failed to parse error body: {e}"));
            return Err(AppError::ImageGenerationError(format!(
                "Gemini API error ({status}): {error_message}"
            )));
        }

        let reply = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to parse successful Gemini image API response");
                AppError::SerializationError(format!("Failed to parse Gemini response: {e}"))
            })?;

        let parts = reply
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|part| match (part.inline_data, part.text) {
                (Some(inline), _) => Some(ReplyPart::InlineData {
                    mime_type: inline.mime_type,
                    data: inline.data,
                }),
                (None, Some(text)) => Some(ReplyPart::Text(text)),
                (None, None) => None,
            })
            .collect();

        Ok(ImageReply { parts })
    }
}

pub fn build_gemini_image_client(config: Arc<Config>) -> Result<RestGeminiImageClient, AppError> {
    let reqwest_client = ReqwestClient::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| {
            AppError::InternalServerError(format!("Failed to build Reqwest client: {e}"))
        })?;

    Ok(RestGeminiImageClient {
        reqwest_client,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_image_missing_api_key() {
        let config = Arc::new(Config::default());
        let client = build_gemini_image_client(config).unwrap();

        let result = client.generate_image("a horse").await;

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
