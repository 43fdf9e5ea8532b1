// Gemini text-generation client using the REST API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::AiClient;

// --- Request Structs ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
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
}

// --- Error Response Struct ---

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
pub struct RestGeminiTextClient {
    reqwest_client: ReqwestClient,
    config: Arc<Config>,
}

#[async_trait]
impl AiClient for RestGeminiTextClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.text_model), err)]
    async fn generate_text(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self.config.gemini_api_key.as_ref().ok_or_else(|| {
            error!("GEMINI_API_KEY not configured");
            AppError::ConfigError("GEMINI_API_KEY not configured".to_string())
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.gemini_api_base_url, self.config.text_model, api_key
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .reqwest_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request to Gemini text API failed");
                AppError::TextGenerationError(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.json::<GeminiApiErrorResponse>().await;
            error!(status = %status, error_details = ?error_body, "Gemini text API returned error status");
            let error_message = error_body
                .map(|b| b.error.message)
                .unwrap_or_else(|e| format!("Failed to parse error body: {e}"));
            return Err(AppError::TextGenerationError(format!(
                "Gemini API error ({status}): {error_message}"
            )));
        }

        let reply = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to parse successful Gemini text API response");
                AppError::SerializationError(format!("Failed to parse Gemini response: {e}"))
            })?;

        let text = reply
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(AppError::TextGenerationError(
                "Gemini reply contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}

pub fn build_gemini_text_client(config: Arc<Config>) -> Result<RestGeminiTextClient, AppError> {
    let reqwest_client = ReqwestClient::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| {
            AppError::InternalServerError(format!("Failed to build Reqwest client: {e}"))
        })?;

    Ok(RestGeminiTextClient {
        reqwest_client,
        config,
    })
}
