use async_trait::async_trait;

use crate::errors::AppError;

pub mod extraction;
pub mod gemini_image_client;
pub mod gemini_text_client;
pub mod retry;

/// Trait defining the interface for text-generation operations.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Sends a single-turn prompt to the model and returns the raw reply
    /// text, prose and all. Callers own any structure extraction.
    async fn generate_text(&self, prompt: &str) -> Result<String, AppError>;
}

/// One part of an image-model reply. The upstream API interleaves text
/// commentary with inline binary payloads; both are kept so the extraction
/// strategies can probe them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPart {
    Text(String),
    /// Binary payload embedded directly in the reply, still base64-encoded.
    InlineData {
        mime_type: String,
        data: String,
    },
}

/// Raw image-model reply, decoupled from any one provider's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageReply {
    pub parts: Vec<ReplyPart>,
}

/// Trait defining the interface for image-generation operations.
#[async_trait]
pub trait ImageModelClient: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<ImageReply, AppError>;
}
