// src/llm/retry.rs

use tracing::{info, warn};

use crate::llm::{ImageModelClient, extraction};
use crate::models::profile::GeneratedImage;

/// Fixed attempt budget for the image-generation call. Attempts run back to
/// back with no delay between them.
pub const IMAGE_GENERATION_ATTEMPTS: usize = 3;

/// Calls the image model up to [`IMAGE_GENERATION_ATTEMPTS`] times and
/// returns the first reply that carries inline image bytes. A reply without
/// usable bytes counts as a failed attempt, same as a transport error.
///
/// Exhausting the budget is not an error: the caller substitutes the
/// fallback asset and the request still succeeds.
pub async fn generate_with_retry(
    client: &dyn ImageModelClient,
    prompt: &str,
) -> Option<GeneratedImage> {
    for attempt in 1..=IMAGE_GENERATION_ATTEMPTS {
        match client.generate_image(prompt).await {
            Ok(reply) => {
                if let Some(image) = extraction::extract_image_bytes(&reply) {
                    info!(attempt, size = image.bytes.len(), "image generation succeeded");
                    return Some(image);
                }
                warn!(attempt, "image reply contained no inline image data");
            }
            Err(err) => {
                warn!(attempt, error = %err, "image generation attempt failed");
            }
        }
    }
    warn!(
        attempts = IMAGE_GENERATION_ATTEMPTS,
        "image generation exhausted all attempts, using fallback asset"
    );
    None
}
