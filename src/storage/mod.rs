use async_trait::async_trait;

use crate::errors::AppError;

pub mod gcs;

/// Trait defining the interface for blob uploads. Blobs are write-once;
/// nothing in this system reads them back or deletes them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `bytes` under `key` and returns the public URL the store
    /// serves the object from.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;
}

/// Namespace prefix for generated images inside the bucket.
pub const OUTPUT_PREFIX: &str = "output/";

/// Fresh random object key for one generated image.
pub fn fresh_output_key(extension: &str) -> String {
    format!("{OUTPUT_PREFIX}{}.{extension}", uuid::Uuid::new_v4())
}

/// Object-key extension for an image content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_keys_are_namespaced_and_unique() {
        let a = fresh_output_key("png");
        let b = fresh_output_key("png");
        assert!(a.starts_with(OUTPUT_PREFIX));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn extension_follows_content_type() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/unknown"), "png");
    }
}
