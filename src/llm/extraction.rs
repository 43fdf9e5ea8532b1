// src/llm/extraction.rs
//
// The image API has returned inline payloads in more than one reply shape
// over time. Rather than probing fields ad hoc at the call site, each known
// shape gets a pure extraction function and they are tried in a fixed order
// until one yields bytes.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::warn;

use crate::llm::{ImageReply, ReplyPart};
use crate::models::profile::GeneratedImage;

type ExtractionStrategy = fn(&ImageReply) -> Option<GeneratedImage>;

/// Ordered list of extraction strategies. The common case (a dedicated
/// inline-data part) is first; the data-URL salvage covers replies where the
/// model stuffed the payload into a text part.
const STRATEGIES: [ExtractionStrategy; 2] = [from_inline_data_part, from_data_url_in_text];

/// Probes the reply for inline image bytes. Returns `None` when no strategy
/// finds a usable payload; the caller decides whether that counts as a
/// failed attempt.
pub fn extract_image_bytes(reply: &ImageReply) -> Option<GeneratedImage> {
    STRATEGIES.iter().find_map(|strategy| strategy(reply))
}

fn from_inline_data_part(reply: &ImageReply) -> Option<GeneratedImage> {
    reply.parts.iter().find_map(|part| match part {
        ReplyPart::InlineData { mime_type, data } if mime_type.starts_with("image/") => {
            match STANDARD.decode(data) {
                Ok(bytes) if !bytes.is_empty() => Some(GeneratedImage {
                    bytes,
                    content_type: mime_type.clone(),
                }),
                Ok(_) => None,
                Err(err) => {
                    warn!(error = %err, "inline data part was not valid base64");
                    None
                }
            }
        }
        _ => None,
    })
}

fn from_data_url_in_text(reply: &ImageReply) -> Option<GeneratedImage> {
    reply.parts.iter().find_map(|part| {
        let ReplyPart::Text(text) = part else {
            return None;
        };
        let start = text.find("data:image/")?;
        let rest = &text[start + "data:".len()..];
        let (mime_type, after_mime) = rest.split_once(";base64,")?;
        // The payload runs to the first character that cannot appear in
        // base64; typically whitespace or closing punctuation from prose.
        let payload: &str = after_mime
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='))
            .next()?;
        match STANDARD.decode(payload) {
            Ok(bytes) if !bytes.is_empty() => Some(GeneratedImage {
                bytes,
                content_type: mime_type.to_string(),
            }),
            _ => None,
        }
    })
}
