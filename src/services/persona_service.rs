// src/services/persona_service.rs

use tracing::debug;

use crate::errors::AppError;
use crate::models::profile::GeneratedProfile;

/// Locates the first balanced `{...}` span in the reply. The model is asked
/// for bare JSON but routinely wraps it in prose or code fences, so the
/// parser scans instead of trusting the whole body.
///
/// Braces inside JSON string literals are skipped; an opening brace that
/// never closes is treated the same as no object at all.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in reply[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses the text-generation reply into a profile. Missing keys fall back
/// to the sentinel defaults baked into [`GeneratedProfile`]'s serde derive;
/// a reply without a parseable JSON object is fatal.
///
/// # Errors
///
/// `AppError::ProfileParseError` when no balanced object exists or the span
/// is not valid JSON.
pub fn parse_profile(reply: &str) -> Result<GeneratedProfile, AppError> {
    let span = extract_json_object(reply).ok_or_else(|| {
        AppError::ProfileParseError("reply contained no JSON object".to_string())
    })?;
    debug!(span_len = span.len(), "extracted profile JSON span");
    serde_json::from_str::<GeneratedProfile>(span)
        .map_err(|e| AppError::ProfileParseError(format!("invalid profile JSON: {e}")))
}
