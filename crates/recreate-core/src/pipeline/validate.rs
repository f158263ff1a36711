//! Input validation before any external call is made.

use std::borrow::Cow;

use base64::Engine;

use crate::error::{PipelineError, PipelineResult};
use crate::providers::ImageInput;

/// Media type assumed when neither a data-URL prefix nor the bytes say otherwise.
const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Validates incoming base64 payloads.
#[derive(Debug, Clone)]
pub struct Validator {
    max_bytes: usize,
}

impl Validator {
    /// Create a validator rejecting payloads that decode to more than `max_bytes`.
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Check a payload and turn it into an [`ImageInput`].
    ///
    /// Accepts bare base64 or a `data:image/...;base64,` URL. Checks:
    /// - payload is non-empty
    /// - line breaks and other ASCII whitespace are dropped (MIME-wrapped base64)
    /// - payload uses the base64 alphabet
    /// - estimated decoded size is within limits
    pub fn validate(&self, payload: &str) -> PipelineResult<ImageInput> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(required());
        }

        let (declared_type, data) = split_data_url(payload)?;
        let data: Cow<'_, str> = if data.bytes().any(|b| b.is_ascii_whitespace()) {
            Cow::Owned(data.chars().filter(|c| !c.is_ascii_whitespace()).collect())
        } else {
            Cow::Borrowed(data)
        };
        if data.is_empty() {
            return Err(required());
        }

        if !data
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        {
            return Err(PipelineError::InvalidInput(
                "Image must be base64-encoded".to_string(),
            ));
        }

        let estimated = data.len() / 4 * 3;
        if estimated > self.max_bytes {
            return Err(PipelineError::InvalidInput(format!(
                "Image exceeds the {} MB limit",
                self.max_bytes / (1024 * 1024)
            )));
        }

        let media_type = declared_type
            .map(str::to_string)
            .or_else(|| sniff_media_type(&data))
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

        Ok(ImageInput::new(data, media_type))
    }
}

fn required() -> PipelineError {
    PipelineError::InvalidInput("Image is required".to_string())
}

/// Split `data:<type>;base64,<data>` into its media type and data.
fn split_data_url(payload: &str) -> PipelineResult<(Option<&str>, &str)> {
    let Some(rest) = payload.strip_prefix("data:") else {
        return Ok((None, payload));
    };
    let Some((media_type, data)) = rest.split_once(";base64,") else {
        return Err(PipelineError::InvalidInput(
            "Image must be base64-encoded".to_string(),
        ));
    };
    if !media_type.starts_with("image/") {
        return Err(PipelineError::InvalidInput(format!(
            "Unsupported media type: {media_type}"
        )));
    }
    Ok((Some(media_type), data))
}

/// Guess the media type from the first decoded bytes.
fn sniff_media_type(data: &str) -> Option<String> {
    // 64 base64 chars decode to 48 bytes, enough for every magic number we care about.
    let head_len = data.len().min(64) / 4 * 4;
    let head = base64::engine::general_purpose::STANDARD
        .decode(&data[..head_len])
        .ok()?;
    image::guess_format(&head)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}
