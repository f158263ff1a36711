//! Classification of upstream provider failures.
//!
//! OpenAI and Anthropic both answer errors with `{"error": {"type", "message", ...}}`
//! (OpenAI adds `code`). The adapters parse that envelope into an [`UpstreamError`]
//! and [`UpstreamError::classify`] folds it into the pipeline's error taxonomy.

use crate::error::{PipelineError, PipelineResult, Stage};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// An error response from a provider, reduced to the fields we classify on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamError {
    /// Provider name ("openai", "anthropic")
    pub provider: String,
    /// HTTP status, when the failure came from an HTTP response
    pub status: Option<u16>,
    /// `error.type` from the body
    pub error_type: Option<String>,
    /// `error.code` from the body
    pub code: Option<String>,
    /// Human-readable detail
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    code: Option<String>,
    message: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl UpstreamError {
    /// Build from a non-success HTTP response body.
    ///
    /// Bodies that are not the standard error envelope are kept verbatim as the message.
    pub fn from_response(provider: &str, status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self {
                provider: provider.to_string(),
                status: Some(status),
                error_type: envelope.error.error_type,
                code: envelope.error.code,
                message: envelope
                    .error
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}")),
            },
            Err(_) => Self {
                provider: provider.to_string(),
                status: Some(status),
                error_type: None,
                code: None,
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    fn is(&self, value: &str) -> bool {
        self.error_type.as_deref() == Some(value) || self.code.as_deref() == Some(value)
    }

    /// Map this upstream failure onto the pipeline taxonomy.
    ///
    /// Order matters: OpenAI reports exhausted quota as HTTP 429, so the quota
    /// check runs before the generic rate-limit check.
    pub fn classify(&self) -> PipelineError {
        let provider = self.provider.clone();
        let message = self.message.clone();

        if self.is("insufficient_quota") {
            return PipelineError::QuotaExceeded { provider, message };
        }
        if self.status == Some(429) || self.is("rate_limit_error") {
            return PipelineError::RateLimited { provider, message };
        }
        if self.is("billing_hard_limit_reached")
            || (self.status == Some(400) && self.message.contains("credit balance"))
        {
            return PipelineError::BillingLimitReached { provider, message };
        }
        if self.is("model_not_found")
            || self.is("invalid_api_key")
            || self.is("authentication_error")
            || self.is("permission_error")
            || matches!(self.status, Some(401 | 403 | 404))
        {
            return PipelineError::ServiceMisconfigured { provider, message };
        }
        PipelineError::Unknown(format!("{provider}: {message}"))
    }
}

impl From<UpstreamError> for PipelineError {
    fn from(err: UpstreamError) -> Self {
        err.classify()
    }
}

/// Classify a transport-level failure (connect, DNS, timeout).
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> PipelineError {
    tracing::warn!(provider, error = %err, "Provider request failed");
    PipelineError::Unknown(format!("{provider} request failed: {err}"))
}

/// Check the status of a provider response and decode its JSON body.
///
/// Error statuses are parsed and classified; a success body that does not decode
/// is an unusable result for `stage`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    stage: Stage,
    resp: reqwest::Response,
) -> PipelineResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let upstream = UpstreamError::from_response(provider, status.as_u16(), &body);
        tracing::warn!(
            provider,
            status = status.as_u16(),
            error_type = upstream.error_type.as_deref().unwrap_or("-"),
            code = upstream.code.as_deref().unwrap_or("-"),
            "Provider returned error: {}",
            upstream.message
        );
        return Err(upstream.classify());
    }

    resp.json::<T>()
        .await
        .map_err(|e| PipelineError::GenerationFailure {
            stage,
            message: format!("Failed to parse {provider} response: {e}"),
        })
}
