use thiserror::Error;

use crate::metrics::TimingInfo;

/// Aggregates every failure mode exposed by the unified client.
///
/// The first five variants are pre-flight policy violations raised by the
/// request validator before any network call is issued. `ApiRequestFailed`
/// covers everything that goes wrong once the transport has been engaged,
/// and carries the latency accumulated up to the failure so callers can
/// always log timing regardless of outcome.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The requested model id is not registered for the target vendor.
    #[error("unknown {vendor} model: {model}. Available models: {}", .known.join(", "))]
    UnknownModel {
        /// Vendor the request was addressed to.
        vendor: &'static str,
        /// Model id the caller supplied.
        model: String,
        /// Every id the vendor's registry knows, sorted.
        known: Vec<String>,
    },
    /// A message (or request) field is not accepted by the target vendor.
    #[error("unsupported field {field}: {message}")]
    UnsupportedMessageField {
        /// Name of the offending field, such as `name` or `logit_bias`.
        field: &'static str,
        message: String,
    },
    /// The temperature falls outside the vendor's accepted range.
    #[error("invalid temperature: {message}")]
    InvalidTemperature { message: String },
    /// The requested max output tokens exceed the model's ceiling.
    #[error("max tokens {requested} exceeds output limit of {allowed} for {model}")]
    TokenLimitExceeded {
        model: String,
        requested: u32,
        allowed: u64,
    },
    /// The estimated input size exceeds the model's context window.
    #[error("estimated input size of {estimated} tokens exceeds model limit of {allowed} for {model}")]
    InputTooLarge {
        model: String,
        /// Estimated prompt size in tokens.
        estimated: u64,
        /// Scaled context-window ceiling in tokens.
        allowed: u64,
    },
    /// The vendor or the network rejected the dispatched request.
    #[error("API request failed: {message}")]
    ApiRequestFailed {
        /// Vendor-supplied error message when one could be extracted,
        /// otherwise the raw transport message.
        message: String,
        /// Latency accumulated up to the failure point.
        timing: Option<TimingInfo>,
    },
    /// Token estimation was handed input it cannot process.
    #[error("token estimation failed: {message}")]
    TokenEstimation { message: String },
    /// Transport-layer or networking failure, raised below the adapter.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The request payload itself could not be built or serialized.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl LlmError {
    /// Creates an [`LlmError::Transport`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsunagi::error::LlmError;
    ///
    /// let err = LlmError::transport("dns lookup failed");
    /// assert!(matches!(err, LlmError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an [`LlmError::ApiRequestFailed`] with timing attached.
    pub fn api_failure<T: Into<String>>(message: T, timing: TimingInfo) -> Self {
        Self::ApiRequestFailed {
            message: message.into(),
            timing: Some(timing),
        }
    }

    /// Normalizes a transport-side error into [`LlmError::ApiRequestFailed`]
    /// carrying the given timing. Pre-flight variants pass through
    /// unchanged since no network attempt backs them.
    pub fn into_api_failure(self, timing: TimingInfo) -> Self {
        match self {
            Self::Transport { message } => Self::ApiRequestFailed {
                message,
                timing: Some(timing),
            },
            Self::ApiRequestFailed { message, .. } => Self::ApiRequestFailed {
                message,
                timing: Some(timing),
            },
            other => other,
        }
    }

    /// Returns the timing recorded at the failure point, if any.
    pub fn timing(&self) -> Option<&TimingInfo> {
        match self {
            Self::ApiRequestFailed { timing, .. } => timing.as_ref(),
            _ => None,
        }
    }

    /// `true` for policy violations raised before any network call.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::UnknownModel { .. }
                | Self::UnsupportedMessageField { .. }
                | Self::InvalidTemperature { .. }
                | Self::TokenLimitExceeded { .. }
                | Self::InputTooLarge { .. }
        )
    }
}

/// Attempts to pull a human-readable message out of a vendor error body.
///
/// Probes the `{"error": {"message": ...}}` shape shared by the
/// OpenAI-compatible family and Anthropic, then a top-level `message`.
pub(crate) fn extract_vendor_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let nested = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str());
    let message = nested.or_else(|| value.get("message").and_then(|m| m.as_str()))?;
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
