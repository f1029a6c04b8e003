//! Shared data structures modeling chat requests and responses.
//!
//! These types normalize vendor-specific payloads so the rest of the crate
//! stays agnostic of individual API differences.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat role understood by every supported vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Normalized chat message shared across vendors.
///
/// Ordering within a request is caller-significant and preserved verbatim
/// on the wire. The optional `name` field exists because some vendors
/// accept it and at least one (Groq) rejects it.
///
/// # Examples
///
/// ```
/// use tsunagi::types::{Message, Role};
///
/// let msg = Message::user("What is the capital of France?");
/// assert_eq!(msg.role, Role::User);
/// assert!(msg.name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }

    /// Attaches a participant name to the message.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Stop sequence(s), a single text or a set of texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

impl StopSequences {
    /// Flattens into a list, the shape vendors that only accept sets want.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StopSequences::One(stop) => vec![stop.clone()],
            StopSequences::Many(stops) => stops.clone(),
        }
    }
}

/// One chat-completion request in the unified shape.
///
/// `temperature` and `max_tokens`, once validated, fall within the bounds
/// advertised by the vendor's model registry entry for `model`. The
/// `logprobs`/`logit_bias`/`top_logprobs` extension fields are opaque
/// pass-through unless a vendor forbids them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// Side-channel system prompt for vendors that take it as a top-level
    /// parameter rather than an inline message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequences>,
    /// Carried for wire fidelity; the invoked operation decides the value
    /// actually sent.
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<Value>,
}

impl ChatCompletionRequest {
    /// Builds a request with only the required fields set.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system: None,
            temperature: None,
            max_tokens: None,
            stop: None,
            stream: false,
            logprobs: None,
            logit_bias: None,
            top_logprobs: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stop(mut self, stop: StopSequences) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// Prompt/completion/total token counts reported by the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Builds usage from the two counted halves; `total_tokens` is always
    /// their sum, whatever the vendor reported.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// One chat-completion response in the unified shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Vendor-assigned response id.
    pub id: String,
    /// Model id echoed by the vendor.
    pub model: String,
    /// The single assistant message.
    pub message: Message,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn usage_total_is_always_the_sum() {
        let usage = TokenUsage::new(120, 34);
        assert_eq!(usage.total_tokens, 154);
    }

    #[test]
    fn stop_sequences_accept_single_and_many() {
        let one: StopSequences = serde_json::from_str("\"END\"").expect("one");
        assert_eq!(one.to_vec(), vec!["END".to_string()]);

        let many: StopSequences = serde_json::from_str(r#"["a","b"]"#).expect("many");
        assert_eq!(many.to_vec(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn request_builder_round_trips_through_serde() {
        let request = ChatCompletionRequest::new("gpt-4o", vec![Message::user("hi")])
            .with_temperature(0.7)
            .with_max_tokens(256)
            .with_stop(StopSequences::One("\n\n".to_string()));
        let json = serde_json::to_string(&request).expect("serialize");
        let back: ChatCompletionRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.model, "gpt-4o");
        assert_eq!(back.temperature, Some(0.7));
        assert_eq!(back.max_tokens, Some(256));
        assert!(!back.stream);
    }
}
