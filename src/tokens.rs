//! Heuristic token estimation for pre-flight input-size checks.
//!
//! This is deliberately not a tokenizer. Estimates come from per-encoding
//! characters-per-token ratios plus fixed role overheads, which is accurate
//! enough to enforce context-window ceilings before a request is sent.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::LlmError;
use crate::types::{Message, Role};

/// Tokens added per message when role accounting is enabled.
pub const PER_MESSAGE_OVERHEAD: u64 = 4;
/// Extra tokens for a system-role message.
pub const SYSTEM_MESSAGE_OVERHEAD: u64 = 2;
/// Extra tokens for a message carrying a `name` field.
pub const NAME_FIELD_OVERHEAD: u64 = 1;
/// Tokens reserved for the assistant reply preamble.
pub const REPLY_PREFIX_OVERHEAD: u64 = 2;

/// Knobs controlling how an estimate is computed, fixed per vendor.
#[derive(Debug, Clone, Copy)]
pub struct EstimateOptions {
    /// When false, system-role messages contribute zero tokens.
    pub count_system_message: bool,
    /// When true, per-message role overheads and the reply prefix apply.
    pub count_roles: bool,
    /// Encoding name resolved through the encoder cache.
    pub encoding: &'static str,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            count_system_message: false,
            count_roles: false,
            encoding: "cl100k_base",
        }
    }
}

/// Resolved per-encoding estimator.
#[derive(Debug, Clone, Copy)]
struct Encoder {
    chars_per_token: f64,
}

impl Encoder {
    fn for_name(name: &str) -> Result<Self, LlmError> {
        // ~4 chars/token holds for the cl100k family on English text;
        // the older GPT-3 encodings pack slightly fewer.
        let chars_per_token = match name {
            "cl100k_base" | "o200k_base" => 4.0,
            "p50k_base" => 3.8,
            "r50k_base" => 3.6,
            model if model.starts_with("gpt-") => 4.0,
            other => {
                return Err(LlmError::TokenEstimation {
                    message: format!("unknown encoding: {other}"),
                });
            }
        };
        Ok(Self { chars_per_token })
    }

    fn count(&self, text: &str) -> u64 {
        let chars = text.chars().count();
        (chars as f64 / self.chars_per_token).ceil() as u64
    }
}

/// Lazily populated encoding-name → encoder cache.
///
/// Concurrent reads are the common case; a racing double-insert produces a
/// duplicate encoder, which is harmless. A poisoned lock degrades to
/// recomputing the encoder.
pub struct EncoderCache {
    entries: RwLock<HashMap<String, Encoder>>,
}

impl EncoderCache {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_insert(&self, name: &str) -> Result<Encoder, LlmError> {
        if let Ok(entries) = self.entries.read() {
            if let Some(encoder) = entries.get(name) {
                return Ok(*encoder);
            }
        }
        let encoder = Encoder::for_name(name)?;
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(name.to_string(), encoder);
        }
        Ok(encoder)
    }

    /// Drops every cached encoder.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}

/// Message-sequence token estimator with an owned encoder cache.
///
/// # Examples
///
/// ```
/// use tsunagi::tokens::{EstimateOptions, TokenEstimator};
/// use tsunagi::types::Message;
///
/// let estimator = TokenEstimator::new();
/// let estimate = estimator
///     .estimate(&[Message::user("hello world")], &EstimateOptions::default())
///     .unwrap();
/// assert!(estimate > 0);
/// ```
pub struct TokenEstimator {
    cache: EncoderCache,
}

impl TokenEstimator {
    pub fn new() -> Self {
        Self {
            cache: EncoderCache::new(),
        }
    }

    /// Estimates one message, honoring the system-message and role options.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::TokenEstimation`] for an unknown encoding name.
    pub fn estimate_message(
        &self,
        message: &Message,
        options: &EstimateOptions,
    ) -> Result<u64, LlmError> {
        if message.role == Role::System && !options.count_system_message {
            return Ok(0);
        }
        let encoder = self.cache.get_or_insert(options.encoding)?;
        let mut tokens = encoder.count(&message.content);
        if options.count_roles {
            tokens += PER_MESSAGE_OVERHEAD;
            if message.role == Role::System {
                tokens += SYSTEM_MESSAGE_OVERHEAD;
            }
            if message.name.is_some() {
                tokens += NAME_FIELD_OVERHEAD;
            }
        }
        Ok(tokens)
    }

    /// Estimates a full message sequence.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::TokenEstimation`] for an unknown encoding name.
    pub fn estimate(
        &self,
        messages: &[Message],
        options: &EstimateOptions,
    ) -> Result<u64, LlmError> {
        let mut total = if options.count_roles {
            REPLY_PREFIX_OVERHEAD
        } else {
            0
        };
        for message in messages {
            total += self.estimate_message(message, options)?;
        }
        Ok(total)
    }

    /// Drops every cached encoder; the next estimate repopulates lazily.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a token count for humans.
///
/// # Examples
///
/// ```
/// use tsunagi::tokens::format_token_count;
///
/// assert_eq!(format_token_count(532), "532 tokens");
/// assert_eq!(format_token_count(1_234), "1.2K tokens");
/// assert_eq!(format_token_count(2_500_000), "2.5M tokens");
/// ```
pub fn format_token_count(count: u64) -> String {
    if count < 1_000 {
        format!("{count} tokens")
    } else if count < 1_000_000 {
        format!("{:.1}K tokens", count as f64 / 1_000.0)
    } else {
        format!("{:.1}M tokens", count as f64 / 1_000_000.0)
    }
}
