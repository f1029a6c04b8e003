//! Unified chat-completion client over multiple hosted LLM vendors.
//!
//! One request/response contract covers OpenAI, Groq, Google Gemini,
//! Anthropic (direct, Bedrock, Vertex), DeepSeek, xAI, and Together.
//! Every call runs the same pipeline of pre-flight validation against the
//! vendor's model registry, a single HTTP POST, incremental SSE decoding
//! for streams, and wall-clock metrics, parameterized by per-vendor
//! policy records instead of per-vendor implementations.

pub mod adapter;
pub mod client;
pub mod error;
pub mod http;
pub mod metrics;
pub mod registry;
pub mod stream;
pub mod tokens;
pub mod types;
pub mod validate;
pub mod vendor;

pub use adapter::{ProviderAdapter, TimedCompletion};
pub use client::LlmClient;
pub use error::LlmError;
pub use metrics::{CallTimer, MetricsCollector, StreamReport, StreamingMetrics, TimingInfo};
pub use registry::{ModelCapability, ModelRegistry, ModelSpec};
pub use stream::DeltaDecoder;
pub use tokens::{EstimateOptions, TokenEstimator, format_token_count};
pub use types::*;
