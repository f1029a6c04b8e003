//! Minimal call surface over one provider adapter.

use crate::adapter::{ProviderAdapter, TimedCompletion};
use crate::error::LlmError;
use crate::http::DynHttpTransport;
use crate::metrics::{StreamReport, TimingInfo};
use crate::types::{ChatCompletionRequest, Message};
use crate::vendor;

/// Entry point binding a vendor adapter to its default model.
///
/// # Examples
///
/// ```no_run
/// use tsunagi::LlmClient;
/// use tsunagi::http::reqwest::default_dyn_transport;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let client = LlmClient::openai(default_dyn_transport().unwrap(), "sk-test");
/// let (content, timing) = client.complete_text("What is the capital of France?").await.unwrap();
/// println!("{content} ({:.0}ms)", timing.duration_ms());
/// # });
/// ```
pub struct LlmClient {
    adapter: ProviderAdapter,
    default_model: String,
}

impl LlmClient {
    /// Wraps an already-built adapter, using its vendor's default model.
    pub fn new(adapter: ProviderAdapter) -> Self {
        let default_model = adapter.registry().default_model().to_string();
        Self {
            adapter,
            default_model,
        }
    }

    pub fn openai(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::new(ProviderAdapter::new(vendor::openai::profile(), transport, api_key))
    }

    pub fn groq(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::new(ProviderAdapter::new(vendor::groq::profile(), transport, api_key))
    }

    pub fn gemini(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::new(ProviderAdapter::new(vendor::gemini::profile(), transport, api_key))
    }

    /// Anthropic through the direct API.
    pub fn anthropic(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::anthropic_on(vendor::anthropic::Hosting::Direct, transport, api_key)
    }

    /// Anthropic through a specific hosting environment.
    pub fn anthropic_on(
        hosting: vendor::anthropic::Hosting,
        transport: DynHttpTransport,
        api_key: impl Into<String>,
    ) -> Self {
        Self::new(ProviderAdapter::new(
            vendor::anthropic::profile(hosting),
            transport,
            api_key,
        ))
    }

    pub fn deepseek(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::new(ProviderAdapter::new(vendor::deepseek::profile(), transport, api_key))
    }

    pub fn xai(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::new(ProviderAdapter::new(vendor::xai::profile(), transport, api_key))
    }

    pub fn together(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self::new(ProviderAdapter::new(vendor::together::profile(), transport, api_key))
    }

    /// Overrides the model used by [`LlmClient::complete_text`].
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// The wrapped adapter, for registry and estimator queries.
    pub fn adapter(&self) -> &ProviderAdapter {
        &self.adapter
    }

    /// Buffered chat completion. See [`ProviderAdapter::complete`].
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<TimedCompletion, LlmError> {
        self.adapter.complete(request).await
    }

    /// Streaming chat completion. See [`ProviderAdapter::stream_complete`].
    pub async fn stream_complete<D, T>(
        &self,
        request: &ChatCompletionRequest,
        on_delta: D,
        on_timing: T,
    ) -> Result<(), LlmError>
    where
        D: FnMut(&str),
        T: FnOnce(StreamReport),
    {
        self.adapter.stream_complete(request, on_delta, on_timing).await
    }

    /// Streaming chat completion without a timing callback.
    pub async fn stream<D>(
        &self,
        request: &ChatCompletionRequest,
        on_delta: D,
    ) -> Result<(), LlmError>
    where
        D: FnMut(&str),
    {
        self.adapter.stream(request, on_delta).await
    }

    /// One-shot prompt against the default model.
    pub async fn complete_text(&self, prompt: &str) -> Result<(String, TimingInfo), LlmError> {
        let request =
            ChatCompletionRequest::new(self.default_model.clone(), vec![Message::user(prompt)]);
        let outcome = self.complete(&request).await?;
        Ok((outcome.response.message.content, outcome.timing))
    }
}
