//! The provider adapter: sole implementer of the two public operations.
//!
//! One generic adapter composes the validator, transport, streaming
//! decoder, and metrics collector; everything vendor-specific comes from
//! the [`VendorProfile`] it is constructed with. Each invocation issues
//! exactly one network call and never retries.

use futures_util::StreamExt;

use crate::error::{LlmError, extract_vendor_message};
use crate::http::{
    DynHttpTransport, HttpBodyStream, post_json_stream_with_headers, post_json_with_headers,
};
use crate::metrics::{CallTimer, MetricsCollector, StreamReport, TimingInfo};
use crate::registry::ModelRegistry;
use crate::stream::DeltaDecoder;
use crate::tokens::TokenEstimator;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::validate;
use crate::vendor::VendorProfile;

/// A unified response together with the latency of the call that produced it.
#[derive(Debug, Clone)]
pub struct TimedCompletion {
    pub response: ChatCompletionResponse,
    pub timing: TimingInfo,
}

/// Vendor-parameterized implementation of `complete`/`stream_complete`.
pub struct ProviderAdapter {
    profile: VendorProfile,
    transport: DynHttpTransport,
    api_key: String,
    registry: ModelRegistry,
    estimator: TokenEstimator,
    base_url_override: Option<String>,
}

impl ProviderAdapter {
    pub fn new(profile: VendorProfile, transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        let registry = ModelRegistry::new(
            profile.name,
            profile.models,
            profile.fallback,
            profile.default_model,
        );
        Self {
            profile,
            transport,
            api_key: api_key.into(),
            registry,
            estimator: TokenEstimator::new(),
            base_url_override: None,
        }
    }

    /// Redirects requests to another host, for proxies and compatibility
    /// gateways.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn vendor(&self) -> &'static str {
        self.profile.name
    }

    /// The vendor's model registry, for capability queries.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// The adapter-owned token estimator; its encoder cache lives and dies
    /// with the adapter.
    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    fn endpoint(&self) -> String {
        match &self.base_url_override {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), self.profile.chat_path),
            None => self.profile.endpoint(),
        }
    }

    /// Validates, issues one buffered POST, and maps the vendor response
    /// into the unified shape.
    ///
    /// # Errors
    ///
    /// Pre-flight policy violations abort before any network call.
    /// Anything after dispatch surfaces as [`LlmError::ApiRequestFailed`]
    /// with the vendor's message when extractable and timing attached.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<TimedCompletion, LlmError> {
        let plan = validate::run(&self.profile, &self.registry, &self.estimator, request)?;
        let timer = CallTimer::start();
        let body = (self.profile.shape_request)(&self.profile, request, &plan, false);

        let response = post_json_with_headers(
            self.transport.as_ref(),
            self.endpoint(),
            self.profile.headers(&self.api_key),
            &body,
        )
        .await
        .map_err(|err| err.into_api_failure(timer.stop()))?;

        let status = response.status;
        let text = response
            .into_string()
            .map_err(|err| err.into_api_failure(timer.stop()))?;
        if !(200..300).contains(&status) {
            let message = extract_vendor_message(&text)
                .unwrap_or_else(|| format!("status {status}: {text}"));
            return Err(LlmError::api_failure(message, timer.stop()));
        }

        let parsed = (self.profile.extract_response)(&text)
            .map_err(|err| err.into_api_failure(timer.stop()))?;
        Ok(TimedCompletion {
            response: parsed,
            timing: timer.stop(),
        })
    }

    /// Validates, issues one chunked POST, and forwards every decoded
    /// delta to `on_delta` in arrival order.
    ///
    /// `on_timing` is invoked exactly once with the finalized report on
    /// every exit path, including pre-flight validation failures (the
    /// report then carries near-zero timing and all-zero stream metrics).
    ///
    /// # Errors
    ///
    /// As [`ProviderAdapter::complete`]; decoder and mid-stream transport
    /// failures also normalize into [`LlmError::ApiRequestFailed`].
    pub async fn stream_complete<D, T>(
        &self,
        request: &ChatCompletionRequest,
        mut on_delta: D,
        on_timing: T,
    ) -> Result<(), LlmError>
    where
        D: FnMut(&str),
        T: FnOnce(StreamReport),
    {
        let mut collector = MetricsCollector::start();

        let plan = match validate::run(&self.profile, &self.registry, &self.estimator, request) {
            Ok(plan) => plan,
            Err(err) => {
                on_timing(collector.finalize());
                return Err(err);
            }
        };
        let body = (self.profile.shape_request)(&self.profile, request, &plan, true);

        let response = match post_json_stream_with_headers(
            self.transport.as_ref(),
            self.endpoint(),
            self.profile.headers(&self.api_key),
            &body,
        )
        .await
        {
            Ok(response) => response,
            Err(err) => {
                let report = collector.finalize();
                on_timing(report);
                return Err(err.into_api_failure(report.timing));
            }
        };

        if !(200..300).contains(&response.status) {
            let status = response.status;
            let text = collect_error_body(response.body).await;
            let report = collector.finalize();
            on_timing(report);
            let message = extract_vendor_message(&text)
                .unwrap_or_else(|| format!("status {status}: {text}"));
            return Err(LlmError::api_failure(message, report.timing));
        }

        let mut decoder = DeltaDecoder::new(response.body, self.profile.extract_delta);
        while let Some(item) = decoder.next().await {
            match item {
                Ok(delta) => {
                    collector.mark_first_token();
                    collector.add_tokens(1);
                    on_delta(&delta);
                }
                Err(err) => {
                    let report = collector.finalize();
                    on_timing(report);
                    return Err(err.into_api_failure(report.timing));
                }
            }
        }

        on_timing(collector.finalize());
        Ok(())
    }

    /// [`ProviderAdapter::stream_complete`] without a timing callback.
    pub async fn stream<D>(
        &self,
        request: &ChatCompletionRequest,
        on_delta: D,
    ) -> Result<(), LlmError>
    where
        D: FnMut(&str),
    {
        self.stream_complete(request, on_delta, |_| {}).await
    }
}

/// Buffers an error-status stream body for message extraction. Decoding is
/// lossy; the body is only ever displayed.
async fn collect_error_body(mut body: HttpBodyStream) -> String {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
