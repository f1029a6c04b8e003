//! End-to-end adapter behavior against in-memory transports.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream;
use serde_json::{Value, json};

use tsunagi::error::LlmError;
use tsunagi::http::{HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport};
use tsunagi::metrics::StreamReport;
use tsunagi::types::{ChatCompletionRequest, Message, Role, StopSequences};
use tsunagi::vendor::{anthropic, openai};
use tsunagi::{LlmClient, ProviderAdapter};

/// Transport that replays canned responses and records every request.
struct MockTransport {
    status: u16,
    body: Vec<u8>,
    chunks: Vec<Vec<u8>>,
    captured: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    fn buffered(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.as_bytes().to_vec(),
            chunks: Vec::new(),
            captured: Mutex::new(Vec::new()),
        })
    }

    fn streaming(status: u16, chunks: &[&[u8]]) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: Vec::new(),
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
            captured: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.captured.lock().expect("captured requests").clone()
    }

    fn only_request_body(&self) -> Value {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one network call");
        serde_json::from_slice(&requests[0].body).expect("request body should be JSON")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LlmError> {
        self.captured.lock().expect("captured requests").push(request);
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LlmError> {
        self.captured.lock().expect("captured requests").push(request);
        let chunks: Vec<Result<Vec<u8>, LlmError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        Ok(HttpStreamResponse {
            status: self.status,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

/// Transport that fails before producing any byte.
struct UnreachableHost;

#[async_trait]
impl HttpTransport for UnreachableHost {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LlmError> {
        Err(LlmError::transport("connection refused"))
    }

    async fn send_stream(&self, _request: HttpRequest) -> Result<HttpStreamResponse, LlmError> {
        Err(LlmError::transport("connection refused"))
    }
}

const OPENAI_COMPLETION: &str = r#"{
    "id": "chatcmpl-42",
    "object": "chat.completion",
    "created": 1735000000,
    "model": "gpt-4o-mini",
    "choices": [{
        "index": 0,
        "message": {"role": "assistant", "content": "The capital of France is Paris."},
        "finish_reason": "stop"
    }],
    "usage": {"prompt_tokens": 14, "completion_tokens": 8, "total_tokens": 22}
}"#;

fn question() -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        "gpt-4o-mini",
        vec![Message::user("What is the capital of France?")],
    )
}

#[tokio::test]
async fn complete_maps_the_vendor_response_and_attaches_timing() {
    let transport = MockTransport::buffered(200, OPENAI_COMPLETION);
    let adapter = ProviderAdapter::new(openai::profile(), transport.clone(), "sk-test");

    let outcome = adapter.complete(&question()).await.expect("completion");
    assert_eq!(outcome.response.id, "chatcmpl-42");
    assert_eq!(outcome.response.model, "gpt-4o-mini");
    assert_eq!(outcome.response.message.role, Role::Assistant);
    assert_eq!(
        outcome.response.message.content,
        "The capital of France is Paris."
    );
    assert_eq!(
        outcome.response.usage.total_tokens,
        outcome.response.usage.prompt_tokens + outcome.response.usage.completion_tokens
    );
    assert!(outcome.timing.duration_ms() >= 0.0);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://api.openai.com/v1/chat/completions");
    assert_eq!(
        requests[0].headers.get("Authorization"),
        Some(&"Bearer sk-test".to_string())
    );
    let body = transport.only_request_body();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["stream"], false);
}

#[tokio::test]
async fn complete_surfaces_the_vendor_error_message_with_timing() {
    let transport = MockTransport::buffered(
        429,
        r#"{"error": {"message": "Rate limit reached", "type": "tokens"}}"#,
    );
    let adapter = ProviderAdapter::new(openai::profile(), transport, "sk-test");

    let err = adapter.complete(&question()).await.expect_err("should fail");
    match &err {
        LlmError::ApiRequestFailed { message, timing } => {
            assert_eq!(message, "Rate limit reached");
            assert!(timing.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.timing().is_some());
}

#[tokio::test]
async fn complete_normalizes_network_failures() {
    let adapter = ProviderAdapter::new(openai::profile(), Arc::new(UnreachableHost), "sk-test");
    let err = adapter.complete(&question()).await.expect_err("should fail");
    match err {
        LlmError::ApiRequestFailed { message, timing } => {
            assert!(message.contains("connection refused"));
            assert!(timing.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn complete_rejects_invalid_requests_before_any_network_call() {
    let transport = MockTransport::buffered(200, OPENAI_COMPLETION);
    let adapter = ProviderAdapter::new(openai::profile(), transport.clone(), "sk-test");

    let request = ChatCompletionRequest::new("gpt-unknown", vec![Message::user("hi")]);
    let err = adapter.complete(&request).await.expect_err("should fail");
    assert!(matches!(err, LlmError::UnknownModel { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn streamed_deltas_concatenate_to_the_buffered_content() {
    // the same answer the buffered fixture returns, cut into SSE frames
    let transport = MockTransport::streaming(
        200,
        &[
            br#"data: {"choices":[{"delta":{"role":"assistant","content":""},"index":0}]}"#
                as &[u8],
            b"\n",
            br#"data: {"choices":[{"delta":{"content":"The capital of France"},"index":0}]}"#,
            b"\n",
            br#"data: {"choices":[{"delta":{"content":" is Paris."},"index":0}]}"#,
            b"\ndata: [DONE]\n",
        ],
    );
    let adapter = ProviderAdapter::new(openai::profile(), transport.clone(), "sk-test");

    let mut deltas: Vec<String> = Vec::new();
    let mut report: Option<StreamReport> = None;
    adapter
        .stream_complete(
            &question(),
            |delta| deltas.push(delta.to_string()),
            |r| report = Some(r),
        )
        .await
        .expect("stream");

    assert_eq!(
        deltas,
        vec!["The capital of France".to_string(), " is Paris.".to_string()]
    );
    assert_eq!(deltas.concat(), "The capital of France is Paris.");

    let report = report.expect("timing callback fired");
    assert_eq!(report.streaming.total_tokens, 2);
    assert!(report.streaming.time_to_first_token <= report.streaming.total_response_time);

    let body = transport.only_request_body();
    assert_eq!(body["stream"], true);
}

#[tokio::test]
async fn streaming_non_2xx_fires_timing_and_fails() {
    let transport = MockTransport::streaming(
        400,
        &[br#"{"error": {"message": "bad request body"}}"# as &[u8]],
    );
    let adapter = ProviderAdapter::new(openai::profile(), transport, "sk-test");

    let mut calls = 0;
    let mut report: Option<StreamReport> = None;
    let err = adapter
        .stream_complete(
            &question(),
            |_delta| calls += 1,
            |r| report = Some(r),
        )
        .await
        .expect_err("should fail");

    assert_eq!(calls, 0);
    let report = report.expect("timing callback fired");
    assert_eq!(report.streaming.total_tokens, 0);
    match err {
        LlmError::ApiRequestFailed { message, .. } => assert_eq!(message, "bad request body"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn streaming_preflight_failure_still_reports_zero_metrics() {
    let transport = MockTransport::streaming(200, &[]);
    let adapter = ProviderAdapter::new(openai::profile(), transport.clone(), "sk-test");

    let request = ChatCompletionRequest::new("gpt-unknown", vec![Message::user("hi")]);
    let mut report: Option<StreamReport> = None;
    let err = adapter
        .stream_complete(&request, |_delta| {}, |r| report = Some(r))
        .await
        .expect_err("should fail");

    assert!(matches!(err, LlmError::UnknownModel { .. }));
    let report = report.expect("timing callback fired");
    assert_eq!(report.streaming.total_tokens, 0);
    assert_eq!(report.streaming.tokens_per_second, 0.0);
    assert_eq!(
        report.streaming.time_to_first_token,
        report.streaming.total_response_time
    );
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn zero_delta_stream_reports_first_token_equal_to_total() {
    let transport = MockTransport::streaming(200, &[b"data: [DONE]\n" as &[u8]]);
    let adapter = ProviderAdapter::new(openai::profile(), transport, "sk-test");

    let mut report: Option<StreamReport> = None;
    adapter
        .stream_complete(&question(), |_delta| {}, |r| report = Some(r))
        .await
        .expect("stream");

    let report = report.expect("timing callback fired");
    assert_eq!(report.streaming.total_tokens, 0);
    assert_eq!(report.streaming.tokens_per_second, 0.0);
    assert_eq!(
        report.streaming.time_to_first_token,
        report.streaming.total_response_time
    );
}

#[tokio::test]
async fn anthropic_stream_decodes_content_block_deltas() {
    let transport = MockTransport::streaming(
        200,
        &[
            b"event: message_start\n" as &[u8],
            br#"data: {"type":"message_start","message":{"id":"msg_01"}}"#,
            b"\nevent: content_block_delta\n",
            br#"data: {"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Par"}}"#,
            b"\n",
            br#"data: {"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"is"}}"#,
            b"\n",
            br#"data: {"type":"message_stop"}"#,
            b"\n",
        ],
    );
    let adapter = ProviderAdapter::new(
        anthropic::profile(anthropic::Hosting::Direct),
        transport.clone(),
        "sk-ant",
    );

    let request = ChatCompletionRequest::new(
        "claude-3-5-sonnet-20241022",
        vec![Message::user("What is the capital of France?")],
    )
    .with_system("Answer with the city name only.")
    .with_stop(StopSequences::Many(vec!["\n".to_string()]));

    let mut deltas: Vec<String> = Vec::new();
    adapter
        .stream(&request, |delta| deltas.push(delta.to_string()))
        .await
        .expect("stream");
    assert_eq!(deltas.concat(), "Paris");

    let requests = transport.requests();
    assert_eq!(requests[0].url, "https://api.anthropic.com/v1/messages");
    assert_eq!(requests[0].headers.get("x-api-key"), Some(&"sk-ant".to_string()));
    let body = transport.only_request_body();
    assert_eq!(body["system"], "Answer with the city name only.");
    assert_eq!(body["stop_sequences"], json!(["\n"]));
    assert_eq!(body["messages"][0]["content"][0]["type"], "text");
}

#[tokio::test]
async fn client_facade_fills_in_the_default_model() {
    let transport = MockTransport::buffered(200, OPENAI_COMPLETION);
    let client = LlmClient::openai(transport.clone(), "sk-test");
    assert_eq!(client.default_model(), "gpt-4o-mini");

    let (content, timing) = client
        .complete_text("What is the capital of France?")
        .await
        .expect("completion");
    assert_eq!(content, "The capital of France is Paris.");
    assert!(timing.duration_ms() >= 0.0);

    let body = transport.only_request_body();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["role"], "user");
}

#[tokio::test]
async fn base_url_override_redirects_the_endpoint() {
    let transport = MockTransport::buffered(200, OPENAI_COMPLETION);
    let adapter = ProviderAdapter::new(openai::profile(), transport.clone(), "sk-test")
        .with_base_url("http://localhost:8080/v1/");

    adapter.complete(&question()).await.expect("completion");
    assert_eq!(
        transport.requests()[0].url,
        "http://localhost:8080/v1/chat/completions"
    );
}
