// API route tests: validation errors, pass-through statuses, fallbacks

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use pactum_core::types::{Clause, StoredDocument};
use pactum_llm::{ChatProvider, ChatRequest, ChatResponse, FlowchartGenerator};
use pactum_server::documents::DocumentStore;
use pactum_server::http::{self, ApiState};
use pactum_spk::{SpeechError, TtsEngine};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tower::ServiceExt;

enum TtsScript {
    Audio(&'static [u8]),
    Status(u16, &'static str),
    Empty,
}

struct MockTts {
    available: bool,
    script: Mutex<VecDeque<TtsScript>>,
}

impl MockTts {
    fn available() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            script: Mutex::new(VecDeque::new()),
        })
    }

    fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            script: Mutex::new(VecDeque::new()),
        })
    }

    fn scripted(script: Vec<TtsScript>) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            script: Mutex::new(script.into()),
        })
    }
}

#[async_trait]
impl TtsEngine for MockTts {
    async fn synthesize(&self, _text: &str) -> pactum_spk::Result<Bytes> {
        match self.script.lock().pop_front() {
            Some(TtsScript::Status(status, detail)) => Err(SpeechError::Status {
                status,
                detail: detail.to_string(),
            }),
            Some(TtsScript::Empty) => Err(SpeechError::EmptyAudio),
            Some(TtsScript::Audio(bytes)) => Ok(Bytes::from_static(bytes)),
            None => Ok(Bytes::from_static(b"mpeg-audio-bytes")),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct CannedProvider {
    content: String,
}

impl CannedProvider {
    fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            content: content.to_string(),
        })
    }
}

#[async_trait]
impl ChatProvider for CannedProvider {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn has_api_key(&self) -> bool {
        true
    }

    async fn chat(&self, _request: ChatRequest) -> pactum_llm::Result<ChatResponse> {
        Ok(ChatResponse {
            content: self.content.clone(),
            model: "canned".to_string(),
            usage: None,
            finish_reason: None,
        })
    }
}

fn make_router(tts: Arc<dyn TtsEngine>, chat: Option<Arc<dyn ChatProvider>>) -> (Router, Arc<DocumentStore>) {
    let documents = Arc::new(DocumentStore::new());
    let state = ApiState {
        documents: documents.clone(),
        chat: chat.clone(),
        tts,
        flowchart: Arc::new(FlowchartGenerator::new(chat)),
    };
    (http::router(state), documents)
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_tts_requires_text() {
    let (router, _) = make_router(MockTts::available(), None);
    let (status, body) = post_json(router, "/api/elevenlabs-tts", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text is required");

    let (router, _) = make_router(MockTts::available(), None);
    let (status, body) = post_json(router, "/api/elevenlabs-tts", json!({"text": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text is required");
}

#[tokio::test]
async fn test_tts_without_credential_is_500() {
    let (router, _) = make_router(MockTts::unavailable(), None);
    let (status, body) = post_json(router, "/api/elevenlabs-tts", json!({"text": "hello"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "ElevenLabs API key not configured");
}

#[tokio::test]
async fn test_tts_returns_audio() {
    let (router, _) = make_router(MockTts::available(), None);
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/elevenlabs-tts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"text": "hello there"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "audio/mpeg"
    );
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"mpeg-audio-bytes");
}

#[tokio::test]
async fn test_tts_passes_upstream_status_through() {
    let tts = MockTts::scripted(vec![TtsScript::Status(429, "quota exceeded")]);
    let (router, _) = make_router(tts, None);
    let (status, body) = post_json(router, "/api/elevenlabs-tts", json!({"text": "hi"})).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Failed to generate speech");
    assert_eq!(body["details"], "quota exceeded");
    assert_eq!(body["status"], 429);
}

#[tokio::test]
async fn test_tts_empty_audio_is_500() {
    let tts = MockTts::scripted(vec![TtsScript::Empty]);
    let (router, _) = make_router(tts, None);
    let (status, body) = post_json(router, "/api/elevenlabs-tts", json!({"text": "hi"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Received empty audio from ElevenLabs");
}

#[tokio::test]
async fn test_flowchart_requires_document_id() {
    let (router, _) = make_router(MockTts::available(), None);
    let (status, body) = get_json(router, "/api/flowchart").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "documentId is required");
}

#[tokio::test]
async fn test_flowchart_falls_back_without_provider() {
    let (router, _) = make_router(MockTts::available(), None);
    let (status, body) = get_json(router, "/api/flowchart?documentId=doc-42").await;

    assert_eq!(status, StatusCode::OK);
    let nodes = body["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 7);
    assert_eq!(nodes[0]["label"], "Upload Contract");
    assert_eq!(nodes[0]["type"], "start");
    assert_eq!(nodes[6]["type"], "end");
    assert_eq!(nodes[3]["position"]["y"], 360.0);

    let edges = body["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 6);
    for edge in edges {
        assert_eq!(edge["label"], "Next");
    }
    assert!(body["description"]
        .as_str()
        .unwrap()
        .starts_with("Fallback flowchart"));
}

#[tokio::test]
async fn test_flowchart_uses_stored_clauses_with_ai_provider() {
    let reply = r#"{
  "nodes": [
    {"id": "node-0", "label": "Review Terms", "type": "start"},
    {"id": "node-1", "label": "Accept", "type": "end"}
  ],
  "edges": [{"source": "node-0", "target": "node-1", "label": "approved"}],
  "riskAssessment": "low"
}"#;
    let chat: Arc<dyn ChatProvider> = CannedProvider::replying(reply);
    let (router, documents) = make_router(MockTts::available(), Some(chat));
    documents.insert(
        "doc-9",
        StoredDocument::new("An NDA", vec![Clause::new("Confidentiality", "5 years")]),
    );

    let (status, body) = get_json(router, "/api/flowchart?documentId=doc-9").await;
    assert_eq!(status, StatusCode::OK);
    let nodes = body["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1]["label"], "Accept");
    assert_eq!(nodes[1]["position"]["y"], 120.0);
    assert!(body["description"]
        .as_str()
        .unwrap()
        .contains("Risk Level: low"));
}

#[tokio::test]
async fn test_document_route() {
    let (router, documents) = make_router(MockTts::available(), None);
    documents.insert("doc-1", StoredDocument::new("Lease agreement", vec![]));

    let (status, body) = get_json(router.clone(), "/api/documents/doc-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Lease agreement");

    let (status, body) = get_json(router, "/api/documents/doc-2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Document not found");
}

#[tokio::test]
async fn test_chat_requires_message() {
    let (router, _) = make_router(MockTts::available(), None);
    let (status, body) = post_json(router, "/api/chat", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn test_chat_without_provider_degrades() {
    let (router, _) = make_router(MockTts::available(), None);
    let (status, body) = post_json(router, "/api/chat", json!({"message": "hello"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("I apologize"));
}

#[tokio::test]
async fn test_chat_proxies_provider_reply() {
    let chat: Arc<dyn ChatProvider> = CannedProvider::replying("The termination clause allows 30 days notice.");
    let (router, _) = make_router(MockTts::available(), Some(chat));
    let (status, body) = post_json(
        router,
        "/api/chat",
        json!({"message": "what does the termination clause say?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "The termination clause allows 30 days notice."
    );
}
