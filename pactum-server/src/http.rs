// HTTP server with the API routes backing the chat widget and pages

use crate::documents::DocumentStore;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use pactum_llm::{ChatMessage, ChatProvider, ChatRequest, FlowchartGenerator};
use pactum_spk::{SpeechError, TtsEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Persona for the chat proxy.
const CHAT_SYSTEM_PROMPT: &str = "You are Dr. Chick, a friendly contract-analysis assistant. \
Answer questions about contracts, clauses, and risk in plain language. Keep replies short and \
helpful, and remind users that you give general information, not legal advice.";

/// Reply returned when the chat collaborator is missing or failing; the
/// widget shows it in the log instead of an error page.
const DEGRADED_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

#[derive(Clone)]
pub struct ApiState {
    pub documents: Arc<DocumentStore>,
    pub chat: Option<Arc<dyn ChatProvider>>,
    pub tts: Arc<dyn TtsEngine>,
    pub flowchart: Arc<FlowchartGenerator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            status: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct FlowchartQuery {
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/elevenlabs-tts", post(synthesize_speech))
        .route("/api/flowchart", get(generate_flowchart))
        .route("/api/documents/:id", get(get_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /api/elevenlabs-tts - text in, `audio/mpeg` out.
async fn synthesize_speech(
    State(state): State<ApiState>,
    Json(request): Json<TtsRequest>,
) -> Response {
    if request.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Text is required")),
        )
            .into_response();
    }

    if !state.tts.is_available() {
        error!("TTS credential is missing");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("ElevenLabs API key not configured")),
        )
            .into_response();
    }

    let preview: String = request.text.chars().take(50).collect();
    info!(
        "TTS request: {} chars, preview: {}{}",
        request.text.chars().count(),
        preview,
        if request.text.chars().count() > 50 {
            "..."
        } else {
            ""
        }
    );

    match state.tts.synthesize(&request.text).await {
        Ok(audio) => {
            info!("Audio generated: {:.2}KB", audio.len() as f64 / 1024.0);
            (
                [
                    (header::CONTENT_TYPE, "audio/mpeg"),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                audio,
            )
                .into_response()
        }
        Err(SpeechError::Status { status, detail }) => {
            // Pass the upstream status through to the caller
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                code,
                Json(ErrorResponse {
                    error: "Failed to generate speech".to_string(),
                    details: Some(detail),
                    status: Some(status),
                }),
            )
                .into_response()
        }
        Err(SpeechError::EmptyAudio) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Received empty audio from ElevenLabs")),
        )
            .into_response(),
        Err(e) => {
            error!("TTS route error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}

/// GET /api/flowchart?documentId=<id> - never fails outright, the generator
/// falls back internally.
async fn generate_flowchart(
    State(state): State<ApiState>,
    Query(query): Query<FlowchartQuery>,
) -> Response {
    let Some(document_id) = query.document_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("documentId is required")),
        )
            .into_response();
    };

    let (summary, clauses) = match state.documents.get(&document_id) {
        Some(document) => (document.summary, document.clauses),
        None => {
            warn!(
                "No stored document for {}, generating from empty clause list",
                document_id
            );
            ("No summary available".to_string(), Vec::new())
        }
    };

    let chart = state.flowchart.generate(&summary, &clauses).await;
    if let Err(e) = chart.validate() {
        error!("Flowchart generation error: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response();
    }

    Json(chart).into_response()
}

/// POST /api/chat - thin proxy to the configured chat provider. Provider
/// trouble degrades into an apologetic reply rather than a 5xx.
async fn chat(State(state): State<ApiState>, Json(request): Json<ChatApiRequest>) -> Response {
    if request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Message is required")),
        )
            .into_response();
    }

    let reply = match &state.chat {
        Some(provider) if provider.has_api_key() => {
            let chat_request = ChatRequest::new(vec![
                ChatMessage::system(CHAT_SYSTEM_PROMPT),
                ChatMessage::user(request.message.as_str()),
            ]);
            match provider.chat(chat_request).await {
                Ok(response) => response.content,
                Err(e) => {
                    warn!("Chat provider error: {}", e);
                    DEGRADED_REPLY.to_string()
                }
            }
        }
        _ => {
            warn!("No chat provider configured");
            DEGRADED_REPLY.to_string()
        }
    };

    Json(ChatApiResponse { response: reply }).into_response()
}

/// GET /api/documents/:id - the keyed store behind the result pages.
async fn get_document(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.documents.get(&id) {
        Some(document) => Json(document).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Document not found")),
        )
            .into_response(),
    }
}
