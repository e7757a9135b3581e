// Pactum - contract-analysis assistant services
// Launch and it's ready - configuration comes from the environment

use pactum_core::AppConfig;
use pactum_llm::providers::openai::OpenAIProvider;
use pactum_llm::{ChatProvider, FlowchartGenerator};
use pactum_server::documents::DocumentStore;
use pactum_server::http::{self, ApiState};
use pactum_spk::{ElevenLabsEngine, SpeechConfig, TtsEngine};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    info!("🚀 Starting Pactum server...");

    let config = AppConfig::default();
    config.validate().map_err(anyhow::Error::msg)?;

    // Speech synthesis
    let speech_config = SpeechConfig::default();
    let tts: Arc<dyn TtsEngine> = Arc::new(ElevenLabsEngine::new(&speech_config)?);
    if tts.is_available() {
        info!("🎤 Speech synthesis ready");
    } else {
        warn!("⚠️  ELEVENLABS_API_KEY not set - TTS requests will be rejected");
    }

    // Chat provider
    let chat: Option<Arc<dyn ChatProvider>> = OpenAIProvider::from_env()
        .map(|provider| Arc::new(provider) as Arc<dyn ChatProvider>);
    match &chat {
        Some(provider) => info!("🧠 Chat provider ready: {}", provider.name()),
        None => warn!("⚠️  OPENAI_API_KEY not set - chat and flowcharts use fallbacks"),
    }

    // Flowchart generation shares the chat provider
    let flowchart = Arc::new(FlowchartGenerator::new(chat.clone()));

    // Document store
    let documents = Arc::new(DocumentStore::new());
    info!("📄 Document store ready");

    let state = ApiState {
        documents,
        chat,
        tts,
        flowchart,
    };
    let app = http::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Pactum server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("🛑 Shutdown signal received");
    }
}
