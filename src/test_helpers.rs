// src/test_helpers.rs
// Mock service handles and the spawn_app helper shared by unit tests and
// the integration tests under tests/.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::{AiClient, ImageModelClient, ImageReply, ReplyPart};
use crate::routes::build_router;
use crate::services::generation_service::GenerationService;
use crate::services::mint::{MintClient, MintReceipt, MintRequest};
use crate::state::AppState;
use crate::storage::BlobStore;
use crate::telemetry::{GenerationEvent, TelemetrySink};

/// 1x1 transparent PNG, base64-encoded. Small but decodes as a real image.
pub const TINY_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn tiny_png() -> Vec<u8> {
    STANDARD.decode(TINY_PNG_B64).expect("embedded PNG is valid base64")
}

/// An image reply carrying the tiny PNG as an inline-data part.
pub fn tiny_png_reply() -> ImageReply {
    ImageReply {
        parts: vec![
            ReplyPart::Text("here is your portrait".to_string()),
            ReplyPart::InlineData {
                mime_type: "image/png".to_string(),
                data: TINY_PNG_B64.to_string(),
            },
        ],
    }
}

/// A text reply in the shape the real model produces: prose around a JSON
/// object.
pub fn profile_reply() -> String {
    r#"Here is your persona! {"name":"テスト","type":"先行","stats":{"スピード":80}} Enjoy!"#
        .to_string()
}

static TRACING_INIT: Once = Once::new();

pub fn ensure_tracing_initialized() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
            .with(fmt::layer())
            .try_init();
    });
}

// --- Mock text-generation client ---

pub struct MockAiClient {
    response: Mutex<Result<String, AppError>>,
    prompts: Mutex<Vec<String>>,
}

impl MockAiClient {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(Ok(profile_reply())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_response(&self, response: Result<String, AppError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockAiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiClient for MockAiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.lock().unwrap().clone()
    }
}

// --- Mock image-model client ---
//
// Scripted responses are consumed first (front of the queue); once the
// script is empty the default response repeats forever. Every call is
// counted so tests can assert the exact attempt budget.

pub struct MockImageModelClient {
    script: Mutex<VecDeque<Result<ImageReply, AppError>>>,
    default_response: Mutex<Result<ImageReply, AppError>>,
    calls: AtomicUsize,
}

impl MockImageModelClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(Ok(tiny_png_reply())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_response(&self, response: Result<ImageReply, AppError>) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn fail_always(&self) {
        *self.default_response.lock().unwrap() =
            Err(AppError::ImageGenerationError("simulated outage".to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockImageModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageModelClient for MockImageModelClient {
    async fn generate_image(&self, _prompt: &str) -> Result<ImageReply, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(scripted) = self.script.lock().unwrap().pop_front() {
            return scripted;
        }
        self.default_response.lock().unwrap().clone()
    }
}

// --- Mock blob store ---

pub struct MockBlobStore {
    bucket: String,
    uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
    fail_next: Mutex<Option<AppError>>,
}

impl MockBlobStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            uploads: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    pub fn fail_next(&self, err: AppError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn uploads(&self) -> Vec<(String, Vec<u8>, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), bytes, content_type.to_string()));
        Ok(format!(
            "https://storage.googleapis.com/{}/{key}",
            self.bucket
        ))
    }
}

// --- Mock mint client ---

pub struct MockMintClient {
    requests: Mutex<Vec<MintRequest>>,
    fail: Mutex<bool>,
}

impl MockMintClient {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    pub fn fail_always(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn requests(&self) -> Vec<MintRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockMintClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MintClient for MockMintClient {
    async fn mint(&self, request: MintRequest) -> Result<MintReceipt, AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::MintError("simulated mint failure".to_string()));
        }
        self.requests.lock().unwrap().push(request);
        Ok(MintReceipt {
            status: 200,
            body: r#"{"id":"mock-mint"}"#.to_string(),
        })
    }
}

// --- Recording telemetry sink ---

pub struct RecordingTelemetrySink {
    events: Mutex<Vec<GenerationEvent>>,
}

impl RecordingTelemetrySink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<GenerationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Default for RecordingTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySink for RecordingTelemetrySink {
    async fn record(&self, event: GenerationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// --- TestApp / spawn_app ---

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub ai: Arc<MockAiClient>,
    pub image: Arc<MockImageModelClient>,
    pub store: Arc<MockBlobStore>,
    pub minter: Arc<MockMintClient>,
    pub telemetry: Arc<RecordingTelemetrySink>,
}

/// Spins up the full router on an ephemeral port with mock service handles
/// and returns the handles for scripting and inspection.
pub async fn spawn_app(mint_enabled: bool) -> TestApp {
    ensure_tracing_initialized();

    let config = Arc::new(Config {
        gemini_api_key: Some("test-key".to_string()),
        storage_bucket: Some("test-bucket".to_string()),
        mint_api_key: mint_enabled.then(|| "test-mint-key".to_string()),
        mint_wallet_address: mint_enabled.then(|| "0xtest-wallet".to_string()),
        mint_chain: mint_enabled.then(|| "polygon-amoy".to_string()),
        ..Default::default()
    });

    let ai = Arc::new(MockAiClient::new());
    let image = Arc::new(MockImageModelClient::new());
    let store = Arc::new(MockBlobStore::new("test-bucket"));
    let minter = Arc::new(MockMintClient::new());
    let telemetry = Arc::new(RecordingTelemetrySink::new());

    let generation = Arc::new(GenerationService::new(
        config.clone(),
        ai.clone(),
        image.clone(),
        store.clone(),
        mint_enabled.then(|| minter.clone() as Arc<dyn MintClient>),
        telemetry.clone(),
    ));

    let app = build_router(AppState::new(config, generation));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server crashed");
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        ai,
        image,
        store,
        minter,
        telemetry,
    }
}
