// src/services/generation_service.rs
//
// The single request flow of the service: text generation, profile parsing,
// image generation with bounded retries, persistence, the optional mint
// fork, and one telemetry event. Only the image stage is recoverable; every
// other failure aborts the request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::{AiClient, ImageModelClient, retry};
use crate::models::profile::{GeneratedImage, ImageOutcome, PersonaView};
use crate::models::quiz::QuizSubmission;
use crate::prompt_builder;
use crate::services::mint::{self, MintClient, MintRequest};
use crate::services::persona_service;
use crate::storage::{self, BlobStore};
use crate::telemetry::{GenerationEvent, ImageSource, TelemetrySink};

pub struct GenerationService {
    config: Arc<Config>,
    ai_client: Arc<dyn AiClient>,
    image_client: Arc<dyn ImageModelClient>,
    blob_store: Arc<dyn BlobStore>,
    mint_client: Option<Arc<dyn MintClient>>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl GenerationService {
    pub fn new(
        config: Arc<Config>,
        ai_client: Arc<dyn AiClient>,
        image_client: Arc<dyn ImageModelClient>,
        blob_store: Arc<dyn BlobStore>,
        mint_client: Option<Arc<dyn MintClient>>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            config,
            ai_client,
            image_client,
            blob_store,
            mint_client,
            telemetry,
        }
    }

    /// Runs the full flow and emits exactly one telemetry event, success or
    /// failure. The event is recorded fire-and-forget and cannot affect the
    /// returned result.
    #[instrument(skip(self, submission), fields(trait_count = submission.len()))]
    pub async fn generate(&self, submission: &QuizSubmission) -> Result<PersonaView, AppError> {
        let started = Instant::now();
        let result = self.run(submission).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let event = match &result {
            Ok((view, mint_attempted)) => GenerationEvent::success(
                submission.len(),
                if view.image.is_fallback() {
                    ImageSource::Fallback
                } else {
                    ImageSource::Generated
                },
                *mint_attempted,
                elapsed_ms,
            ),
            Err(err) => GenerationEvent::failure(failed_stage(err), submission.len(), elapsed_ms),
        };
        crate::telemetry::spawn_record(self.telemetry.clone(), event);

        result.map(|(view, _)| view)
    }

    async fn run(&self, submission: &QuizSubmission) -> Result<(PersonaView, bool), AppError> {
        let prompt = prompt_builder::build_profile_prompt(submission);
        let reply = self.ai_client.generate_text(&prompt).await?;
        let profile = persona_service::parse_profile(&reply)?;
        info!(name = %profile.name, gait = %profile.gait, "profile parsed");

        let image_prompt = prompt_builder::build_image_prompt(&profile.name, &profile.gait);
        let image = retry::generate_with_retry(self.image_client.as_ref(), &image_prompt).await;

        let mut mint_attempted = false;
        let outcome = match image {
            Some(image) => {
                let url = self.persist(&image).await?;
                if let Some(mint_client) = &self.mint_client {
                    // mint_settings is Some whenever a mint client was
                    // built; guard anyway so a partial config cannot panic.
                    if let Some(settings) = self.config.mint_settings() {
                        mint::spawn_mint(
                            mint_client.clone(),
                            MintRequest::new(
                                &settings.wallet_address,
                                &settings.chain,
                                &profile.name,
                                &url,
                            ),
                        );
                        mint_attempted = true;
                    }
                }
                ImageOutcome::Uploaded(url)
            }
            None => ImageOutcome::Fallback(self.config.fallback_image_path.clone()),
        };

        Ok((PersonaView::new(profile, outcome), mint_attempted))
    }

    async fn persist(&self, generated: &GeneratedImage) -> Result<String, AppError> {
        // Sanity-decode only; an undecodable payload still gets uploaded
        // since the upstream declared it an image.
        if generated.content_type == "image/png" || generated.content_type == "image/jpeg" {
            if let Err(err) = image::load_from_memory(&generated.bytes) {
                warn!(error = %err, content_type = %generated.content_type, "image bytes failed to decode");
            }
        }

        let key = storage::fresh_output_key(storage::extension_for(&generated.content_type));
        self.blob_store
            .upload(&key, generated.bytes.clone(), &generated.content_type)
            .await
    }
}

fn failed_stage(err: &AppError) -> &'static str {
    match err {
        AppError::TextGenerationError(_) => "text_generation",
        AppError::ProfileParseError(_) => "profile_parse",
        AppError::ImageGenerationError(_) => "image_generation",
        AppError::StorageError(_) => "persistence",
        AppError::MintError(_) => "mint",
        _ => "internal",
    }
}
