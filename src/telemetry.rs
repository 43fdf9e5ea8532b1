// src/telemetry.rs
//
// One structured success/failure event per generation request, shipped to a
// monitoring sink on a detached task. Recording must never affect the
// response.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationEvent {
    pub outcome: EventOutcome,
    /// Stage that failed, for failure events.
    pub failed_stage: Option<&'static str>,
    pub trait_count: usize,
    pub image_source: Option<ImageSource>,
    pub mint_attempted: bool,
    pub elapsed_ms: u64,
}

impl GenerationEvent {
    pub fn success(
        trait_count: usize,
        image_source: ImageSource,
        mint_attempted: bool,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            outcome: EventOutcome::Success,
            failed_stage: None,
            trait_count,
            image_source: Some(image_source),
            mint_attempted,
            elapsed_ms,
        }
    }

    pub fn failure(failed_stage: &'static str, trait_count: usize, elapsed_ms: u64) -> Self {
        Self {
            outcome: EventOutcome::Failure,
            failed_stage: Some(failed_stage),
            trait_count,
            image_source: None,
            mint_attempted: false,
            elapsed_ms,
        }
    }
}

#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn record(&self, event: GenerationEvent);
}

/// Default sink: emits the event as a structured log line, which the
/// operational log shipper forwards to the monitoring backend.
pub struct TracingTelemetrySink;

#[async_trait]
impl TelemetrySink for TracingTelemetrySink {
    async fn record(&self, event: GenerationEvent) {
        info!(
            target: "horselab_backend::telemetry",
            outcome = ?event.outcome,
            failed_stage = event.failed_stage,
            trait_count = event.trait_count,
            image_source = ?event.image_source,
            mint_attempted = event.mint_attempted,
            elapsed_ms = event.elapsed_ms,
            "generation event"
        );
    }
}

/// Fire-and-forget record. The task is detached; a panicking or slow sink
/// cannot delay or fail the request that produced the event.
pub fn spawn_record(sink: Arc<dyn TelemetrySink>, event: GenerationEvent) {
    tokio::spawn(async move {
        sink.record(event).await;
    });
}
