// src/routes/generate.rs

use axum::extract::{Form, State};
use axum::response::Html;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::quiz::QuizSubmission;
use crate::state::AppState;
use crate::views;

/// `POST /generate` — runs the full generation flow for one submission and
/// returns the rendered results fragment.
///
/// The form arrives as repeated `traits=<value>` pairs, so the body is
/// deserialized as raw pairs rather than a struct.
#[instrument(skip(state, pairs), err)]
pub async fn generate_handler(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let submission = QuizSubmission::from_form_pairs(&pairs)?;
    let view = state.generation.generate(&submission).await?;
    Ok(Html(views::render_result(&view)?))
}
