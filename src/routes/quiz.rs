// src/routes/quiz.rs

use axum::response::Html;
use tracing::instrument;

use crate::errors::AppError;
use crate::views;

/// `GET /` — serves the quiz form.
#[instrument(err)]
pub async fn quiz_form_handler() -> Result<Html<String>, AppError> {
    Ok(Html(views::render_quiz_form()?))
}
