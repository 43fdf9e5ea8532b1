// src/views.rs
//
// HTML rendering for the quiz form and the results fragment. Templates are
// embedded so the binary stays self-contained.

use std::sync::LazyLock;

use serde::Serialize;
use tera::{Context, Tera};

use crate::errors::AppError;
use crate::models::profile::PersonaView;
use crate::models::quiz::HorseTrait;

const QUIZ_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="utf-8">
  <title>ウマ性格診断</title>
</head>
<body>
  <h1>ウマ性格診断</h1>
  <p>あなたの性格に合う競走馬ペルソナを生成します。当てはまる性格を選んでください。</p>
  <form method="post" action="/generate">
    <fieldset>
      <legend>性格</legend>
      {% for trait in traits %}
      <label>
        <input type="checkbox" name="traits" value="{{ trait.value }}"> {{ trait.label }}
      </label>
      {% endfor %}
    </fieldset>
    <button type="submit">診断する</button>
  </form>
</body>
</html>
"#;

const RESULT_TEMPLATE: &str = r#"<section class="result">
  <h2>{{ name }}</h2>
  <p class="gait">脚質: {{ gait }}</p>
  <ul class="stats">
    {% for row in stats %}
    <li><span class="label">{{ row.label }}</span> <span class="stars">{{ row.stars }}</span></li>
    {% endfor %}
  </ul>
  <img src="{{ image_url | safe }}" alt="{{ name }}">
  {% if image_failed %}
  <p class="image-failed">image generation failed</p>
  {% endif %}
</section>
"#;

static TEMPLATES: LazyLock<Tera> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("quiz.html", QUIZ_TEMPLATE),
        ("result.html", RESULT_TEMPLATE),
    ])
    .expect("embedded templates must compile");
    tera
});

#[derive(Serialize)]
struct TraitOption {
    value: &'static str,
    label: &'static str,
}

/// Renders the quiz form.
pub fn render_quiz_form() -> Result<String, AppError> {
    let traits: Vec<TraitOption> = HorseTrait::ALL
        .iter()
        .map(|t| TraitOption {
            value: t.as_str(),
            label: t.label(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("traits", &traits);
    Ok(TEMPLATES.render("quiz.html", &context)?)
}

/// Renders the results fragment for a generated persona.
pub fn render_result(view: &PersonaView) -> Result<String, AppError> {
    let mut context = Context::new();
    context.insert("name", &view.name);
    context.insert("gait", &view.gait);
    context.insert("stats", &view.stats);
    context.insert("image_url", view.image.url());
    context.insert("image_failed", &view.image.is_fallback());
    Ok(TEMPLATES.render("result.html", &context)?)
}
