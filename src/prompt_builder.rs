// src/prompt_builder.rs

use crate::models::quiz::QuizSubmission;

/// Gait-types the profile prompt offers the model. The reply is not
/// validated against this list; an unexpected value still renders.
pub const GAIT_TYPES: [&str; 4] = ["逃げ", "先行", "差し", "追込"];

/// Assembles the profile-generation prompt from the selected traits.
pub fn build_profile_prompt(submission: &QuizSubmission) -> String {
    let traits = submission
        .traits()
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::new();
    prompt.push_str(
        "You are naming a fictional racehorse persona for a personality quiz.\n",
    );
    prompt.push_str(&format!(
        "The player chose these personality traits: {traits}.\n\n"
    ));
    prompt.push_str("Invent a matching racehorse persona and answer with a single JSON object:\n");
    prompt.push_str("{\"name\": string, \"gait\": string, \"stats\": object}\n");
    prompt.push_str(&format!(
        "\"gait\" must be one of: {}.\n",
        GAIT_TYPES.join(", ")
    ));
    prompt.push_str(
        "\"stats\" maps stat names (スピード, スタミナ, パワー, 根性, 賢さ) to integers from 0 to 100.\n",
    );
    prompt.push_str("Respond with the JSON object only, no other text.");
    prompt
}

/// Assembles the portrait prompt from the resolved persona.
pub fn build_image_prompt(name: &str, gait: &str) -> String {
    format!(
        "A vibrant anime-style portrait of a racehorse character named \"{name}\", \
         running style: {gait}. Dynamic racing pose, racetrack background, \
         bright colors, clean lines, no text in the image."
    )
}
