// src/models/profile.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel used when the model reply omits the persona name.
pub const UNKNOWN_NAME: &str = "Unknown Horse";
/// Sentinel used when the model reply omits the gait-type.
pub const UNKNOWN_GAIT: &str = "不明";

/// Racing persona parsed out of the text-generation reply. Discarded after
/// rendering; nothing outlives the request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeneratedProfile {
    #[serde(default = "default_name")]
    pub name: String,
    // Historical replies used "type" for the gait-type field.
    #[serde(default = "default_gait", alias = "type")]
    pub gait: String,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
}

fn default_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn default_gait() -> String {
    UNKNOWN_GAIT.to_string()
}

/// 1..=5 display level derived from a 0..=100 stat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating(u8);

impl StarRating {
    /// Divide by 20, round to nearest, clamp into [1, 5]. A purely visual
    /// transform; out-of-range scores are clamped rather than rejected.
    pub fn from_score(score: i64) -> Self {
        let level = ((score as f64) / 20.0).round() as i64;
        Self(level.clamp(1, 5) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for StarRating {
    /// Always exactly five characters: filled then hollow stars.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.0 {
            f.write_str("★")?;
        }
        for _ in self.0..5 {
            f.write_str("☆")?;
        }
        Ok(())
    }
}

/// Image bytes obtained from the image API, already decoded from the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Where the rendered image reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Uploaded to the blob store; holds the public URL.
    Uploaded(String),
    /// Generation failed after all attempts; holds the static asset path.
    Fallback(String),
}

impl ImageOutcome {
    pub fn url(&self) -> &str {
        match self {
            ImageOutcome::Uploaded(url) | ImageOutcome::Fallback(url) => url,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ImageOutcome::Fallback(_))
    }
}

/// One stat line of the results view.
#[derive(Debug, Clone, Serialize)]
pub struct StatRow {
    pub label: String,
    pub score: i64,
    pub stars: String,
}

/// Render model for the results page.
#[derive(Debug, Clone)]
pub struct PersonaView {
    pub name: String,
    pub gait: String,
    pub stats: Vec<StatRow>,
    pub image: ImageOutcome,
}

impl PersonaView {
    pub fn new(profile: GeneratedProfile, image: ImageOutcome) -> Self {
        let stats = profile
            .stats
            .iter()
            .map(|(label, score)| StatRow {
                label: label.clone(),
                score: *score,
                stars: StarRating::from_score(*score).to_string(),
            })
            .collect();
        Self {
            name: profile.name,
            gait: profile.gait,
            stats,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_score_clamps_to_one_star() {
        assert_eq!(StarRating::from_score(0).level(), 1);
        assert_eq!(StarRating::from_score(0).to_string(), "★☆☆☆☆");
    }

    #[test]
    fn full_score_is_five_stars() {
        assert_eq!(StarRating::from_score(100).level(), 5);
        assert_eq!(StarRating::from_score(100).to_string(), "★★★★★");
    }

    #[test]
    fn midpoint_rounds_up_within_range() {
        // 50 / 20 = 2.5, rounds away from zero to 3
        assert_eq!(StarRating::from_score(50).level(), 3);
    }

    #[test]
    fn eighty_is_four_stars() {
        assert_eq!(StarRating::from_score(80).to_string(), "★★★★☆");
    }

    #[test]
    fn out_of_range_scores_clamp() {
        assert_eq!(StarRating::from_score(-40).level(), 1);
        assert_eq!(StarRating::from_score(900).level(), 5);
    }

    #[test]
    fn display_is_always_five_chars() {
        for score in [0, 10, 50, 77, 100] {
            let stars = StarRating::from_score(score).to_string();
            assert_eq!(stars.chars().count(), 5, "score {score} -> {stars}");
        }
    }

    #[test]
    fn profile_defaults_missing_keys_to_sentinels() {
        let profile: GeneratedProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.name, UNKNOWN_NAME);
        assert_eq!(profile.gait, UNKNOWN_GAIT);
        assert!(profile.stats.is_empty());
    }

    #[test]
    fn profile_accepts_type_alias_for_gait() {
        let profile: GeneratedProfile =
            serde_json::from_str(r#"{"name":"テスト","type":"先行","stats":{"スピード":80}}"#)
                .unwrap();
        assert_eq!(profile.gait, "先行");
        assert_eq!(profile.stats.get("スピード"), Some(&80));
    }

    #[test]
    fn view_builds_star_rows() {
        let profile: GeneratedProfile =
            serde_json::from_str(r#"{"name":"A","gait":"逃げ","stats":{"スタミナ":40,"根性":100}}"#)
                .unwrap();
        let view = PersonaView::new(
            profile,
            ImageOutcome::Fallback("/static/fallback_horse.png".to_string()),
        );
        assert_eq!(view.stats.len(), 2);
        let guts = view.stats.iter().find(|row| row.label == "根性").unwrap();
        assert_eq!(guts.stars, "★★★★★");
        assert!(view.image.is_fallback());
    }
}
