// src/models/quiz.rs

use std::str::FromStr;

use crate::errors::AppError;

/// Fixed vocabulary of personality traits offered on the quiz form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorseTrait {
    Brave,
    Calm,
    Agile,
    Loyal,
    Clever,
}

impl HorseTrait {
    pub const ALL: [HorseTrait; 5] = [
        HorseTrait::Brave,
        HorseTrait::Calm,
        HorseTrait::Agile,
        HorseTrait::Loyal,
        HorseTrait::Clever,
    ];

    /// Form value and prompt token for this trait.
    pub fn as_str(self) -> &'static str {
        match self {
            HorseTrait::Brave => "brave",
            HorseTrait::Calm => "calm",
            HorseTrait::Agile => "agile",
            HorseTrait::Loyal => "loyal",
            HorseTrait::Clever => "clever",
        }
    }

    /// Label shown on the quiz form.
    pub fn label(self) -> &'static str {
        match self {
            HorseTrait::Brave => "勇敢",
            HorseTrait::Calm => "冷静",
            HorseTrait::Agile => "俊敏",
            HorseTrait::Loyal => "忠実",
            HorseTrait::Clever => "賢い",
        }
    }
}

impl FromStr for HorseTrait {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "brave" => Ok(HorseTrait::Brave),
            "calm" => Ok(HorseTrait::Calm),
            "agile" => Ok(HorseTrait::Agile),
            "loyal" => Ok(HorseTrait::Loyal),
            "clever" => Ok(HorseTrait::Clever),
            other => Err(AppError::BadRequest(format!("unknown trait: {other}"))),
        }
    }
}

impl std::fmt::Display for HorseTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One quiz submission: the ordered, de-duplicated trait selection of a
/// single request. Never persisted.
#[derive(Debug, Clone)]
pub struct QuizSubmission {
    traits: Vec<HorseTrait>,
}

impl QuizSubmission {
    /// Builds a submission from decoded `name=value` form pairs, keeping the
    /// selection order of repeated `traits` fields and dropping duplicates.
    ///
    /// # Errors
    ///
    /// `AppError::BadRequest` when no trait was selected or a value is
    /// outside the vocabulary.
    pub fn from_form_pairs(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut traits: Vec<HorseTrait> = Vec::new();
        for (name, value) in pairs {
            if name != "traits" {
                continue;
            }
            let parsed = value.parse::<HorseTrait>()?;
            if !traits.contains(&parsed) {
                traits.push(parsed);
            }
        }

        if traits.is_empty() {
            return Err(AppError::BadRequest(
                "select at least one trait".to_string(),
            ));
        }

        Ok(Self { traits })
    }

    pub fn traits(&self) -> &[HorseTrait] {
        &self.traits
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[&str]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|v| ("traits".to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn keeps_selection_order() {
        let submission = QuizSubmission::from_form_pairs(&pairs(&["loyal", "brave"])).unwrap();
        assert_eq!(
            submission.traits(),
            &[HorseTrait::Loyal, HorseTrait::Brave]
        );
    }

    #[test]
    fn drops_duplicate_selections() {
        let submission =
            QuizSubmission::from_form_pairs(&pairs(&["brave", "brave", "calm"])).unwrap();
        assert_eq!(submission.len(), 2);
    }

    #[test]
    fn rejects_empty_selection() {
        let err = QuizSubmission::from_form_pairs(&[]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn rejects_unknown_trait() {
        let err = QuizSubmission::from_form_pairs(&pairs(&["sleepy"])).unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("sleepy")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn ignores_unrelated_form_fields() {
        let mut form = pairs(&["agile"]);
        form.push(("submit".to_string(), "go".to_string()));
        let submission = QuizSubmission::from_form_pairs(&form).unwrap();
        assert_eq!(submission.traits(), &[HorseTrait::Agile]);
    }
}
