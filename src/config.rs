// src/config.rs

use serde::Deserialize;

use crate::errors::AppError;

/// Runtime configuration, loaded once at startup from the process
/// environment. Optional secrets stay `Option` so tests can construct a
/// `Config` without touching the environment; `validate` enforces the
/// required set before the server starts.
#[derive(Deserialize, Clone)]
pub struct Config {
    // Generative AI
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_api_base_url")]
    pub gemini_api_base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,

    // Blob storage
    pub storage_bucket: Option<String>,
    #[serde(default = "default_storage_api_base_url")]
    pub storage_api_base_url: String,
    pub storage_access_token: Option<String>,

    // Fallback asset served when image generation fails
    #[serde(default = "default_fallback_image_path")]
    pub fallback_image_path: String,

    // Server
    #[serde(default = "default_port")]
    pub port: u16,

    // NFT minting (the whole block must be present for minting to be active)
    pub mint_api_key: Option<String>,
    pub mint_wallet_address: Option<String>,
    pub mint_chain: Option<String>,
    #[serde(default = "default_mint_api_base_url")]
    pub mint_api_base_url: String,
}

/// Minting settings, available only when the full block is configured.
#[derive(Debug, Clone)]
pub struct MintSettings {
    pub wallet_address: String,
    pub chain: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("gemini_api_base_url", &self.gemini_api_base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_api_base_url", &self.storage_api_base_url)
            .field(
                "storage_access_token",
                &self.storage_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("fallback_image_path", &self.fallback_image_path)
            .field("port", &self.port)
            .field(
                "mint_api_key",
                &self.mint_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("mint_wallet_address", &self.mint_wallet_address)
            .field("mint_chain", &self.mint_chain)
            .field("mint_api_base_url", &self.mint_api_base_url)
            .finish()
    }
}

fn default_gemini_api_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.0-flash-preview-image-generation".to_string()
}

fn default_storage_api_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_fallback_image_path() -> String {
    "/static/fallback_horse.png".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_mint_api_base_url() -> String {
    "https://staging.crossmint.com".to_string()
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable parsing fails.
    pub fn load() -> Result<Self, anyhow::Error> {
        envy::from_env::<Self>().map_err(anyhow::Error::from)
    }

    /// Enforces the required-at-startup values. Missing values are a fatal
    /// startup condition, not a silent `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` naming the first missing value, or a
    /// partially configured mint block.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.gemini_api_key.is_none() {
            return Err(AppError::ConfigError(
                "GEMINI_API_KEY must be set".to_string(),
            ));
        }
        if self.storage_bucket.is_none() {
            return Err(AppError::ConfigError(
                "STORAGE_BUCKET must be set".to_string(),
            ));
        }

        // Minting is optional, but a half-configured block is a deployment
        // mistake we refuse to start with.
        let mint_fields = [
            self.mint_api_key.is_some(),
            self.mint_wallet_address.is_some(),
            self.mint_chain.is_some(),
        ];
        if mint_fields.iter().any(|set| *set) && !mint_fields.iter().all(|set| *set) {
            return Err(AppError::ConfigError(
                "MINT_API_KEY, MINT_WALLET_ADDRESS and MINT_CHAIN must be set together"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the mint settings when the whole mint block is configured.
    pub fn mint_settings(&self) -> Option<MintSettings> {
        match (&self.mint_wallet_address, &self.mint_chain) {
            (Some(wallet), Some(chain)) if self.mint_api_key.is_some() => Some(MintSettings {
                wallet_address: wallet.clone(),
                chain: chain.clone(),
            }),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_base_url: default_gemini_api_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            storage_bucket: None,
            storage_api_base_url: default_storage_api_base_url(),
            storage_access_token: None,
            fallback_image_path: default_fallback_image_path(),
            port: default_port(),
            mint_api_key: None,
            mint_wallet_address: None,
            mint_chain: None,
            mint_api_base_url: default_mint_api_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            gemini_api_key: Some("test-key".to_string()),
            storage_bucket: Some("test-bucket".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn validate_accepts_required_set() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let config = Config {
            gemini_api_key: None,
            ..configured()
        };
        match config.validate() {
            Err(AppError::ConfigError(msg)) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_missing_bucket() {
        let config = Config {
            storage_bucket: None,
            ..configured()
        };
        match config.validate() {
            Err(AppError::ConfigError(msg)) => assert!(msg.contains("STORAGE_BUCKET")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_partial_mint_block() {
        let config = Config {
            mint_api_key: Some("mint-key".to_string()),
            ..configured()
        };
        match config.validate() {
            Err(AppError::ConfigError(msg)) => assert!(msg.contains("MINT_")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn mint_settings_requires_full_block() {
        let mut config = configured();
        assert!(config.mint_settings().is_none());

        config.mint_api_key = Some("mint-key".to_string());
        config.mint_wallet_address = Some("0xabc".to_string());
        config.mint_chain = Some("polygon-amoy".to_string());
        let settings = config.mint_settings().expect("full block configured");
        assert_eq!(settings.wallet_address, "0xabc");
        assert_eq!(settings.chain, "polygon-amoy");
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = Config {
            mint_api_key: Some("mint-secret".to_string()),
            storage_access_token: Some("token-secret".to_string()),
            ..configured()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("test-key"));
        assert!(!rendered.contains("mint-secret"));
        assert!(!rendered.contains("token-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
