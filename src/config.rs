//! Application configuration.
//!
//! Handles loading provider credentials and endpoints from environment
//! variables and .env files. The loaded `Config` is read-only afterwards.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::providers;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Language model API key (Gemini)
    pub gemini_api_key: String,
    /// Language model name used for content generation
    pub gemini_model: String,
    /// Base URL of the language model API
    pub gemini_api_base: String,
    /// Image generation API key (Together)
    pub together_api_key: String,
    /// Diffusion model used for image generation
    pub image_model: String,
    /// Image generation endpoint
    pub image_endpoint: String,
    /// Directory exported decks are written to
    pub output_dir: PathBuf,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            gemini_api_key: String::new(),
            gemini_model: providers::GEMINI_MODEL.to_string(),
            gemini_api_base: providers::GEMINI_API_BASE.to_string(),
            together_api_key: String::new(),
            image_model: providers::TOGETHER_IMAGE_MODEL.to_string(),
            image_endpoint: providers::TOGETHER_IMAGE_ENDPOINT.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Some(key) = non_empty_env("GEMINI_API_KEY") {
            config.gemini_api_key = key;
        }

        if let Some(model) = non_empty_env("GEMINI_MODEL") {
            config.gemini_model = model;
        }

        if let Some(base) = non_empty_env("GEMINI_API_BASE") {
            config.gemini_api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(key) = non_empty_env("TOGETHER_API_KEY") {
            config.together_api_key = key;
        } else {
            tracing::warn!("TOGETHER_API_KEY is not set, image generation will fall back to stock photos");
        }

        if let Some(model) = non_empty_env("TOGETHER_IMAGE_MODEL") {
            config.image_model = model;
        }

        if let Some(dir) = non_empty_env("DECKGEN_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config
    }

    /// Check if the language model is configured
    pub const fn has_content_credentials(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Check if the image generator is configured
    pub const fn has_image_credentials(&self) -> bool {
        !self.together_api_key.is_empty()
    }
}

/// Read an environment variable, treating blank values as unset
fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
