//! Image generation client.
//!
//! Resolves a text prompt to an image reference through a fallback chain:
//! diffusion model, then keyword stock photo, then nothing. Resolution never
//! fails; provider errors are logged and the next link in the chain is used.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::constants::{image, providers};
use crate::error::{Error, Result};
use crate::types::ImageSource;

/// Optional overrides for one image request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// Diffusion steps.
    pub steps: Option<u32>,
    /// Fixed seed; random when unset.
    pub seed: Option<u32>,
    /// What the image should not contain.
    pub negative_prompt: Option<String>,
}

/// A fully specified image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Prompt including the quality prefix.
    pub prompt: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Diffusion steps.
    pub steps: u32,
    /// Seed in `0..SEED_RANGE` unless overridden.
    pub seed: u32,
    /// What the image should not contain.
    pub negative_prompt: Option<String>,
}

impl ImageRequest {
    /// Apply defaults and the quality prefix to a slide prompt.
    pub fn new(prompt: &str, options: &ImageOptions) -> Self {
        Self {
            prompt: format!("{}{prompt}", image::PROMPT_PREFIX),
            width: options.width.unwrap_or(image::DEFAULT_WIDTH),
            height: options.height.unwrap_or(image::DEFAULT_HEIGHT),
            steps: options.steps.unwrap_or(image::DEFAULT_STEPS),
            seed: options
                .seed
                .unwrap_or_else(|| rand::thread_rng().gen_range(0..image::SEED_RANGE)),
            negative_prompt: options.negative_prompt.clone(),
        }
    }

    /// JSON body for the images endpoint.
    pub fn to_body(&self, model: &str) -> Value {
        let mut body = json!({
            "model": model,
            "prompt": self.prompt,
            "width": self.width,
            "height": self.height,
            "steps": self.steps,
            "n": 1,
            "seed": self.seed,
            "response_format": "b64_json",
        });
        if let Some(negative) = &self.negative_prompt {
            body["negative_prompt"] = Value::String(negative.clone());
        }
        body
    }
}

/// A generative image provider returning base64 image data.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Generate one image and return its base64 payload.
    async fn generate(&self, request: &ImageRequest) -> Result<String>;
}

/// Together images API backend.
#[derive(Clone)]
pub struct TogetherBackend {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl TogetherBackend {
    /// Create a Together backend from config
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.together_api_key.clone(),
            model: config.image_model.clone(),
            endpoint: config.image_endpoint.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(providers::REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ImageBackend for TogetherBackend {
    fn name(&self) -> &'static str {
        "Together"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<String> {
        let resp = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request.to_body(&self.model))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Image request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::provider_status(
                self.name(),
                format!("images endpoint returned {status}"),
                status.as_u16(),
            ));
        }

        let json: Value = resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON from images endpoint: {e}")))?;

        extract_b64_image(&json)
            .map(String::from)
            .ok_or_else(|| Error::Provider {
                provider: "Together",
                message: "No image data in response".to_string(),
                status: Some(status.as_u16()),
                hint: None,
            })
    }
}

/// Read `data[0].b64_json` from an images response.
pub fn extract_b64_image(json: &Value) -> Option<&str> {
    json["data"][0]["b64_json"]
        .as_str()
        .filter(|b64| !b64.is_empty())
}

/// Keyword search URL used when no image can be generated.
pub fn stock_image_url(prompt: &str) -> String {
    format!("{}/?{}", providers::STOCK_IMAGE_BASE, urlencoding::encode(prompt))
}

/// Outcome of resolving a prompt to an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// Generated image as a `data:image/png;base64,...` URI.
    Generated(String),
    /// Stock photo search URL.
    Stock(String),
    /// No image could be found.
    Missing,
}

impl ResolvedImage {
    /// The image reference, if any.
    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Generated(url) | Self::Stock(url) => Some(url),
            Self::Missing => None,
        }
    }

    /// Whether any image was found.
    pub const fn is_found(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Client that resolves prompts to slide images.
#[derive(Clone, Default)]
pub struct ImageClient {
    backend: Option<Arc<dyn ImageBackend>>,
}

impl ImageClient {
    /// Use the given generator, falling back to stock photos.
    pub fn new(backend: Arc<dyn ImageBackend>) -> Self {
        Self { backend: Some(backend) }
    }

    /// Stock photos only.
    pub fn stock_only() -> Self {
        Self { backend: None }
    }

    /// Create a Together-backed client, or a stock-only one without a key.
    pub fn from_config(config: &Config) -> Self {
        if config.has_image_credentials() {
            Self::new(Arc::new(TogetherBackend::new(config)))
        } else {
            Self::stock_only()
        }
    }

    /// Client honoring the configured image source.
    #[must_use]
    pub fn for_source(&self, source: ImageSource) -> Self {
        match source {
            ImageSource::Ai => self.clone(),
            ImageSource::Stock => Self::stock_only(),
        }
    }

    /// Whether a generator is available.
    pub const fn has_generator(&self) -> bool {
        self.backend.is_some()
    }

    /// Resolve a prompt through the fallback chain. Never fails.
    pub async fn resolve(&self, prompt: &str, options: &ImageOptions) -> ResolvedImage {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::warn!("Empty image prompt, leaving slide without an image");
            return ResolvedImage::Missing;
        }

        let Some(backend) = &self.backend else {
            return ResolvedImage::Stock(stock_image_url(prompt));
        };

        let request = ImageRequest::new(prompt, options);
        match backend.generate(&request).await {
            Ok(b64) => {
                tracing::debug!("Generated image for '{prompt}' (seed {})", request.seed);
                ResolvedImage::Generated(format!("data:image/png;base64,{b64}"))
            }
            Err(e) => {
                tracing::warn!("Error generating image with {}: {e}", backend.name());
                ResolvedImage::Stock(stock_image_url(prompt))
            }
        }
    }

    /// Resolve a prompt to an image URL with default options.
    pub async fn fetch_image(&self, prompt: &str) -> Option<String> {
        self.resolve(prompt, &ImageOptions::default()).await.into_url()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::sync::Mutex;

    struct Fixed(&'static str);

    #[async_trait]
    impl ImageBackend for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn generate(&self, _request: &ImageRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl ImageBackend for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _request: &ImageRequest) -> Result<String> {
            Err(Error::provider_status("failing", "boom", 500))
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<ImageRequest>>);

    #[async_trait]
    impl ImageBackend for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn generate(&self, request: &ImageRequest) -> Result<String> {
            self.0.lock().unwrap().push(request.clone());
            Ok("AAAA".to_string())
        }
    }

    #[tokio::test]
    async fn no_credential_returns_stock_url() {
        let client = ImageClient::from_config(&Config::default());
        assert!(!client.has_generator());
        let url = client.fetch_image("golden retriever").await.unwrap();
        assert!(url.starts_with(providers::STOCK_IMAGE_BASE));
        assert!(url.ends_with("?golden%20retriever"));
    }

    #[tokio::test]
    async fn generated_image_becomes_data_uri() {
        let client = ImageClient::new(Arc::new(Fixed("iVBORw0KGgo=")));
        let resolved = client.resolve("coral reef", &ImageOptions::default()).await;
        assert_eq!(resolved, ResolvedImage::Generated("data:image/png;base64,iVBORw0KGgo=".into()));
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_stock() {
        let client = ImageClient::new(Arc::new(Failing));
        let resolved = client.resolve("coral reef", &ImageOptions::default()).await;
        assert_eq!(resolved, ResolvedImage::Stock(stock_image_url("coral reef")));
    }

    #[tokio::test]
    async fn blank_prompt_is_missing() {
        let client = ImageClient::new(Arc::new(Fixed("x")));
        let resolved = client.resolve("   ", &ImageOptions::default()).await;
        assert!(!resolved.is_found());
        assert_eq!(resolved.into_url(), None);
    }

    #[tokio::test]
    async fn stock_source_skips_generator() {
        let recording = Arc::new(Recording::default());
        let client = ImageClient::new(Arc::clone(&recording) as Arc<dyn ImageBackend>)
            .for_source(ImageSource::Stock);
        let resolved = client.resolve("plastic", &ImageOptions::default()).await;
        assert!(matches!(resolved, ResolvedImage::Stock(_)));
        assert!(recording.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn request_applies_prefix_and_options() {
        let recording = Arc::new(Recording::default());
        let client = ImageClient::new(Arc::clone(&recording) as Arc<dyn ImageBackend>);
        let options = ImageOptions { width: Some(512), seed: Some(7), ..Default::default() };
        client.resolve("reef", &options).await;
        let seen = recording.0.lock().unwrap();
        assert_eq!(seen[0].prompt, "Professional, high quality presentation image: reef");
        assert_eq!(seen[0].width, 512);
        assert_eq!(seen[0].height, image::DEFAULT_HEIGHT);
        assert_eq!(seen[0].steps, image::DEFAULT_STEPS);
        assert_eq!(seen[0].seed, 7);
    }

    #[test]
    fn random_seed_stays_in_range() {
        for _ in 0..100 {
            let request = ImageRequest::new("x", &ImageOptions::default());
            assert!(request.seed < image::SEED_RANGE);
        }
    }

    #[test]
    fn body_matches_images_api_shape() {
        let request = ImageRequest::new("reef", &ImageOptions { seed: Some(3), ..Default::default() });
        let body = request.to_body("sdxl");
        assert_eq!(body["model"], "sdxl");
        assert_eq!(body["n"], 1);
        assert_eq!(body["seed"], 3);
        assert_eq!(body["response_format"], "b64_json");
        assert!(body.get("negative_prompt").is_none());

        let with_negative = ImageRequest::new(
            "reef",
            &ImageOptions { negative_prompt: Some("text".into()), ..Default::default() },
        );
        assert_eq!(with_negative.to_body("sdxl")["negative_prompt"], "text");
    }

    #[test]
    fn extract_b64_requires_image_data() {
        assert_eq!(extract_b64_image(&json!({"data":[{"b64_json":"QUJD"}]})), Some("QUJD"));
        assert_eq!(extract_b64_image(&json!({"data":[]})), None);
        assert_eq!(extract_b64_image(&json!({"data":[{"b64_json":""}]})), None);
        assert_eq!(extract_b64_image(&json!({"error":"nope"})), None);
    }
}
