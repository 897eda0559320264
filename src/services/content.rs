//! Content generation client.
//!
//! Renders the slide-writing instruction, sends it to the language model and
//! turns the reply into validated [`PresentationContent`]. Model output is an
//! untrusted contract: every field is checked before a slide is accepted.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;

use crate::config::Config;
use crate::constants::{generation, providers};
use crate::error::{Error, Result};
use crate::types::{ContentLength, PresentationConfig, PresentationContent, Purpose, SlideContent};

/// Opening fence such as "```json" at the very start of a reply.
#[allow(clippy::expect_used)]
static RE_FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```[A-Za-z0-9_-]*\s*").expect("valid regex: RE_FENCE_OPEN")
});

/// Closing fence at the very end of a reply.
#[allow(clippy::expect_used)]
static RE_FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*```\s*$").expect("valid regex: RE_FENCE_CLOSE")
});

/// A language model that turns one instruction into free-form text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Provider name for logs and errors.
    fn name(&self) -> &'static str;

    /// Send the instruction and return the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` backend.
#[derive(Clone)]
pub struct GeminiBackend {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

impl GeminiBackend {
    /// Create a Gemini backend from config
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_base: config.gemini_api_base.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(providers::REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": generation::TEMPERATURE,
                "topK": generation::TOP_K,
                "topP": generation::TOP_P,
                "maxOutputTokens": generation::MAX_OUTPUT_TOKENS,
            }
        });

        let resp = self.client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {} failed: {e}", self.model)))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(Error::provider_status(
                self.name(),
                format!("generateContent returned {status}: {}", truncate(&detail, 200)),
                status.as_u16(),
            ));
        }

        let json: Value = resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON envelope from {}: {e}", self.name())))?;

        extract_completion_text(&json)
    }
}

/// Pull the generated text out of a `generateContent` response.
pub fn extract_completion_text(json: &Value) -> Result<String> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Err(Error::Provider {
            provider: "Gemini",
            message: format!("prompt was blocked ({reason})"),
            status: None,
            hint: Some("Rephrase the topic or key points"),
        });
    }

    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| Error::parse("Missing 'candidates[0].content.parts' in model response"))?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(Error::parse("Model response contained no text"));
    }
    Ok(text)
}

/// Inputs to one content generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest<'a> {
    /// Subject of the deck.
    pub topic: &'a str,
    /// What the deck is for.
    pub purpose: Purpose,
    /// Who the deck is for.
    pub audience: &'a str,
    /// Non-blank key points in order.
    pub key_points: Vec<&'a str>,
    /// Exact number of slides to ask for.
    pub slide_count: u32,
    /// Amount of text per slide.
    pub content_length: ContentLength,
}

impl<'a> ContentRequest<'a> {
    /// Build a request from the submitted configuration.
    pub fn from_config(config: &'a PresentationConfig) -> Self {
        Self {
            topic: config.topic.trim(),
            purpose: config.purpose,
            audience: config.audience.trim(),
            key_points: config.filled_key_points().collect(),
            slide_count: config.slide_count,
            content_length: config.content_length,
        }
    }
}

/// Render the slide-writing instruction.
pub fn build_prompt(request: &ContentRequest<'_>) -> String {
    let count = request.slide_count;
    let audience = request.audience;
    let mut prompt = String::with_capacity(2048);

    let _ = write!(
        prompt,
        "Create a well-researched presentation with exactly {count} slides on:\n\
         Topic: {}\n\
         Purpose: {}\n\
         Audience: {audience}\n\
         Key Points: {}\n\n",
        request.topic,
        request.purpose,
        request.key_points.join(", "),
    );

    let _ = write!(
        prompt,
        "IMPORTANT: The presentation MUST have exactly {count} slides, including the title slide.\n\
         Respond ONLY with a valid JSON object containing comprehensive research and citations.\n\
         The response must be a JSON object with this exact schema:\n\
         {{\n  \"slides\": [\n    {{\n      \"title\": string,\n      \"content\": string,\n      \
         \"notes\": string (include research findings and talking points),\n      \
         \"imagePrompt\": string,\n      \
         \"sources\": string[] (list of relevant sources)\n    }}\n  ],\n  \
         \"references\": string[] (complete list of all sources used)\n}}\n\n"
    );

    let _ = write!(
        prompt,
        "Requirements:\n\
         1. Content:\n\
         \x20 - First slide is a compelling title slide\n\
         \x20 - Each key point gets its own detailed slide\n\
         \x20 - Content is concise yet informative\n\
         \x20 - Use professional language for {audience}\n\
         \x20 - {}\n\n\
         2. Research:\n\
         \x20 - Include relevant statistics and data\n\
         \x20 - Cite reputable sources (academic papers, industry reports, etc.)\n\
         \x20 - Add context and background in speaker notes\n\n\
         3. Speaker Notes:\n\
         \x20 - Provide detailed talking points\n\
         \x20 - Include relevant research findings\n\
         \x20 - Add engagement tips and audience interaction points\n\
         \x20 - Suggest answers to potential questions\n\n\
         4. Visual Elements:\n\
         \x20 - Include descriptive imagePrompt for professional visuals\n\
         \x20 - Suggest data visualization where appropriate\n\n\
         5. Sources:\n\
         \x20 - Include source citations for each slide\n\
         \x20 - Provide a complete reference list",
        request.content_length.guidance(),
    );

    prompt
}

/// Remove a markdown code fence wrapped around a reply.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = RE_FENCE_OPEN.find(trimmed) else {
        return trimmed;
    };
    let inner = &trimmed[open.end()..];
    RE_FENCE_CLOSE
        .find(inner)
        .map_or(inner, |close| &inner[..close.start()])
        .trim()
}

/// Parse and validate a model reply into slide content.
pub fn parse_content(raw: &str) -> Result<PresentationContent> {
    let cleaned = strip_code_fences(raw);
    let json: Value = serde_json::from_str(cleaned).map_err(|e| {
        tracing::debug!("Invalid JSON response: {}", truncate(cleaned, 500));
        Error::parse(format!("Failed to parse AI response as JSON: {e}"))
    })?;

    let slides = json
        .get("slides")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::parse("Response is missing the 'slides' array"))?;

    if slides.is_empty() {
        return Err(Error::parse("Response contained no slides"));
    }

    let slides = slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| parse_slide(idx, slide))
        .collect::<Result<Vec<_>>>()?;

    let references = json.get("references").map(coerce_list).unwrap_or_default();

    Ok(PresentationContent { slides, references })
}

fn parse_slide(idx: usize, slide: &Value) -> Result<SlideContent> {
    if !slide.is_object() {
        return Err(Error::parse(format!("Slide {idx} is not an object")));
    }

    let required = |field: &str| {
        slide
            .get(field)
            .and_then(coerce_text)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::parse(format!("Slide {idx} is missing required field '{field}'")))
    };

    let optional = |field: &str| slide.get(field).and_then(coerce_text).unwrap_or_default();

    Ok(SlideContent {
        title: required("title")?,
        content: required("content")?,
        notes: optional("notes"),
        image_prompt: optional("imagePrompt"),
        sources: slide.get("sources").map(coerce_list).unwrap_or_default(),
    })
}

/// Accept a string, or a list of strings joined by newlines (models often
/// return bullet arrays for body text).
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let lines: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }
        _ => None,
    }
}

/// Accept a list of strings or a single string; other entries are dropped.
fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Client that produces slide content for a deck.
#[derive(Clone)]
pub struct ContentClient {
    backend: Arc<dyn CompletionBackend>,
}

impl ContentClient {
    /// Wrap a completion backend.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Create a Gemini-backed client, failing if no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        if !config.has_content_credentials() {
            return Err(Error::config(
                "GEMINI_API_KEY is not set",
                "Set GEMINI_API_KEY in the environment or a .env file",
            ));
        }
        Ok(Self::new(Arc::new(GeminiBackend::new(config))))
    }

    /// Generate slide content. Parse failures are surfaced, never retried.
    pub async fn generate(&self, request: &ContentRequest<'_>) -> Result<PresentationContent> {
        let prompt = build_prompt(request);
        tracing::info!(
            "Requesting {} slides on '{}' from {}",
            request.slide_count,
            request.topic,
            self.backend.name()
        );

        let raw = self.backend.complete(&prompt).await.map_err(|e| {
            tracing::error!("Error generating presentation: {e}");
            e
        })?;

        let content = parse_content(&raw)?;
        tracing::debug!(
            "Parsed {} slides and {} references",
            content.slides.len(),
            content.references.len()
        );
        Ok(content)
    }
}
