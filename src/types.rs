//! Core type definitions for the presentation pipeline.
//!
//! Newtype wrappers keep slide and presentation identifiers apart at compile
//! time; the configuration enums serialize to the same lowercase strings the
//! configuration form submits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::generation::{MAX_SLIDES, MIN_SLIDES};
use crate::error::{Error, Result};
use crate::theme::ThemeId;

/// What the presentation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Pitches, reports and other business settings.
    #[default]
    Business,
    /// Teaching material.
    Educational,
    /// General information sharing.
    Informative,
}

impl Purpose {
    /// Returns the lowercase name used in prompts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Educational => "educational",
            Self::Informative => "informative",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How much text each slide should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    /// A headline and a few words.
    Brief,
    /// A short paragraph or a handful of bullets.
    #[default]
    Medium,
    /// Full explanatory paragraphs.
    Detailed,
}

impl ContentLength {
    /// Guidance sentence added to the generation prompt.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Brief => "Keep slide content brief: one or two short sentences or up to three terse bullet points per slide.",
            Self::Medium => "Keep slide content moderate: a short paragraph or three to five bullet points per slide.",
            Self::Detailed => "Make slide content detailed: full explanatory paragraphs or five or more substantive bullet points per slide.",
        }
    }
}

/// Where slide illustrations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Generate images with the diffusion model, falling back to stock photos.
    #[default]
    Ai,
    /// Use keyword stock photos only.
    Stock,
}

/// Settings collected by the configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationConfig {
    /// Subject of the deck.
    pub topic: String,
    /// What the deck is for.
    pub purpose: Purpose,
    /// Who the deck is for.
    pub audience: String,
    /// Requested number of slides, title slide included.
    pub slide_count: u32,
    /// Points the deck should cover; entries may be blank.
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Visual theme.
    pub style: ThemeId,
    /// Amount of text per slide.
    #[serde(default)]
    pub content_length: ContentLength,
    /// Where illustrations come from.
    #[serde(default)]
    pub image_source: ImageSource,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            purpose: Purpose::Business,
            audience: String::new(),
            slide_count: 8,
            key_points: vec![String::new()],
            style: ThemeId::Verdigris,
            content_length: ContentLength::Medium,
            image_source: ImageSource::Ai,
        }
    }
}

impl PresentationConfig {
    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::invalid("topic", "a topic is required"));
        }
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.slide_count) {
            return Err(Error::invalid(
                "slideCount",
                format!(
                    "{} is outside the supported range {MIN_SLIDES}-{MAX_SLIDES}",
                    self.slide_count
                ),
            ));
        }
        Ok(())
    }

    /// Key points with blank entries removed.
    pub fn filled_key_points(&self) -> impl Iterator<Item = &str> {
        self.key_points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }
}

/// One slide as produced by the language model, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideContent {
    /// Slide heading.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Speaker notes.
    pub notes: String,
    /// Description used to drive image generation.
    pub image_prompt: String,
    /// Citations for this slide.
    pub sources: Vec<String>,
}

/// Everything the language model produced for one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationContent {
    /// Slides in generation order.
    pub slides: Vec<SlideContent>,
    /// Full reference list.
    pub references: Vec<String>,
}

/// Slide identifier, stable within a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId(pub String);

impl SlideId {
    /// Create a new `SlideId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for the slide at `index` in generation order.
    pub fn for_index(index: usize) -> Self {
        Self(format!("slide-{index}"))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlideId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Presentation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationId(pub Uuid);

impl PresentationId {
    /// Create a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PresentationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One slide of an assembled presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Stable identifier within the presentation.
    pub id: SlideId,
    /// Slide heading.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Speaker notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Remote image URL or `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Citations for this slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl Slide {
    /// The image reference, if one is set and non-blank.
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Speaker notes, if any are non-blank.
    pub fn speaker_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Citations, if there are any.
    pub fn citations(&self) -> &[String] {
        self.sources.as_deref().unwrap_or_default()
    }
}

/// A complete in-memory presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Presentation identifier.
    pub id: PresentationId,
    /// Settings the deck was generated from.
    pub config: PresentationConfig,
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
    /// Full reference list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,
    /// When the deck was assembled.
    pub created_at: DateTime<Utc>,
    /// When the deck was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Presentation {
    /// Reference list, empty when none was generated.
    pub fn reference_list(&self) -> &[String] {
        self.references.as_deref().unwrap_or_default()
    }

    /// Find a slide by id.
    pub fn slide(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| &s.id == id)
    }
}
