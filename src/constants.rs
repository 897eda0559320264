//! Application constants.
//!
//! Centralizes provider endpoints, generation parameters and slide layout
//! values.

/// Provider endpoints and model names.
pub mod providers {
    /// Default language model for slide content.
    pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

    /// Base URL of the Gemini REST API.
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default diffusion model for slide illustrations.
    pub const TOGETHER_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

    /// Together image generation endpoint.
    pub const TOGETHER_IMAGE_ENDPOINT: &str = "https://api.together.xyz/v1/images/generations";

    /// Keyword search endpoint used when no image can be generated.
    pub const STOCK_IMAGE_BASE: &str = "https://source.unsplash.com/1600x900";

    /// Request timeout in seconds for provider calls.
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
}

/// Language model generation parameters.
pub mod generation {
    /// Sampling temperature.
    pub const TEMPERATURE: f32 = 0.9;

    /// Top-k sampling.
    pub const TOP_K: u32 = 1;

    /// Nucleus sampling.
    pub const TOP_P: f32 = 1.0;

    /// Upper bound on generated tokens.
    pub const MAX_OUTPUT_TOKENS: u32 = 4096;

    /// Smallest slide count a deck may request.
    pub const MIN_SLIDES: u32 = 1;

    /// Largest slide count a deck may request.
    pub const MAX_SLIDES: u32 = 50;
}

/// Image generation defaults.
pub mod image {
    /// Default image width in pixels.
    pub const DEFAULT_WIDTH: u32 = 1024;

    /// Default image height in pixels.
    pub const DEFAULT_HEIGHT: u32 = 1024;

    /// Default diffusion steps.
    pub const DEFAULT_STEPS: u32 = 40;

    /// Random seeds are drawn from `0..SEED_RANGE`.
    pub const SEED_RANGE: u32 = 10_000;

    /// Phrase prepended to every image prompt.
    pub const PROMPT_PREFIX: &str = "Professional, high quality presentation image: ";
}

/// Exported document layout.
///
/// Positions are fractions of the slide size; sizes are in points.
pub mod layout {
    /// Slide width in EMUs (10 inches, 16:9).
    pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;

    /// Slide height in EMUs (5.625 inches, 16:9).
    pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

    /// Notes page width in EMUs.
    pub const NOTES_WIDTH_EMU: i64 = 6_858_000;

    /// Notes page height in EMUs.
    pub const NOTES_HEIGHT_EMU: i64 = 9_144_000;

    /// Author recorded in document metadata.
    pub const AUTHOR: &str = "AI Presentation Generator";

    /// Font used for slide titles.
    pub const TITLE_FONT: &str = "Cabin";

    /// Font used for body text.
    pub const BODY_FONT: &str = "Unbounded";

    /// Title font size.
    pub const TITLE_SIZE: u32 = 36;

    /// Body font size.
    pub const BODY_SIZE: u32 = 18;

    /// Sources font size.
    pub const SOURCES_SIZE: u32 = 10;

    /// References slide body font size.
    pub const REFERENCES_SIZE: u32 = 14;

    /// Title of the trailing references slide.
    pub const REFERENCES_TITLE: &str = "References";
}
