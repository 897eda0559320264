//! `deckgen` - AI slide deck generator.
//!
//! Drafts slide content with a language model, illustrates each slide with a
//! generated or stock image, supports per-slide edits, and exports the result
//! as a PowerPoint file.

pub mod config;
pub mod constants;
pub mod error;
pub mod pptx;
pub mod services;
pub mod theme;
pub mod types;
