//! PowerPoint export.
//!
//! Turns a [`crate::types::Presentation`] into a PresentationML package and
//! reads such packages back for verification.

pub mod export;
pub mod inspect;
pub mod media;
pub mod model;
pub mod package;
pub mod template;

pub use export::{export, file_name, render, sanitize_file_stem};
pub use inspect::{inspect, DeckSummary, ImageRef, SlideSummary};
