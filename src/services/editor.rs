//! Slide editing.
//!
//! An [`EditingSession`] owns the presentation currently being edited and
//! applies slide replacements to it. Edits that clear a slide's image fetch a
//! fresh one from the slide title.

use chrono::Utc;

use crate::services::image::{ImageClient, ImageOptions};
use crate::types::{Presentation, Slide};

/// Replace the slide whose id matches `updated`.
///
/// A slide with no image gets one resolved from its title, honoring the
/// presentation's image source. Unknown ids leave the slides unchanged and
/// fetch nothing. `updated_at` is refreshed either way.
pub async fn apply_edit(
    mut presentation: Presentation,
    mut updated: Slide,
    images: &ImageClient,
) -> Presentation {
    presentation.updated_at = Utc::now();

    let Some(index) = presentation.slides.iter().position(|s| s.id == updated.id) else {
        tracing::warn!("No slide with id {} in presentation {}", updated.id, presentation.id);
        return presentation;
    };

    if updated.image().is_none() {
        let images = images.for_source(presentation.config.image_source);
        let resolved = images.resolve(&updated.title, &ImageOptions::default()).await;
        if !resolved.is_found() {
            tracing::warn!("No replacement image found for slide {}", updated.id);
        }
        updated.image_url = resolved.into_url();
    }

    tracing::debug!("Replaced slide {}", updated.id);
    presentation.slides[index] = updated;
    presentation
}

/// Holds the presentation being edited.
pub struct EditingSession {
    images: ImageClient,
    presentation: Option<Presentation>,
}

impl EditingSession {
    /// Create an empty session.
    pub fn new(images: ImageClient) -> Self {
        Self { images, presentation: None }
    }

    /// Start editing a presentation, replacing any previous one.
    pub fn load(&mut self, presentation: Presentation) {
        tracing::info!("Editing presentation {}", presentation.id);
        self.presentation = Some(presentation);
    }

    /// The presentation being edited.
    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    /// Stop editing and hand back the presentation.
    pub fn take(&mut self) -> Option<Presentation> {
        self.presentation.take()
    }

    /// Whether a presentation is loaded.
    pub const fn is_loaded(&self) -> bool {
        self.presentation.is_some()
    }

    /// Apply a slide edit to the loaded presentation.
    ///
    /// Returns `None` without doing anything when nothing is loaded.
    pub async fn apply_edit(&mut self, updated: Slide) -> Option<&Presentation> {
        let Some(current) = self.presentation.take() else {
            tracing::debug!("Ignoring edit to {}: no presentation loaded", updated.id);
            return None;
        };
        let edited = apply_edit(current, updated, &self.images).await;
        self.presentation = Some(edited);
        self.presentation.as_ref()
    }
}
