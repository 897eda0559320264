//! Presentation assembler.
//!
//! Turns a configuration into a complete [`Presentation`]: one content
//! generation call, then concurrent image resolution for every slide.

use chrono::Utc;
use futures::future::join_all;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::content::{ContentClient, ContentRequest};
use crate::services::image::{ImageClient, ImageOptions};
use crate::types::{
    Presentation, PresentationConfig, PresentationContent, PresentationId, Slide, SlideContent,
    SlideId,
};

/// Builds presentations from configuration.
#[derive(Clone)]
pub struct Assembler {
    content: Option<ContentClient>,
    images: ImageClient,
}

impl Assembler {
    /// Assemble with explicit clients.
    pub fn new(content: ContentClient, images: ImageClient) -> Self {
        Self { content: Some(content), images }
    }

    /// Assemble with clients built from config.
    ///
    /// A missing language model key is reported by [`Assembler::build`], not here.
    pub fn from_config(config: &Config) -> Self {
        let content = match ContentClient::from_config(config) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };
        Self { content, images: ImageClient::from_config(config) }
    }

    /// The image client, shared with the editing session.
    pub fn images(&self) -> &ImageClient {
        &self.images
    }

    /// Generate a complete presentation.
    pub async fn build(&self, config: &PresentationConfig) -> Result<Presentation> {
        config.validate()?;
        let content_client = self.content.as_ref().ok_or_else(|| {
            Error::config(
                "GEMINI_API_KEY is not set",
                "Set GEMINI_API_KEY in the environment or a .env file",
            )
        })?;

        let request = ContentRequest::from_config(config);
        let content = content_client.generate(&request).await?;
        let PresentationContent { slides, references } =
            reconcile_slide_count(content, config.slide_count)?;

        let images = self.images.for_source(config.image_source);
        let options = ImageOptions::default();
        let resolved = join_all(slides.iter().map(|slide| {
            let prompt = image_prompt(slide);
            let images = &images;
            let options = &options;
            async move { images.resolve(prompt, options).await }
        }))
        .await;

        let slides: Vec<Slide> = slides
            .into_iter()
            .zip(resolved)
            .enumerate()
            .map(|(index, (content, image))| {
                if !image.is_found() {
                    tracing::warn!("No image found for slide {index} '{}'", content.title);
                }
                Slide {
                    id: SlideId::for_index(index),
                    title: content.title,
                    content: content.content,
                    notes: Some(content.notes),
                    image_url: image.into_url(),
                    sources: Some(content.sources),
                }
            })
            .collect();

        let now = Utc::now();
        let presentation = Presentation {
            id: PresentationId::new(),
            config: config.clone(),
            slides,
            references: Some(references).filter(|r| !r.is_empty()),
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            "Assembled presentation {} with {} slides",
            presentation.id,
            presentation.slides.len()
        );
        Ok(presentation)
    }
}

/// Prompt used to illustrate a slide: its image prompt, or its title when blank.
fn image_prompt(slide: &SlideContent) -> &str {
    let prompt = slide.image_prompt.trim();
    if prompt.is_empty() {
        slide.title.trim()
    } else {
        prompt
    }
}

/// Apply the slide count policy to generated content.
///
/// Extra slides are dropped, missing ones are tolerated, none at all is an error.
pub fn reconcile_slide_count(
    mut content: PresentationContent,
    requested: u32,
) -> Result<PresentationContent> {
    let requested = requested as usize;
    let generated = content.slides.len();

    if generated == 0 {
        return Err(Error::parse("model returned no slides"));
    }
    if generated > requested {
        tracing::warn!("Model returned {generated} slides, keeping the first {requested}");
        content.slides.truncate(requested);
    } else if generated < requested {
        tracing::warn!("Model returned {generated} slides, {requested} were requested");
    }
    Ok(content)
}
