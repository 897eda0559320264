//! End-to-end pipeline tests with in-process providers.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use async_trait::async_trait;
use deckgen::error::{Error, Result};
use deckgen::pptx::{self, ImageRef};
use deckgen::services::assembler::Assembler;
use deckgen::services::content::{CompletionBackend, ContentClient};
use deckgen::services::editor::EditingSession;
use deckgen::services::image::{stock_image_url, ImageBackend, ImageClient, ImageRequest};
use deckgen::theme::ThemeId;
use deckgen::types::{Presentation, PresentationConfig, Purpose, SlideId};
use std::sync::Arc;

const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUg==";

const MODEL_REPLY: &str = r#"```json
{
  "slides": [
    {
      "title": "Ocean Conservation",
      "content": "Protecting the blue heart of the planet",
      "notes": "Welcome everyone.\nAsk who has visited a beach this year.",
      "imagePrompt": "aerial view of a turquoise ocean",
      "sources": ["NOAA Ocean Facts 2023"]
    },
    {
      "title": "Plastic Pollution",
      "content": "8 million tonnes enter the ocean each year\nMost of it comes from land",
      "notes": "",
      "imagePrompt": "plastic bottles floating at sea (fail)",
      "sources": []
    },
    {
      "title": "Coral Reefs",
      "content": "Reefs cover under 1% of the ocean floor\nThey host a quarter of marine species",
      "notes": "Pause for questions.",
      "imagePrompt": ""
    }
  ],
  "references": ["NOAA Ocean Facts 2023", "UNEP Marine Litter Report 2021"]
}
```"#;

struct CannedModel;

#[async_trait]
impl CompletionBackend for CannedModel {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        assert!(prompt.contains("Ocean Conservation"));
        assert!(prompt.contains("exactly 3 slides"));
        Ok(MODEL_REPLY.to_string())
    }
}

/// Generates a PNG for every prompt except those marked "(fail)".
struct FlakyPainter;

#[async_trait]
impl ImageBackend for FlakyPainter {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<String> {
        if request.prompt.contains("(fail)") {
            Err(Error::provider_status("flaky", "service unavailable", 503))
        } else {
            Ok(PNG_B64.to_string())
        }
    }
}

fn ocean_config() -> PresentationConfig {
    PresentationConfig {
        topic: "Ocean Conservation".into(),
        purpose: Purpose::Educational,
        audience: "High school students".into(),
        slide_count: 3,
        key_points: vec!["Plastic pollution".into(), String::new(), "Coral reefs".into()],
        style: ThemeId::Oasis,
        ..Default::default()
    }
}

async fn build_ocean_deck() -> Presentation {
    let assembler = Assembler::new(
        ContentClient::new(Arc::new(CannedModel)),
        ImageClient::new(Arc::new(FlakyPainter)),
    );
    assembler.build(&ocean_config()).await.unwrap()
}

#[tokio::test]
async fn ocean_deck_exports_with_theme_and_references() {
    let deck = build_ocean_deck().await;
    assert_eq!(deck.slides.len(), 3);
    assert!(deck.slides[0].image().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(
        deck.slides[1].image(),
        Some(stock_image_url("plastic bottles floating at sea (fail)").as_str())
    );

    let summary = pptx::inspect(&pptx::render(&deck).unwrap()).unwrap();
    assert_eq!(summary.title.as_deref(), Some("Ocean Conservation"));
    assert_eq!(summary.author.as_deref(), Some("AI Presentation Generator"));
    assert_eq!(summary.slides.len(), 4);
    assert!(summary.slides.iter().all(|s| s.background.as_deref() == Some("F0FDF4")));

    let first = &summary.slides[0];
    assert_eq!(first.texts[0], "Ocean Conservation");
    assert_eq!(first.texts[1], "Protecting the blue heart of the planet");
    assert_eq!(first.texts[2], "NOAA Ocean Facts 2023");
    assert_eq!(first.images, vec![ImageRef::Embedded("ppt/media/image1.png".into())]);
    assert_eq!(
        first.notes.as_deref(),
        Some("Welcome everyone.\nAsk who has visited a beach this year.")
    );

    let second = &summary.slides[1];
    assert_eq!(second.texts.len(), 2);
    assert_eq!(second.texts[1], "8 million tonnes enter the ocean each year\nMost of it comes from land");
    assert!(matches!(&second.images[..], [ImageRef::Linked(url)] if url.contains("source.unsplash.com")));
    assert!(second.notes.is_none());

    let third = &summary.slides[2];
    assert_eq!(third.images, vec![ImageRef::Embedded("ppt/media/image2.png".into())]);
    assert_eq!(third.notes.as_deref(), Some("Pause for questions."));

    let references = &summary.slides[3];
    assert_eq!(
        references.texts,
        vec![
            "References".to_string(),
            "NOAA Ocean Facts 2023\n\nUNEP Marine Litter Report 2021".to_string(),
        ]
    );
    assert_eq!(references.pictures, 0);
    assert_eq!(summary.picture_count(), 3);
}

#[tokio::test]
async fn rendering_is_repeatable() {
    let deck = build_ocean_deck().await;
    let first = pptx::inspect(&pptx::render(&deck).unwrap()).unwrap();
    let second = pptx::inspect(&pptx::render(&deck).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn edited_slide_survives_export() {
    let deck = build_ocean_deck().await;
    let mut session = EditingSession::new(ImageClient::stock_only());
    session.load(deck);

    let mut edited = session.presentation().unwrap().slide(&SlideId::for_index(2)).cloned().unwrap();
    edited.content = "Reefs are rainforests of the sea".into();
    edited.image_url = None;
    session.apply_edit(edited).await.unwrap();

    let deck = session.take().unwrap();
    assert!(deck.updated_at >= deck.created_at);

    let dir = tempfile::tempdir().unwrap();
    let path = pptx::export(&deck, dir.path()).unwrap();
    assert!(path.ends_with("ocean_conservation_presentation.pptx"));

    let summary = pptx::inspect(&fs_err::read(&path).unwrap()).unwrap();
    let slide = &summary.slides[2];
    assert_eq!(slide.texts[1], "Reefs are rainforests of the sea");
    assert_eq!(slide.images, vec![ImageRef::Linked(stock_image_url("Coral Reefs"))]);
    assert_eq!(summary.slides[0].texts[0], "Ocean Conservation");
}

#[tokio::test]
async fn slide_without_image_spans_full_width() {
    let mut deck = build_ocean_deck().await;
    deck.slides[0].image_url = None;
    deck.references = None;

    let summary = pptx::inspect(&pptx::render(&deck).unwrap()).unwrap();
    assert_eq!(summary.slides.len(), 3);
    assert_eq!(summary.slides[0].pictures, 0);
    assert_eq!(summary.slides[0].texts[1], "Protecting the blue heart of the planet");
}
