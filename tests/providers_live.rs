//! Live tests against the hosted content and image providers.

// Only runs with `--features integration_test`; each test skips itself when
// the matching credential is missing.
#![cfg(feature = "integration_test")]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use deckgen::config::Config;
use deckgen::services::content::{ContentClient, ContentRequest};
use deckgen::services::image::{ImageClient, ImageOptions, ResolvedImage};
use deckgen::types::{ContentLength, Purpose};

fn content_client() -> Option<ContentClient> {
    match ContentClient::from_config(&Config::load()) {
        Ok(client) => Some(client),
        Err(e) => {
            println!("Skipping integration test: {e}");
            None
        }
    }
}

#[tokio::test]
async fn test_generate_content() {
    let Some(client) = content_client() else {
        return;
    };

    let request = ContentRequest {
        topic: "Ocean Conservation",
        purpose: Purpose::Educational,
        audience: "high school students",
        key_points: vec!["coral reefs", "plastic pollution"],
        slide_count: 3,
        content_length: ContentLength::Brief,
    };

    match client.generate(&request).await {
        Ok(content) => {
            println!("Generated {} slides, {} references", content.slides.len(), content.references.len());
            assert!(!content.slides.is_empty());
            assert!(content.slides.iter().all(|s| !s.title.trim().is_empty()));
        }
        Err(e) => panic!("generate failed: {}", e.user_message()),
    }
}

#[tokio::test]
async fn test_generate_image() {
    let config = Config::load();
    if !config.has_image_credentials() {
        println!("Skipping integration test: TOGETHER_API_KEY not set");
        return;
    }

    let client = ImageClient::from_config(&config);
    let options = ImageOptions { width: Some(512), height: Some(512), steps: Some(20), ..Default::default() };
    match client.resolve("a sea turtle swimming over a coral reef", &options).await {
        ResolvedImage::Generated(uri) => assert!(uri.starts_with("data:image/png;base64,")),
        other => panic!("expected a generated image, got {other:?}"),
    }
}
