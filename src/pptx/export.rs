//! Export presentations to `.pptx` files.
//!
//! Lays out each slide with a title, an optional picture, the body text, and
//! a sources block, then appends a references slide.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::constants::layout::{
    AUTHOR, BODY_FONT, BODY_SIZE, REFERENCES_SIZE, REFERENCES_TITLE, SOURCES_SIZE, TITLE_FONT,
    TITLE_SIZE,
};
use crate::error::{Error, Result};
use crate::theme::{self, ExportColors};
use crate::types::{Presentation, Slide};
use super::media::picture_source;
use super::model::{DeckDocument, Frame, TextStyle};
use super::package::write_package;

#[allow(clippy::expect_used)]
static RE_FILE_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid regex: RE_FILE_STEM"));

/// Slide regions, as percentages of the slide.
mod region {
    use super::Frame;

    pub const TITLE: Frame = Frame::percent(5, 5, 90, 15);
    pub const IMAGE: Frame = Frame::percent(5, 25, 40, 40);
    pub const BODY_BESIDE_IMAGE: Frame = Frame::percent(50, 25, 45, 50);
    pub const BODY_FULL: Frame = Frame::percent(5, 25, 90, 50);
    pub const SOURCES: Frame = Frame::percent(5, 80, 90, 15);
    pub const REFERENCES: Frame = Frame::percent(5, 25, 90, 70);
}

/// Lower-cased topic with every non-alphanumeric character replaced by `_`.
pub fn sanitize_file_stem(topic: &str) -> String {
    RE_FILE_STEM.replace_all(topic, "_").to_lowercase()
}

/// File name an exported presentation is saved under.
pub fn file_name(presentation: &Presentation) -> String {
    format!("{}_presentation.pptx", sanitize_file_stem(&presentation.config.topic))
}

/// Build the slide document for a presentation.
pub fn build_document(presentation: &Presentation) -> DeckDocument {
    let colors = theme::resolve(presentation.config.style).export;
    let mut doc = DeckDocument::new(&presentation.config.topic, AUTHOR)
        .with_timestamps(presentation.created_at, presentation.updated_at);

    for slide in &presentation.slides {
        add_content_slide(&mut doc, slide, &colors);
    }

    let references = presentation.reference_list();
    if !references.is_empty() {
        let page = doc.add_slide();
        page.set_background(colors.background);
        page.add_text(region::TITLE, REFERENCES_TITLE, title_style(&colors));
        page.add_text(
            region::REFERENCES,
            &references.join("\n\n"),
            TextStyle::new(REFERENCES_SIZE, colors.text).font(BODY_FONT),
        );
    }

    doc
}

fn title_style(colors: &ExportColors) -> TextStyle {
    TextStyle::new(TITLE_SIZE, colors.text).bold().font(TITLE_FONT)
}

fn add_content_slide(doc: &mut DeckDocument, slide: &Slide, colors: &ExportColors) {
    let page = doc.add_slide();
    page.set_background(colors.background);
    page.add_text(region::TITLE, &slide.title, title_style(colors));

    let mut has_picture = false;
    if let Some(url) = slide.image() {
        match picture_source(url) {
            Ok(source) => {
                page.add_picture(region::IMAGE, source, &slide.title);
                has_picture = true;
            }
            Err(e) => tracing::warn!("Skipping image on slide {}: {e}", slide.id),
        }
    }

    let body = if has_picture { region::BODY_BESIDE_IMAGE } else { region::BODY_FULL };
    page.add_text(body, &slide.content, TextStyle::new(BODY_SIZE, colors.text).font(BODY_FONT));

    let sources = slide.citations();
    if !sources.is_empty() {
        page.add_text(
            region::SOURCES,
            &sources.join("\n"),
            TextStyle::new(SOURCES_SIZE, colors.text).italic().font(BODY_FONT),
        );
    }

    if let Some(notes) = slide.speaker_notes() {
        page.set_notes(notes);
    }
}

/// Render a presentation to `.pptx` bytes.
pub fn render(presentation: &Presentation) -> Result<Vec<u8>> {
    let doc = build_document(presentation);
    write_package(&doc).map_err(|e| match e {
        Error::Export(_) => e,
        other => Error::export(other.to_string()),
    })
}

/// Export a presentation into `dir`, returning the written file path.
pub fn export(presentation: &Presentation, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let bytes = render(presentation)?;

    fs_err::create_dir_all(dir).map_err(|e| Error::io(e, dir.to_path_buf()))?;
    let path = dir.join(file_name(presentation));
    fs_err::write(&path, &bytes).map_err(|e| Error::io(e, path.clone()))?;

    tracing::info!(
        "Exported {} slides to {} ({} bytes)",
        presentation.slides.len(),
        path.display(),
        bytes.len()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::pptx::model::{PictureSource, Shape};
    use crate::theme::ThemeId;
    use crate::types::{PresentationConfig, PresentationId, SlideId};
    use chrono::Utc;

    fn slide(i: usize, image: Option<&str>) -> Slide {
        Slide {
            id: SlideId::for_index(i),
            title: format!("Slide {i}"),
            content: "Line one\nLine two".into(),
            notes: Some(format!("Notes {i}")),
            image_url: image.map(String::from),
            sources: Some(vec!["NOAA".into(), "UNEP".into()]),
        }
    }

    fn deck(slides: Vec<Slide>, references: Option<Vec<String>>) -> Presentation {
        let now = Utc::now();
        Presentation {
            id: PresentationId::new(),
            config: PresentationConfig {
                topic: "Ocean Conservation".into(),
                style: ThemeId::Oasis,
                ..Default::default()
            },
            slides,
            references,
            created_at: now,
            updated_at: now,
        }
    }

    fn text_frames(doc: &DeckDocument, slide: usize) -> Vec<(Frame, Vec<String>)> {
        doc.slides[slide]
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text(t) => Some((t.frame, t.paragraphs.clone())),
                Shape::Picture(_) => None,
            })
            .collect()
    }

    #[test]
    fn file_stem_is_sanitized() {
        assert_eq!(sanitize_file_stem("Ocean Conservation"), "ocean_conservation");
        assert_eq!(sanitize_file_stem("Q3: Sales/Plan!"), "q3__sales_plan_");
        assert_eq!(sanitize_file_stem("Café"), "caf_");
    }

    #[test]
    fn body_moves_right_when_picture_present() {
        let doc = build_document(&deck(
            vec![slide(0, Some("https://img.example/a.png")), slide(1, None)],
            None,
        ));

        let with_image = text_frames(&doc, 0);
        assert_eq!(with_image[1].0, region::BODY_BESIDE_IMAGE);
        assert!(matches!(
            doc.slides[0].pictures().next().unwrap().source,
            PictureSource::Linked(_)
        ));

        let without = text_frames(&doc, 1);
        assert_eq!(without[1].0, region::BODY_FULL);
        assert_eq!(doc.slides[1].pictures().count(), 0);
    }

    #[test]
    fn bad_image_is_skipped_and_body_spans_slide() {
        let doc = build_document(&deck(vec![slide(0, Some("data:image/png;base64,###"))], None));
        assert_eq!(doc.slides[0].pictures().count(), 0);
        assert_eq!(text_frames(&doc, 0)[1].0, region::BODY_FULL);
    }

    #[test]
    fn slides_use_theme_colors_and_sources() {
        let doc = build_document(&deck(vec![slide(0, None)], None));
        let page = &doc.slides[0];
        assert_eq!(page.background.as_deref(), Some("F0FDF4"));
        let texts = text_frames(&doc, 0);
        assert_eq!(texts[0].1, vec!["Slide 0"]);
        assert_eq!(texts[1].1, vec!["Line one", "Line two"]);
        assert_eq!(texts[2], (region::SOURCES, vec!["NOAA".to_string(), "UNEP".to_string()]));
        assert_eq!(page.notes, Some(vec!["Notes 0".to_string()]));
    }

    #[test]
    fn references_slide_is_appended() {
        let doc = build_document(&deck(
            vec![slide(0, None)],
            Some(vec!["Ref A".into(), "Ref B".into()]),
        ));
        assert_eq!(doc.slides.len(), 2);
        let texts = text_frames(&doc, 1);
        assert_eq!(texts[0].1, vec!["References"]);
        assert_eq!(texts[1].0, region::REFERENCES);
        assert_eq!(texts[1].1, vec!["Ref A", "", "Ref B"]);
    }

    #[test]
    fn body_sources_and_references_share_body_font() {
        let doc = build_document(&deck(vec![slide(0, None)], Some(vec!["Ref A".into()])));
        let fonts = |page: usize| -> Vec<Option<&'static str>> {
            doc.slides[page]
                .shapes
                .iter()
                .filter_map(|s| match s {
                    Shape::Text(t) => Some(t.style.font),
                    Shape::Picture(_) => None,
                })
                .collect()
        };
        assert_eq!(fonts(0), vec![Some(TITLE_FONT), Some(BODY_FONT), Some(BODY_FONT)]);
        assert_eq!(fonts(1), vec![Some(TITLE_FONT), Some(BODY_FONT)]);
    }

    #[test]
    fn no_references_slide_without_references() {
        let doc = build_document(&deck(vec![slide(0, None)], Some(vec![])));
        assert_eq!(doc.slides.len(), 1);
    }

    #[test]
    fn export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let presentation = deck(vec![slide(0, None)], None);
        let path = export(&presentation, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "ocean_conservation_presentation.pptx");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
