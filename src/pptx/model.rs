//! In-memory slide document.
//!
//! A [`DeckDocument`] is a flat list of slides, each holding positioned text
//! boxes and pictures. It knows nothing about the package format; see
//! [`super::package`] for serialization.

use chrono::{DateTime, Utc};

use crate::constants::layout::{SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use super::media::ImageFormat;

/// Position and size of a shape in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub cx: i64,
    /// Height.
    pub cy: i64,
}

impl Frame {
    /// Frame given as whole percentages of the slide size.
    pub const fn percent(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            x: SLIDE_WIDTH_EMU * x / 100,
            y: SLIDE_HEIGHT_EMU * y / 100,
            cx: SLIDE_WIDTH_EMU * w / 100,
            cy: SLIDE_HEIGHT_EMU * h / 100,
        }
    }
}

/// Character formatting applied to a whole text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Size in points.
    pub size: u32,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Latin typeface, if not the theme default.
    pub font: Option<&'static str>,
    /// Six-digit hex color.
    pub color: String,
}

impl TextStyle {
    /// Regular text of the given size and color.
    pub fn new(size: u32, color: &str) -> Self {
        Self { size, bold: false, italic: false, font: None, color: color.to_string() }
    }

    /// Set bold
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set italic
    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the typeface
    #[must_use]
    pub fn font(mut self, font: &'static str) -> Self {
        self.font = Some(font);
        self
    }
}

/// A text box. Each entry of `paragraphs` is one `<a:p>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    /// Placement.
    pub frame: Frame,
    /// Paragraph texts, possibly empty.
    pub paragraphs: Vec<String>,
    /// Formatting for every run.
    pub style: TextStyle,
}

/// Where a picture's pixels live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureSource {
    /// Remote image referenced by URL.
    Linked(String),
    /// Image bytes stored in the package.
    Embedded {
        /// Raw image bytes.
        data: Vec<u8>,
        /// Detected format.
        format: ImageFormat,
    },
}

/// A picture shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Placement.
    pub frame: Frame,
    /// Image data or link.
    pub source: PictureSource,
    /// Alternative text.
    pub description: String,
}

/// Any shape on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Text box
    Text(TextBox),
    /// Picture
    Picture(Picture),
}

/// One slide of a [`DeckDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSlide {
    /// Solid background color, six-digit hex.
    pub background: Option<String>,
    /// Shapes in z-order.
    pub shapes: Vec<Shape>,
    /// Speaker notes paragraphs.
    pub notes: Option<Vec<String>>,
}

impl DeckSlide {
    /// Set a solid background color.
    pub fn set_background(&mut self, hex: &str) {
        self.background = Some(hex.to_string());
    }

    /// Add a text box; `text` is split on newlines into paragraphs.
    pub fn add_text(&mut self, frame: Frame, text: &str, style: TextStyle) {
        self.shapes.push(Shape::Text(TextBox {
            frame,
            paragraphs: split_paragraphs(text),
            style,
        }));
    }

    /// Add a picture.
    pub fn add_picture(&mut self, frame: Frame, source: PictureSource, description: &str) {
        self.shapes.push(Shape::Picture(Picture {
            frame,
            source,
            description: description.to_string(),
        }));
    }

    /// Set speaker notes; `text` is split on newlines into paragraphs.
    pub fn set_notes(&mut self, text: &str) {
        self.notes = Some(split_paragraphs(text));
    }

    /// Pictures on this slide.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture(p) => Some(p),
            Shape::Text(_) => None,
        })
    }
}

/// A whole slide document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDocument {
    /// Document title metadata.
    pub title: String,
    /// Document author metadata.
    pub author: String,
    /// Creation time metadata.
    pub created: DateTime<Utc>,
    /// Last modification time metadata.
    pub modified: DateTime<Utc>,
    /// Slides in order.
    pub slides: Vec<DeckSlide>,
}

impl DeckDocument {
    /// Create an empty document.
    pub fn new(title: &str, author: &str) -> Self {
        let now = Utc::now();
        Self {
            title: title.to_string(),
            author: author.to_string(),
            created: now,
            modified: now,
            slides: Vec::new(),
        }
    }

    /// Set creation and modification times
    #[must_use]
    pub fn with_timestamps(mut self, created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    /// Append an empty slide and return it.
    pub fn add_slide(&mut self) -> &mut DeckSlide {
        self.slides.push(DeckSlide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Whether any slide carries speaker notes.
    pub fn has_notes(&self) -> bool {
        self.slides.iter().any(|s| s.notes.is_some())
    }
}

/// Split text on `\n` into paragraphs, keeping empty ones.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
