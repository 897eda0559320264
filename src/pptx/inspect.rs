//! Read exported `.pptx` packages back into a summary.
//!
//! Only understands what the exporter writes: text boxes, pictures, solid
//! backgrounds and notes slides, with slides named `slideN.xml` in order.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::Result;

/// Where a picture's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// External link to a URL.
    Linked(String),
    /// Media part inside the package.
    Embedded(String),
}

/// What one slide contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideSummary {
    /// Text of each text box, paragraphs joined by `\n`.
    pub texts: Vec<String>,
    /// Solid background color.
    pub background: Option<String>,
    /// Number of picture shapes.
    pub pictures: usize,
    /// Image relationships of the slide.
    pub images: Vec<ImageRef>,
    /// Speaker notes, paragraphs joined by `\n`.
    pub notes: Option<String>,
}

/// What a whole package contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSummary {
    /// Title metadata.
    pub title: Option<String>,
    /// Author metadata.
    pub author: Option<String>,
    /// Slides in order.
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    /// Total number of pictures across all slides.
    pub fn picture_count(&self) -> usize {
        self.slides.iter().map(|s| s.pictures).sum()
    }
}

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut out = String::new();
    file.read_to_string(&mut out)?;
    Ok(Some(out))
}

/// Summarize a `.pptx` package.
pub fn inspect(bytes: &[u8]) -> Result<DeckSummary> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut summary = DeckSummary::default();

    if let Some(core) = read_part(&mut archive, "docProps/core.xml")? {
        summary.title = element_text(&core, b"dc:title")?;
        summary.author = element_text(&core, b"dc:creator")?;
    }

    for n in 1.. {
        let Some(xml) = read_part(&mut archive, &format!("ppt/slides/slide{n}.xml"))? else {
            break;
        };
        let mut slide = parse_slide(&xml)?;

        if let Some(rels) = read_part(&mut archive, &format!("ppt/slides/_rels/slide{n}.xml.rels"))? {
            let (images, notes_target) = parse_slide_rels(&rels)?;
            slide.images = images;
            if let Some(target) = notes_target {
                let part = resolve_target(&target);
                if let Some(notes) = read_part(&mut archive, &part)? {
                    let texts = parse_slide(&notes)?.texts;
                    slide.notes = Some(texts.join("\n"));
                }
            }
        }
        summary.slides.push(slide);
    }

    Ok(summary)
}

/// Resolve a slide-relative target like `../media/image1.png` to a part name.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix("../") {
        Some(rest) => format!("ppt/{rest}"),
        None => format!("ppt/slides/{target}"),
    }
}

/// Text of the first element with the given qualified name.
fn element_text(xml: &str, name: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == name => inside = true,
            Event::Text(t) if inside => text.push_str(&t.unescape()?),
            Event::End(e) if e.name().as_ref() == name => return Ok(Some(text)),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Text boxes, background and pictures of a slide or notes part.
fn parse_slide(xml: &str) -> Result<SlideSummary> {
    let mut reader = Reader::from_str(xml);
    let mut slide = SlideSummary::default();

    let mut in_background = false;
    let mut in_text_run = false;
    let mut paragraphs: Option<Vec<String>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:bg" => in_background = true,
                b"p:txBody" => paragraphs = Some(Vec::new()),
                b"a:p" => {
                    if let Some(p) = paragraphs.as_mut() {
                        p.push(String::new());
                    }
                }
                b"a:t" => in_text_run = true,
                b"p:pic" => slide.pictures += 1,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"a:srgbClr" if in_background => {
                    if let Some(val) = e.try_get_attribute("val")? {
                        slide.background = Some(val.unescape_value()?.into_owned());
                    }
                }
                b"a:p" => {
                    if let Some(p) = paragraphs.as_mut() {
                        p.push(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                if let Some(last) = paragraphs.as_mut().and_then(|p| p.last_mut()) {
                    last.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"p:bg" => in_background = false,
                b"a:t" => in_text_run = false,
                b"p:txBody" => {
                    if let Some(p) = paragraphs.take() {
                        slide.texts.push(p.join("\n"));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(slide)
}

/// Image references and the notes slide target from a slide's relationships.
fn parse_slide_rels(xml: &str) -> Result<(Vec<ImageRef>, Option<String>)> {
    let mut reader = Reader::from_str(xml);
    let mut images = Vec::new();
    let mut notes = None;

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                let attr = |name: &str| -> Result<Option<String>> {
                    Ok(match e.try_get_attribute(name)? {
                        Some(a) => Some(a.unescape_value()?.into_owned()),
                        None => None,
                    })
                };
                let kind = attr("Type")?.unwrap_or_default();
                let Some(target) = attr("Target")? else {
                    continue;
                };
                let external = attr("TargetMode")?.as_deref() == Some("External");

                if kind.ends_with("/image") {
                    images.push(if external {
                        ImageRef::Linked(target)
                    } else {
                        ImageRef::Embedded(resolve_target(&target))
                    });
                } else if kind.ends_with("/notesSlide") {
                    notes = Some(target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((images, notes))
}
