//! OOXML package serialization.
//!
//! Writes a [`DeckDocument`] as a PresentationML zip package. Slide parts are
//! built as strings; relationships are assigned before any slide XML is
//! written so shapes can reference their real ids.

use chrono::SecondsFormat;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::constants::layout::{NOTES_HEIGHT_EMU, NOTES_WIDTH_EMU, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use crate::error::Result;
use super::media::ImageFormat;
use super::model::{DeckDocument, DeckSlide, Frame, Picture, PictureSource, Shape, TextBox};
use super::template;

const NS_DECL: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#,
);
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_NOTES_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
const REL_SLIDE_LAYOUT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

/// Whether XML 1.0 allows `c` in character data.
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escape text for XML, dropping characters XML 1.0 does not allow.
fn xml_text(text: &str) -> String {
    if text.chars().all(is_xml_char) {
        escape(text).into_owned()
    } else {
        let kept: String = text.chars().filter(|&c| is_xml_char(c)).collect();
        escape(&kept).into_owned()
    }
}

/// Relationship from a slide to one of its pictures.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageRel {
    id: String,
    target: String,
    external: bool,
}

/// An embedded image stored under `ppt/media/`.
struct MediaPart<'a> {
    name: String,
    data: &'a [u8],
}

/// Relationship ids for one slide, in picture order.
struct SlideRels {
    images: Vec<ImageRel>,
    notes: Option<String>,
}

/// Assign relationship ids and media part names for every slide.
fn plan_relationships(doc: &DeckDocument) -> (Vec<SlideRels>, Vec<MediaPart<'_>>, Vec<ImageFormat>) {
    let mut media = Vec::new();
    let mut formats = Vec::new();
    let mut plans = Vec::with_capacity(doc.slides.len());

    for slide in &doc.slides {
        let mut next_rid = 2;
        let mut images = Vec::new();
        for picture in slide.pictures() {
            let id = format!("rId{next_rid}");
            next_rid += 1;
            match &picture.source {
                PictureSource::Linked(url) => images.push(ImageRel {
                    id,
                    target: url.clone(),
                    external: true,
                }),
                PictureSource::Embedded { data, format } => {
                    let name = format!("image{}.{}", media.len() + 1, format.extension());
                    images.push(ImageRel {
                        id,
                        target: format!("../media/{name}"),
                        external: false,
                    });
                    if !formats.contains(format) {
                        formats.push(*format);
                    }
                    media.push(MediaPart { name, data });
                }
            }
        }
        let notes = slide.notes.as_ref().map(|_| format!("rId{next_rid}"));
        plans.push(SlideRels { images, notes });
    }

    (plans, media, formats)
}

/// Serialize a document to `.pptx` bytes.
pub fn write_package(doc: &DeckDocument) -> Result<Vec<u8>> {
    let (rels, media, formats) = plan_relationships(doc);
    let has_notes = doc.has_notes();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let put = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, data: &[u8]| -> Result<()> {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        Ok(())
    };

    put(&mut zip, "[Content_Types].xml", content_types_xml(doc, &formats)?.as_bytes())?;
    put(&mut zip, "_rels/.rels", template::ROOT_RELS.as_bytes())?;
    put(&mut zip, "docProps/core.xml", core_xml(doc)?.as_bytes())?;
    put(&mut zip, "docProps/app.xml", app_xml(doc)?.as_bytes())?;

    put(&mut zip, "ppt/presentation.xml", presentation_xml(doc)?.as_bytes())?;
    put(&mut zip, "ppt/_rels/presentation.xml.rels", presentation_rels_xml(doc)?.as_bytes())?;
    put(&mut zip, "ppt/presProps.xml", template::PRES_PROPS.as_bytes())?;
    put(&mut zip, "ppt/viewProps.xml", template::VIEW_PROPS.as_bytes())?;
    put(&mut zip, "ppt/tableStyles.xml", template::TABLE_STYLES.as_bytes())?;
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml", template::SLIDE_MASTER.as_bytes())?;
    put(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", template::SLIDE_MASTER_RELS.as_bytes())?;
    put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", template::SLIDE_LAYOUT.as_bytes())?;
    put(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", template::SLIDE_LAYOUT_RELS.as_bytes())?;
    put(&mut zip, "ppt/theme/theme1.xml", template::THEME.as_bytes())?;

    if has_notes {
        put(&mut zip, "ppt/notesMasters/notesMaster1.xml", template::NOTES_MASTER.as_bytes())?;
        put(&mut zip, "ppt/notesMasters/_rels/notesMaster1.xml.rels", template::NOTES_MASTER_RELS.as_bytes())?;
        put(&mut zip, "ppt/theme/theme2.xml", template::THEME.as_bytes())?;
    }

    for (index, (slide, plan)) in doc.slides.iter().zip(&rels).enumerate() {
        let n = index + 1;
        put(&mut zip, &format!("ppt/slides/slide{n}.xml"), slide_xml(slide, &plan.images)?.as_bytes())?;
        put(&mut zip, &format!("ppt/slides/_rels/slide{n}.xml.rels"), slide_rels_xml(n, plan)?.as_bytes())?;

        if let Some(notes) = &slide.notes {
            put(&mut zip, &format!("ppt/notesSlides/notesSlide{n}.xml"), notes_xml(notes)?.as_bytes())?;
            put(&mut zip, &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"), notes_rels_xml(n)?.as_bytes())?;
        }
    }

    for part in &media {
        put(&mut zip, &format!("ppt/media/{}", part.name), part.data)?;
    }

    let cursor = zip.finish()?;
    tracing::debug!(
        "Wrote package with {} slides and {} embedded images",
        doc.slides.len(),
        media.len()
    );
    Ok(cursor.into_inner())
}

fn content_types_xml(doc: &DeckDocument, formats: &[ImageFormat]) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for format in formats {
        write!(
            xml,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            format.extension(),
            format.content_type()
        )?;
    }

    let overrides = [
        ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
        ("/ppt/presProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"),
        ("/ppt/viewProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"),
        ("/ppt/tableStyles.xml", "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
        ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
    ];
    for (part, content_type) in overrides {
        write!(xml, r#"<Override PartName="{part}" ContentType="{content_type}"/>"#)?;
    }

    if doc.has_notes() {
        xml.push_str(r#"<Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    }

    for (index, slide) in doc.slides.iter().enumerate() {
        let n = index + 1;
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        )?;
        if slide.notes.is_some() {
            write!(
                xml,
                r#"<Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml"/>"#
            )?;
        }
    }

    xml.push_str("</Types>");
    Ok(xml)
}

fn core_xml(doc: &DeckDocument) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    write!(xml, "<dc:title>{}</dc:title>", xml_text(&doc.title))?;
    write!(xml, "<dc:creator>{}</dc:creator>", xml_text(&doc.author))?;
    write!(xml, "<cp:lastModifiedBy>{}</cp:lastModifiedBy>", xml_text(&doc.author))?;
    write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        doc.created.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    write!(
        xml,
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        doc.modified.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

fn app_xml(doc: &DeckDocument) -> Result<String> {
    let notes = doc.slides.iter().filter(|s| s.notes.is_some()).count();
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    write!(xml, "<Application>{}</Application>", env!("CARGO_PKG_NAME"))?;
    xml.push_str("<PresentationFormat>On-screen Show (16:9)</PresentationFormat>");
    write!(xml, "<Slides>{}</Slides><Notes>{notes}</Notes>", doc.slides.len())?;
    xml.push_str("</Properties>");
    Ok(xml)
}

/// Relationship id of slide `index` (0-based) in the presentation part.
fn slide_rel_id(index: usize) -> String {
    format!("rId{}", index + 3)
}

fn presentation_xml(doc: &DeckDocument) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:presentation {NS_DECL} saveSubsetFonts="1">"#)?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if doc.has_notes() {
        write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            slide_rel_id(doc.slides.len() + 3)
        )?;
    }
    if !doc.slides.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for index in 0..doc.slides.len() {
            write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + index, slide_rel_id(index))?;
        }
        xml.push_str("</p:sldIdLst>");
    }
    write!(xml, r#"<p:sldSz cx="{SLIDE_WIDTH_EMU}" cy="{SLIDE_HEIGHT_EMU}"/>"#)?;
    write!(xml, r#"<p:notesSz cx="{NOTES_WIDTH_EMU}" cy="{NOTES_HEIGHT_EMU}"/>"#)?;
    xml.push_str("</p:presentation>");
    Ok(xml)
}

fn presentation_rels_xml(doc: &DeckDocument) -> Result<String> {
    let base = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    write!(xml, r#"<Relationship Id="rId1" Type="{base}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#)?;
    write!(xml, r#"<Relationship Id="rId2" Type="{base}/theme" Target="theme/theme1.xml"/>"#)?;
    for index in 0..doc.slides.len() {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{base}/slide" Target="slides/slide{}.xml"/>"#,
            slide_rel_id(index),
            index + 1
        )?;
    }
    let after_slides = doc.slides.len();
    write!(xml, r#"<Relationship Id="{}" Type="{base}/presProps" Target="presProps.xml"/>"#, slide_rel_id(after_slides))?;
    write!(xml, r#"<Relationship Id="{}" Type="{base}/viewProps" Target="viewProps.xml"/>"#, slide_rel_id(after_slides + 1))?;
    write!(xml, r#"<Relationship Id="{}" Type="{base}/tableStyles" Target="tableStyles.xml"/>"#, slide_rel_id(after_slides + 2))?;
    if doc.has_notes() {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{base}/notesMaster" Target="notesMasters/notesMaster1.xml"/>"#,
            slide_rel_id(after_slides + 3)
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn slide_rels_xml(n: usize, plan: &SlideRels) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    write!(
        xml,
        r#"<Relationship Id="rId1" Type="{REL_SLIDE_LAYOUT}" Target="../slideLayouts/slideLayout1.xml"/>"#
    )?;
    for image in &plan.images {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{REL_IMAGE}" Target="{}"{}/>"#,
            image.id,
            xml_text(&image.target),
            if image.external { r#" TargetMode="External""# } else { "" }
        )?;
    }
    if let Some(id) = &plan.notes {
        write!(
            xml,
            r#"<Relationship Id="{id}" Type="{REL_NOTES_SLIDE}" Target="../notesSlides/notesSlide{n}.xml"/>"#
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn notes_rels_xml(n: usize) -> Result<String> {
    let base = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    write!(xml, r#"<Relationship Id="rId1" Type="{base}/notesMaster" Target="../notesMasters/notesMaster1.xml"/>"#)?;
    write!(xml, r#"<Relationship Id="rId2" Type="{base}/slide" Target="../slides/slide{n}.xml"/>"#)?;
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn write_group_header(xml: &mut String) {
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
}

fn write_xfrm(xml: &mut String, frame: Frame) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )?;
    Ok(())
}

fn slide_xml(slide: &DeckSlide, images: &[ImageRel]) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(xml, "<p:sld {NS_DECL}>")?;
    xml.push_str("<p:cSld>");
    if let Some(color) = &slide.background {
        write!(
            xml,
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
        )?;
    }
    xml.push_str("<p:spTree>");
    write_group_header(&mut xml);

    let mut images = images.iter();
    for (index, shape) in slide.shapes.iter().enumerate() {
        let shape_id = index + 2;
        match shape {
            Shape::Text(text) => write_text_box(&mut xml, shape_id, text)?,
            Shape::Picture(picture) => {
                let Some(rel) = images.next() else {
                    continue;
                };
                write_picture(&mut xml, shape_id, picture, rel)?;
            }
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

fn write_text_box(xml: &mut String, shape_id: usize, text: &TextBox) -> Result<()> {
    xml.push_str("<p:sp><p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{shape_id}" name="TextBox {shape_id}"/>"#)?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
    xml.push_str("<p:spPr>");
    write_xfrm(xml, text.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);

    let style = &text.style;
    let mut run_props = String::with_capacity(128);
    write!(run_props, r#"lang="en-US" sz="{}""#, style.size * 100)?;
    if style.bold {
        run_props.push_str(r#" b="1""#);
    }
    if style.italic {
        run_props.push_str(r#" i="1""#);
    }
    run_props.push_str(r#" dirty="0""#);

    for paragraph in &text.paragraphs {
        xml.push_str("<a:p>");
        if paragraph.is_empty() {
            write!(xml, "<a:endParaRPr {run_props}/>")?;
        } else {
            write!(xml, "<a:r><a:rPr {run_props}>")?;
            write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, style.color)?;
            if let Some(font) = style.font {
                write!(xml, r#"<a:latin typeface="{}"/>"#, escape(font))?;
            }
            write!(xml, "</a:rPr><a:t>{}</a:t></a:r>", xml_text(paragraph))?;
        }
        xml.push_str("</a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_picture(xml: &mut String, shape_id: usize, picture: &Picture, rel: &ImageRel) -> Result<()> {
    xml.push_str("<p:pic><p:nvPicPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{shape_id}" name="Picture {shape_id}" descr="{}"/>"#,
        xml_text(&picture.description)
    )?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
    xml.push_str("<p:blipFill>");
    let attr = if rel.external { "r:link" } else { "r:embed" };
    write!(xml, r#"<a:blip {attr}="{}"/>"#, rel.id)?;
    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");
    xml.push_str("<p:spPr>");
    write_xfrm(xml, picture.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
    Ok(())
}

fn notes_xml(paragraphs: &[String]) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(xml, "<p:notes {NS_DECL}>")?;
    xml.push_str("<p:cSld><p:spTree>");
    write_group_header(&mut xml);
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Notes Placeholder 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#);
    xml.push_str("<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>");
    for paragraph in paragraphs {
        if paragraph.is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
        } else {
            write!(
                xml,
                r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                xml_text(paragraph)
            )?;
        }
    }
    xml.push_str("</p:txBody></p:sp>");
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::pptx::model::TextStyle;
    use std::io::Read;

    fn sample() -> DeckDocument {
        let mut doc = DeckDocument::new("Tides & Currents", "Tester");
        let slide = doc.add_slide();
        slide.set_background("F0FDF4");
        slide.add_text(Frame::percent(5, 5, 90, 15), "Tides <intro>", TextStyle::new(36, "374151").bold());
        slide.add_picture(
            Frame::percent(5, 25, 40, 40),
            PictureSource::Linked("https://img.example/a.png?x=1&y=2".into()),
            "tide pool",
        );
        slide.set_notes("say hello");

        let slide = doc.add_slide();
        slide.add_picture(
            Frame::percent(5, 25, 40, 40),
            PictureSource::Embedded { data: vec![1, 2, 3], format: ImageFormat::Png },
            "embedded",
        );
        doc
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn package_contains_required_parts() {
        let bytes = write_package(&sample()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/notesSlides/notesSlide1.xml",
            "ppt/notesMasters/notesMaster1.xml",
            "ppt/media/image1.png",
        ] {
            assert!(names.contains(&required), "missing {required}");
        }
        assert!(!names.contains(&"ppt/notesSlides/notesSlide2.xml"));
    }

    #[test]
    fn linked_and_embedded_images_use_distinct_relationships() {
        let bytes = write_package(&sample()).unwrap();

        let rels1 = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels1.contains(r#"Target="https://img.example/a.png?x=1&amp;y=2" TargetMode="External""#));
        assert!(rels1.contains("notesSlide1.xml"));
        assert!(read_part(&bytes, "ppt/slides/slide1.xml").contains(r#"<a:blip r:link="rId2"/>"#));

        let rels2 = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels2.contains(r#"Target="../media/image1.png""#));
        assert!(read_part(&bytes, "ppt/slides/slide2.xml").contains(r#"<a:blip r:embed="rId2"/>"#));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
    }

    #[test]
    fn text_is_escaped() {
        let bytes = write_package(&sample()).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Tides &lt;intro&gt;</a:t>"));
        assert!(slide.contains(r#"sz="3600" b="1""#));
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Tides &amp; Currents</dc:title>"));
    }

    #[test]
    fn control_characters_are_dropped() {
        let mut doc = DeckDocument::new("Bad\u{1}title", "Tester");
        let slide = doc.add_slide();
        slide.add_text(Frame::percent(5, 5, 90, 15), "bad\u{1}char\u{b}", TextStyle::new(20, "000000"));
        slide.add_picture(
            Frame::percent(5, 25, 40, 40),
            PictureSource::Linked("https://img.example/a.png".into()),
            "reef\u{1f}",
        );
        slide.set_notes("tab\tkept\u{0}");

        let bytes = write_package(&doc).unwrap();
        let forbidden = |xml: &str| xml.chars().any(|c| (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r'));
        for part in ["ppt/slides/slide1.xml", "ppt/notesSlides/notesSlide1.xml", "docProps/core.xml"] {
            assert!(!forbidden(&read_part(&bytes, part)), "control character left in {part}");
        }

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains("<a:t>badchar</a:t>"));
        assert!(slide_xml.contains(r#"descr="reef""#));
        assert!(read_part(&bytes, "ppt/notesSlides/notesSlide1.xml").contains("<a:t>tab\tkept</a:t>"));
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Badtitle</dc:title>"));
    }

    #[test]
    fn presentation_lists_every_slide() {
        let bytes = write_package(&sample()).unwrap();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        assert!(pres.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(pres.contains(r#"<p:sldId id="257" r:id="rId4"/>"#));
        assert!(pres.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        assert!(pres.contains(r#"<p:notesMasterId r:id="rId8"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster""#));
    }

    #[test]
    fn documents_without_notes_skip_notes_master() {
        let mut doc = DeckDocument::new("Plain", "Tester");
        doc.add_slide().set_background("FFFFFF");
        let bytes = write_package(&doc).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert!(!archive.file_names().any(|n| n.starts_with("ppt/notesMasters")));
        assert!(!read_part(&bytes, "ppt/presentation.xml").contains("notesMasterIdLst"));
    }
}
