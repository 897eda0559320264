//! Slide image references.
//!
//! Remote URLs are linked from the package; `data:` URIs are decoded and
//! stored inside it.

use crate::error::{Error, Result};
use super::model::PictureSource;

/// Raster formats that can be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// PNG
    Png,
    /// JPEG
    Jpeg,
    /// GIF
    Gif,
    /// BMP
    Bmp,
}

impl ImageFormat {
    /// File extension used for the media part.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// MIME type recorded in the content types part.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    /// Format named by a MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Format detected from leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }
}

/// Decode a base64 `data:` URI into bytes and a format.
///
/// The declared MIME type wins when recognized, then the magic bytes, then PNG.
pub fn decode_data_uri(uri: &str) -> Result<(Vec<u8>, ImageFormat)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::export("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::export("data URI has no payload"))?;

    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or_default();
    if !parts.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(Error::export("only base64 data URIs are supported"));
    }

    let data = base64::decode(payload.trim())
        .map_err(|e| Error::export(format!("invalid base64 image data: {e}")))?;
    if data.is_empty() {
        return Err(Error::export("data URI contains no image data"));
    }

    let format = ImageFormat::from_mime(mime)
        .or_else(|| ImageFormat::sniff(&data))
        .unwrap_or(ImageFormat::Png);
    Ok((data, format))
}

/// Turn a slide's image reference into a picture source.
pub fn picture_source(url: &str) -> Result<PictureSource> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(PictureSource::Linked(url.to_string()))
    } else if lower.starts_with("data:") {
        let (data, format) = decode_data_uri(url)?;
        Ok(PictureSource::Embedded { data, format })
    } else {
        Err(Error::export(format!("unsupported image reference '{}'", truncate(url, 40))))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
