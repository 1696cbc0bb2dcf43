//! Image source resolution.
//!
//! Turns the `src` of an image node into embeddable bytes plus natural
//! dimensions. Embedded sources (data URIs and bare base64) are decoded in
//! place, remote sources go through an [`ImageFetcher`]. Decodable images are
//! normalized to PNG; anything else is embedded as-is with its format sniffed
//! from magic numbers and its size probed from the header.

use super::fetch::ImageFetcher;
use crate::common::unit::px_to_pt;
use crate::ooxml::docx::ImageFormat;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{debug, warn};

/// Size used when neither measurement nor header gives one.
pub const DEFAULT_IMAGE_WIDTH_PX: u32 = 400;
pub const DEFAULT_IMAGE_HEIGHT_PX: u32 = 300;

/// Errors raised while resolving a single image.
///
/// These never escape the resolver: a failed image is logged and omitted.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("empty image source")]
    Empty,

    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] crate::Error),
}

/// Classified image source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// `data:[mime][;base64],payload`
    DataUri {
        mime: Option<&'a str>,
        payload: &'a str,
        base64: bool,
    },
    /// Bare base64 payload
    Base64(&'a str),
    /// `http://` or `https://` URL
    Remote(&'a str),
}

impl<'a> ImageSource<'a> {
    pub fn parse(src: &'a str) -> Result<Self, ImageError> {
        let src = src.trim();
        if src.is_empty() {
            return Err(ImageError::Empty);
        }

        if let Some(rest) = strip_prefix_ignore_case(src, "data:") {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| ImageError::InvalidDataUri(describe(src)))?;
            let base64 = meta.to_ascii_lowercase().ends_with(";base64");
            let mime = meta.split(';').next().map(str::trim).filter(|m| !m.is_empty());
            return Ok(Self::DataUri {
                mime,
                payload,
                base64,
            });
        }

        if strip_prefix_ignore_case(src, "http://").is_some()
            || strip_prefix_ignore_case(src, "https://").is_some()
        {
            return Ok(Self::Remote(src));
        }

        if src
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=') || b.is_ascii_whitespace())
        {
            return Ok(Self::Base64(src));
        }

        Err(ImageError::UnsupportedSource(describe(src)))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Short form of a source for log lines; data URIs can be megabytes long.
fn describe(src: &str) -> String {
    match src.char_indices().nth(48) {
        Some((end, _)) => format!("{}...", &src[..end]),
        None => src.to_string(),
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, ImageError> {
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// Embeddable image bytes with their geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// Intrinsic size in px
    pub natural_width: u32,
    pub natural_height: u32,
    /// Size the surface rendered the image at, in px
    pub measured_width_px: Option<f64>,
    pub measured_height_px: Option<f64>,
}

impl ResolvedImage {
    /// Attach a display size. Non-positive sizes are ignored.
    pub fn with_measured(mut self, width_px: f64, height_px: f64) -> Self {
        if width_px > 0.0 && height_px > 0.0 {
            self.measured_width_px = Some(width_px);
            self.measured_height_px = Some(height_px);
        }
        self
    }

    /// Display size in px: measured when known, intrinsic otherwise.
    pub fn display_size_px(&self) -> (f64, f64) {
        match (self.measured_width_px, self.measured_height_px) {
            (Some(w), Some(h)) => (w, h),
            _ => (self.natural_width as f64, self.natural_height as f64),
        }
    }

    /// Output size in points; see [`target_size_pt`].
    pub fn target_size_pt(&self, boost: f64, max_width_pt: f64) -> (f64, f64) {
        let (w, h) = self.display_size_px();
        target_size_pt(w, h, boost, max_width_pt)
    }
}

/// Convert a px size to points, enlarge it by `boost`, then shrink it
/// proportionally so the width does not exceed `max_width_pt`.
///
/// # Examples
///
/// ```rust
/// use folio::export::target_size_pt;
///
/// assert_eq!(target_size_pt(1000.0, 500.0, 1.1, 700.0), (700.0, 350.0));
/// ```
pub fn target_size_pt(width_px: f64, height_px: f64, boost: f64, max_width_pt: f64) -> (f64, f64) {
    let width = px_to_pt(width_px.max(0.0)) * boost;
    let height = px_to_pt(height_px.max(0.0)) * boost;
    if width > max_width_pt && width > 0.0 {
        (max_width_pt, height * max_width_pt / width)
    } else {
        (width, height)
    }
}

/// Resolve an image source. Failures are logged and yield `None`.
pub async fn resolve_image(src: &str, fetcher: &dyn ImageFetcher) -> Option<ResolvedImage> {
    match try_resolve(src, fetcher).await {
        Ok(image) => {
            debug!(
                source = %describe(src),
                format = image.format.extension(),
                width = image.natural_width,
                height = image.natural_height,
                "resolved image"
            );
            Some(image)
        },
        Err(err) => {
            warn!(source = %describe(src), error = %err, "skipping image");
            None
        },
    }
}

async fn try_resolve(src: &str, fetcher: &dyn ImageFetcher) -> Result<ResolvedImage, ImageError> {
    match ImageSource::parse(src)? {
        ImageSource::DataUri {
            mime,
            payload,
            base64,
        } => {
            let bytes = if base64 {
                decode_base64(payload)?
            } else {
                payload.as_bytes().to_vec()
            };
            decode_image(bytes, mime.and_then(ImageFormat::from_mime))
        },
        ImageSource::Base64(payload) => decode_image(decode_base64(payload)?, None),
        ImageSource::Remote(url) => {
            let fetched = fetcher.fetch(url).await?;
            let hint = fetched.content_type.as_deref().and_then(ImageFormat::from_mime);
            decode_image(fetched.bytes, hint)
        },
    }
}

/// Normalize raw bytes, falling back to the undecoded bytes.
pub fn decode_image(bytes: Vec<u8>, hint: Option<ImageFormat>) -> Result<ResolvedImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    #[cfg(feature = "imgconv")]
    {
        match reencode_png(&bytes, hint) {
            Ok(image) => return Ok(image),
            Err(err) => debug!(error = %err, "image not decodable, embedding raw bytes"),
        }
    }

    Ok(raw_image(bytes, hint))
}

#[cfg(feature = "imgconv")]
fn reencode_png(bytes: &[u8], hint: Option<ImageFormat>) -> image::ImageResult<ResolvedImage> {
    use std::io::Cursor;

    let decoded = match hint.map(codec_format) {
        Some(format) => image::load_from_memory_with_format(bytes, format)
            .or_else(|_| image::load_from_memory(bytes))?,
        None => image::load_from_memory(bytes)?,
    };

    let mut buffer = Cursor::new(Vec::new());
    decoded.write_to(&mut buffer, image::ImageFormat::Png)?;

    Ok(ResolvedImage {
        data: buffer.into_inner(),
        format: ImageFormat::Png,
        natural_width: decoded.width(),
        natural_height: decoded.height(),
        measured_width_px: None,
        measured_height_px: None,
    })
}

#[cfg(feature = "imgconv")]
fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Gif => image::ImageFormat::Gif,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::Tiff => image::ImageFormat::Tiff,
    }
}

fn raw_image(bytes: Vec<u8>, hint: Option<ImageFormat>) -> ResolvedImage {
    let format = ImageFormat::detect_from_bytes(&bytes)
        .or(hint)
        .unwrap_or(ImageFormat::Png);
    let (natural_width, natural_height) =
        probe_dimensions(&bytes).unwrap_or((DEFAULT_IMAGE_WIDTH_PX, DEFAULT_IMAGE_HEIGHT_PX));

    ResolvedImage {
        data: bytes,
        format,
        natural_width,
        natural_height,
        measured_width_px: None,
        measured_height_px: None,
    }
}

/// Read pixel dimensions from a PNG, GIF or JPEG header.
pub fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let dims = match ImageFormat::detect_from_bytes(data)? {
        ImageFormat::Png => {
            // IHDR is always the first chunk
            if data.get(12..16)? != b"IHDR" {
                return None;
            }
            let width = u32::from_be_bytes(data.get(16..20)?.try_into().ok()?);
            let height = u32::from_be_bytes(data.get(20..24)?.try_into().ok()?);
            (width, height)
        },
        ImageFormat::Gif => {
            let width = u16::from_le_bytes(data.get(6..8)?.try_into().ok()?);
            let height = u16::from_le_bytes(data.get(8..10)?.try_into().ok()?);
            (width as u32, height as u32)
        },
        ImageFormat::Jpeg => probe_jpeg(data)?,
        ImageFormat::Bmp | ImageFormat::Tiff => return None,
    };
    (dims.0 > 0 && dims.1 > 0).then_some(dims)
}

fn probe_jpeg(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    loop {
        while *data.get(pos)? != 0xFF {
            pos += 1;
        }
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *data.get(pos)?;
        pos += 1;

        // standalone markers carry no length
        if matches!(marker, 0x01 | 0xD0..=0xD9) {
            continue;
        }

        let length = u16::from_be_bytes(data.get(pos..pos + 2)?.try_into().ok()?) as usize;
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let height = u16::from_be_bytes(data.get(pos + 3..pos + 5)?.try_into().ok()?);
            let width = u16::from_be_bytes(data.get(pos + 5..pos + 7)?.try_into().ok()?);
            return Some((width as u32, height as u32));
        }
        if length < 2 {
            return None;
        }
        pos += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fetch::{FetchedImage, OfflineFetcher};
    use futures::future::{BoxFuture, FutureExt};

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data
    }

    fn jpeg_header(width: u16, height: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46];
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00]);
        data
    }

    struct StaticFetcher(FetchedImage);

    impl ImageFetcher for StaticFetcher {
        fn fetch<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, crate::Result<FetchedImage>> {
            futures::future::ready(Ok(self.0.clone())).boxed()
        }
    }

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            ImageSource::parse("data:image/png;base64,AAAA").unwrap(),
            ImageSource::DataUri {
                mime: Some("image/png"),
                payload: "AAAA",
                base64: true
            }
        );
        assert_eq!(
            ImageSource::parse("HTTPS://example.com/a.png").unwrap(),
            ImageSource::Remote("HTTPS://example.com/a.png")
        );
        assert_eq!(ImageSource::parse("iVBORw0KGgo=").unwrap(), ImageSource::Base64("iVBORw0KGgo="));
        assert!(matches!(ImageSource::parse("   "), Err(ImageError::Empty)));
        assert!(matches!(ImageSource::parse("data:image/png"), Err(ImageError::InvalidDataUri(_))));
        assert!(matches!(
            ImageSource::parse("./images/a.png"),
            Err(ImageError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn test_target_size_clamps_width() {
        assert_eq!(target_size_pt(1000.0, 500.0, 1.1, 700.0), (700.0, 350.0));

        let (w, h) = target_size_pt(400.0, 300.0, 1.1, 700.0);
        assert!((w - 330.0).abs() < 1e-9);
        assert!((h - 247.5).abs() < 1e-9);
    }

    #[test]
    fn test_probe_headers() {
        assert_eq!(probe_dimensions(&png_header(640, 480)), Some((640, 480)));
        assert_eq!(probe_dimensions(&jpeg_header(800, 600)), Some((800, 600)));

        let mut gif = b"GIF89a".to_vec();
        gif.extend_from_slice(&[0x20, 0x00, 0x10, 0x00]);
        assert_eq!(probe_dimensions(&gif), Some((32, 16)));

        assert_eq!(probe_dimensions(b"not an image"), None);
        assert_eq!(probe_dimensions(&png_header(0, 10)), None);
    }

    #[test]
    fn test_undecodable_bytes_are_embedded_raw() {
        let image = decode_image(png_header(120, 80), None).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!((image.natural_width, image.natural_height), (120, 80));
        assert_eq!(image.data, png_header(120, 80));

        let unknown = decode_image(vec![1, 2, 3, 4], Some(ImageFormat::Gif)).unwrap();
        assert_eq!(unknown.format, ImageFormat::Gif);
        assert_eq!(
            (unknown.natural_width, unknown.natural_height),
            (DEFAULT_IMAGE_WIDTH_PX, DEFAULT_IMAGE_HEIGHT_PX)
        );

        let fallback = decode_image(vec![1, 2, 3, 4], None).unwrap();
        assert_eq!(fallback.format, ImageFormat::Png);

        assert!(matches!(decode_image(Vec::new(), None), Err(ImageError::Empty)));
    }

    #[test]
    fn test_measured_size_wins() {
        let image = decode_image(png_header(1000, 500), None).unwrap();
        assert_eq!(image.target_size_pt(1.1, 700.0), (700.0, 350.0));

        let measured = image.clone().with_measured(200.0, 100.0);
        assert_eq!(measured.display_size_px(), (200.0, 100.0));

        let ignored = image.with_measured(0.0, 100.0);
        assert_eq!(ignored.display_size_px(), (1000.0, 500.0));
    }

    #[cfg(feature = "imgconv")]
    #[tokio::test]
    async fn test_data_uri_reencoded_to_png() {
        use std::io::Cursor;

        let bitmap = image::RgbImage::new(3, 2);
        let mut jpeg = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(bitmap)
            .write_to(&mut jpeg, image::ImageFormat::Jpeg)
            .unwrap();
        let src = format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg.into_inner()));

        let image = resolve_image(&src, &OfflineFetcher).await.unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!((image.natural_width, image.natural_height), (3, 2));
        assert_eq!(ImageFormat::detect_from_bytes(&image.data), Some(ImageFormat::Png));
    }

    #[tokio::test]
    async fn test_remote_uses_fetcher() {
        let fetcher = StaticFetcher(FetchedImage {
            bytes: jpeg_header(64, 48),
            content_type: Some("image/jpeg".to_string()),
        });
        let image = resolve_image("https://example.com/x.jpg", &fetcher).await.unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!((image.natural_width, image.natural_height), (64, 48));
    }

    #[tokio::test]
    async fn test_failures_yield_none() {
        assert!(resolve_image("https://example.com/x.png", &OfflineFetcher).await.is_none());
        assert!(resolve_image("data:image/png;base64,@@@", &OfflineFetcher).await.is_none());
        assert!(resolve_image("", &OfflineFetcher).await.is_none());
    }
}
