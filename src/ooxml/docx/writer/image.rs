/// Inline picture support for DOCX documents.
use crate::common::unit::EMUS_PER_INCH;
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

pub use super::super::format::ImageFormat;

/// A mutable inline image.
///
/// Inline images are embedded within paragraphs as part of runs.
#[derive(Debug, Clone)]
pub struct MutableInlineImage {
    pub(crate) data: Vec<u8>,
    pub(crate) format: ImageFormat,
    /// Width in EMUs (English Metric Units, 1 inch = 914400 EMUs)
    pub(crate) width_emu: i64,
    pub(crate) height_emu: i64,
    pub(crate) description: String,
}

impl MutableInlineImage {
    pub fn new(data: Vec<u8>, format: ImageFormat, width_emu: i64, height_emu: i64) -> Self {
        Self {
            data,
            format,
            width_emu: width_emu.max(0),
            height_emu: height_emu.max(0),
            description: String::new(),
        }
    }

    /// Set the image description/alt text.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Extent in EMUs as `(cx, cy)`.
    #[inline]
    pub fn extent(&self) -> (i64, i64) {
        (self.width_emu, self.height_emu)
    }

    /// Serialize as `<w:drawing>`; `doc_pr_id` must be unique in the document.
    pub(crate) fn to_xml(&self, xml: &mut String, r_id: &str, doc_pr_id: usize) -> Result<()> {
        let width = if self.width_emu > 0 { self.width_emu } else { EMUS_PER_INCH };
        let height = if self.height_emu > 0 { self.height_emu } else { EMUS_PER_INCH };
        let desc = escape_xml(&self.description);

        write!(
            xml,
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{w}" cy="{h}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{id}" name="Picture {id}" descr="{desc}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="{id}" name="image{id}.{ext}" descr="{desc}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{w}" cy="{h}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
            w = width,
            h = height,
            id = doc_pr_id,
            desc = desc,
            ext = self.format.extension(),
            r_id = r_id,
        )?;

        Ok(())
    }
}
