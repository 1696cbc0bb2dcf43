/// Document writer implementation for DOCX.
use crate::ooxml::docx::format::ImageFormat;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace as ns;
use std::fmt::Write as FmtWrite;

use super::paragraph::MutableParagraph;
use super::relmap::{RelCursor, RelationshipMapper};
use super::section::SectionProperties;
use super::table::MutableTable;

/// A mutable Word document for writing.
///
/// Holds the body content in order plus the single section that closes the
/// body. Relationship ids for hyperlinks and images are assigned by the
/// package builder and consumed in document order by [`Self::to_xml_with_rels`].
#[derive(Debug, Default)]
pub struct MutableDocument {
    body: Vec<BodyElement>,
    section: SectionProperties,
}

#[derive(Debug)]
pub(crate) enum BodyElement {
    Paragraph(MutableParagraph),
    Table(MutableTable),
}

impl MutableDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section_mut(&mut self) -> &mut SectionProperties {
        &mut self.section
    }

    #[inline]
    pub fn section(&self) -> &SectionProperties {
        &self.section
    }

    pub fn set_section(&mut self, section: SectionProperties) {
        self.section = section;
    }

    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        self.body
            .push(BodyElement::Paragraph(MutableParagraph::new()));
        match self.body.last_mut() {
            Some(BodyElement::Paragraph(p)) => p,
            _ => unreachable!(),
        }
    }

    pub fn add_paragraph_with_text(&mut self, text: &str) -> &mut MutableParagraph {
        let para = self.add_paragraph();
        para.add_run_with_text(text);
        para
    }

    /// Add an empty paragraph styled as a heading of the given level (1-6).
    pub fn add_heading(&mut self, level: u8) -> Result<&mut MutableParagraph> {
        if !(1..=6).contains(&level) {
            return Err(OoxmlError::InvalidArgument(format!(
                "heading level must be 1-6, got {}",
                level
            )));
        }
        let para = self.add_paragraph();
        para.set_style(&format!("Heading{}", level));
        Ok(para)
    }

    /// Add a table with the given column widths in twips.
    pub fn add_table(&mut self, grid: Vec<u32>) -> &mut MutableTable {
        self.body.push(BodyElement::Table(MutableTable::new(grid)));
        match self.body.last_mut() {
            Some(BodyElement::Table(t)) => t,
            _ => unreachable!(),
        }
    }

    /// Add a paragraph holding only a page break.
    pub fn add_page_break(&mut self) -> &mut MutableParagraph {
        let para = self.add_paragraph();
        para.add_page_break();
        para
    }

    pub fn paragraph_count(&self) -> usize {
        self.body
            .iter()
            .filter(|e| matches!(e, BodyElement::Paragraph(_)))
            .count()
    }

    pub fn table_count(&self) -> usize {
        self.body
            .iter()
            .filter(|e| matches!(e, BodyElement::Table(_)))
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn paragraph(&mut self, index: usize) -> Option<&mut MutableParagraph> {
        self.body
            .iter_mut()
            .filter_map(|e| match e {
                BodyElement::Paragraph(p) => Some(p),
                _ => None,
            })
            .nth(index)
    }

    pub fn table(&mut self, index: usize) -> Option<&mut MutableTable> {
        self.body
            .iter_mut()
            .filter_map(|e| match e {
                BodyElement::Table(t) => Some(t),
                _ => None,
            })
            .nth(index)
    }

    /// Every paragraph in body order, descending into table cells.
    fn all_paragraphs(&self) -> Vec<&MutableParagraph> {
        let mut paragraphs = Vec::new();
        for element in &self.body {
            match element {
                BodyElement::Paragraph(p) => paragraphs.push(p),
                BodyElement::Table(t) => paragraphs.extend(t.paragraphs()),
            }
        }
        paragraphs
    }

    /// Hyperlink targets in the order XML generation visits them.
    pub(crate) fn collect_hyperlink_urls(&self) -> Vec<String> {
        self.all_paragraphs()
            .into_iter()
            .flat_map(|p| p.hyperlinks())
            .map(|h| h.url().to_string())
            .collect()
    }

    /// Image payloads in the order XML generation visits them.
    pub(crate) fn collect_images(&self) -> Vec<(&[u8], ImageFormat)> {
        self.all_paragraphs()
            .into_iter()
            .flat_map(|p| p.images())
            .map(|img| (img.data(), img.format()))
            .collect()
    }

    /// Generate `document.xml` with relationship ids from the mapper.
    pub(crate) fn to_xml_with_rels(&self, rel_mapper: &RelationshipMapper) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
            ns::WML_MAIN,
            ns::OFC_RELATIONSHIPS,
            ns::DML_WORDPROCESSING_DRAWING,
            ns::DML_MAIN,
            ns::DML_PICTURE
        )?;
        xml.push_str("<w:body>");

        let mut cursor = RelCursor::new(rel_mapper);
        for element in &self.body {
            match element {
                BodyElement::Paragraph(p) => p.to_xml(&mut xml, &mut cursor)?,
                BodyElement::Table(t) => t.to_xml(&mut xml, &mut cursor)?,
            }
        }
        // Word rejects a body whose last block before sectPr is a table.
        if matches!(self.body.last(), Some(BodyElement::Table(_))) {
            xml.push_str("<w:p/>");
        }

        // sectPr must be the last child of the body
        self.section.to_xml(&mut xml)?;

        xml.push_str("</w:body>");
        xml.push_str("</w:document>");
        Ok(xml)
    }
}
