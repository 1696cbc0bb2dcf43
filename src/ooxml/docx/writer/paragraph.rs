/// Paragraph types and implementation for DOCX documents.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

pub use super::super::format::{LineSpacing, ParagraphAlignment};
use super::hyperlink::MutableHyperlink;
use super::image::{ImageFormat, MutableInlineImage};
use super::relmap::RelCursor;
use super::run::{MutableRun, RunContent};

/// Elements that can appear in a paragraph.
#[derive(Debug, Clone)]
pub(crate) enum ParagraphElement {
    Run(MutableRun),
    Hyperlink(MutableHyperlink),
    InlineImage(MutableInlineImage),
}

/// A mutable paragraph in a document.
#[derive(Debug, Clone)]
pub struct MutableParagraph {
    pub(crate) elements: Vec<ParagraphElement>,
    /// Paragraph style ID
    pub(crate) style: Option<String>,
    pub(crate) properties: ParagraphProperties,
}

impl MutableParagraph {
    pub(crate) fn new() -> Self {
        Self {
            elements: Vec::new(),
            style: None,
            properties: ParagraphProperties::default(),
        }
    }

    /// Add a new run to the paragraph.
    pub fn add_run(&mut self) -> &mut MutableRun {
        self.push_run(MutableRun::new())
    }

    /// Add a run with text.
    pub fn add_run_with_text(&mut self, text: &str) -> &mut MutableRun {
        let run = self.add_run();
        run.set_text(text);
        run
    }

    pub fn add_line_break(&mut self) -> &mut MutableRun {
        self.push_run(MutableRun::with_content(RunContent::LineBreak))
    }

    pub fn add_page_break(&mut self) -> &mut MutableRun {
        self.push_run(MutableRun::with_content(RunContent::PageBreak))
    }

    fn push_run(&mut self, run: MutableRun) -> &mut MutableRun {
        self.elements.push(ParagraphElement::Run(run));
        match self.elements.last_mut() {
            Some(ParagraphElement::Run(r)) => r,
            _ => unreachable!(),
        }
    }

    /// Add a hyperlink to the paragraph; fill it through the returned handle.
    pub fn add_hyperlink(&mut self, url: &str) -> &mut MutableHyperlink {
        self.elements
            .push(ParagraphElement::Hyperlink(MutableHyperlink::new(url)));
        match self.elements.last_mut() {
            Some(ParagraphElement::Hyperlink(h)) => h,
            _ => unreachable!(),
        }
    }

    /// Add an inline image from encoded bytes, sized in EMUs.
    pub fn add_picture_from_bytes(
        &mut self,
        data: Vec<u8>,
        format: ImageFormat,
        width_emu: i64,
        height_emu: i64,
    ) -> &mut MutableInlineImage {
        let image = MutableInlineImage::new(data, format, width_emu, height_emu);
        self.elements.push(ParagraphElement::InlineImage(image));
        match self.elements.last_mut() {
            Some(ParagraphElement::InlineImage(img)) => img,
            _ => unreachable!(),
        }
    }

    /// Set the paragraph style.
    pub fn set_style(&mut self, style_id: &str) {
        self.style = Some(style_id.to_string());
    }

    pub fn set_alignment(&mut self, alignment: ParagraphAlignment) {
        self.properties.alignment = Some(alignment);
    }

    /// Spacing before this paragraph in twips.
    pub fn set_space_before(&mut self, twips: u32) {
        self.properties.space_before = Some(twips);
    }

    /// Spacing after this paragraph in twips.
    pub fn set_space_after(&mut self, twips: u32) {
        self.properties.space_after = Some(twips);
    }

    pub fn set_line_spacing(&mut self, spacing: LineSpacing) {
        self.properties.line_spacing = Some(spacing);
    }

    /// Left indentation in twips.
    pub fn set_indent_left(&mut self, twips: u32) {
        self.properties.indent_left = Some(twips);
    }

    /// Number of runs, hyperlinks and images.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Concatenated text of all runs, hyperlinks included.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for element in &self.elements {
            match element {
                ParagraphElement::Run(run) => text.push_str(run.text()),
                ParagraphElement::Hyperlink(link) => {
                    for run in &link.runs {
                        text.push_str(run.text());
                    }
                },
                ParagraphElement::InlineImage(_) => {},
            }
        }
        text
    }

    pub(crate) fn hyperlinks(&self) -> impl Iterator<Item = &MutableHyperlink> {
        self.elements.iter().filter_map(|e| match e {
            ParagraphElement::Hyperlink(h) => Some(h),
            _ => None,
        })
    }

    pub(crate) fn images(&self) -> impl Iterator<Item = &MutableInlineImage> {
        self.elements.iter().filter_map(|e| match e {
            ParagraphElement::InlineImage(img) => Some(img),
            _ => None,
        })
    }

    fn write_properties(&self, xml: &mut String) -> Result<()> {
        if self.style.is_none() && !self.properties.has_properties() {
            return Ok(());
        }

        xml.push_str("<w:pPr>");

        if let Some(ref style) = self.style {
            write!(xml, "<w:pStyle w:val=\"{}\"/>", escape_xml(style))?;
        }

        if self.properties.space_before.is_some()
            || self.properties.space_after.is_some()
            || self.properties.line_spacing.is_some()
        {
            xml.push_str("<w:spacing");
            if let Some(before) = self.properties.space_before {
                write!(xml, " w:before=\"{}\"", before)?;
            }
            if let Some(after) = self.properties.space_after {
                write!(xml, " w:after=\"{}\"", after)?;
            }
            if let Some(line_spacing) = self.properties.line_spacing {
                let (line, rule) = line_spacing.to_attrs();
                write!(xml, " w:line=\"{}\" w:lineRule=\"{}\"", line, rule)?;
            }
            xml.push_str("/>");
        }

        if let Some(left) = self.properties.indent_left {
            write!(xml, "<w:ind w:left=\"{}\"/>", left)?;
        }

        if let Some(alignment) = self.properties.alignment {
            write!(xml, "<w:jc w:val=\"{}\"/>", alignment.as_str())?;
        }

        xml.push_str("</w:pPr>");
        Ok(())
    }

    /// Generate XML, taking relationship ids for hyperlinks and images from
    /// `cursor` in document order.
    pub(crate) fn to_xml(&self, xml: &mut String, cursor: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:p>");

        self.write_properties(xml)?;

        for element in &self.elements {
            match element {
                ParagraphElement::Run(run) => run.to_xml(xml)?,
                ParagraphElement::Hyperlink(hyperlink) => {
                    let rel_id = cursor.next_hyperlink().ok_or_else(|| {
                        OoxmlError::InvalidRelationship(format!(
                            "no relationship for hyperlink to {}",
                            hyperlink.url()
                        ))
                    })?;
                    hyperlink.to_xml(xml, rel_id)?;
                },
                ParagraphElement::InlineImage(image) => {
                    let (rel_id, doc_pr_id) = cursor.next_image().ok_or_else(|| {
                        OoxmlError::InvalidRelationship("no relationship for image".to_string())
                    })?;
                    xml.push_str("<w:r>");
                    image.to_xml(xml, rel_id, doc_pr_id)?;
                    xml.push_str("</w:r>");
                },
            }
        }

        xml.push_str("</w:p>");
        Ok(())
    }
}

/// Paragraph properties.
#[derive(Debug, Default, Clone)]
pub(crate) struct ParagraphProperties {
    pub(crate) alignment: Option<ParagraphAlignment>,
    /// Twips
    pub(crate) space_before: Option<u32>,
    /// Twips
    pub(crate) space_after: Option<u32>,
    pub(crate) line_spacing: Option<LineSpacing>,
    /// Twips
    pub(crate) indent_left: Option<u32>,
}

impl ParagraphProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.alignment.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line_spacing.is_some()
            || self.indent_left.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::relmap::RelationshipMapper;

    fn render(para: &MutableParagraph, mapper: &RelationshipMapper) -> Result<String> {
        let mut xml = String::new();
        let mut cursor = RelCursor::new(mapper);
        para.to_xml(&mut xml, &mut cursor)?;
        Ok(xml)
    }

    #[test]
    fn test_properties_in_schema_order() {
        let mut para = MutableParagraph::new();
        para.set_style("Heading1");
        para.set_alignment(ParagraphAlignment::Center);
        para.set_space_before(120);
        para.set_space_after(120);
        para.set_line_spacing(LineSpacing::Multiple(1.5));
        para.add_run_with_text("Title");

        let xml = render(&para, &RelationshipMapper::new()).unwrap();
        assert!(xml.starts_with(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/><w:spacing w:before=\"120\" w:after=\"120\" w:line=\"360\" w:lineRule=\"auto\"/><w:jc w:val=\"center\"/></w:pPr>"
        ));
        assert_eq!(para.text(), "Title");
    }

    #[test]
    fn test_hyperlink_requires_relationship() {
        let mut para = MutableParagraph::new();
        para.add_hyperlink("https://example.com").add_run_with_text("x");

        assert!(render(&para, &RelationshipMapper::new()).is_err());

        let mut mapper = RelationshipMapper::new();
        mapper.add_hyperlink(0, "rId9".to_string());
        let xml = render(&para, &mapper).unwrap();
        assert!(xml.contains(r#"<w:hyperlink r:id="rId9">"#));
    }

    #[test]
    fn test_image_wrapped_in_run() {
        let mut para = MutableParagraph::new();
        para.add_picture_from_bytes(vec![1, 2, 3], ImageFormat::Png, 12700, 12700);

        let mut mapper = RelationshipMapper::new();
        mapper.add_image(0, "rId3".to_string());
        let xml = render(&para, &mapper).unwrap();
        assert!(xml.contains("<w:r><w:drawing>"));
        assert!(xml.contains(r#"r:embed="rId3""#));
        assert_eq!(para.images().count(), 1);
    }
}
