/// Run types and implementation for DOCX documents.
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

pub use super::super::format::{UnderlineStyle, VerticalAlign};

/// Run content type.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    /// Plain text
    Text(String),
    /// Line break inside the paragraph
    LineBreak,
    /// Hard page break
    PageBreak,
}

/// A mutable run.
///
/// Runs contain text and character formatting.
#[derive(Debug, Clone)]
pub struct MutableRun {
    pub(crate) content: RunContent,
    pub(crate) properties: RunProperties,
}

impl MutableRun {
    pub(crate) fn new() -> Self {
        Self {
            content: RunContent::Text(String::new()),
            properties: RunProperties::default(),
        }
    }

    pub(crate) fn with_content(content: RunContent) -> Self {
        Self {
            content,
            properties: RunProperties::default(),
        }
    }

    /// Set the text content.
    pub fn set_text(&mut self, text: &str) {
        self.content = RunContent::Text(text.to_string());
    }

    /// Get the text content.
    pub fn text(&self) -> &str {
        match &self.content {
            RunContent::Text(s) => s,
            _ => "",
        }
    }

    #[inline]
    pub fn content(&self) -> &RunContent {
        &self.content
    }

    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.properties.bold = bold;
        self
    }

    pub fn italic(&mut self, italic: bool) -> &mut Self {
        self.properties.italic = italic;
        self
    }

    pub fn strike(&mut self, strike: bool) -> &mut Self {
        self.properties.strike = strike;
        self
    }

    pub fn underline(&mut self, style: UnderlineStyle) -> &mut Self {
        self.properties.underline = Some(style);
        self
    }

    /// Set font size in half-points (e.g., 24 = 12pt).
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.properties.font_size = Some(size);
        self
    }

    pub fn font_name(&mut self, name: &str) -> &mut Self {
        self.properties.font_name = Some(name.to_string());
        self
    }

    /// Set text color using hex RGB (e.g., "FF0000" for red).
    pub fn color(&mut self, color: &str) -> &mut Self {
        self.properties.color = Some(color.to_string());
        self
    }

    /// Background fill behind the run, hex RGB.
    pub fn shading(&mut self, fill: &str) -> &mut Self {
        self.properties.shading = Some(fill.to_string());
        self
    }

    pub fn vertical_align(&mut self, align: VerticalAlign) -> &mut Self {
        self.properties.vertical_align = Some(align);
        self
    }

    /// Apply a character style by id.
    pub fn style(&mut self, style_id: &str) -> &mut Self {
        self.properties.style = Some(style_id.to_string());
        self
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:r>");

        if self.properties.has_properties() {
            self.properties.to_xml(xml)?;
        }

        match &self.content {
            RunContent::Text(text) if !text.is_empty() => {
                write!(
                    xml,
                    "<w:t xml:space=\"preserve\">{}</w:t>",
                    escape_xml(text)
                )?;
            },
            RunContent::Text(_) => {},
            RunContent::LineBreak => xml.push_str("<w:br/>"),
            RunContent::PageBreak => xml.push_str("<w:br w:type=\"page\"/>"),
        }

        xml.push_str("</w:r>");

        Ok(())
    }
}

/// Run properties.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct RunProperties {
    pub(crate) style: Option<String>,
    pub(crate) bold: bool,
    pub(crate) italic: bool,
    pub(crate) strike: bool,
    pub(crate) underline: Option<UnderlineStyle>,
    pub(crate) font_size: Option<u32>,
    pub(crate) font_name: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) shading: Option<String>,
    pub(crate) vertical_align: Option<VerticalAlign>,
}

impl RunProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.style.is_some()
            || self.bold
            || self.italic
            || self.strike
            || self.underline.is_some()
            || self.font_size.is_some()
            || self.font_name.is_some()
            || self.color.is_some()
            || self.shading.is_some()
            || self.vertical_align.is_some()
    }

    /// Writes `<w:rPr>` with children in schema order.
    fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:rPr>");

        if let Some(ref style) = self.style {
            write!(xml, "<w:rStyle w:val=\"{}\"/>", escape_xml(style))?;
        }

        if let Some(ref font_name) = self.font_name {
            let font_name = escape_xml(font_name);
            write!(
                xml,
                "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:cs=\"{0}\"/>",
                font_name
            )?;
        }

        if self.bold {
            xml.push_str("<w:b/>");
        }
        if self.italic {
            xml.push_str("<w:i/>");
        }
        if self.strike {
            xml.push_str("<w:strike/>");
        }

        if let Some(ref color) = self.color {
            write!(xml, "<w:color w:val=\"{}\"/>", color)?;
        }

        if let Some(size) = self.font_size {
            write!(xml, "<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>", size)?;
        }

        if let Some(underline_style) = self.underline {
            write!(xml, "<w:u w:val=\"{}\"/>", underline_style.as_str())?;
        }

        if let Some(ref fill) = self.shading {
            write!(
                xml,
                "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
                fill
            )?;
        }

        if let Some(align) = self.vertical_align {
            write!(xml, "<w:vertAlign w:val=\"{}\"/>", align.as_str())?;
        }

        xml.push_str("</w:rPr>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(run: &MutableRun) -> String {
        let mut xml = String::new();
        run.to_xml(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_plain_text_escaped() {
        let mut run = MutableRun::new();
        run.set_text("a < b & c");
        assert_eq!(
            render(&run),
            "<w:r><w:t xml:space=\"preserve\">a &lt; b &amp; c</w:t></w:r>"
        );
    }

    #[test]
    fn test_control_characters_dropped() {
        let mut run = MutableRun::new();
        run.set_text("page\u{0B}one\u{0C}");
        assert_eq!(
            render(&run),
            "<w:r><w:t xml:space=\"preserve\">pageone</w:t></w:r>"
        );
    }

    #[test]
    fn test_formatting_order() {
        let mut run = MutableRun::new();
        run.set_text("x");
        run.bold(true)
            .italic(true)
            .underline(UnderlineStyle::Single)
            .font_size(21)
            .font_name("Arial")
            .color("FF0000")
            .shading("FFFF00")
            .vertical_align(VerticalAlign::Superscript);

        let xml = render(&run);
        let fonts = xml.find("<w:rFonts").unwrap();
        let bold = xml.find("<w:b/>").unwrap();
        let size = xml.find("<w:sz w:val=\"21\"/>").unwrap();
        let vert = xml.find("<w:vertAlign w:val=\"superscript\"/>").unwrap();
        assert!(fonts < bold && bold < size && size < vert);
        assert!(xml.contains("<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"FFFF00\"/>"));
    }

    #[test]
    fn test_breaks() {
        assert_eq!(
            render(&MutableRun::with_content(RunContent::LineBreak)),
            "<w:r><w:br/></w:r>"
        );
        assert_eq!(
            render(&MutableRun::with_content(RunContent::PageBreak)),
            "<w:r><w:br w:type=\"page\"/></w:r>"
        );
    }
}
