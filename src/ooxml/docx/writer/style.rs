/// Style definitions written to `styles.xml`.
use crate::ooxml::docx::format::{LineSpacing, WdStyleType};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace as ns;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// A style definition for writing.
///
/// # Examples
///
/// ```rust
/// use folio::ooxml::docx::writer::MutableStyle;
///
/// let h2 = MutableStyle::heading(2).unwrap();
/// assert_eq!(h2.style_id(), "Heading2");
/// ```
#[derive(Debug, Clone)]
pub struct MutableStyle {
    /// Style identifier (e.g., "Heading1")
    style_id: String,
    /// UI-visible name (e.g., "heading 1")
    name: String,
    style_type: WdStyleType,
    is_default: bool,
    based_on: Option<String>,
    next: Option<String>,
    priority: Option<i32>,
    is_quick_style: bool,
    font_name: Option<String>,
    /// Half-points
    font_size: Option<u32>,
    bold: bool,
    italic: bool,
    underline: bool,
    color: Option<String>,
    /// Twips
    space_before: Option<u32>,
    /// Twips
    space_after: Option<u32>,
    /// Twips
    indent_left: Option<u32>,
    keep_next: bool,
    /// Outline level 0-8 for headings
    outline_level: Option<u8>,
}

impl MutableStyle {
    pub fn new(
        style_id: impl Into<String>,
        name: impl Into<String>,
        style_type: WdStyleType,
    ) -> Self {
        Self {
            style_id: style_id.into(),
            name: name.into(),
            style_type,
            is_default: false,
            based_on: None,
            next: None,
            priority: None,
            is_quick_style: false,
            font_name: None,
            font_size: None,
            bold: false,
            italic: false,
            underline: false,
            color: None,
            space_before: None,
            space_after: None,
            indent_left: None,
            keep_next: false,
            outline_level: None,
        }
    }

    #[inline]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn style_type(&self) -> WdStyleType {
        self.style_type
    }

    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }

    pub fn set_based_on(&mut self, based_on: Option<String>) {
        self.based_on = based_on;
    }

    pub fn set_next(&mut self, next: Option<String>) {
        self.next = next;
    }

    pub fn set_priority(&mut self, priority: Option<i32>) {
        self.priority = priority;
    }

    pub fn set_quick_style(&mut self, is_quick_style: bool) {
        self.is_quick_style = is_quick_style;
    }

    pub fn set_font_name(&mut self, font_name: Option<String>) {
        self.font_name = font_name;
    }

    /// Font size in half-points.
    pub fn set_font_size(&mut self, font_size: Option<u32>) {
        self.font_size = font_size;
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.italic = italic;
    }

    pub fn set_underline(&mut self, underline: bool) {
        self.underline = underline;
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    pub fn set_space_before(&mut self, space_before: Option<u32>) {
        self.space_before = space_before;
    }

    pub fn set_space_after(&mut self, space_after: Option<u32>) {
        self.space_after = space_after;
    }

    pub fn set_indent_left(&mut self, indent_left: Option<u32>) {
        self.indent_left = indent_left;
    }

    pub fn set_keep_next(&mut self, keep_next: bool) {
        self.keep_next = keep_next;
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<w:style w:type="{}" w:styleId="{}""#,
            self.style_type.to_xml(),
            escape_xml(&self.style_id)
        )?;
        if self.is_default {
            xml.push_str(r#" w:default="1""#);
        }
        xml.push('>');

        write!(xml, r#"<w:name w:val="{}"/>"#, escape_xml(&self.name))?;

        if let Some(ref based_on) = self.based_on {
            write!(xml, r#"<w:basedOn w:val="{}"/>"#, escape_xml(based_on))?;
        }
        if let Some(ref next) = self.next {
            write!(xml, r#"<w:next w:val="{}"/>"#, escape_xml(next))?;
        }
        if let Some(priority) = self.priority {
            write!(xml, r#"<w:uiPriority w:val="{}"/>"#, priority)?;
        }
        if self.is_quick_style {
            xml.push_str("<w:qFormat/>");
        }

        if self.style_type == WdStyleType::Paragraph {
            let has_para_props = self.keep_next
                || self.space_before.is_some()
                || self.space_after.is_some()
                || self.indent_left.is_some()
                || self.outline_level.is_some();

            if has_para_props {
                xml.push_str("<w:pPr>");
                if self.keep_next {
                    xml.push_str("<w:keepNext/>");
                }
                if self.space_before.is_some() || self.space_after.is_some() {
                    xml.push_str("<w:spacing");
                    if let Some(before) = self.space_before {
                        write!(xml, r#" w:before="{}""#, before)?;
                    }
                    if let Some(after) = self.space_after {
                        write!(xml, r#" w:after="{}""#, after)?;
                    }
                    xml.push_str("/>");
                }
                if let Some(left) = self.indent_left {
                    write!(xml, r#"<w:ind w:left="{}"/>"#, left)?;
                }
                if let Some(level) = self.outline_level {
                    write!(xml, r#"<w:outlineLvl w:val="{}"/>"#, level)?;
                }
                xml.push_str("</w:pPr>");
            }
        }

        let has_run_props = self.font_name.is_some()
            || self.font_size.is_some()
            || self.bold
            || self.italic
            || self.underline
            || self.color.is_some();

        if has_run_props {
            xml.push_str("<w:rPr>");
            if let Some(ref font_name) = self.font_name {
                let font_name = escape_xml(font_name);
                write!(
                    xml,
                    r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
                    font_name
                )?;
            }
            if self.bold {
                xml.push_str("<w:b/>");
            }
            if self.italic {
                xml.push_str("<w:i/>");
            }
            if let Some(ref color) = self.color {
                write!(xml, r#"<w:color w:val="{}"/>"#, escape_xml(color))?;
            }
            if let Some(size) = self.font_size {
                write!(xml, r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size)?;
            }
            if self.underline {
                xml.push_str(r#"<w:u w:val="single"/>"#);
            }
            xml.push_str("</w:rPr>");
        }

        xml.push_str("</w:style>");
        Ok(())
    }

    /// The default paragraph style.
    pub fn normal() -> Self {
        let mut style = Self::new("Normal", "Normal", WdStyleType::Paragraph);
        style.set_default(true);
        style.set_quick_style(true);
        style
    }

    /// Built-in heading style for levels 1 through 6.
    pub fn heading(level: u8) -> Result<Self> {
        let (size, color) = match level {
            1 => (32, "2F5496"),
            2 => (26, "2F5496"),
            3 => (24, "1F3763"),
            4 => (22, "2F5496"),
            5 => (22, "2F5496"),
            6 => (21, "1F3763"),
            _ => {
                return Err(OoxmlError::InvalidArgument(format!(
                    "heading level must be 1-6, got {}",
                    level
                )));
            },
        };

        let mut style = Self::new(
            format!("Heading{}", level),
            format!("heading {}", level),
            WdStyleType::Paragraph,
        );
        style.set_based_on(Some("Normal".to_string()));
        style.set_next(Some("Normal".to_string()));
        style.set_priority(Some(9));
        style.set_quick_style(true);
        style.set_keep_next(true);
        style.set_bold(true);
        style.set_font_size(Some(size));
        style.set_color(Some(color.to_string()));
        style.set_space_before(Some(if level == 1 { 240 } else { 40 }));
        style.outline_level = Some(level - 1);
        Ok(style)
    }

    /// Block quotation paragraph style.
    pub fn quote() -> Self {
        let mut style = Self::new("Quote", "Quote", WdStyleType::Paragraph);
        style.set_based_on(Some("Normal".to_string()));
        style.set_next(Some("Normal".to_string()));
        style.set_priority(Some(29));
        style.set_quick_style(true);
        style.set_italic(true);
        style.set_color(Some("404040".to_string()));
        style.set_indent_left(Some(720));
        style
    }

    pub fn default_paragraph_font() -> Self {
        let mut style = Self::new(
            "DefaultParagraphFont",
            "Default Paragraph Font",
            WdStyleType::Character,
        );
        style.set_default(true);
        style.set_priority(Some(1));
        style
    }

    /// Hyperlink character style.
    pub fn hyperlink() -> Self {
        let mut style = Self::new("Hyperlink", "Hyperlink", WdStyleType::Character);
        style.set_based_on(Some("DefaultParagraphFont".to_string()));
        style.set_priority(Some(99));
        style.set_color(Some("0563C1".to_string()));
        style.set_underline(true);
        style
    }

    pub fn table_normal() -> Self {
        let mut style = Self::new("TableNormal", "Normal Table", WdStyleType::Table);
        style.set_default(true);
        style.set_priority(Some(99));
        style
    }

    /// The full built-in set used by exported documents.
    pub fn builtin_set() -> Result<Vec<Self>> {
        let mut styles = vec![Self::normal()];
        for level in 1..=6 {
            styles.push(Self::heading(level)?);
        }
        styles.push(Self::quote());
        styles.push(Self::default_paragraph_font());
        styles.push(Self::hyperlink());
        styles.push(Self::table_normal());
        Ok(styles)
    }
}

/// Document-wide run and paragraph defaults (`w:docDefaults`).
#[derive(Debug, Clone, PartialEq)]
pub struct DocDefaults {
    pub font_name: String,
    /// Half-points
    pub font_size: u32,
    pub line_spacing: Option<LineSpacing>,
}

impl Default for DocDefaults {
    fn default() -> Self {
        Self {
            font_name: "Calibri".to_string(),
            font_size: 22,
            line_spacing: None,
        }
    }
}

/// Generate a complete styles.xml document.
pub fn generate_styles_xml(styles: &[MutableStyle], defaults: &DocDefaults) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<w:styles xmlns:w="{}" xmlns:r="{}">"#,
        ns::WML_MAIN,
        ns::OFC_RELATIONSHIPS
    )?;

    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    let font = escape_xml(&defaults.font_name);
    write!(
        xml,
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}" w:eastAsia="{0}"/>"#,
        font
    )?;
    write!(
        xml,
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        defaults.font_size
    )?;
    xml.push_str("</w:rPr></w:rPrDefault>");
    match defaults.line_spacing {
        Some(spacing) => {
            let (line, rule) = spacing.to_attrs();
            write!(
                xml,
                r#"<w:pPrDefault><w:pPr><w:spacing w:line="{}" w:lineRule="{}"/></w:pPr></w:pPrDefault>"#,
                line, rule
            )?;
        },
        None => xml.push_str("<w:pPrDefault/>"),
    }
    xml.push_str("</w:docDefaults>");

    for style in styles {
        style.to_xml(&mut xml)?;
    }

    xml.push_str("</w:styles>");

    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        for level in 1..=6 {
            let style = MutableStyle::heading(level).unwrap();
            assert_eq!(style.style_id(), format!("Heading{}", level));
        }
        assert!(MutableStyle::heading(0).is_err());
        assert!(MutableStyle::heading(7).is_err());
    }

    #[test]
    fn test_style_xml() {
        let mut xml = String::new();
        MutableStyle::heading(1).unwrap().to_xml(&mut xml).unwrap();
        assert!(xml.starts_with(r#"<w:style w:type="paragraph" w:styleId="Heading1">"#));
        assert!(xml.contains(r#"<w:basedOn w:val="Normal"/>"#));
        assert!(xml.contains(r#"<w:outlineLvl w:val="0"/>"#));
        assert!(xml.contains(r#"<w:sz w:val="32"/>"#));
    }

    #[test]
    fn test_generate_styles_xml() {
        let defaults = DocDefaults {
            font_name: "Arial".to_string(),
            font_size: 21,
            line_spacing: Some(LineSpacing::Multiple(1.5)),
        };
        let styles = MutableStyle::builtin_set().unwrap();
        let xml = generate_styles_xml(&styles, &defaults).unwrap();

        assert!(xml.contains(r#"w:ascii="Arial""#));
        assert!(xml.contains(r#"<w:sz w:val="21"/>"#));
        assert!(xml.contains(r#"<w:spacing w:line="360" w:lineRule="auto"/>"#));
        assert_eq!(xml.matches("<w:style ").count(), styles.len());
        assert!(xml.contains(r#"w:styleId="Quote""#));
        assert!(xml.contains(r#"w:styleId="Hyperlink""#));
    }

    #[test]
    fn test_xml_escaping() {
        let style = MutableStyle::new("S&P", "S&P <500>", WdStyleType::Character);
        let mut xml = String::new();
        style.to_xml(&mut xml).unwrap();
        assert!(xml.contains("S&amp;P &lt;500&gt;"));
    }
}
