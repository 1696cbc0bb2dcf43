/// Section properties: page size and margins.
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// Section properties including page setup and margins.
///
/// All lengths are in twips (1440 = 1 inch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProperties {
    pub page_width: u32,
    pub page_height: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    /// Header distance from the page top
    pub header_distance: u32,
    /// Footer distance from the page bottom
    pub footer_distance: u32,
}

impl Default for SectionProperties {
    fn default() -> Self {
        // US Letter size: 8.5" x 11" = 12240 x 15840 twips
        Self {
            page_width: 12240,
            page_height: 15840,
            margin_top: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            margin_right: 1440,
            header_distance: 720,
            footer_distance: 720,
        }
    }
}

impl SectionProperties {
    /// US Letter page with one-inch margins.
    pub fn letter() -> Self {
        Self::default()
    }

    /// Set page size in twips.
    pub fn page_size(mut self, width: u32, height: u32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set margins in twips.
    pub fn margins(mut self, top: u32, right: u32, bottom: u32, left: u32) -> Self {
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self
    }

    /// Width available for content between the side margins.
    pub fn content_width(&self) -> u32 {
        self.page_width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:sectPr>");
        write!(
            xml,
            r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
            self.page_width, self.page_height
        )?;
        write!(
            xml,
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
            self.margin_top,
            self.margin_right,
            self.margin_bottom,
            self.margin_left,
            self.header_distance,
            self.footer_distance
        )?;
        xml.push_str("</w:sectPr>");
        Ok(())
    }
}
