/// Table types and implementation for DOCX documents.
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

pub use super::super::format::TableBorderStyle;
use super::paragraph::MutableParagraph;
use super::relmap::RelCursor;

/// Border definition for a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBorder {
    pub style: TableBorderStyle,
    /// Border width in eighths of a point (e.g., 8 = 1pt)
    pub size: u32,
    /// Border color in hex RGB format (e.g., "FF0000" for red)
    pub color: String,
}

impl Default for TableBorder {
    fn default() -> Self {
        Self {
            style: TableBorderStyle::Single,
            size: 4,
            color: "000000".to_string(),
        }
    }
}

/// Table properties.
#[derive(Debug, Clone)]
pub(crate) struct TableProperties {
    /// Applied to all six edges (outer and inside)
    pub(crate) border: TableBorder,
    /// Uniform cell padding in twips
    pub(crate) cell_margin: u32,
}

impl Default for TableProperties {
    fn default() -> Self {
        Self {
            border: TableBorder::default(),
            cell_margin: 100,
        }
    }
}

/// A mutable table with a fixed column grid.
#[derive(Debug, Clone)]
pub struct MutableTable {
    pub(crate) rows: Vec<MutableRow>,
    /// Column widths in twips
    pub(crate) grid: Vec<u32>,
    pub(crate) properties: TableProperties,
}

impl MutableTable {
    pub(crate) fn new(grid: Vec<u32>) -> Self {
        Self {
            rows: Vec::new(),
            grid,
            properties: TableProperties::default(),
        }
    }

    /// Add an empty row; cells are added through the returned handle.
    pub fn add_row(&mut self) -> &mut MutableRow {
        self.rows.push(MutableRow::new());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Uniform cell padding in twips.
    pub fn set_cell_margin(&mut self, twips: u32) {
        self.properties.cell_margin = twips;
    }

    pub fn cell(&mut self, row: usize, col: usize) -> Option<&mut MutableCell> {
        self.rows.get_mut(row)?.cell(col)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column widths in twips.
    #[inline]
    pub fn grid(&self) -> &[u32] {
        &self.grid
    }

    pub fn total_width(&self) -> u32 {
        self.grid.iter().sum()
    }

    pub(crate) fn paragraphs(&self) -> impl Iterator<Item = &MutableParagraph> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .flat_map(|cell| cell.paragraphs.iter())
    }

    pub(crate) fn to_xml(&self, xml: &mut String, cursor: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:tbl>");

        xml.push_str("<w:tblPr>");
        write!(xml, "<w:tblW w:w=\"{}\" w:type=\"dxa\"/>", self.total_width())?;

        let border = &self.properties.border;
        xml.push_str("<w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            write!(
                xml,
                "<w:{} w:val=\"{}\" w:sz=\"{}\" w:space=\"0\" w:color=\"{}\"/>",
                edge,
                border.style.as_str(),
                border.size,
                border.color
            )?;
        }
        xml.push_str("</w:tblBorders>");

        xml.push_str("<w:tblLayout w:type=\"fixed\"/>");

        let margin = self.properties.cell_margin;
        xml.push_str("<w:tblCellMar>");
        for side in ["top", "left", "bottom", "right"] {
            write!(xml, "<w:{} w:w=\"{}\" w:type=\"dxa\"/>", side, margin)?;
        }
        xml.push_str("</w:tblCellMar>");
        xml.push_str("</w:tblPr>");

        xml.push_str("<w:tblGrid>");
        for width in &self.grid {
            write!(xml, "<w:gridCol w:w=\"{}\"/>", width)?;
        }
        xml.push_str("</w:tblGrid>");

        for row in &self.rows {
            row.to_xml(xml, &self.grid, cursor)?;
        }

        xml.push_str("</w:tbl>");

        Ok(())
    }
}

/// A mutable table row.
#[derive(Debug, Clone, Default)]
pub struct MutableRow {
    pub(crate) cells: Vec<MutableCell>,
}

impl MutableRow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn cell(&mut self, index: usize) -> Option<&mut MutableCell> {
        self.cells.get_mut(index)
    }

    pub fn add_cell(&mut self) -> &mut MutableCell {
        self.cells.push(MutableCell::new());
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn to_xml(&self, xml: &mut String, grid: &[u32], cursor: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:tr>");

        for (col, cell) in self.cells.iter().enumerate() {
            cell.to_xml(xml, grid.get(col).copied(), cursor)?;
        }

        xml.push_str("</w:tr>");

        Ok(())
    }
}

/// A mutable table cell.
#[derive(Debug, Clone, Default)]
pub struct MutableCell {
    pub(crate) paragraphs: Vec<MutableParagraph>,
    /// Cell background color in hex RGB format
    pub(crate) background_color: Option<String>,
}

impl MutableCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        self.paragraphs.push(MutableParagraph::new());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    #[inline]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn set_text(&mut self, text: &str) {
        self.paragraphs.clear();
        self.add_paragraph().add_run_with_text(text);
    }

    /// Cell background color in hex RGB format (e.g., "FFFF00" for yellow).
    pub fn set_background_color(&mut self, color: &str) {
        self.background_color = Some(color.to_string());
    }

    fn to_xml(&self, xml: &mut String, width: Option<u32>, cursor: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:tc>");

        if width.is_some() || self.background_color.is_some() {
            xml.push_str("<w:tcPr>");
            if let Some(width) = width {
                write!(xml, "<w:tcW w:w=\"{}\" w:type=\"dxa\"/>", width)?;
            }
            if let Some(ref bg_color) = self.background_color {
                write!(
                    xml,
                    "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
                    bg_color
                )?;
            }
            xml.push_str("</w:tcPr>");
        }

        // A cell must end with a paragraph.
        if self.paragraphs.is_empty() {
            xml.push_str("<w:p/>");
        }
        for para in &self.paragraphs {
            para.to_xml(xml, cursor)?;
        }

        xml.push_str("</w:tc>");

        Ok(())
    }
}
