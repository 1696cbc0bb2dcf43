//! Export pipeline: walk, resolve, assemble, serialize.

use super::fetch::{ImageFetcher, default_fetcher};
use super::image::{ResolvedImage, resolve_image};
use super::sink::PackageSink;
use super::snapshot::MeasurementSnapshot;
use super::style::word_font_name;
use super::table::resolve_table_geometry;
use super::walker::{Block, BlockKind, ImageRun, Run, StyleDefaults, TextRun, extract_blocks};
use crate::common::error::Result;
use crate::common::unit::{pt_to_emu, pt_to_half_points, px_to_twips};
use crate::document::{Alignment, BreakKind, RichDocument, TextFormat};
use crate::layout::{DEFAULT_PAGE_HEIGHT_PX, DEFAULT_PAGE_WIDTH_PX, PageMargins};
use crate::ooxml::docx::Package;
use crate::ooxml::docx::format::{LineSpacing, ParagraphAlignment, UnderlineStyle, VerticalAlign};
use crate::ooxml::docx::writer::{
    AppProperties, DocDefaults, DocumentProperties, MutableCell, MutableDocument, MutableParagraph,
    MutableRun, SectionProperties,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

const MONOSPACE_FONT: &str = "Courier New";
const QUOTE_STYLE: &str = "Quote";
const HYPERLINK_STYLE: &str = "Hyperlink";
/// Left indent per list nesting level, in twips
const LIST_INDENT: u32 = 360;

/// Export configuration.
///
/// # Examples
///
/// ```rust
/// use folio::export::ExportOptions;
///
/// let options = ExportOptions::default()
///     .with_block_spacing(0, 240)
///     .with_legacy_three_column(false);
/// assert_eq!(options.space_after, 240);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Space before every block, in twips
    pub space_before: u32,
    /// Space after every block, in twips
    pub space_after: u32,
    pub image_boost: f64,
    pub max_image_width_pt: f64,
    /// Table content width in twips; derived from the page when unset
    pub content_width: Option<u32>,
    /// Uniform table cell padding in twips
    pub cell_padding: u32,
    /// Split unmeasured three-column tables as 3600/3600/remainder
    pub legacy_three_column: bool,
    pub file_name: String,
    pub page_width_px: f64,
    pub page_height_px: f64,
    pub title: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            space_before: 120,
            space_after: 120,
            image_boost: 1.1,
            max_image_width_pt: 700.0,
            content_width: None,
            cell_padding: 100,
            legacy_three_column: true,
            file_name: "document.docx".to_string(),
            page_width_px: DEFAULT_PAGE_WIDTH_PX,
            page_height_px: DEFAULT_PAGE_HEIGHT_PX,
            title: None,
        }
    }
}

impl ExportOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_spacing(mut self, before: u32, after: u32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn with_image_boost(mut self, boost: f64) -> Self {
        self.image_boost = boost;
        self
    }

    pub fn with_max_image_width(mut self, points: f64) -> Self {
        self.max_image_width_pt = points;
        self
    }

    pub fn with_content_width(mut self, twips: u32) -> Self {
        self.content_width = Some(twips);
        self
    }

    pub fn with_cell_padding(mut self, twips: u32) -> Self {
        self.cell_padding = twips;
        self
    }

    pub fn with_legacy_three_column(mut self, enabled: bool) -> Self {
        self.legacy_three_column = enabled;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn with_page_size(mut self, width_px: f64, height_px: f64) -> Self {
        self.page_width_px = width_px;
        self.page_height_px = height_px;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Converts a [`RichDocument`] into a Word package.
///
/// The document is only read. Images are resolved concurrently; any image
/// that cannot be resolved is left out and the export carries on.
///
/// # Examples
///
/// ```rust
/// use folio::document::{Node, RichDocument};
/// use folio::export::{DocumentExporter, MeasurementSnapshot};
/// use folio::layout::PageMargins;
///
/// let doc = RichDocument::from_nodes(vec![Node::paragraph(vec![Node::text("Hi")])]);
/// let exporter = DocumentExporter::new();
/// let bytes = exporter.export_blocking(&doc, &PageMargins::default(), &MeasurementSnapshot::new())?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), folio::Error>(())
/// ```
#[derive(Clone)]
pub struct DocumentExporter {
    options: ExportOptions,
    defaults: StyleDefaults,
    fetcher: Arc<dyn ImageFetcher>,
}

impl Default for DocumentExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocumentExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentExporter")
            .field("options", &self.options)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl DocumentExporter {
    pub fn new() -> Self {
        Self {
            options: ExportOptions::default(),
            defaults: StyleDefaults::default(),
            fetcher: default_fetcher(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_defaults(mut self, defaults: StyleDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    #[inline]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    #[inline]
    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    /// Serialize `document` to package bytes.
    pub async fn export(
        &self,
        document: &RichDocument,
        margins: &PageMargins,
        snapshot: &MeasurementSnapshot,
    ) -> Result<Vec<u8>> {
        let package = self.assemble(document, margins, snapshot).await?;
        Ok(package.to_bytes()?)
    }

    /// Export and hand the bytes to `sink` under the configured file name.
    pub async fn export_to(
        &self,
        document: &RichDocument,
        margins: &PageMargins,
        snapshot: &MeasurementSnapshot,
        sink: &mut dyn PackageSink,
    ) -> Result<()> {
        let bytes = self.export(document, margins, snapshot).await?;
        sink.accept(bytes, &self.options.file_name)
    }

    /// Run [`export`](Self::export) on a private current-thread runtime.
    ///
    /// Must not be called from within an async context.
    pub fn export_blocking(
        &self,
        document: &RichDocument,
        margins: &PageMargins,
        snapshot: &MeasurementSnapshot,
    ) -> Result<Vec<u8>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.export(document, margins, snapshot))
    }

    /// Build the package without serializing it.
    pub async fn assemble(
        &self,
        document: &RichDocument,
        margins: &PageMargins,
        snapshot: &MeasurementSnapshot,
    ) -> Result<Package> {
        let blocks = extract_blocks(document, &self.defaults);
        debug!(blocks = blocks.len(), "document flattened");

        let requests: Vec<&ImageRun> = blocks.iter().flat_map(Block::images).collect();
        let images = self.resolve_images(&requests, snapshot).await;

        let section = SectionProperties::letter()
            .page_size(
                px_to_twips(self.options.page_width_px),
                px_to_twips(self.options.page_height_px),
            )
            .margins(
                px_to_twips(margins.top),
                px_to_twips(margins.right),
                px_to_twips(margins.bottom),
                px_to_twips(margins.left),
            );
        let content_width = self.options.content_width.unwrap_or(section.content_width());

        let mut output = MutableDocument::new();
        output.set_section(section);

        let mut assembler = Assembler {
            options: &self.options,
            snapshot,
            images,
            content_width,
            embedded: 0,
        };
        for block in &blocks {
            assembler.add_block(&mut output, block)?;
        }

        let paragraphs = output.paragraph_count();
        let tables = output.table_count();

        let mut package = Package::new(output)?;
        package.set_doc_defaults(DocDefaults {
            font_name: word_font_name(&self.defaults.font_family).to_string(),
            font_size: pt_to_half_points(self.defaults.font_size_pt()),
            line_spacing: Some(LineSpacing::Multiple(self.defaults.line_height)),
        });
        let mut properties = DocumentProperties::now();
        if let Some(title) = &self.options.title {
            properties = properties.title(title);
        }
        package.set_properties(properties);
        package.set_app_properties(AppProperties {
            paragraphs: Some(paragraphs as u32),
            ..AppProperties::default()
        });

        info!(
            blocks = blocks.len(),
            paragraphs,
            tables,
            images = requests.len(),
            images_embedded = assembler.embedded,
            "document exported"
        );
        Ok(package)
    }

    /// Resolve every image concurrently. Results keep their image index;
    /// failed images are absent from the map.
    async fn resolve_images(
        &self,
        requests: &[&ImageRun],
        snapshot: &MeasurementSnapshot,
    ) -> HashMap<usize, ResolvedImage> {
        let fetcher = self.fetcher.as_ref();
        let resolved =
            futures::future::join_all(requests.iter().map(|run| resolve_image(&run.src, fetcher)))
                .await;

        requests
            .iter()
            .zip(resolved)
            .filter_map(|(run, image)| {
                let image = image?;
                let image = match snapshot.image_size(run.index) {
                    Some((w, h)) => image.with_measured(w, h),
                    None => match (run.width_px, run.height_px) {
                        (Some(w), Some(h)) => image.with_measured(w, h),
                        _ => image,
                    },
                };
                Some((run.index, image))
            })
            .collect()
    }
}

/// Serialize `document` with default options and no measurements.
pub async fn export_document(document: &RichDocument, margins: &PageMargins) -> Result<Vec<u8>> {
    DocumentExporter::new()
        .export(document, margins, &MeasurementSnapshot::new())
        .await
}

struct Assembler<'a> {
    options: &'a ExportOptions,
    snapshot: &'a MeasurementSnapshot,
    /// Resolved images not yet placed
    images: HashMap<usize, ResolvedImage>,
    content_width: u32,
    embedded: usize,
}

impl Assembler<'_> {
    fn add_block(&mut self, doc: &mut MutableDocument, block: &Block) -> Result<()> {
        match &block.kind {
            BlockKind::PageBreak(BreakKind::Auto) => {},
            BlockKind::PageBreak(BreakKind::Manual) => {
                doc.add_page_break();
            },
            BlockKind::Table(table) => {
                let Some(geometry) = resolve_table_geometry(
                    self.snapshot,
                    table.index,
                    table.column_count(),
                    self.content_width,
                    self.options.legacy_three_column,
                ) else {
                    debug!(table = table.index, "skipping table without columns");
                    return Ok(());
                };

                let output = doc.add_table(geometry.column_widths);
                output.set_cell_margin(self.options.cell_padding);
                for row in &table.rows {
                    let output_row = output.add_row();
                    for cell in row {
                        let output_cell = output_row.add_cell();
                        if let Some(background) = &cell.background {
                            output_cell.set_background_color(&background.to_hex());
                        }
                        self.fill_cell(output_cell, &cell.blocks);
                    }
                }
            },
            BlockKind::Heading(level) => {
                let paragraph = doc.add_heading(*level)?;
                self.fill_paragraph(paragraph, block);
            },
            _ => self.fill_paragraph(doc.add_paragraph(), block),
        }
        Ok(())
    }

    fn fill_cell(&mut self, cell: &mut MutableCell, blocks: &[Block]) {
        for block in blocks {
            match &block.kind {
                BlockKind::PageBreak(_) => {},
                // cells hold paragraphs only, so nested tables are flattened
                BlockKind::Table(nested) => {
                    for nested_cell in nested.rows.iter().flatten() {
                        self.fill_cell(cell, &nested_cell.blocks);
                    }
                },
                BlockKind::Heading(level) => {
                    let paragraph = cell.add_paragraph();
                    paragraph.set_style(&format!("Heading{}", level));
                    self.fill_paragraph(paragraph, block);
                },
                _ => self.fill_paragraph(cell.add_paragraph(), block),
            }
        }
    }

    fn fill_paragraph(&mut self, paragraph: &mut MutableParagraph, block: &Block) {
        paragraph.set_space_before(self.options.space_before);
        paragraph.set_space_after(self.options.space_after);
        if block.align != Alignment::Left {
            paragraph.set_alignment(paragraph_alignment(block.align));
        }
        if let Some(spacing) = block.line_spacing {
            paragraph.set_line_spacing(spacing);
        }

        match &block.kind {
            BlockKind::Quote => {
                paragraph.set_style(QUOTE_STYLE);
                paragraph.add_run_with_text("\u{201C}");
                self.add_runs(paragraph, &block.runs);
                paragraph.add_run_with_text("\u{201D}");
            },
            BlockKind::ListItem {
                ordered,
                ordinal,
                depth,
            } => {
                paragraph.set_indent_left(LIST_INDENT * (*depth as u32 + 1));
                let prefix = if *ordered {
                    format!("{}. ", ordinal)
                } else {
                    "\u{2022} ".to_string()
                };
                paragraph.add_run_with_text(&prefix);
                self.add_runs(paragraph, &block.runs);
            },
            _ => self.add_runs(paragraph, &block.runs),
        }
    }

    /// Emit runs; consecutive text runs sharing a link target become one
    /// hyperlink.
    fn add_runs(&mut self, paragraph: &mut MutableParagraph, runs: &[Run]) {
        let mut i = 0;
        while i < runs.len() {
            match &runs[i] {
                Run::Text(text) => match text.link.as_deref() {
                    Some(url) => {
                        let hyperlink = paragraph.add_hyperlink(url);
                        while let Some(Run::Text(linked)) = runs.get(i)
                            && linked.link.as_deref() == Some(url)
                        {
                            let run = hyperlink.add_run_with_text(&linked.text);
                            apply_text_format(run, linked);
                            run.style(HYPERLINK_STYLE);
                            i += 1;
                        }
                        continue;
                    },
                    None => apply_text_format(paragraph.add_run_with_text(&text.text), text),
                },
                Run::LineBreak => {
                    paragraph.add_line_break();
                },
                Run::Image(image) => {
                    if let Some(resolved) = self.images.remove(&image.index) {
                        let (width, height) = resolved
                            .target_size_pt(self.options.image_boost, self.options.max_image_width_pt);
                        paragraph
                            .add_picture_from_bytes(
                                resolved.data,
                                resolved.format,
                                pt_to_emu(width),
                                pt_to_emu(height),
                            )
                            .set_description(image.alt.clone());
                        self.embedded += 1;
                    }
                },
            }
            i += 1;
        }
    }
}

fn apply_text_format(run: &mut MutableRun, text: &TextRun) {
    let format = text.format;
    if format.contains(TextFormat::BOLD) {
        run.bold(true);
    }
    if format.contains(TextFormat::ITALIC) {
        run.italic(true);
    }
    if format.contains(TextFormat::STRIKETHROUGH) {
        run.strike(true);
    }
    if format.contains(TextFormat::UNDERLINE) {
        run.underline(UnderlineStyle::Single);
    }
    if format.contains(TextFormat::SUBSCRIPT) {
        run.vertical_align(VerticalAlign::Subscript);
    } else if format.contains(TextFormat::SUPERSCRIPT) {
        run.vertical_align(VerticalAlign::Superscript);
    }

    if text.is_monospace() {
        run.font_name(MONOSPACE_FONT);
    } else {
        run.font_name(word_font_name(&text.font_family));
    }
    run.font_size(pt_to_half_points(text.font_size));

    if let Some(color) = text.color {
        run.color(&color.to_hex());
    }
    if let Some(background) = text.background {
        run.shading(&background.to_hex());
    }
}

fn paragraph_alignment(align: Alignment) -> ParagraphAlignment {
    match align {
        Alignment::Left => ParagraphAlignment::Left,
        Alignment::Center => ParagraphAlignment::Center,
        Alignment::Right => ParagraphAlignment::Right,
        Alignment::Justify => ParagraphAlignment::Justify,
    }
}
