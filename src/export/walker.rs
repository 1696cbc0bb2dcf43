//! Flattens the rich-document tree into ordered blocks of runs.

use super::style::{InlineStyle, MAX_FONT_SIZE_PT};
use crate::common::style::RGBColor;
use crate::common::unit::px_to_pt;
use crate::document::{Alignment, BreakKind, Element, ImageNode, Node, RichDocument, TextFormat, TextNode};
use crate::ooxml::docx::LineSpacing;
use std::slice;

/// Document-wide run defaults captured from the editing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub font_family: String,
    pub font_size_px: f64,
    /// Multiple of single line spacing
    pub line_height: f64,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size_px: 14.0,
            line_height: 1.5,
        }
    }
}

impl StyleDefaults {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    #[inline]
    pub fn with_font_size_px(mut self, px: f64) -> Self {
        self.font_size_px = px;
        self
    }

    #[inline]
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    #[inline]
    pub fn font_size_pt(&self) -> f64 {
        px_to_pt(self.font_size_px).min(MAX_FONT_SIZE_PT)
    }
}

/// A formatted run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
    pub color: Option<RGBColor>,
    pub background: Option<RGBColor>,
    pub font_family: String,
    /// Points
    pub font_size: f64,
    pub link: Option<String>,
}

impl TextRun {
    #[inline]
    pub fn is_monospace(&self) -> bool {
        self.format.contains(TextFormat::CODE)
    }
}

/// An image reference, numbered in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRun {
    pub index: usize,
    pub src: String,
    pub alt: String,
    pub width_px: Option<f64>,
    pub height_px: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Text(TextRun),
    LineBreak,
    Image(ImageRun),
}

/// A table with nested cell content, numbered in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub index: usize,
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    /// Cell shading from the cell's own `background-color`
    pub background: Option<RGBColor>,
    pub blocks: Vec<Block>,
}

impl TableBlock {
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Paragraph,
    /// Level 1-6
    Heading(u8),
    Quote,
    ListItem {
        ordered: bool,
        /// 1-based position within its list
        ordinal: usize,
        /// Nesting depth, 0 for a top-level list
        depth: usize,
    },
    Table(TableBlock),
    PageBreak(BreakKind),
}

/// A normalized block-level unit of output.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub align: Alignment,
    pub line_spacing: Option<LineSpacing>,
    pub runs: Vec<Run>,
}

impl Block {
    fn new(kind: BlockKind, runs: Vec<Run>) -> Self {
        Self {
            kind,
            align: Alignment::Left,
            line_spacing: None,
            runs,
        }
    }

    fn from_element(kind: BlockKind, element: &Element, runs: Vec<Run>) -> Self {
        Self {
            kind,
            align: element.align,
            line_spacing: InlineStyle::parse(&element.style).line_spacing,
            runs,
        }
    }

    /// Image runs of this block and of nested table cells, in order.
    pub fn images(&self) -> Vec<&ImageRun> {
        let mut images = Vec::new();
        self.collect_images(&mut images);
        images
    }

    fn collect_images<'a>(&'a self, out: &mut Vec<&'a ImageRun>) {
        for run in &self.runs {
            if let Run::Image(image) = run {
                out.push(image);
            }
        }
        if let BlockKind::Table(table) = &self.kind {
            for block in table.rows.iter().flatten().flat_map(|cell| &cell.blocks) {
                block.collect_images(out);
            }
        }
    }
}

/// Flatten `document` into blocks, filling run attributes from `defaults`.
///
/// # Examples
///
/// ```rust
/// use folio::document::{Node, RichDocument};
/// use folio::export::{StyleDefaults, extract_blocks};
///
/// let doc = RichDocument::from_nodes(vec![
///     Node::heading(1, vec![Node::text("Title")]),
///     Node::paragraph(vec![Node::text("Body")]),
/// ]);
/// let blocks = extract_blocks(&doc, &StyleDefaults::default());
/// assert_eq!(blocks.len(), 2);
/// ```
pub fn extract_blocks(document: &RichDocument, defaults: &StyleDefaults) -> Vec<Block> {
    let mut walker = Walker::new(defaults);
    let mut blocks = Vec::new();
    walker.walk_blocks(document.nodes(), &mut blocks);
    blocks
}

struct Walker<'a> {
    defaults: &'a StyleDefaults,
    next_image: usize,
    next_table: usize,
}

fn is_inline(node: &Node) -> bool {
    matches!(
        node,
        Node::Text(_) | Node::LineBreak | Node::Link { .. } | Node::Image(_)
    )
}

fn is_block(node: &Node) -> bool {
    !is_inline(node) && !matches!(node, Node::Generic { .. })
}

impl<'a> Walker<'a> {
    fn new(defaults: &'a StyleDefaults) -> Self {
        Self {
            defaults,
            next_image: 0,
            next_table: 0,
        }
    }

    /// Walk a block-level sequence; stray inline nodes are gathered into
    /// paragraphs.
    fn walk_blocks<'n>(&mut self, nodes: impl IntoIterator<Item = &'n Node>, out: &mut Vec<Block>) {
        let mut pending = Vec::new();
        for node in nodes {
            if is_inline(node) {
                self.collect_runs(slice::from_ref(node), None, &mut pending);
                continue;
            }
            if !pending.is_empty() {
                out.push(Block::new(BlockKind::Paragraph, std::mem::take(&mut pending)));
            }
            self.block(node, out);
        }
        if !pending.is_empty() {
            out.push(Block::new(BlockKind::Paragraph, pending));
        }
    }

    fn block(&mut self, node: &Node, out: &mut Vec<Block>) {
        match node {
            Node::Paragraph(e) => {
                let runs = self.runs_of(&e.children);
                out.push(Block::from_element(BlockKind::Paragraph, e, runs));
            },
            Node::Heading { level, element } => {
                let runs = self.runs_of(&element.children);
                out.push(Block::from_element(
                    BlockKind::Heading((*level).clamp(1, 6)),
                    element,
                    runs,
                ));
            },
            Node::Quote(e) => {
                let runs = self.runs_of(&e.children);
                out.push(Block::from_element(BlockKind::Quote, e, runs));
            },
            Node::List { ordered, element } => self.list(*ordered, &element.children, 0, out),
            Node::ListItem(_) => self.list(false, slice::from_ref(node), 0, out),
            Node::Table(e) => {
                let table = self.table(&e.children);
                out.push(Block::from_element(BlockKind::Table(table), e, Vec::new()));
            },
            Node::PageBreak { kind } => out.push(Block::new(BlockKind::PageBreak(*kind), Vec::new())),
            Node::TableRow(e) | Node::TableCell(e) => self.walk_blocks(&e.children, out),
            Node::Generic { children, .. } => {
                if children.iter().any(is_block) {
                    self.walk_blocks(children, out);
                } else {
                    let runs = self.runs_of(children);
                    if !runs.is_empty() {
                        out.push(Block::new(BlockKind::Paragraph, runs));
                    }
                }
            },
            Node::Text(_) | Node::LineBreak | Node::Link { .. } | Node::Image(_) => {
                let runs = self.runs_of(slice::from_ref(node));
                out.push(Block::new(BlockKind::Paragraph, runs));
            },
        }
    }

    fn list(&mut self, ordered: bool, items: &[Node], depth: usize, out: &mut Vec<Block>) {
        let mut ordinal = 0;
        for item in items {
            match item {
                Node::ListItem(e) => {
                    ordinal += 1;
                    let (nested, inline): (Vec<&Node>, Vec<&Node>) = e
                        .children
                        .iter()
                        .partition(|child| matches!(child, Node::List { .. }));

                    let mut runs = Vec::new();
                    for child in inline {
                        self.collect_runs(slice::from_ref(child), None, &mut runs);
                    }
                    out.push(Block::from_element(
                        BlockKind::ListItem {
                            ordered,
                            ordinal,
                            depth,
                        },
                        e,
                        runs,
                    ));

                    for child in nested {
                        if let Node::List { ordered, element } = child {
                            self.list(*ordered, &element.children, depth + 1, out);
                        }
                    }
                },
                Node::List { ordered, element } => {
                    self.list(*ordered, &element.children, depth + 1, out)
                },
                other => self.block(other, out),
            }
        }
    }

    fn table(&mut self, rows: &[Node]) -> TableBlock {
        let index = self.next_table;
        self.next_table += 1;

        let mut table_rows = Vec::new();
        for row in rows {
            let Node::TableRow(row) = row else {
                continue;
            };
            let mut cells = Vec::new();
            for cell in &row.children {
                if let Node::TableCell(cell) = cell {
                    let mut blocks = Vec::new();
                    self.walk_blocks(&cell.children, &mut blocks);
                    cells.push(TableCell {
                        background: InlineStyle::parse(&cell.style).background,
                        blocks,
                    });
                }
            }
            table_rows.push(cells);
        }

        TableBlock {
            index,
            rows: table_rows,
        }
    }

    fn runs_of(&mut self, nodes: &[Node]) -> Vec<Run> {
        let mut runs = Vec::new();
        self.collect_runs(nodes, None, &mut runs);
        runs
    }

    /// Flatten inline content. Links pass their target down to every text
    /// run beneath them; other containers are transparent.
    fn collect_runs(&mut self, nodes: &[Node], link: Option<&str>, runs: &mut Vec<Run>) {
        for node in nodes {
            match node {
                Node::Text(text) => runs.push(Run::Text(self.text_run(text, link))),
                Node::LineBreak => runs.push(Run::LineBreak),
                Node::Image(image) => runs.push(Run::Image(self.image_run(image))),
                Node::Link { url, children } => self.collect_runs(children, Some(url), runs),
                Node::PageBreak { .. } => {},
                other => self.collect_runs(other.children(), link, runs),
            }
        }
    }

    fn text_run(&self, text: &TextNode, link: Option<&str>) -> TextRun {
        let style = InlineStyle::parse(&text.style);
        TextRun {
            text: text.text.clone(),
            format: text.format,
            color: style.color,
            background: style.background,
            font_family: style
                .font_family
                .unwrap_or_else(|| self.defaults.font_family.clone()),
            font_size: style.font_size.unwrap_or_else(|| self.defaults.font_size_pt()),
            link: link.map(str::to_string),
        }
    }

    fn image_run(&mut self, image: &ImageNode) -> ImageRun {
        let index = self.next_image;
        self.next_image += 1;
        ImageRun {
            index,
            src: image.src.clone(),
            alt: image.alt.clone(),
            width_px: image.width,
            height_px: image.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> Node {
        Node::table_cell(vec![Node::paragraph(vec![Node::text(text)])])
    }

    fn text_of(block: &Block) -> String {
        block
            .runs
            .iter()
            .filter_map(|r| match r {
                Run::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_heading_list_table_counts() {
        let doc = RichDocument::from_nodes(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::list(
                true,
                vec![
                    Node::list_item(vec![Node::text("one")]),
                    Node::list_item(vec![Node::text("two")]),
                ],
            ),
            Node::table(vec![
                Node::table_row(vec![cell("a"), cell("b")]),
                Node::table_row(vec![cell("c"), cell("d")]),
            ]),
        ]);

        let blocks = extract_blocks(&doc, &StyleDefaults::default());
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].kind, BlockKind::Heading(1));
        assert_eq!(
            blocks[2].kind,
            BlockKind::ListItem {
                ordered: true,
                ordinal: 2,
                depth: 0
            }
        );
        match &blocks[3].kind {
            BlockKind::Table(table) => {
                assert_eq!(table.index, 0);
                assert_eq!(table.rows.len(), 2);
                assert_eq!(table.column_count(), 2);
                assert_eq!(text_of(&table.rows[1][1].blocks[0]), "d");
                assert_eq!(table.rows[0][0].background, None);
            },
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_fill_missing_attributes() {
        let defaults = StyleDefaults::new().with_font_family("Tinos");
        let doc = RichDocument::from_nodes(vec![Node::paragraph(vec![
            Node::text("plain"),
            Node::styled_text("styled", TextFormat::BOLD, "font-size: 12pt; color: #00ff00; font-family: \"Courier\", monospace"),
        ])]);

        let blocks = extract_blocks(&doc, &defaults);
        let Run::Text(plain) = &blocks[0].runs[0] else {
            panic!("expected text run");
        };
        assert_eq!(plain.font_family, "Tinos");
        assert_eq!(plain.font_size, 10.5);
        assert_eq!(plain.color, None);

        let Run::Text(styled) = &blocks[0].runs[1] else {
            panic!("expected text run");
        };
        assert_eq!(styled.font_family, "Courier");
        assert_eq!(styled.font_size, 12.0);
        assert_eq!(styled.color, Some(RGBColor::new(0, 255, 0)));
        assert!(styled.format.contains(TextFormat::BOLD));
    }

    #[test]
    fn test_links_propagate_and_images_are_numbered() {
        let doc = RichDocument::from_nodes(vec![
            Node::paragraph(vec![
                Node::image("data:image/png;base64,AAAA"),
                Node::link(
                    "https://example.com",
                    vec![Node::Generic {
                        kind: "span".to_string(),
                        children: vec![Node::text("a"), Node::text("b")],
                    }],
                ),
                Node::LineBreak,
            ]),
            Node::table(vec![Node::table_row(vec![Node::table_cell(vec![
                Node::paragraph(vec![Node::image("https://example.com/x.png")]),
            ])])]),
            Node::paragraph(vec![Node::image("https://example.com/y.png")]),
        ]);

        let blocks = extract_blocks(&doc, &StyleDefaults::default());
        let runs = &blocks[0].runs;
        assert_eq!(runs.len(), 4);
        for run in &runs[1..3] {
            let Run::Text(t) = run else {
                panic!("expected text run");
            };
            assert_eq!(t.link.as_deref(), Some("https://example.com"));
        }
        assert_eq!(runs[3], Run::LineBreak);

        let indices: Vec<usize> = blocks.iter().flat_map(|b| b.images()).map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_generic_nodes() {
        let doc = RichDocument::from_nodes(vec![
            Node::Generic {
                kind: "empty-wrapper".to_string(),
                children: vec![],
            },
            Node::Generic {
                kind: "overflow".to_string(),
                children: vec![Node::text("kept")],
            },
            Node::Generic {
                kind: "section".to_string(),
                children: vec![
                    Node::paragraph(vec![Node::text("x")]),
                    Node::quote(vec![Node::text("y")]),
                ],
            },
        ]);

        let blocks = extract_blocks(&doc, &StyleDefaults::default());
        assert_eq!(blocks.len(), 3);
        assert_eq!(text_of(&blocks[0]), "kept");
        assert_eq!(blocks[2].kind, BlockKind::Quote);
    }

    #[test]
    fn test_nested_lists_and_breaks() {
        let doc = RichDocument::from_nodes(vec![
            Node::list(
                false,
                vec![Node::list_item(vec![
                    Node::text("outer"),
                    Node::list(true, vec![Node::list_item(vec![Node::text("inner")])]),
                ])],
            ),
            Node::page_break(BreakKind::Auto),
        ]);

        let blocks = extract_blocks(&doc, &StyleDefaults::default());
        assert_eq!(blocks.len(), 3);
        assert_eq!(text_of(&blocks[0]), "outer");
        assert_eq!(
            blocks[1].kind,
            BlockKind::ListItem {
                ordered: true,
                ordinal: 1,
                depth: 1
            }
        );
        assert_eq!(blocks[2].kind, BlockKind::PageBreak(BreakKind::Auto));
    }

    #[test]
    fn test_paragraph_line_height_and_alignment() {
        let element = Element::new(vec![Node::text("x")])
            .with_align(Alignment::Justify)
            .with_style("line-height: 2");
        let doc = RichDocument::from_nodes(vec![Node::Paragraph(element)]);

        let blocks = extract_blocks(&doc, &StyleDefaults::default());
        assert_eq!(blocks[0].align, Alignment::Justify);
        assert_eq!(blocks[0].line_spacing, Some(LineSpacing::Multiple(2.0)));
    }

    #[test]
    fn test_cell_background_captured() {
        let shaded = Node::TableCell(
            Element::new(vec![Node::paragraph(vec![Node::text("x")])]).with_style("background-color: #ffff00"),
        );
        let doc = RichDocument::from_nodes(vec![Node::table(vec![Node::table_row(vec![shaded, cell("y")])])]);

        let blocks = extract_blocks(&doc, &StyleDefaults::default());
        let BlockKind::Table(table) = &blocks[0].kind else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0][0].background, Some(RGBColor::new(255, 255, 0)));
        assert_eq!(table.rows[0][1].background, None);
    }
}
