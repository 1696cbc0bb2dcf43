//! Rich-document node types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Inline text formatting flags.
    ///
    /// Bit values match the editor's serialized `format` field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextFormat: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE = 1 << 3;
        /// Inline code, rendered monospace
        const CODE = 1 << 4;
        const SUBSCRIPT = 1 << 5;
        const SUPERSCRIPT = 1 << 6;
    }
}

/// Serializes [`TextFormat`] as its raw bit value.
mod format_bits {
    use super::TextFormat;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(format: &TextFormat, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(format.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TextFormat, D::Error> {
        Ok(TextFormat::from_bits_truncate(u32::deserialize(deserializer)?))
    }
}

/// Horizontal alignment of a block element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" | "end" => Ok(Self::Right),
            "justify" => Ok(Self::Justify),
            _ => Err(()),
        }
    }
}

/// Unknown or empty values fall back to left alignment.
impl From<String> for Alignment {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<Alignment> for String {
    fn from(a: Alignment) -> Self {
        a.as_str().to_string()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a break marker entered the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    /// Inserted by the user
    #[default]
    Manual,
    /// Inserted by the reflow engine
    Auto,
}

/// Shared payload of block-level element nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub align: Alignment,
    /// Raw inline style declarations, e.g. `"line-height: 1.5"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub style: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

/// A run of text with formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(default, with = "format_bits")]
    pub format: TextFormat,
    /// Raw inline style declarations, e.g. `"color: #ff0000; font-size: 12pt"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub style: String,
}

/// An inline image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// Data URI, bare base64 payload or http(s) URL
    pub src: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    /// Declared width in px
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Declared height in px
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A node in the rich-document tree.
///
/// Serialized with a `type` tag:
///
/// ```rust
/// use folio::document::Node;
///
/// let json = r#"{"type":"heading","level":2,"children":[{"type":"text","text":"Intro"}]}"#;
/// let node: Node = serde_json::from_str(json).unwrap();
/// assert_eq!(node.kind_name(), "heading");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Paragraph(Element),
    Heading {
        level: u8,
        #[serde(flatten)]
        element: Element,
    },
    Quote(Element),
    /// Holds `ListItem` children
    List {
        #[serde(default)]
        ordered: bool,
        #[serde(flatten)]
        element: Element,
    },
    ListItem(Element),
    Table(Element),
    TableRow(Element),
    /// Holds nested paragraph nodes
    TableCell(Element),
    Text(TextNode),
    LineBreak,
    Link {
        url: String,
        #[serde(default)]
        children: Vec<Node>,
    },
    Image(ImageNode),
    /// A page break marker
    PageBreak {
        #[serde(default)]
        kind: BreakKind,
    },
    /// Wrapper or unrecognized node kind
    Generic {
        kind: String,
        #[serde(default)]
        children: Vec<Node>,
    },
}

impl Node {
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::Paragraph(Element::new(children))
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Self::Heading {
            level,
            element: Element::new(children),
        }
    }

    pub fn quote(children: Vec<Node>) -> Self {
        Self::Quote(Element::new(children))
    }

    pub fn list(ordered: bool, items: Vec<Node>) -> Self {
        Self::List {
            ordered,
            element: Element::new(items),
        }
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Self::ListItem(Element::new(children))
    }

    pub fn table(rows: Vec<Node>) -> Self {
        Self::Table(Element::new(rows))
    }

    pub fn table_row(cells: Vec<Node>) -> Self {
        Self::TableRow(Element::new(cells))
    }

    pub fn table_cell(children: Vec<Node>) -> Self {
        Self::TableCell(Element::new(children))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode {
            text: text.into(),
            ..TextNode::default()
        })
    }

    pub fn styled_text(text: impl Into<String>, format: TextFormat, style: impl Into<String>) -> Self {
        Self::Text(TextNode {
            text: text.into(),
            format,
            style: style.into(),
        })
    }

    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Link {
            url: url.into(),
            children,
        }
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::Image(ImageNode {
            src: src.into(),
            ..ImageNode::default()
        })
    }

    pub fn page_break(kind: BreakKind) -> Self {
        Self::PageBreak { kind }
    }

    /// Serialized type name of this node.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading { .. } => "heading",
            Self::Quote(_) => "quote",
            Self::List { .. } => "list",
            Self::ListItem(_) => "list-item",
            Self::Table(_) => "table",
            Self::TableRow(_) => "table-row",
            Self::TableCell(_) => "table-cell",
            Self::Text(_) => "text",
            Self::LineBreak => "line-break",
            Self::Link { .. } => "link",
            Self::Image(_) => "image",
            Self::PageBreak { .. } => "page-break",
            Self::Generic { kind, .. } => kind,
        }
    }

    /// Element payload of block-level nodes.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Paragraph(e)
            | Self::Quote(e)
            | Self::ListItem(e)
            | Self::Table(e)
            | Self::TableRow(e)
            | Self::TableCell(e) => Some(e),
            Self::Heading { element, .. } | Self::List { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Link { children, .. } | Self::Generic { children, .. } => children,
            _ => self.element().map_or(&[], |e| e.children.as_slice()),
        }
    }

    #[inline]
    pub fn is_break_marker(&self) -> bool {
        matches!(self, Self::PageBreak { .. })
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(&t.text),
            Self::LineBreak => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_format_bits() {
        let format = TextFormat::BOLD | TextFormat::UNDERLINE;
        assert_eq!(format.bits(), 9);
        assert_eq!(TextFormat::CODE.bits(), 16);
        assert_eq!(TextFormat::SUPERSCRIPT.bits(), 64);
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::from("center".to_string()), Alignment::Center);
        assert_eq!(Alignment::from(String::new()), Alignment::Left);
        assert_eq!(Alignment::from("JUSTIFY".to_string()), Alignment::Justify);
    }

    #[test]
    fn test_serde_shape() {
        let node = Node::paragraph(vec![
            Node::styled_text("hi", TextFormat::BOLD | TextFormat::ITALIC, "color: red"),
            Node::LineBreak,
            Node::page_break(BreakKind::Auto),
        ]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "paragraph");
        assert_eq!(value["align"], "left");
        assert_eq!(value["children"][0]["format"], 3);
        assert_eq!(value["children"][1]["type"], "line-break");
        assert_eq!(value["children"][2]["kind"], "auto");

        let back: Node = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"type":"list","children":[{"type":"list-item","children":[]}]}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        match &node {
            Node::List { ordered, element } => {
                assert!(!ordered);
                assert_eq!(element.children.len(), 1);
            },
            other => panic!("unexpected node {:?}", other),
        }

        let json = r#"{"type":"page-break"}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node, Node::page_break(BreakKind::Manual));
    }

    #[test]
    fn test_text_content() {
        let node = Node::paragraph(vec![
            Node::text("a"),
            Node::link("https://example.com", vec![Node::text("b")]),
            Node::LineBreak,
            Node::text("c"),
        ]);
        assert_eq!(node.text_content(), "ab\nc");
        assert!(!node.is_break_marker());
        assert_eq!(node.children().len(), 4);
    }
}
