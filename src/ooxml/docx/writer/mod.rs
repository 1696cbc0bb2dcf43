//! Mutable document writer components for DOCX.
//!
//! This module provides the writer API for creating Word documents.

pub mod doc;
pub mod hyperlink;
pub mod image;
pub mod paragraph;
pub mod properties;
pub(crate) mod relmap;
pub mod run;
pub mod section;
pub mod style;
pub mod table;

pub use doc::MutableDocument;
pub use hyperlink::MutableHyperlink;
pub use self::image::MutableInlineImage;
pub use paragraph::MutableParagraph;
pub use properties::{AppProperties, DocumentProperties};
pub use run::{MutableRun, RunContent};
pub use section::SectionProperties;
pub use style::{DocDefaults, MutableStyle, generate_styles_xml};
pub use table::{MutableCell, MutableRow, MutableTable, TableBorder};
