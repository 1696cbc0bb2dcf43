//! Folio - paginated rich-text documents with Word export
//!
//! Folio backs a fixed-page word-processing surface. It keeps the rich-text
//! tree, reflows it onto pages by inserting break markers, and exports it as
//! a `.docx` package.
//!
//! # Features
//!
//! - **Pagination**: measured blocks are split across pages of fixed height by
//!   inserting break markers until a fixed point is reached
//! - **Page assignment**: map every block to its page index and leading offset
//! - **DOCX export**: headings, quotes, lists, tables, hyperlinks and images
//!   written as WordprocessingML with the on-screen page margins
//! - **Image resolution**: data URIs, bare base64 and remote URLs, normalized
//!   to PNG when the `imgconv` feature is enabled
//!
//! # Example - Pagination
//!
//! ```rust
//! use folio::document::{Node, NodeId, RichDocument};
//! use folio::layout::{MeasuredBox, plan_reflow};
//!
//! let mut doc = RichDocument::new();
//! let ids: Vec<NodeId> = (0..3)
//!     .map(|_| doc.push(Node::paragraph(vec![Node::text("line")])))
//!     .collect();
//!
//! // three 400px boxes on a page with 864px of room
//! let boxes: Vec<MeasuredBox> = ids.iter().map(|id| MeasuredBox::content(*id, 400.0)).collect();
//! let plan = plan_reflow(&boxes, 864.0);
//! let insertion = plan.insertion.unwrap();
//! assert_eq!(insertion.before, ids[2]);
//! assert_eq!(insertion.leading_offset_px, 64.0);
//! ```
//!
//! # Example - Export
//!
//! ```rust
//! use folio::document::{Node, RichDocument};
//! use folio::export::{DocumentExporter, MeasurementSnapshot};
//! use folio::layout::PageMargins;
//!
//! let doc = RichDocument::from_nodes(vec![Node::paragraph(vec![Node::text("Hello")])]);
//! let bytes = DocumentExporter::new().export_blocking(
//!     &doc,
//!     &PageMargins::default(),
//!     &MeasurementSnapshot::new(),
//! )?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok::<(), folio::Error>(())
//! ```

/// Shared units, colors and the crate error type
pub mod common;

/// The rich-document tree
pub mod document;

/// Word document export pipeline
pub mod export;

/// Page geometry, reflow and page assignment
pub mod layout;

/// Office Open XML package and WordprocessingML writers
pub mod ooxml;

pub use common::{Error, Result};
pub use document::{Node, NodeId, RichDocument};
pub use export::{DocumentExporter, ExportOptions, MeasurementSnapshot, StyleDefaults, export_document};
pub use layout::{MarginPreset, PageGeometry, PageMargins, Paginator};
