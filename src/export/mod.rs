//! Word document export.
//!
//! Export runs once per request over a frozen view of the document:
//!
//! 1. [`extract_blocks`] flattens the tree into blocks of formatted runs,
//!    filling missing run attributes from [`StyleDefaults`].
//! 2. Every image run is resolved concurrently through [`resolve_image`];
//!    a failed image is logged and left out.
//! 3. Table grids come from the [`MeasurementSnapshot`] or fall back to
//!    [`resolve_table_geometry`] defaults.
//! 4. [`DocumentExporter`] assembles the WordprocessingML body with the
//!    page margins as section properties and serializes the package.
//!
//! # Example
//!
//! ```rust
//! use folio::document::{Node, RichDocument};
//! use folio::export::{DocumentExporter, ExportOptions, MeasurementSnapshot};
//! use folio::layout::MarginPreset;
//!
//! let doc = RichDocument::from_nodes(vec![
//!     Node::heading(1, vec![Node::text("Report")]),
//!     Node::paragraph(vec![Node::text("Body text")]),
//! ]);
//!
//! let exporter = DocumentExporter::new()
//!     .with_options(ExportOptions::default().with_title("Report"));
//! let bytes = exporter.export_blocking(
//!     &doc,
//!     &MarginPreset::Narrow.margins(),
//!     &MeasurementSnapshot::new(),
//! )?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), folio::Error>(())
//! ```

pub mod engine;
pub mod fetch;
pub mod image;
pub mod sink;
pub mod snapshot;
pub mod style;
pub mod table;
pub mod walker;

pub use engine::{DocumentExporter, ExportOptions, export_document};
#[cfg(feature = "remote")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchedImage, ImageFetcher, OfflineFetcher, default_fetcher};
pub use self::image::{ImageError, ImageSource, ResolvedImage, resolve_image, target_size_pt};
pub use sink::{FileSink, MemorySink, PackageSink};
pub use snapshot::MeasurementSnapshot;
pub use style::InlineStyle;
pub use table::{ResolvedTableGeometry, resolve_table_geometry};
pub use walker::{Block, BlockKind, ImageRun, Run, StyleDefaults, TableBlock, TableCell, TextRun, extract_blocks};
