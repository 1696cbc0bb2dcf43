//! Office Open XML (OOXML) output.
//!
//! Two layers:
//!
//! 1. **OPC Layer** (`opc`): package parts, relationships and the ZIP container
//! 2. **WordprocessingML** (`docx`): document, styles and metadata parts
//!
//! # Example
//!
//! ```rust
//! use folio::ooxml::docx::Package;
//! use folio::ooxml::docx::writer::MutableDocument;
//!
//! let mut doc = MutableDocument::new();
//! doc.add_paragraph_with_text("Hello");
//! let opc = Package::new(doc)?.to_opc()?;
//! assert_eq!(opc.part_count(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;
pub(crate) mod xml;

pub use opc::{OpcPackage, PackURI};

pub use error::{OoxmlError, Result};
