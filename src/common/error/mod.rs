//! Unified error types for folio.
//!
//! Every layer (package writer, WordprocessingML assembly, export pipeline)
//! keeps its own error enum; this module folds them into one type exposed at
//! the crate boundary.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
