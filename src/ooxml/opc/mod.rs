/// Open Packaging Conventions (OPC) writer.
///
/// Assembles parts and their relationships into the ZIP container that
/// WordprocessingML documents live in:
///
/// - Package structure (parts, relationships)
/// - Content type management
/// - ZIP-based physical packaging
///
/// Relationship ids are parsed with `atoi_simd`; parts are kept in insertion
/// order so that the produced archive is deterministic.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
