/// Word (.docx) document generation.
///
/// Documents are built with the mutable writer types and serialized through
/// [`Package`], which lays out the OPC parts a word processor expects.
///
/// # Example
///
/// ```rust
/// use folio::ooxml::docx::Package;
/// use folio::ooxml::docx::format::ParagraphAlignment;
/// use folio::ooxml::docx::writer::MutableDocument;
///
/// let mut doc = MutableDocument::new();
/// doc.add_heading(1)?.add_run_with_text("Title");
/// let para = doc.add_paragraph();
/// para.set_alignment(ParagraphAlignment::Center);
/// para.add_run_with_text("Body").bold(true);
///
/// let bytes = Package::new(doc)?.to_bytes()?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod format;
pub mod package;
pub mod writer;

pub use format::{ImageFormat, LineSpacing, ParagraphAlignment};
pub use package::Package;
