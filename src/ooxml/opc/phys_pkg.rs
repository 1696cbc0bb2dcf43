//! Physical package writer.
//!
//! Writes package items as members of a ZIP archive held in memory.

use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a part with Deflate compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.write_with(pack_uri, blob, options)
    }

    /// Write a part without compression; used for already-compressed media.
    pub fn write_stored(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.write_with(pack_uri, blob, options)
    }

    fn write_with(
        &mut self,
        pack_uri: &PackURI,
        blob: &[u8],
        options: SimpleFileOptions,
    ) -> Result<()> {
        self.archive.start_file(pack_uri.membername(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the complete archive.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_multiple_parts() {
        let mut writer = PhysPkgWriter::new();

        let content_types = PackURI::new("/[Content_Types].xml").unwrap();
        let document = PackURI::new("/word/document.xml").unwrap();
        let image = PackURI::new("/word/media/image1.png").unwrap();

        writer.write(&content_types, b"<Types/>").unwrap();
        writer.write(&document, b"<document/>").unwrap();
        writer.write_stored(&image, &[0x89, b'P', b'N', b'G']).unwrap();

        let zip_data = writer.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 3);

        let mut content = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<document/>");
        assert!(archive.by_name("[Content_Types].xml").is_ok());
    }
}
