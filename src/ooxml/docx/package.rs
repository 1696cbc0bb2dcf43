/// Package assembly for Word documents.
use crate::ooxml::docx::writer::properties::{AppProperties, DocumentProperties};
use crate::ooxml::docx::writer::relmap::RelationshipMapper;
use crate::ooxml::docx::writer::style::{DocDefaults, MutableStyle, generate_styles_xml};
use crate::ooxml::docx::writer::MutableDocument;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::error::OpcError;
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part};
use std::path::Path;
use tracing::debug;

const DOCUMENT_URI: &str = "/word/document.xml";
const STYLES_URI: &str = "/word/styles.xml";
const SETTINGS_URI: &str = "/word/settings.xml";
const CORE_URI: &str = "/docProps/core.xml";
const APP_URI: &str = "/docProps/app.xml";

/// A Word (.docx) package ready to be written.
///
/// Wraps a [`MutableDocument`] together with the styles, document defaults
/// and metadata that go into the other parts of the package.
///
/// # Examples
///
/// ```rust
/// use folio::ooxml::docx::Package;
/// use folio::ooxml::docx::writer::MutableDocument;
///
/// let mut doc = MutableDocument::new();
/// doc.add_paragraph_with_text("Hello");
///
/// let bytes = Package::new(doc)?.to_bytes()?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Package {
    document: MutableDocument,
    styles: Vec<MutableStyle>,
    doc_defaults: DocDefaults,
    core: DocumentProperties,
    app: AppProperties,
}

impl Package {
    /// Wrap a document with the built-in style set and current timestamps.
    pub fn new(document: MutableDocument) -> Result<Self> {
        Ok(Self {
            document,
            styles: MutableStyle::builtin_set()?,
            doc_defaults: DocDefaults::default(),
            core: DocumentProperties::now(),
            app: AppProperties::default(),
        })
    }

    #[inline]
    pub fn document(&self) -> &MutableDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut MutableDocument {
        &mut self.document
    }

    pub fn styles_mut(&mut self) -> &mut Vec<MutableStyle> {
        &mut self.styles
    }

    pub fn set_doc_defaults(&mut self, defaults: DocDefaults) {
        self.doc_defaults = defaults;
    }

    pub fn set_properties(&mut self, properties: DocumentProperties) {
        self.core = properties;
    }

    pub fn set_app_properties(&mut self, properties: AppProperties) {
        self.app = properties;
    }

    /// Build the OPC package: main document, styles, settings, media and
    /// metadata parts with their relationships.
    pub fn to_opc(&self) -> Result<OpcPackage> {
        let mut package = OpcPackage::new();

        let document_uri = pack_uri(DOCUMENT_URI)?;
        let mut document_part = Part::new(document_uri.clone(), ct::WML_DOCUMENT_MAIN, Vec::new());

        let styles_uri = pack_uri(STYLES_URI)?;
        let styles_xml = generate_styles_xml(&self.styles, &self.doc_defaults)?;
        document_part.relate_to(&styles_uri, rt::STYLES);
        package.add_part(Part::xml(styles_uri, ct::WML_STYLES, styles_xml))?;

        let settings_uri = pack_uri(SETTINGS_URI)?;
        document_part.relate_to(&settings_uri, rt::SETTINGS);
        package.add_part(Part::xml(settings_uri, ct::WML_SETTINGS, settings_xml()))?;

        let mut rel_mapper = RelationshipMapper::new();

        for (index, (data, format)) in self.document.collect_images().into_iter().enumerate() {
            let media_uri = pack_uri(&format!(
                "/word/media/image{}.{}",
                index + 1,
                format.extension()
            ))?;
            let r_id = document_part.relate_to(&media_uri, rt::IMAGE);
            rel_mapper.add_image(index, r_id);
            package.add_part(Part::new(media_uri, format.mime_type(), data.to_vec()))?;
        }

        for (index, url) in self.document.collect_hyperlink_urls().iter().enumerate() {
            let r_id = document_part.relate_to_ext(url, rt::HYPERLINK);
            rel_mapper.add_hyperlink(index, r_id);
        }

        let document_xml = self.document.to_xml_with_rels(&rel_mapper)?;
        let document_part = Part::xml(document_uri.clone(), ct::WML_DOCUMENT_MAIN, document_xml)
            .with_rels(document_part.rels().clone());
        package.add_part(document_part)?;
        package.relate_to(&document_uri, rt::OFFICE_DOCUMENT);

        let core_uri = pack_uri(CORE_URI)?;
        package.relate_to(&core_uri, rt::CORE_PROPERTIES);
        package.add_part(Part::xml(core_uri, ct::OPC_CORE_PROPERTIES, self.core.to_xml()))?;

        let app_uri = pack_uri(APP_URI)?;
        package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);
        package.add_part(Part::xml(app_uri, ct::OFC_EXTENDED_PROPERTIES, self.app.to_xml()))?;

        debug!(
            parts = package.part_count(),
            paragraphs = self.document.paragraph_count(),
            tables = self.document.table_count(),
            "docx package assembled"
        );
        Ok(package)
    }

    /// Serialize to .docx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let package = self.to_opc()?;
        Ok(PackageWriter::to_bytes(&package)?)
    }

    /// Serialize and write to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn pack_uri(uri: &str) -> Result<PackURI> {
    Ok(PackURI::new(uri).map_err(OpcError::InvalidPackUri)?)
}

fn settings_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<w:settings xmlns:w=""#);
    xml.push_str(namespace::WML_MAIN);
    xml.push_str(r#"">"#);
    xml.push_str(r#"<w:defaultTabStop w:val="720"/>"#);
    xml.push_str(r#"<w:characterSpacingControl w:val="doNotCompress"/>"#);
    xml.push_str(r#"<w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#);
    xml.push_str("</w:settings>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::format::ImageFormat;
    use std::io::{Cursor, Read};

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    ];

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_parts() {
        let mut doc = MutableDocument::new();
        doc.add_paragraph_with_text("Hello");
        let package = Package::new(doc).unwrap().to_opc().unwrap();

        for uri in [DOCUMENT_URI, STYLES_URI, SETTINGS_URI, CORE_URI, APP_URI] {
            assert!(package.part(&PackURI::new(uri).unwrap()).is_ok(), "{}", uri);
        }
        assert_eq!(package.rels().len(), 3);
    }

    #[test]
    fn test_media_and_hyperlink_relationships() {
        let mut doc = MutableDocument::new();
        let para = doc.add_paragraph();
        para.add_picture_from_bytes(PNG_1X1.to_vec(), ImageFormat::Png, 12700, 12700);
        para.add_hyperlink("https://example.com").add_run_with_text("link");

        let bytes = Package::new(doc).unwrap().to_bytes().unwrap();

        let rels = read_entry(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="media/image1.png""#));
        assert!(rels.contains(r#"Target="https://example.com" TargetMode="External""#));

        let content_types = read_entry(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"Extension="png""#));

        let document = read_entry(&bytes, "word/document.xml");
        assert!(document.contains("<a:blip r:embed=\"rId3\"/>"));
        assert!(document.contains("<w:hyperlink r:id=\"rId4\">"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        Package::new(MutableDocument::new()).unwrap().save(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
