//! Package metadata parts: `docProps/core.xml` and `docProps/app.xml`.

use chrono::{DateTime, SecondsFormat, Utc};
use crate::ooxml::xml::escape_xml;

/// Core properties (title, author, timestamps).
#[derive(Debug, Clone, Default)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    /// Document creator/author
    pub creator: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub language: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties stamped with the current time as both created and modified.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created: Some(now),
            modified: Some(now),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn last_modified_by(mut self, name: &str) -> Self {
        self.last_modified_by = Some(name.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Generate core.xml content.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        let text_fields = [
            ("dc:title", &self.title),
            ("dc:subject", &self.subject),
            ("dc:creator", &self.creator),
            ("dc:description", &self.description),
            ("cp:lastModifiedBy", &self.last_modified_by),
            ("dc:language", &self.language),
        ];
        for (tag, value) in text_fields {
            if let Some(value) = value {
                push_element(&mut xml, tag, &escape_xml(value));
            }
        }

        if let Some(ref created) = self.created {
            push_timestamp(&mut xml, "dcterms:created", created);
        }
        if let Some(ref modified) = self.modified {
            push_timestamp(&mut xml, "dcterms:modified", modified);
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

/// Extended (application) properties.
#[derive(Debug, Clone)]
pub struct AppProperties {
    pub application: String,
    pub pages: Option<u32>,
    pub paragraphs: Option<u32>,
}

impl Default for AppProperties {
    fn default() -> Self {
        Self {
            application: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
            pages: None,
            paragraphs: None,
        }
    }
}

impl AppProperties {
    /// Generate app.xml content.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
        push_element(&mut xml, "Application", &escape_xml(&self.application));
        if let Some(pages) = self.pages {
            push_element(&mut xml, "Pages", &pages.to_string());
        }
        if let Some(paragraphs) = self.paragraphs {
            push_element(&mut xml, "Paragraphs", &paragraphs.to_string());
        }
        xml.push_str("</Properties>");
        xml
    }
}

fn push_element(xml: &mut String, tag: &str, content: &str) {
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(content);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

fn push_timestamp(xml: &mut String, tag: &str, at: &DateTime<Utc>) {
    xml.push('<');
    xml.push_str(tag);
    xml.push_str(r#" xsi:type="dcterms:W3CDTF">"#);
    xml.push_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_core_xml() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let props = DocumentProperties {
            created: Some(at),
            modified: Some(at),
            ..DocumentProperties::new().title("Report").creator("A & B")
        };

        let xml = props.to_xml();
        assert!(xml.contains("<dc:title>Report</dc:title>"));
        assert!(xml.contains("<dc:creator>A &amp; B</dc:creator>"));
        assert!(xml.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T12:30:00Z</dcterms:created>"#
        ));
        assert!(!xml.contains("dc:subject"));
    }

    #[test]
    fn test_now_sets_both_timestamps() {
        let props = DocumentProperties::now();
        assert_eq!(props.created, props.modified);
        assert!(props.created.is_some());
    }

    #[test]
    fn test_app_xml() {
        let app = AppProperties {
            pages: Some(3),
            ..AppProperties::default()
        };
        let xml = app.to_xml();
        assert!(xml.contains("<Application>folio/"));
        assert!(xml.contains("<Pages>3</Pages>"));
        assert!(!xml.contains("<Paragraphs>"));
    }
}
