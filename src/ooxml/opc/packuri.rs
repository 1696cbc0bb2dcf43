/// Package URI value type.
///
/// A PackURI names a part inside an OPC package. PackURIs always begin with a
/// forward slash and use forward slashes as path separators.
use std::fmt;

/// Pseudo-partname of the package itself.
pub const PACKAGE_URI: &str = "/";
/// Partname of the content types stream.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// A partname within an OPC package, e.g. `/word/document.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI; fails unless `uri` begins with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Directory portion, e.g. `/word` for `/word/document.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    pub fn filename(&self) -> &str {
        self.uri
            .rfind('/')
            .map(|pos| &self.uri[pos + 1..])
            .unwrap_or("")
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        filename
            .rfind('.')
            .map(|pos| &filename[pos + 1..])
            .unwrap_or("")
    }

    /// ZIP member name (leading slash stripped).
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Reference to this part relative to `base_uri`, as written in a
    /// relationship `Target`.
    ///
    /// `/word/media/image1.png` from `/word` gives `media/image1.png`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = Vec::with_capacity(from_parts.len() + to_parts.len());
        segments.extend(std::iter::repeat_n("..", from_parts.len() - common));
        segments.extend(to_parts.iter().skip(common).copied());
        segments.join("/")
    }

    /// PackURI of the `.rels` part for this part, e.g.
    /// `/word/_rels/document.xml.rels`.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let base_uri = self.base_uri();
        let rels_uri = if base_uri == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        Self::new(rels_uri)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for PackURI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_leading_slash() {
        assert!(PackURI::new("word/document.xml").is_err());
        assert!(PackURI::new("/word/document.xml").is_ok());
    }

    #[test]
    fn test_components() {
        let uri = PackURI::new("/word/media/image1.png").unwrap();
        assert_eq!(uri.base_uri(), "/word/media");
        assert_eq!(uri.filename(), "image1.png");
        assert_eq!(uri.ext(), "png");
        assert_eq!(uri.membername(), "word/media/image1.png");
    }

    #[test]
    fn test_package_pseudo_partname() {
        let uri = PackURI::new(PACKAGE_URI).unwrap();
        assert_eq!(uri.base_uri(), "/");
        assert_eq!(uri.membername(), "");
        assert_eq!(uri.rels_uri().unwrap().as_str(), "/_rels/.rels");
    }

    #[test]
    fn test_relative_ref() {
        let uri = PackURI::new("/word/media/image1.png").unwrap();
        assert_eq!(uri.relative_ref("/word"), "media/image1.png");
        assert_eq!(uri.relative_ref("/"), "word/media/image1.png");

        let core = PackURI::new("/docProps/core.xml").unwrap();
        assert_eq!(core.relative_ref("/word"), "../docProps/core.xml");
    }

    #[test]
    fn test_rels_uri() {
        let uri = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(uri.rels_uri().unwrap().as_str(), "/word/_rels/document.xml.rels");
    }
}
