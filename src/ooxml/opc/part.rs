/// Package parts.
///
/// A part is a named blob with a content type and its own outgoing
/// relationships. XML parts are serialized before being handed to the package.
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;

#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    pub fn new(partname: PackURI, content_type: &str, blob: Vec<u8>) -> Self {
        Self {
            partname,
            content_type: content_type.to_string(),
            blob,
            rels: Relationships::new(),
        }
    }

    /// Part holding an XML document.
    pub fn xml(partname: PackURI, content_type: &str, xml: String) -> Self {
        Self::new(partname, content_type, xml.into_bytes())
    }

    /// Attach relationships owned by this part.
    pub fn with_rels(mut self, rels: Relationships) -> Self {
        self.rels = rels;
        self
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// rId of the relationship from this part to `target`, adding it if absent.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname.base_uri());
        self.rels.get_or_add(reltype, &target_ref)
    }

    /// rId of the external relationship to `url`, adding it if absent.
    pub fn relate_to_ext(&mut self, url: &str, reltype: &str) -> String {
        self.rels.get_or_add_ext_rel(reltype, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};

    #[test]
    fn test_relate_to_uses_relative_target() {
        let mut part = Part::xml(
            PackURI::new("/word/document.xml").unwrap(),
            ct::WML_DOCUMENT_MAIN,
            "<w:document/>".to_string(),
        );
        let image = PackURI::new("/word/media/image1.png").unwrap();

        let r_id = part.relate_to(&image, rt::IMAGE);
        assert_eq!(part.relate_to(&image, rt::IMAGE), r_id);
        assert_eq!(part.rels().get(&r_id).unwrap().target_ref(), "media/image1.png");
        assert_eq!(part.blob(), b"<w:document/>");
    }
}
