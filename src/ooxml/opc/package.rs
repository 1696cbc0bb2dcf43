/// In-memory OPC package: package-level relationships plus an ordered set of
/// parts.
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::rel::Relationships;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct OpcPackage {
    rels: Relationships,
    parts: Vec<Part>,
    index: HashMap<PackURI, usize>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package-level relationships (`/_rels/.rels`).
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package to `target` (e.g. the main document part).
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels
            .get_or_add(reltype, &target.relative_ref(PACKAGE_URI))
    }

    /// Add a part; partnames must be unique.
    pub fn add_part(&mut self, part: Part) -> Result<()> {
        if self.index.contains_key(part.partname()) {
            return Err(OpcError::DuplicatePart(part.partname().to_string()));
        }
        self.index.insert(part.partname().clone(), self.parts.len());
        self.parts.push(part);
        Ok(())
    }

    pub fn part(&self, partname: &PackURI) -> Result<&Part> {
        self.index
            .get(partname)
            .map(|&i| &self.parts[i])
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Parts in insertion order.
    #[inline]
    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;

    #[test]
    fn test_duplicate_part_rejected() {
        let mut pkg = OpcPackage::new();
        let uri = PackURI::new("/word/styles.xml").unwrap();
        pkg.add_part(Part::xml(uri.clone(), ct::WML_STYLES, String::new()))
            .unwrap();
        let err = pkg
            .add_part(Part::xml(uri.clone(), ct::WML_STYLES, String::new()))
            .unwrap_err();
        assert!(matches!(err, OpcError::DuplicatePart(_)));
        assert_eq!(pkg.part_count(), 1);
        assert!(pkg.part(&uri).is_ok());
    }

    #[test]
    fn test_missing_part() {
        let pkg = OpcPackage::new();
        let uri = PackURI::new("/word/document.xml").unwrap();
        assert!(matches!(pkg.part(&uri), Err(OpcError::PartNotFound(_))));
    }
}
