/// Relationships between package parts.
///
/// Internal relationships point to another part by relative reference;
/// external ones (hyperlinks) carry an absolute URL.
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::error::Result;
use crate::ooxml::xml::escape_xml;
use std::collections::HashMap;
use std::fmt::Write as _;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,
    reltype: String,
    /// Part reference relative to the source, or an external URL
    target_ref: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String, is_external: bool) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Numeric suffix of the rId, if it follows the `rIdN` convention.
    fn ordinal(&self) -> Option<u32> {
        parse_r_id(&self.r_id)
    }
}

#[inline]
fn parse_r_id(r_id: &str) -> Option<u32> {
    r_id.strip_prefix("rId")
        .and_then(|digits| atoi_simd::parse_pos::<u32, false>(digits.as_bytes()).ok())
}

/// Collection of relationships from a single source part.
#[derive(Debug, Default, Clone)]
pub struct Relationships {
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relationship with an explicit id, replacing any previous
    /// relationship with the same id.
    pub fn add_relationship(
        &mut self,
        reltype: &str,
        target_ref: &str,
        r_id: &str,
        is_external: bool,
    ) -> &Relationship {
        let rel = Relationship::new(
            r_id.to_string(),
            reltype.to_string(),
            target_ref.to_string(),
            is_external,
        );
        self.rels.insert(r_id.to_string(), rel);
        &self.rels[r_id]
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Return the rId of the internal relationship of `reltype` to
    /// `target_ref`, creating it with the next free rId if needed.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        self.find_or_insert(reltype, target_ref, false)
    }

    /// Same as [`get_or_add`](Self::get_or_add) for an external target.
    pub fn get_or_add_ext_rel(&mut self, reltype: &str, target_ref: &str) -> String {
        self.find_or_insert(reltype, target_ref, true)
    }

    fn find_or_insert(&mut self, reltype: &str, target_ref: &str, is_external: bool) -> String {
        if let Some(rel) = self.rels.values().find(|rel| {
            rel.reltype() == reltype
                && rel.target_ref() == target_ref
                && rel.is_external() == is_external
        }) {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.add_relationship(reltype, target_ref, &r_id, is_external);
        r_id
    }

    /// Next available relationship ID, filling the lowest gap first.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self.rels.keys().filter_map(|k| parse_r_id(k)).collect();
        used.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to a `.rels` stream, ordered by numeric rId.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS)?;

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by(|a, b| {
            a.ordinal()
                .cmp(&b.ordinal())
                .then_with(|| a.r_id().cmp(b.r_id()))
        });

        for rel in rels {
            let target_mode = if rel.is_external() {
                r#" TargetMode="External""#
            } else {
                ""
            };
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
                target_mode
            )?;
        }

        xml.push_str("</Relationships>");
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = Relationships::new();
        assert_eq!(rels.next_r_id(), "rId1");

        rels.add_relationship("type1", "target1", "rId1", false);
        rels.add_relationship("type1", "target3", "rId3", false);
        assert_eq!(rels.next_r_id(), "rId2");
    }

    #[test]
    fn test_get_or_add_reuses_existing() {
        let mut rels = Relationships::new();

        assert_eq!(rels.get_or_add("type1", "target1"), "rId1");
        assert_eq!(rels.get_or_add("type1", "target1"), "rId1");
        assert_eq!(rels.get_or_add("type1", "target2"), "rId2");
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_external_distinct_from_internal() {
        let mut rels = Relationships::new();
        let internal = rels.get_or_add("link", "https://example.com");
        let external = rels.get_or_add_ext_rel("link", "https://example.com");
        assert_ne!(internal, external);
        assert!(rels.get(&external).unwrap().is_external());
    }

    #[test]
    fn test_to_xml_numeric_order_and_escaping() {
        let mut rels = Relationships::new();
        for i in 1..=10 {
            rels.get_or_add("t", &format!("media/image{}.png", i));
        }
        rels.get_or_add_ext_rel("h", "https://example.com/?a=1&b=2");

        let xml = rels.to_xml().unwrap();
        let pos2 = xml.find(r#"Id="rId2""#).unwrap();
        let pos10 = xml.find(r#"Id="rId10""#).unwrap();
        assert!(pos2 < pos10);
        assert!(xml.contains(r#"Target="https://example.com/?a=1&amp;b=2" TargetMode="External""#));
    }
}
