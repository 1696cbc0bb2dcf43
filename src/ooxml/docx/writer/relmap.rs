/// Relationship ID mapping used while generating `document.xml`.
///
/// Relationships are created first; XML generation then walks the body in the
/// same order the hyperlinks and images were collected and looks their ids up
/// by sequence index.
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// Hyperlink sequence index to relationship ID
    hyperlink_ids: HashMap<usize, String>,
    /// Image sequence index to relationship ID
    image_ids: HashMap<usize, String>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hyperlink(&mut self, index: usize, rel_id: String) {
        self.hyperlink_ids.insert(index, rel_id);
    }

    pub fn add_image(&mut self, index: usize, rel_id: String) {
        self.image_ids.insert(index, rel_id);
    }

    pub fn get_hyperlink_id(&self, index: usize) -> Option<&str> {
        self.hyperlink_ids.get(&index).map(|s| s.as_str())
    }

    pub fn get_image_id(&self, index: usize) -> Option<&str> {
        self.image_ids.get(&index).map(|s| s.as_str())
    }
}

/// Walk state over a [`RelationshipMapper`]: hands out the next hyperlink or
/// image id in document order.
#[derive(Debug)]
pub(crate) struct RelCursor<'a> {
    mapper: &'a RelationshipMapper,
    hyperlinks: usize,
    images: usize,
}

impl<'a> RelCursor<'a> {
    pub(crate) fn new(mapper: &'a RelationshipMapper) -> Self {
        Self {
            mapper,
            hyperlinks: 0,
            images: 0,
        }
    }

    pub(crate) fn next_hyperlink(&mut self) -> Option<&'a str> {
        let id = self.mapper.get_hyperlink_id(self.hyperlinks);
        self.hyperlinks += 1;
        id
    }

    /// Next image id together with its 1-based drawing object number.
    pub(crate) fn next_image(&mut self) -> Option<(&'a str, usize)> {
        let index = self.images;
        self.images += 1;
        self.mapper.get_image_id(index).map(|id| (id, index + 1))
    }
}
