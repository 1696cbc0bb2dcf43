//! Page assignment for a measured box sequence.

use super::PageGeometry;
use super::reflow::MeasuredBox;
use crate::document::NodeId;
use serde::{Deserialize, Serialize};

/// Where a content box lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageAssignment {
    pub page_index: usize,
    /// Space pushed above the box so it starts at the top of its page
    pub leading_offset_px: f64,
}

/// Page assignment for every content box, plus the page count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub assignments: Vec<(NodeId, PageAssignment)>,
    pub page_count: usize,
}

impl PageLayout {
    pub fn page_of(&self, id: NodeId) -> Option<usize> {
        self.assignments
            .iter()
            .find(|(box_id, _)| *box_id == id)
            .map(|(_, a)| a.page_index)
    }

    /// Content boxes on `page_index`, in order.
    pub fn boxes_on_page(&self, page_index: usize) -> impl Iterator<Item = NodeId> + '_ {
        self.assignments
            .iter()
            .filter(move |(_, a)| a.page_index == page_index)
            .map(|(id, _)| *id)
    }
}

/// Assign every content box to a page.
///
/// A marker closes the current page if it holds anything; markers themselves
/// belong to no page. A box that overflows a non-empty page starts the next
/// one. There is always at least one page.
pub fn assign_pages(boxes: &[MeasuredBox], geometry: &PageGeometry) -> PageLayout {
    let available = geometry.available_height();
    let mut layout = PageLayout::default();
    let mut page_index = 0;
    let mut consumed = 0.0;
    let mut page_has_content = false;

    for b in boxes {
        if b.is_break_marker {
            if page_has_content {
                page_index += 1;
                page_has_content = false;
            }
            consumed = 0.0;
            continue;
        }

        let height = b.normalized_height();
        let mut leading_offset_px = 0.0;
        if page_has_content && consumed + height > available {
            leading_offset_px = (available - consumed).max(0.0);
            page_index += 1;
            consumed = 0.0;
        }

        consumed += height;
        page_has_content = true;
        layout.assignments.push((
            b.element_id,
            PageAssignment {
                page_index,
                leading_offset_px,
            },
        ));
    }

    layout.page_count = if page_has_content {
        page_index + 1
    } else {
        page_index.max(1)
    };
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(id: u64, h: f64) -> MeasuredBox {
        MeasuredBox::content(NodeId(id), h)
    }

    #[test]
    fn test_empty_has_one_page() {
        let layout = assign_pages(&[], &PageGeometry::default());
        assert_eq!(layout.page_count, 1);
        assert!(layout.assignments.is_empty());
    }

    #[test]
    fn test_overflow_starts_new_page() {
        let boxes = [content(0, 500.0), content(1, 300.0), content(2, 300.0)];
        let layout = assign_pages(&boxes, &PageGeometry::default());
        assert_eq!(layout.page_count, 2);
        assert_eq!(layout.page_of(NodeId(1)), Some(0));
        assert_eq!(layout.page_of(NodeId(2)), Some(1));
        assert_eq!(layout.assignments[2].1.leading_offset_px, 64.0);
    }

    #[test]
    fn test_markers_delimit_pages() {
        let boxes = [
            MeasuredBox::marker(NodeId(9)),
            content(0, 100.0),
            MeasuredBox::marker(NodeId(10)),
            MeasuredBox::marker(NodeId(11)),
            content(1, 100.0),
            MeasuredBox::marker(NodeId(12)),
        ];
        let layout = assign_pages(&boxes, &PageGeometry::default());
        assert_eq!(layout.page_of(NodeId(0)), Some(0));
        assert_eq!(layout.page_of(NodeId(1)), Some(1));
        assert_eq!(layout.page_of(NodeId(9)), None);
        assert_eq!(layout.page_count, 2);
        assert_eq!(layout.boxes_on_page(1).collect::<Vec<_>>(), vec![NodeId(1)]);
    }

    #[test]
    fn test_oversized_box_alone() {
        let boxes = [content(0, 100.0), content(1, 2000.0), content(2, 100.0)];
        let layout = assign_pages(&boxes, &PageGeometry::default());
        assert_eq!(layout.page_of(NodeId(1)), Some(1));
        assert_eq!(layout.page_of(NodeId(2)), Some(2));
        assert_eq!(layout.page_count, 3);
    }
}
