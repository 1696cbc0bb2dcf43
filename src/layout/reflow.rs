//! Single-pass break planning over measured boxes.
//!
//! [`plan_reflow`] is pure: it reads a box sequence and returns what the
//! caller must change. Applying the plan to a live tree is the job of a
//! [`ReflowSurface`].

use crate::document::NodeId;
use serde::{Deserialize, Serialize};

/// One rendered top-level box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredBox {
    pub element_id: NodeId,
    pub height_px: f64,
    pub is_break_marker: bool,
}

impl MeasuredBox {
    pub fn content(element_id: NodeId, height_px: f64) -> Self {
        Self {
            element_id,
            height_px,
            is_break_marker: false,
        }
    }

    pub fn marker(element_id: NodeId) -> Self {
        Self {
            element_id,
            height_px: 0.0,
            is_break_marker: true,
        }
    }

    /// Height rounded to whole pixels, clamped at zero.
    #[inline]
    pub fn normalized_height(&self) -> f64 {
        self.height_px.round().max(0.0)
    }
}

/// Source of measurements for the current rendered state.
pub trait MeasurementProvider {
    type RootId;

    /// The content root, if the surface is mounted.
    fn root_element_id(&self) -> Option<Self::RootId>;

    /// Top-level boxes under `root`, in document order.
    fn rendered_boxes(&self, root: &Self::RootId) -> Vec<MeasuredBox>;
}

/// A live tree that accepts reflow instructions.
pub trait ReflowSurface: MeasurementProvider {
    /// Insert an auto break marker before `target`; returns the marker id.
    fn insert_break_before(&mut self, target: NodeId) -> Option<NodeId>;

    /// Set the leading space rendered above a marker.
    fn set_leading_offset(&mut self, marker: NodeId, offset_px: f64);
}

/// A break to insert before `before`, padded by `leading_offset_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakInsertion {
    pub before: NodeId,
    pub leading_offset_px: f64,
}

/// Outcome of one planning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflowPlan {
    /// Markers walked before the stop point; their leading offset resets to zero.
    pub resets: Vec<NodeId>,
    pub insertion: Option<BreakInsertion>,
}

impl ReflowPlan {
    #[inline]
    pub fn inserts(&self) -> bool {
        self.insertion.is_some()
    }
}

/// Plan one pass over `boxes` against `available_px` of page content height.
///
/// Walks boxes accumulating height. A marker resets the accumulator. The
/// first content box that overflows gets a break inserted before it, unless
/// the box directly follows a marker, in which case it is accepted as the
/// sole content of its page.
pub fn plan_reflow(boxes: &[MeasuredBox], available_px: f64) -> ReflowPlan {
    let available = available_px.max(0.0);
    let mut plan = ReflowPlan::default();
    let mut consumed = 0.0;

    for (index, b) in boxes.iter().enumerate() {
        if b.is_break_marker {
            plan.resets.push(b.element_id);
            consumed = 0.0;
            continue;
        }

        let height = b.normalized_height();
        if consumed + height > available {
            let after_marker = index > 0 && boxes[index - 1].is_break_marker;
            if after_marker {
                consumed = height;
                continue;
            }

            plan.insertion = Some(BreakInsertion {
                before: b.element_id,
                leading_offset_px: (available - consumed).max(0.0),
            });
            return plan;
        }
        consumed += height;
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(heights: &[f64]) -> Vec<MeasuredBox> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| MeasuredBox::content(NodeId(i as u64), h))
            .collect()
    }

    #[test]
    fn test_fits_without_break() {
        let plan = plan_reflow(&boxes(&[100.0, 200.0, 300.0]), 600.0);
        assert!(!plan.inserts());
        assert!(plan.resets.is_empty());
    }

    #[test]
    fn test_first_overflow_inserts() {
        let plan = plan_reflow(&boxes(&[300.0, 300.0, 300.0]), 864.0);
        assert_eq!(
            plan.insertion,
            Some(BreakInsertion {
                before: NodeId(2),
                leading_offset_px: 264.0,
            })
        );
    }

    #[test]
    fn test_marker_resets_and_accepts_oversized() {
        let mut seq = vec![MeasuredBox::marker(NodeId(10))];
        seq.extend(boxes(&[2000.0]));
        let plan = plan_reflow(&seq, 864.0);
        assert!(!plan.inserts());
        assert_eq!(plan.resets, vec![NodeId(10)]);
    }

    #[test]
    fn test_oversized_first_box_gets_break() {
        let plan = plan_reflow(&boxes(&[2000.0]), 864.0);
        let insertion = plan.insertion.unwrap();
        assert_eq!(insertion.before, NodeId(0));
        assert_eq!(insertion.leading_offset_px, 864.0);
    }

    #[test]
    fn test_heights_are_rounded_and_clamped() {
        // 432.4 + 432.4 rounds to 864 and fits exactly
        let plan = plan_reflow(&boxes(&[432.4, 432.4, -50.0]), 864.0);
        assert!(!plan.inserts());

        let plan = plan_reflow(&boxes(&[432.6, 432.0]), 864.0);
        assert!(plan.inserts());
    }

    #[test]
    fn test_zero_available_height() {
        let plan = plan_reflow(&boxes(&[0.0, 1.0]), -10.0);
        let insertion = plan.insertion.unwrap();
        assert_eq!(insertion.before, NodeId(1));
        assert_eq!(insertion.leading_offset_px, 0.0);
    }

    #[test]
    fn test_boxes_from_json() {
        let json = r#"[{"element_id": 7, "height_px": 120.5, "is_break_marker": false},
                       {"element_id": 8, "height_px": 0.0, "is_break_marker": true}]"#;
        let parsed: Vec<MeasuredBox> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, vec![MeasuredBox::content(NodeId(7), 120.5), MeasuredBox::marker(NodeId(8))]);

        let value = serde_json::to_value(parsed[0]).unwrap();
        assert_eq!(value["element_id"], 7);
    }
}
