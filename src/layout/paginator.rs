//! Repeated reflow against a live surface.

use super::reflow::{ReflowSurface, plan_reflow};
use super::{PageGeometry, PaginationOptions};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Run one reflow pass against `surface`.
///
/// Returns whether a break marker was inserted. Call again until it returns
/// `false`. An unmounted surface or one without content is a no-op.
pub fn paginate<S: ReflowSurface>(
    surface: &mut S,
    page_height_px: f64,
    top_margin_px: f64,
    bottom_margin_px: f64,
) -> bool {
    let available = (page_height_px - top_margin_px - bottom_margin_px).max(0.0);
    apply_pass(surface, available)
}

fn apply_pass<S: ReflowSurface>(surface: &mut S, available_px: f64) -> bool {
    let Some(root) = surface.root_element_id() else {
        return false;
    };
    let boxes = surface.rendered_boxes(&root);
    if boxes.is_empty() {
        return false;
    }

    let plan = plan_reflow(&boxes, available_px);
    for marker in &plan.resets {
        surface.set_leading_offset(*marker, 0.0);
    }

    let Some(insertion) = plan.insertion else {
        return false;
    };
    match surface.insert_break_before(insertion.before) {
        Some(marker) => {
            surface.set_leading_offset(marker, insertion.leading_offset_px);
            debug!(
                before = %insertion.before,
                marker = %marker,
                leading_offset = insertion.leading_offset_px,
                "inserted page break"
            );
            true
        },
        None => {
            warn!(before = %insertion.before, "break target vanished from surface");
            false
        },
    }
}

/// Clears the in-flight flag when a reflow request ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives reflow passes until the surface reaches a fixed point.
///
/// Only one request runs at a time; a request arriving while another is in
/// flight is dropped, not queued.
///
/// # Examples
///
/// ```rust,ignore
/// let paginator = Paginator::new(PageGeometry::default());
/// // after every edit or resize:
/// paginator.schedule(&surface).await;
/// ```
#[derive(Debug, Default)]
pub struct Paginator {
    geometry: PageGeometry,
    options: PaginationOptions,
    in_flight: AtomicBool,
}

impl Paginator {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            options: PaginationOptions::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_options(mut self, options: PaginationOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: PageGeometry) {
        self.geometry = geometry;
    }

    #[inline]
    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// One guarded pass. Returns whether a break was inserted.
    pub fn paginate<S: ReflowSurface>(&self, surface: &mut S) -> bool {
        let Some(_guard) = self.try_begin() else {
            warn!("reflow already in flight, dropping request");
            return false;
        };
        apply_pass(surface, self.geometry.available_height())
    }

    /// Repeat passes until one inserts nothing or the safety limit is hit.
    /// Returns the number of markers inserted, or `None` if the request was
    /// dropped.
    pub fn run<S: ReflowSurface>(&self, surface: &mut S) -> Option<usize> {
        let Some(_guard) = self.try_begin() else {
            warn!("reflow already in flight, dropping request");
            return None;
        };
        Some(self.converge(surface))
    }

    /// Wait for layout to settle, then run to a fixed point.
    pub async fn schedule<S: ReflowSurface>(&self, surface: &Mutex<S>) -> Option<usize> {
        let Some(_guard) = self.try_begin() else {
            warn!("reflow already in flight, dropping request");
            return None;
        };
        tokio::time::sleep(self.options.settle_delay).await;
        let mut surface = surface.lock();
        Some(self.converge(&mut *surface))
    }

    fn converge<S: ReflowSurface>(&self, surface: &mut S) -> usize {
        let available = self.geometry.available_height();
        let mut inserted = 0;
        while inserted < self.options.safety_limit {
            if !apply_pass(surface, available) {
                debug!(inserted, "reflow converged");
                return inserted;
            }
            inserted += 1;
        }
        warn!(
            limit = self.options.safety_limit,
            "reflow stopped at safety limit"
        );
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BreakKind, Node, NodeId, RichDocument};
    use crate::layout::reflow::{MeasuredBox, MeasurementProvider};
    use crate::layout::PageMargins;
    use std::collections::HashMap;
    use std::time::Duration;

    struct TestSurface {
        doc: RichDocument,
        heights: HashMap<NodeId, f64>,
        offsets: HashMap<NodeId, f64>,
        mounted: bool,
    }

    impl TestSurface {
        fn with_boxes(count: usize, height: f64) -> Self {
            let mut doc = RichDocument::new();
            let mut heights = HashMap::new();
            for i in 0..count {
                let id = doc.push(Node::paragraph(vec![Node::text(format!("p{}", i))]));
                heights.insert(id, height);
            }
            Self {
                doc,
                heights,
                offsets: HashMap::new(),
                mounted: true,
            }
        }

        fn markers(&self) -> Vec<NodeId> {
            self.doc
                .iter()
                .filter(|(_, node)| node.is_break_marker())
                .map(|(id, _)| id)
                .collect()
        }
    }

    impl MeasurementProvider for TestSurface {
        type RootId = ();

        fn root_element_id(&self) -> Option<()> {
            self.mounted.then_some(())
        }

        fn rendered_boxes(&self, _root: &()) -> Vec<MeasuredBox> {
            self.doc
                .iter()
                .map(|(id, node)| {
                    if node.is_break_marker() {
                        MeasuredBox::marker(id)
                    } else {
                        MeasuredBox::content(id, self.heights.get(&id).copied().unwrap_or(0.0))
                    }
                })
                .collect()
        }
    }

    impl ReflowSurface for TestSurface {
        fn insert_break_before(&mut self, target: NodeId) -> Option<NodeId> {
            self.doc.insert_break_before(target, BreakKind::Auto)
        }

        fn set_leading_offset(&mut self, marker: NodeId, offset_px: f64) {
            self.offsets.insert(marker, offset_px);
        }
    }

    fn expected_markers(n: usize, height: f64, capacity: f64) -> usize {
        let per_page = (capacity / height).floor() as usize;
        n.div_ceil(per_page) - 1
    }

    #[test]
    fn test_fixed_point_marker_count() {
        // capacity 864 is not a multiple of either height
        for (n, height) in [(10, 300.0), (7, 250.0), (12, 100.0)] {
            let mut surface = TestSurface::with_boxes(n, height);
            let paginator = Paginator::new(PageGeometry::default());
            let inserted = paginator.run(&mut surface).unwrap();
            assert_eq!(inserted, expected_markers(n, height, 864.0));
            assert_eq!(surface.markers().len(), inserted);
        }
    }

    #[test]
    fn test_idempotent_after_convergence() {
        let mut surface = TestSurface::with_boxes(10, 300.0);
        let paginator = Paginator::new(PageGeometry::default());
        paginator.run(&mut surface).unwrap();
        let before: Vec<NodeId> = surface.doc.ids().collect();

        assert!(!paginator.paginate(&mut surface));
        assert_eq!(paginator.run(&mut surface), Some(0));
        assert_eq!(surface.doc.ids().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_oversized_boxes_one_marker_each() {
        let mut surface = TestSurface::with_boxes(3, 1000.0);
        let paginator = Paginator::new(PageGeometry::default());
        assert_eq!(paginator.run(&mut surface), Some(3));

        let first = surface.doc.nodes().next().unwrap();
        assert!(first.is_break_marker());
    }

    #[test]
    fn test_leading_offsets() {
        let mut surface = TestSurface::with_boxes(3, 300.0);
        assert!(paginate(&mut surface, 1056.0, 96.0, 96.0));
        let marker = surface.markers()[0];
        assert_eq!(surface.offsets[&marker], 264.0);

        // a later pass walks the marker and resets its offset
        assert!(!paginate(&mut surface, 1056.0, 96.0, 96.0));
        assert_eq!(surface.offsets[&marker], 0.0);
    }

    #[test]
    fn test_unmounted_or_empty_is_noop() {
        let mut surface = TestSurface::with_boxes(10, 300.0);
        surface.mounted = false;
        assert!(!paginate(&mut surface, 1056.0, 96.0, 96.0));

        let mut empty = TestSurface::with_boxes(0, 0.0);
        assert!(!paginate(&mut empty, 1056.0, 96.0, 96.0));
    }

    #[test]
    fn test_safety_limit() {
        let mut surface = TestSurface::with_boxes(10, 300.0);
        let paginator = Paginator::new(PageGeometry::default())
            .with_options(PaginationOptions::new().with_safety_limit(3));
        assert_eq!(paginator.run(&mut surface), Some(3));
        assert_eq!(paginator.run(&mut surface), Some(1));
    }

    #[test]
    fn test_margins_change_capacity() {
        let mut surface = TestSurface::with_boxes(4, 300.0);
        let geometry = PageGeometry::default().with_margins(PageMargins::uniform(0.0));
        let paginator = Paginator::new(geometry);
        // 1056 / 300 -> three boxes per page
        assert_eq!(paginator.run(&mut surface), Some(1));
    }

    #[tokio::test]
    async fn test_overlapping_schedule_is_dropped() {
        let surface = Mutex::new(TestSurface::with_boxes(10, 300.0));
        let paginator = Paginator::new(PageGeometry::default()).with_options(
            PaginationOptions::new().with_settle_delay(Duration::from_millis(20)),
        );

        let (first, second) = tokio::join!(
            paginator.schedule(&surface),
            paginator.schedule(&surface)
        );
        assert_eq!(first, Some(4));
        assert_eq!(second, None);
        assert!(!paginator.is_running());

        assert_eq!(paginator.schedule(&surface).await, Some(0));
    }
}
