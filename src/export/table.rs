//! Table column geometry.

use super::snapshot::MeasurementSnapshot;
use crate::common::unit::px_to_twips;
use tracing::debug;

/// Content width between standard one-inch margins on a Letter page.
pub const STANDARD_CONTENT_WIDTH: u32 = 9_360;

/// Width of each fixed column in the legacy three-column split.
const LEGACY_FIXED_COLUMN: u32 = 3_600;

/// Final column grid of a table, in twips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTableGeometry {
    pub column_widths: Vec<u32>,
    pub total_width: u32,
}

impl ResolvedTableGeometry {
    fn from_widths(column_widths: Vec<u32>) -> Self {
        let total_width = column_widths.iter().sum();
        Self {
            column_widths,
            total_width,
        }
    }
}

/// Resolve the grid for table `index`.
///
/// Measured first-row widths are converted to twips and scaled down
/// proportionally when they exceed `content_width`. A measurement is used only
/// when it has one positive width per column; anything else counts as
/// unmeasured. Unmeasured tables split
/// `content_width` evenly; with `legacy_three_column` set, an unmeasured
/// three-column table instead gets two fixed 3600-twip columns and the
/// remainder. Returns `None` for a table without columns.
pub fn resolve_table_geometry(
    snapshot: &MeasurementSnapshot,
    index: usize,
    column_count: usize,
    content_width: u32,
    legacy_three_column: bool,
) -> Option<ResolvedTableGeometry> {
    if let Some(measured) = snapshot.table_columns(index)
        && measured.len() == column_count
        && column_count > 0
        && measured.iter().all(|w| w.is_finite() && *w > 0.0)
    {
        let twips: Vec<u32> = measured.iter().map(|px| px_to_twips(*px)).collect();
        return Some(ResolvedTableGeometry::from_widths(scale_to_fit(
            twips,
            content_width,
        )));
    }

    if column_count == 0 {
        return None;
    }

    debug!(table = index, columns = column_count, "table not measured, using fallback grid");

    if legacy_three_column && column_count == 3 && content_width >= 2 * LEGACY_FIXED_COLUMN {
        return Some(ResolvedTableGeometry::from_widths(vec![
            LEGACY_FIXED_COLUMN,
            LEGACY_FIXED_COLUMN,
            content_width - 2 * LEGACY_FIXED_COLUMN,
        ]));
    }

    let each = content_width / column_count as u32;
    Some(ResolvedTableGeometry::from_widths(vec![each; column_count]))
}

/// Scale widths down so they sum to at most `limit`. Widths already within
/// the limit are returned unchanged.
pub fn scale_to_fit(widths: Vec<u32>, limit: u32) -> Vec<u32> {
    let total: u64 = widths.iter().map(|w| *w as u64).sum();
    if total <= limit as u64 {
        return widths;
    }
    widths
        .into_iter()
        .map(|w| (w as u64 * limit as u64 / total) as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scaling_keeps_ratio() {
        let widths = scale_to_fit(vec![4000, 4000, 2000], STANDARD_CONTENT_WIDTH);
        assert_eq!(widths, vec![3744, 3744, 1872]);
        assert!(widths.iter().sum::<u32>() <= STANDARD_CONTENT_WIDTH);
        assert_eq!(widths[0], 2 * widths[2]);
    }

    #[test]
    fn test_measured_widths_converted() {
        let snapshot = MeasurementSnapshot::new().with_table(0, vec![200.0, 100.0]);
        let geometry = resolve_table_geometry(&snapshot, 0, 2, STANDARD_CONTENT_WIDTH, true).unwrap();
        assert_eq!(geometry.column_widths, vec![3000, 1500]);
        assert_eq!(geometry.total_width, 4500);
    }

    #[test]
    fn test_fallbacks() {
        let snapshot = MeasurementSnapshot::new();

        let equal = resolve_table_geometry(&snapshot, 0, 4, STANDARD_CONTENT_WIDTH, true).unwrap();
        assert_eq!(equal.column_widths, vec![2340; 4]);

        let legacy = resolve_table_geometry(&snapshot, 0, 3, STANDARD_CONTENT_WIDTH, true).unwrap();
        assert_eq!(legacy.column_widths, vec![3600, 3600, 2160]);

        let plain = resolve_table_geometry(&snapshot, 0, 3, STANDARD_CONTENT_WIDTH, false).unwrap();
        assert_eq!(plain.column_widths, vec![3120; 3]);

        // too narrow for the fixed columns
        let narrow = resolve_table_geometry(&snapshot, 0, 3, 6000, true).unwrap();
        assert_eq!(narrow.column_widths, vec![2000; 3]);

        assert_eq!(resolve_table_geometry(&snapshot, 0, 0, STANDARD_CONTENT_WIDTH, true), None);
    }

    #[test]
    fn test_zero_measurement_falls_back() {
        let snapshot = MeasurementSnapshot::new().with_table(0, vec![0.0, 0.0]);
        let geometry = resolve_table_geometry(&snapshot, 0, 2, STANDARD_CONTENT_WIDTH, true).unwrap();
        assert_eq!(geometry.column_widths, vec![4680, 4680]);
    }

    #[test]
    fn test_partial_measurement_falls_back() {
        let snapshot = MeasurementSnapshot::new().with_table(0, vec![300.0, 0.0, 0.0]);
        let geometry = resolve_table_geometry(&snapshot, 0, 3, STANDARD_CONTENT_WIDTH, false).unwrap();
        assert_eq!(geometry.column_widths, vec![3120; 3]);
    }

    #[test]
    fn test_column_count_mismatch_falls_back() {
        let short = MeasurementSnapshot::new().with_table(0, vec![300.0, 300.0]);
        let geometry = resolve_table_geometry(&short, 0, 3, STANDARD_CONTENT_WIDTH, true).unwrap();
        assert_eq!(geometry.column_widths, vec![3600, 3600, 2160]);

        let long = MeasurementSnapshot::new().with_table(0, vec![100.0, 100.0, 100.0]);
        let geometry = resolve_table_geometry(&long, 0, 2, STANDARD_CONTENT_WIDTH, true).unwrap();
        assert_eq!(geometry.column_widths, vec![4680, 4680]);
    }

    proptest! {
        #[test]
        fn prop_scaled_widths_fit(widths in proptest::collection::vec(0u32..20_000, 1..8)) {
            let scaled = scale_to_fit(widths.clone(), STANDARD_CONTENT_WIDTH);
            prop_assert_eq!(scaled.len(), widths.len());
            prop_assert!(scaled.iter().sum::<u32>() <= STANDARD_CONTENT_WIDTH.max(widths.iter().sum()));
            prop_assert!(scaled.iter().sum::<u32>() <= STANDARD_CONTENT_WIDTH || scaled == widths);
            for (s, w) in scaled.iter().zip(&widths) {
                prop_assert!(s <= w);
            }
        }
    }
}
