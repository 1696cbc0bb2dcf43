//! Geometry captured from the rendered surface at export time.

use serde::{Deserialize, Serialize};

/// Frozen measurements keyed by sequential image and table index.
///
/// The surface records what it actually rendered so export can reproduce it.
/// Anything missing falls back to intrinsic or default geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSnapshot {
    /// Rendered `(width, height)` in px per image index
    #[serde(default)]
    images: Vec<Option<(f64, f64)>>,
    /// First-row column widths in px per table index
    #[serde(default)]
    tables: Vec<Option<Vec<f64>>>,
}

impl MeasurementSnapshot {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, index: usize, width_px: f64, height_px: f64) -> Self {
        self.set_image(index, width_px, height_px);
        self
    }

    pub fn with_table(mut self, index: usize, column_widths_px: Vec<f64>) -> Self {
        self.set_table(index, column_widths_px);
        self
    }

    pub fn set_image(&mut self, index: usize, width_px: f64, height_px: f64) {
        if self.images.len() <= index {
            self.images.resize(index + 1, None);
        }
        self.images[index] = Some((width_px, height_px));
    }

    pub fn set_table(&mut self, index: usize, column_widths_px: Vec<f64>) {
        if self.tables.len() <= index {
            self.tables.resize(index + 1, None);
        }
        self.tables[index] = Some(column_widths_px);
    }

    /// Rendered size of an image, if it was measured with a positive area.
    pub fn image_size(&self, index: usize) -> Option<(f64, f64)> {
        self.images
            .get(index)
            .copied()
            .flatten()
            .filter(|(w, h)| *w > 0.0 && *h > 0.0)
    }

    pub fn table_columns(&self, index: usize) -> Option<&[f64]> {
        self.tables.get(index)?.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.images.iter().all(Option::is_none) && self.tables.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_indices() {
        let snapshot = MeasurementSnapshot::new()
            .with_image(2, 320.0, 240.0)
            .with_table(1, vec![100.0, 200.0]);

        assert_eq!(snapshot.image_size(0), None);
        assert_eq!(snapshot.image_size(2), Some((320.0, 240.0)));
        assert_eq!(snapshot.image_size(7), None);
        assert_eq!(snapshot.table_columns(0), None);
        assert_eq!(snapshot.table_columns(1), Some(&[100.0, 200.0][..]));
        assert!(!snapshot.is_empty());
        assert!(MeasurementSnapshot::new().is_empty());
    }

    #[test]
    fn test_zero_area_is_unmeasured() {
        let snapshot = MeasurementSnapshot::new().with_image(0, 0.0, 120.0);
        assert_eq!(snapshot.image_size(0), None);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"images": [null, [10.0, 20.0]], "tables": [[50.0, 50.0]]}"#;
        let snapshot: MeasurementSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.image_size(1), Some((10.0, 20.0)));
        assert_eq!(snapshot.table_columns(0), Some(&[50.0, 50.0][..]));

        let empty: MeasurementSnapshot = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
