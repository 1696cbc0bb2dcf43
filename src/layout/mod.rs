//! Page layout: fixed-size page geometry and the break-marker reflow engine.
//!
//! The live surface reports measured top-level boxes through
//! [`MeasurementProvider`]; [`Paginator`] turns them into break insertions
//! applied back through [`ReflowSurface`], and [`assign_pages`] maps the
//! resulting box sequence onto page indices.

pub mod pages;
pub mod paginator;
pub mod reflow;

pub use pages::{PageAssignment, PageLayout, assign_pages};
pub use paginator::{Paginator, paginate};
pub use reflow::{BreakInsertion, MeasuredBox, MeasurementProvider, ReflowPlan, ReflowSurface, plan_reflow};

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Default page width in px (8.5in at 96 DPI).
pub const DEFAULT_PAGE_WIDTH_PX: f64 = 816.0;
/// Default page height in px (11in at 96 DPI).
pub const DEFAULT_PAGE_HEIGHT_PX: f64 = 1056.0;
/// Vertical gap between rendered pages in px.
pub const DEFAULT_PAGE_GAP_PX: f64 = 20.0;

/// Page margins in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PageMargins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(px: f64) -> Self {
        Self::new(px, px, px, px)
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        MarginPreset::Normal.margins()
    }
}

/// Named margin presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginPreset {
    /// 1in on every side
    #[default]
    Normal,
    /// 0.375in on every side
    Narrow,
    /// 1in top/bottom, 0.75in left/right
    Moderate,
    /// 1in top/bottom, 1.5in left/right
    Wide,
    None,
}

impl MarginPreset {
    pub const fn margins(self) -> PageMargins {
        match self {
            Self::Normal => PageMargins::uniform(96.0),
            Self::Narrow => PageMargins::uniform(36.0),
            Self::Moderate => PageMargins::new(96.0, 72.0, 96.0, 72.0),
            Self::Wide => PageMargins::new(96.0, 144.0, 96.0, 144.0),
            Self::None => PageMargins::uniform(0.0),
        }
    }
}

impl FromStr for MarginPreset {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "narrow" => Ok(Self::Narrow),
            "moderate" => Ok(Self::Moderate),
            "wide" => Ok(Self::Wide),
            "none" => Ok(Self::None),
            other => Err(crate::Error::InvalidArgument(format!(
                "unknown margin preset '{}'",
                other
            ))),
        }
    }
}

/// Size and margins of a printable page, in CSS pixels.
///
/// # Examples
///
/// ```rust
/// use folio::layout::{MarginPreset, PageGeometry};
///
/// let geometry = PageGeometry::new().with_preset(MarginPreset::Narrow);
/// assert_eq!(geometry.available_height(), 1056.0 - 72.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_px: f64,
    pub height_px: f64,
    pub margins: PageMargins,
    pub page_gap_px: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_PAGE_WIDTH_PX,
            height_px: DEFAULT_PAGE_HEIGHT_PX,
            margins: PageMargins::default(),
            page_gap_px: DEFAULT_PAGE_GAP_PX,
        }
    }
}

impl PageGeometry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_page_size(mut self, width_px: f64, height_px: f64) -> Self {
        self.width_px = width_px;
        self.height_px = height_px;
        self
    }

    #[inline]
    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    #[inline]
    pub fn with_preset(self, preset: MarginPreset) -> Self {
        self.with_margins(preset.margins())
    }

    #[inline]
    pub fn with_page_gap(mut self, gap_px: f64) -> Self {
        self.page_gap_px = gap_px;
        self
    }

    /// Content height between top and bottom margins, never negative.
    pub fn available_height(&self) -> f64 {
        (self.height_px - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Content width between left and right margins, never negative.
    pub fn available_width(&self) -> f64 {
        (self.width_px - self.margins.left - self.margins.right).max(0.0)
    }

    /// Top edge of page `index` on the rendered surface.
    pub fn page_top_px(&self, index: usize) -> f64 {
        index as f64 * (self.height_px + self.page_gap_px)
    }
}

/// Settings for the repeated reflow loop.
#[derive(Debug, Clone)]
pub struct PaginationOptions {
    /// Maximum passes per reflow request
    pub safety_limit: usize,
    /// Wait before measuring, letting layout settle after a change
    pub settle_delay: Duration,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            safety_limit: 20,
            settle_delay: Duration::from_millis(50),
        }
    }
}

impl PaginationOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_safety_limit(mut self, limit: usize) -> Self {
        self.safety_limit = limit;
        self
    }

    #[inline]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}
