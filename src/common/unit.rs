//! Unit conversion utilities.
//!
//! The editing surface measures everything in CSS pixels at 96 DPI, while the
//! word-processing output speaks points, half-points, twips and EMUs. All
//! conversions between the two worlds live here so both the pagination and
//! export paths agree on the ratios.
//!

use crate::Result;
use std::fmt;
use std::str::FromStr;

/// Screen resolution assumed for CSS pixels.
pub const DPI: u32 = 96;
pub const PT_PER_PX: f64 = 0.75;
pub const TWIPS_PER_INCH: i64 = 1_440;
pub const TWIPS_PER_PT: i64 = 20;
pub const TWIPS_PER_PX: i64 = 15;
pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
/// Line-spacing units per single line in WordprocessingML (`w:line` with `auto`).
pub const LINE_UNITS_PER_LINE: f64 = 240.0;

#[inline]
pub fn px_to_pt(px: f64) -> f64 {
    px * PT_PER_PX
}

#[inline]
pub fn pt_to_px(pt: f64) -> f64 {
    pt / PT_PER_PX
}

/// Font sizes are written in half-points, rounded to the nearest unit.
#[inline]
pub fn pt_to_half_points(pt: f64) -> u32 {
    (pt * 2.0).round().max(0.0) as u32
}

#[inline]
pub fn half_points_to_pt(half_points: u32) -> f64 {
    half_points as f64 / 2.0
}

#[inline]
pub fn px_to_twips(px: f64) -> u32 {
    (px * TWIPS_PER_PX as f64).round().max(0.0) as u32
}

#[inline]
pub fn twips_to_px(twips: u32) -> f64 {
    twips as f64 / TWIPS_PER_PX as f64
}

#[inline]
pub fn pt_to_twips(pt: f64) -> u32 {
    (pt * TWIPS_PER_PT as f64).round().max(0.0) as u32
}

#[inline]
pub fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH as f64).round().max(0.0) as u32
}

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn px_to_emu(px: f64) -> i64 {
    (px * EMUS_PER_INCH as f64 / DPI as f64).round() as i64
}

/// Units accepted in inline style values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssUnit {
    /// Point (1/72 inch)
    Point,
    /// CSS pixel (1/96 inch)
    Pixel,
    /// Inch
    Inch,
    /// Percentage of the reference value
    Percent,
    /// Bare number, e.g. a line-height multiplier
    Unitless,
}

impl CssUnit {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "pt",
            Self::Pixel => "px",
            Self::Inch => "in",
            Self::Percent => "%",
            Self::Unitless => "",
        }
    }

    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "pt" => Some(Self::Point),
            "px" => Some(Self::Pixel),
            "in" => Some(Self::Inch),
            "%" => Some(Self::Percent),
            "" => Some(Self::Unitless),
            _ => None,
        }
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric style value with its unit, e.g. `"12pt"`, `"16px"`, `"150%"`.
///
/// # Examples
///
/// ```
/// use folio::common::unit::{CssLength, CssUnit};
///
/// let size = "16px".parse::<CssLength>().unwrap();
/// assert_eq!(size.unit(), CssUnit::Pixel);
/// assert_eq!(size.to_points(), Some(12.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssLength {
    value: f64,
    unit: CssUnit,
}

impl CssLength {
    #[inline]
    pub fn new(value: f64, unit: CssUnit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn unit(&self) -> CssUnit {
        self.unit
    }

    /// Absolute length in points; `None` for relative units.
    pub fn to_points(&self) -> Option<f64> {
        match self.unit {
            CssUnit::Point => Some(self.value),
            CssUnit::Pixel => Some(px_to_pt(self.value)),
            CssUnit::Inch => Some(self.value * 72.0),
            CssUnit::Percent | CssUnit::Unitless => None,
        }
    }
}

impl FromStr for CssLength {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);

        if digits.is_empty() {
            return Err(crate::Error::InvalidFormat(format!(
                "No numeric value found in '{}'",
                s
            )));
        }

        let value: f64 = digits.parse().map_err(|_| {
            crate::Error::InvalidFormat(format!("Failed to parse numeric value from '{}'", s))
        })?;
        if !value.is_finite() {
            return Err(crate::Error::InvalidFormat(format!("Non-finite value '{}'", s)));
        }

        let unit = CssUnit::from_str_internal(&suffix.trim().to_ascii_lowercase()).ok_or_else(
            || crate::Error::InvalidFormat(format!("Unknown length unit in '{}'", s)),
        )?;

        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}
