//! Inline style normalization.
//!
//! Parses raw `prop: value; ...` declarations from the editor into typed
//! values in the output unit system. Malformed declarations are skipped.

use crate::common::style::RGBColor;
use crate::common::unit::{CssLength, CssUnit};
use crate::ooxml::docx::LineSpacing;
use phf::phf_map;
use tracing::warn;

/// Web fonts the editor substitutes for office fonts, mapped back to the
/// names a word processor expects.
static WEB_FONT_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "carlito" => "Calibri",
    "caladea" => "Cambria",
    "arimo" => "Arial",
    "tinos" => "Times New Roman",
    "cousine" => "Courier New",
};

/// Typed values recognized in an inline style string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub color: Option<RGBColor>,
    pub background: Option<RGBColor>,
    pub font_family: Option<String>,
    /// Points
    pub font_size: Option<f64>,
    pub line_spacing: Option<LineSpacing>,
}

impl InlineStyle {
    /// Parse a declaration list such as `"color: #f00; font-size: 12pt"`.
    pub fn parse(declarations: &str) -> Self {
        let mut style = Self::default();

        for declaration in declarations.split(';') {
            let declaration = declaration.trim();
            if declaration.is_empty() {
                continue;
            }
            let Some((property, value)) = declaration.split_once(':') else {
                warn!(declaration, "ignoring malformed style declaration");
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();

            let recognized = match property.as_str() {
                "color" => {
                    style.color = RGBColor::parse_css(value);
                    style.color.is_some()
                },
                "background-color" | "background" => {
                    style.background = RGBColor::parse_css(value);
                    style.background.is_some()
                },
                "font-family" => {
                    style.font_family = parse_font_family(value);
                    style.font_family.is_some()
                },
                "font-size" => {
                    style.font_size = parse_font_size(value);
                    style.font_size.is_some()
                },
                "line-height" => {
                    style.line_spacing = parse_line_height(value);
                    style.line_spacing.is_some()
                },
                _ => true,
            };
            if !recognized {
                warn!(property = %property, value, "ignoring unparseable style value");
            }
        }

        style
    }
}

/// First family in a comma-separated list, with quotes stripped.
pub fn parse_font_family(value: &str) -> Option<String> {
    let first = value
        .split(',')
        .next()?
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// Largest font size a word processor accepts, in points.
pub const MAX_FONT_SIZE_PT: f64 = 1_638.0;

/// Font size in points from a `pt` or `px` length, clamped to
/// [`MAX_FONT_SIZE_PT`].
pub fn parse_font_size(value: &str) -> Option<f64> {
    let length: CssLength = value.parse().ok()?;
    match length.unit() {
        CssUnit::Point | CssUnit::Pixel => length
            .to_points()
            .filter(|pt| *pt > 0.0)
            .map(|pt| pt.min(MAX_FONT_SIZE_PT)),
        _ => None,
    }
}

/// Line height: unitless multipliers and percentages become proportional
/// spacing, `pt`/`px` lengths become exact spacing.
pub fn parse_line_height(value: &str) -> Option<LineSpacing> {
    let length: CssLength = value.parse().ok()?;
    if length.value() <= 0.0 {
        return None;
    }
    match length.unit() {
        CssUnit::Unitless => Some(LineSpacing::Multiple(length.value())),
        CssUnit::Percent => Some(LineSpacing::Multiple(length.value() / 100.0)),
        CssUnit::Point | CssUnit::Pixel => length.to_points().map(LineSpacing::Exact),
        CssUnit::Inch => None,
    }
}

/// Office font name for a family, undoing web-font substitution.
pub fn word_font_name(family: &str) -> &str {
    WEB_FONT_NAMES
        .get(family.trim().to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let style = InlineStyle::parse(
            "color: #ff0000; background-color: rgb(0, 255, 0); font-family: 'Open Sans', Arial; font-size: 16px",
        );
        assert_eq!(style.color, Some(RGBColor::new(255, 0, 0)));
        assert_eq!(style.background, Some(RGBColor::new(0, 255, 0)));
        assert_eq!(style.font_family.as_deref(), Some("Open Sans"));
        assert_eq!(style.font_size, Some(12.0));
        assert_eq!(style.line_spacing, None);
    }

    #[test]
    fn test_malformed_declarations_are_skipped() {
        let style = InlineStyle::parse("garbage; color: notacolor; font-size: 11pt;;");
        assert_eq!(style.color, None);
        assert_eq!(style.font_size, Some(11.0));
    }

    #[test]
    fn test_line_height() {
        assert_eq!(parse_line_height("1.5"), Some(LineSpacing::Multiple(1.5)));
        assert_eq!(parse_line_height("200%"), Some(LineSpacing::Multiple(2.0)));
        assert_eq!(parse_line_height("18pt"), Some(LineSpacing::Exact(18.0)));
        assert_eq!(parse_line_height("24px"), Some(LineSpacing::Exact(18.0)));
        assert_eq!(parse_line_height("normal"), None);
        assert_eq!(parse_line_height("0"), None);
        assert_eq!(LineSpacing::Multiple(1.5).to_attrs(), (360, "auto"));
    }

    #[test]
    fn test_font_size_units() {
        assert_eq!(parse_font_size("14px"), Some(10.5));
        assert_eq!(parse_font_size("12pt"), Some(12.0));
        assert_eq!(parse_font_size("120%"), None);
        assert_eq!(parse_font_size("-3px"), None);
    }

    #[test]
    fn test_font_size_clamped() {
        assert_eq!(parse_font_size("100000pt"), Some(MAX_FONT_SIZE_PT));
        assert_eq!(parse_font_size("1638pt"), Some(1638.0));
        assert_eq!(crate::common::unit::pt_to_half_points(MAX_FONT_SIZE_PT), 3276);
    }

    #[test]
    fn test_word_font_name() {
        assert_eq!(word_font_name("Carlito"), "Calibri");
        assert_eq!(word_font_name("tinos"), "Times New Roman");
        assert_eq!(word_font_name("Georgia"), "Georgia");
    }
}
