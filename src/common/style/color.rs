use phf::phf_map;
use std::fmt;

/// Named CSS colors recognized in inline styles.
static NAMED_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "black" => (0x00, 0x00, 0x00),
    "white" => (0xFF, 0xFF, 0xFF),
    "red" => (0xFF, 0x00, 0x00),
    "green" => (0x00, 0x80, 0x00),
    "lime" => (0x00, 0xFF, 0x00),
    "blue" => (0x00, 0x00, 0xFF),
    "yellow" => (0xFF, 0xFF, 0x00),
    "cyan" => (0x00, 0xFF, 0xFF),
    "aqua" => (0x00, 0xFF, 0xFF),
    "magenta" => (0xFF, 0x00, 0xFF),
    "fuchsia" => (0xFF, 0x00, 0xFF),
    "gray" => (0x80, 0x80, 0x80),
    "grey" => (0x80, 0x80, 0x80),
    "silver" => (0xC0, 0xC0, 0xC0),
    "maroon" => (0x80, 0x00, 0x00),
    "olive" => (0x80, 0x80, 0x00),
    "navy" => (0x00, 0x00, 0x80),
    "purple" => (0x80, 0x00, 0x80),
    "teal" => (0x00, 0x80, 0x80),
    "orange" => (0xFF, 0xA5, 0x00),
    "pink" => (0xFF, 0xC0, 0xCB),
    "brown" => (0xA5, 0x2A, 0x2A),
};

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the range 0-255.
///
/// # Examples
///
/// ```rust
/// use folio::common::style::RGBColor;
///
/// let red = RGBColor::new(255, 0, 0);
/// assert_eq!(red.to_hex(), "FF0000");
///
/// let blue = RGBColor::parse_css("rgb(0, 0, 255)").unwrap();
/// assert_eq!(blue, RGBColor::from_hex("#00f").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string.
    ///
    /// Accepts six-digit (`"FF0000"`) and three-digit (`"f00"`) forms, with or
    /// without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            },
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
                let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
                Some(Self::new(r * 17, g * 17, b * 17))
            },
            _ => None,
        }
    }

    /// Parse a CSS color value: hex, `rgb()`/`rgba()` or a basic color name.
    ///
    /// Fully transparent colors and keywords such as `transparent` or
    /// `inherit` yield `None`.
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();

        if value.starts_with('#') {
            return Self::from_hex(&value);
        }

        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_rgb_args(args);
        }

        NAMED_COLORS
            .get(value.as_str())
            .map(|&(r, g, b)| Self::new(r, g, b))
    }

    fn parse_rgb_args(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }

        if let Some(alpha) = parts.get(3) {
            let alpha = match alpha.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => alpha.parse::<f64>().ok()?,
            };
            if alpha <= 0.0 {
                return None;
            }
        }

        let channel = |s: &str| -> Option<u8> {
            let v = match s.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? * 2.55,
                None => s.parse::<f64>().ok()?,
            };
            Some(v.round().clamp(0.0, 255.0) as u8)
        };

        Some(Self::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
        ))
    }

    /// Convert to hex string (without # prefix).
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}
