//! Common style and formatting types.

pub mod color;

pub use color::RGBColor;
