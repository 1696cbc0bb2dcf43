//! Common types and utilities shared by the layout and export layers.

pub mod error;
pub mod style;
pub mod unit;

pub use error::{Error, Result};
pub use style::RGBColor;
