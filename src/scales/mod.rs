//! Scales mapping data values to pixels, angles and colors

pub mod band;
pub mod color;
pub mod format;
pub mod linear;
pub mod point;
pub mod radial;

pub use band::BandScale;
pub use color::{ColorPalette, ColorScale, ColorStop};
pub use format::{format_count, format_fixed, format_number};
pub use linear::LinearScale;
pub use point::PointScale;
pub use radial::RadialScale;
