//! Piecewise color scales with HCL interpolation
//!
//! Colors between two stops are blended in the cylindrical CIE Lab space
//! (hue, chroma, luminance) along the shortest hue path, the way the
//! dashboard's heatmap colors have always been computed. Lab uses the D50
//! white point.

use super::linear::ticks;

const XN: f64 = 0.96422;
const YN: f64 = 1.0;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// A color palette with sorted color stops for interpolation
#[derive(Debug, Clone, Default)]
pub struct ColorPalette {
    /// Sorted list of color stops (by value, ascending)
    pub stops: Vec<ColorStop>,
}

/// A single color stop in a palette
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Numeric value at this stop
    pub value: f64,
    /// RGB color at this stop
    pub color: [u8; 3],
}

impl ColorPalette {
    pub fn new() -> Self {
        ColorPalette { stops: Vec::new() }
    }

    /// Add a color stop and maintain sorted order (replaces an equal value)
    pub fn add_stop(&mut self, value: f64, color: [u8; 3]) {
        let stop = ColorStop { value, color };
        match self
            .stops
            .binary_search_by(|s| s.value.total_cmp(&value))
        {
            Ok(pos) => self.stops[pos] = stop,
            Err(pos) => self.stops.insert(pos, stop),
        }
    }

    /// Append a stop; callers supply values in ascending order
    ///
    /// Unlike `add_stop`, equal values are kept, so a degenerate domain
    /// (saturating value 0) still has one stop per palette color.
    pub fn push_stop(&mut self, value: f64, color: [u8; 3]) {
        self.stops.push(ColorStop { value, color });
    }

    /// Get the value range of this palette
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => Some((first.value, last.value)),
            _ => None,
        }
    }
}

/// A color in the cylindrical Lab space
#[derive(Debug, Clone, Copy)]
struct Hcl {
    h: f64,
    c: f64,
    l: f64,
}

fn rgb_to_linear(v: u8) -> f64 {
    let x = f64::from(v) / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_rgb(x: f64) -> f64 {
    255.0
        * if x <= 0.0031308 {
            12.92 * x
        } else {
            1.055 * x.powf(1.0 / 2.4) - 0.055
        }
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

impl Hcl {
    fn from_rgb(rgb: [u8; 3]) -> Self {
        let r = rgb_to_linear(rgb[0]);
        let g = rgb_to_linear(rgb[1]);
        let b = rgb_to_linear(rgb[2]);
        let y = xyz_to_lab((0.2225045 * r + 0.7168786 * g + 0.0606169 * b) / YN);
        let (x, z) = if rgb[0] == rgb[1] && rgb[1] == rgb[2] {
            (y, y)
        } else {
            (
                xyz_to_lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
                xyz_to_lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
            )
        };
        let l = 116.0 * y - 16.0;
        let a = 500.0 * (x - y);
        let b = 200.0 * (y - z);

        // Achromatic: hue undefined, chroma undefined at pure black/white
        if a == 0.0 && b == 0.0 {
            let c = if l > 0.0 && l < 100.0 { 0.0 } else { f64::NAN };
            return Hcl { h: f64::NAN, c, l };
        }
        let mut h = b.atan2(a).to_degrees();
        if h < 0.0 {
            h += 360.0;
        }
        Hcl {
            h,
            c: a.hypot(b),
            l,
        }
    }

    fn to_rgb(self) -> [f64; 3] {
        let (a, b) = if self.h.is_nan() {
            (0.0, 0.0)
        } else {
            let c = if self.c.is_nan() { 0.0 } else { self.c };
            let h = self.h.to_radians();
            (h.cos() * c, h.sin() * c)
        };
        let y = (self.l + 16.0) / 116.0;
        let x = XN * lab_to_xyz(y + a / 500.0);
        let z = ZN * lab_to_xyz(y - b / 200.0);
        let y = YN * lab_to_xyz(y);
        [
            linear_to_rgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
            linear_to_rgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
            linear_to_rgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
        ]
    }
}

/// Interpolate a channel; an undefined endpoint takes the other's value
fn lerp_channel(a: f64, b: f64, t: f64) -> f64 {
    let d = b - a;
    if d.is_nan() || d == 0.0 {
        return if a.is_nan() { b } else { a };
    }
    a + t * d
}

/// Interpolate a hue along the shortest arc
fn lerp_hue(a: f64, b: f64, t: f64) -> f64 {
    let mut d = b - a;
    if d.is_nan() || d == 0.0 {
        return if a.is_nan() { b } else { a };
    }
    if !(-180.0..=180.0).contains(&d) {
        d -= 360.0 * (d / 360.0).round();
    }
    a + t * d
}

fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    // Half-up rounding
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Blend two colors in HCL at `t` ∈ [0, 1]
pub fn interpolate_hcl(from: [u8; 3], to: [u8; 3], t: f64) -> [u8; 3] {
    let a = Hcl::from_rgb(from);
    let b = Hcl::from_rgb(to);
    let mixed = Hcl {
        h: lerp_hue(a.h, b.h, t),
        c: lerp_channel(a.c, b.c, t),
        l: lerp_channel(a.l, b.l, t),
    };
    let rgb = mixed.to_rgb();
    [
        clamp_channel(rgb[0]),
        clamp_channel(rgb[1]),
        clamp_channel(rgb[2]),
    ]
}

/// Interpolate a color value using the palette
///
/// Values outside the palette range clamp to the min/max colors.
pub fn interpolate_color(value: f64, palette: &ColorPalette) -> [u8; 3] {
    let stops = &palette.stops;
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [128, 128, 128];
    };

    if value.is_nan() || value <= first.value {
        return first.color;
    }
    if value >= last.value {
        return last.color;
    }

    // Segment whose upper stop is the first one strictly above `value`
    let idx = stops
        .partition_point(|stop| stop.value <= value)
        .clamp(1, stops.len() - 1);
    let lower = &stops[idx - 1];
    let upper = &stops[idx];

    let span = upper.value - lower.value;
    let t = if span == 0.0 {
        0.5
    } else {
        (value - lower.value) / span
    };
    interpolate_hcl(lower.color, upper.color, t)
}

/// `#rrggbb` for an RGB triple
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Device count → fill color
#[derive(Debug, Clone)]
pub struct ColorScale {
    palette: ColorPalette,
}

impl ColorScale {
    pub fn new(palette: ColorPalette) -> Self {
        ColorScale { palette }
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Domain [first stop, last stop]
    pub fn domain(&self) -> (f64, f64) {
        self.palette.range().unwrap_or((0.0, 0.0))
    }

    pub fn color(&self, value: f64) -> [u8; 3] {
        interpolate_color(value, &self.palette)
    }

    pub fn hex(&self, value: f64) -> String {
        to_hex(self.color(value))
    }

    /// Ten evenly spaced round values across the domain (legend gradient stops)
    pub fn ticks(&self) -> Vec<f64> {
        let (min, max) = self.domain();
        ticks(min, max, 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::palettes::parse_hex_color;

    fn hex(s: &str) -> [u8; 3] {
        parse_hex_color(s).unwrap()
    }

    fn aileen(max: f64) -> ColorScale {
        let mut palette = ColorPalette::new();
        for (pos, color) in [
            (0.0, "#D8D860"),
            (0.05, "#D8D860"),
            (0.45, "#A6CCCD"),
            (0.75, "#207E82"),
            (1.0, "#1D5464"),
        ] {
            palette.push_stop(pos * max, hex(color));
        }
        ColorScale::new(palette)
    }

    #[test]
    fn test_palette_add_stop() {
        let mut palette = ColorPalette::new();
        palette.add_stop(0.0, [0, 0, 0]);
        palette.add_stop(100.0, [255, 255, 255]);
        palette.add_stop(50.0, [128, 128, 128]);
        palette.add_stop(50.0, [1, 2, 3]);

        assert_eq!(palette.stops.len(), 3);
        assert_eq!(palette.stops[1].value, 50.0);
        assert_eq!(palette.stops[1].color, [1, 2, 3]);
        assert_eq!(palette.range(), Some((0.0, 100.0)));
    }

    #[test]
    fn test_interpolate_hcl_known_values() {
        assert_eq!(
            to_hex(interpolate_hcl(hex("#A6CCCD"), hex("#207E82"), 0.5)),
            "#69a4a7"
        );
        assert_eq!(
            to_hex(interpolate_hcl(hex("#D8D860"), hex("#A6CCCD"), 0.5)),
            "#93dca9"
        );
        assert_eq!(
            to_hex(interpolate_hcl(hex("#FFFFFF"), hex("#1D5464"), 0.25)),
            "#a4d8eb"
        );
    }

    #[test]
    fn test_interpolate_hcl_achromatic() {
        // Both hues undefined: only luminance moves
        assert_eq!(
            to_hex(interpolate_hcl([0, 0, 0], [255, 255, 255], 0.5)),
            "#777777"
        );
        assert_eq!(interpolate_hcl([0, 0, 0], [255, 255, 255], 0.0), [0, 0, 0]);
    }

    #[test]
    fn test_color_scale_stops() {
        let scale = aileen(200.0);
        assert_eq!(scale.hex(0.0), "#d8d860");
        assert_eq!(scale.hex(10.0), "#d8d860");
        assert_eq!(scale.hex(5.0), "#d8d860");
        assert_eq!(scale.hex(150.0), "#207e82");
        assert_eq!(scale.hex(200.0), "#1d5464");
        // 120 is halfway between the .45 and .75 stops
        assert_eq!(scale.hex(120.0), "#69a4a7");
    }

    #[test]
    fn test_color_scale_clamps() {
        let scale = aileen(100.0);
        assert_eq!(scale.hex(-5.0), "#d8d860");
        assert_eq!(scale.hex(1000.0), "#1d5464");
    }

    #[test]
    fn test_color_scale_ticks() {
        let scale = aileen(100.0);
        let ticks = scale.ticks();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[10], 100.0);
    }

    #[test]
    fn test_empty_palette() {
        assert_eq!(interpolate_color(1.0, &ColorPalette::new()), [128, 128, 128]);
    }
}
