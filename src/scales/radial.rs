//! Radial scale: linear on the squared radius
//!
//! Bar area rather than bar length grows linearly with the value, so an
//! annular wedge of twice the value covers twice the ring area.

use super::linear::LinearScale;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialScale {
    linear: LinearScale,
    range: (f64, f64),
}

impl RadialScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        RadialScale {
            linear: LinearScale::new(domain, (range.0 * range.0, range.1 * range.1)),
            range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.linear.domain()
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.linear.set_domain(domain);
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
        self.linear
            .set_range((range.0 * range.0, range.1 * range.1));
    }

    pub fn scale(&self, x: f64) -> f64 {
        let squared = self.linear.scale(x);
        squared.signum() * squared.abs().sqrt()
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        self.linear.ticks(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_area_proportional() {
        let scale = RadialScale::new((0.0, 100.0), (0.0, 10.0));
        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(100.0), 10.0);
        assert!((scale.scale(25.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_radial_inner_radius() {
        let scale = RadialScale::new((0.0, 10.0), (40.0, 100.0));
        assert!((scale.scale(0.0) - 40.0).abs() < 1e-9);
        // sqrt(1600 + 0.5 * 8400)
        assert!((scale.scale(5.0) - 5800f64.sqrt()).abs() < 1e-9);
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_radial_empty_domain() {
        let scale = RadialScale::new((0.0, 0.0), (40.0, 100.0));
        assert!((scale.scale(0.0) - 5800f64.sqrt()).abs() < 1e-9);
    }
}
