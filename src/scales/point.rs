//! Ordinal point scale: a band scale whose bands have zero width
//!
//! With padding 0.5 every point sits in the middle of an evenly sized cell,
//! which is how the heatmap centers its squares on days and hours.

use super::band::BandScale;

#[derive(Debug, Clone)]
pub struct PointScale<T> {
    band: BandScale<T>,
}

impl<T: PartialEq> PointScale<T> {
    pub fn new(domain: Vec<T>, range: (f64, f64)) -> Self {
        PointScale {
            band: BandScale::new(domain, range).padding_inner(1.0),
        }
    }

    /// Outer padding, as a fraction of the step
    pub fn padding(self, padding: f64) -> Self {
        PointScale {
            band: self.band.padding_outer(padding),
        }
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.band.set_range(range);
    }

    pub fn domain(&self) -> &[T] {
        self.band.domain()
    }

    pub fn range(&self) -> (f64, f64) {
        self.band.range()
    }

    /// Distance between adjacent points
    pub fn step(&self) -> f64 {
        self.band.step()
    }

    pub fn position_at(&self, index: usize) -> f64 {
        self.band.position_at(index)
    }

    pub fn position(&self, value: &T) -> Option<f64> {
        self.band.position(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_centers_cells() {
        let hours: Vec<u32> = (0..24).collect();
        let scale = PointScale::new(hours, (0.0, 240.0)).padding(0.5);
        assert!((scale.step() - 10.0).abs() < 1e-9);
        assert!((scale.position(&0).unwrap() - 5.0).abs() < 1e-9);
        assert!((scale.position(&23).unwrap() - 235.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_no_padding() {
        let scale = PointScale::new(vec!['a', 'b', 'c'], (0.0, 100.0));
        assert_eq!(scale.position(&'a'), Some(0.0));
        assert_eq!(scale.position(&'b'), Some(50.0));
        assert_eq!(scale.position(&'c'), Some(100.0));
    }

    #[test]
    fn test_point_single_value() {
        let scale = PointScale::new(vec![7], (0.0, 100.0)).padding(0.5);
        // step = 100 / max(1, 0 + 1) = 100, centered
        assert_eq!(scale.position(&7), Some(50.0));
    }

    #[test]
    fn test_point_offset_range() {
        let scale = PointScale::new(vec![1, 2, 3, 4], (-20.0, 20.0)).padding(0.5);
        assert!((scale.position(&1).unwrap() + 15.0).abs() < 1e-9);
        assert!((scale.position(&4).unwrap() - 15.0).abs() < 1e-9);
    }
}
