//! Ordinal band scale
//!
//! Splits a continuous range into `n` equal bands separated by inner
//! padding, with outer padding before the first and after the last band.
//! Both paddings are fractions of the step.

#[derive(Debug, Clone)]
pub struct BandScale<T> {
    domain: Vec<T>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl<T: PartialEq> BandScale<T> {
    pub fn new(domain: Vec<T>, range: (f64, f64)) -> Self {
        let mut scale = BandScale {
            domain,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            start: 0.0,
        };
        scale.rescale();
        scale
    }

    /// Same inner and outer padding
    pub fn padding(self, padding: f64) -> Self {
        self.padding_inner(padding).padding_outer(padding)
    }

    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    pub fn padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding;
        self.rescale();
        self
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
        self.rescale();
    }

    pub fn set_domain(&mut self, domain: Vec<T>) {
        self.domain = domain;
        self.rescale();
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let span = hi - lo;
        self.step = span / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = lo + (span - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Band start by index; a reversed range counts from its high end
    pub fn position_at(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        if r1 < r0 {
            let n = self.domain.len();
            self.start + self.step * (n.saturating_sub(index + 1)) as f64
        } else {
            self.start + self.step * index as f64
        }
    }

    /// Band start of a domain value
    pub fn position(&self, value: &T) -> Option<f64> {
        self.domain
            .iter()
            .position(|v| v == value)
            .map(|i| self.position_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_band_no_padding() {
        let scale = BandScale::new(vec!["a", "b", "c", "d"], (0.0, 100.0));
        assert_eq!(scale.step(), 25.0);
        assert_eq!(scale.bandwidth(), 25.0);
        assert_eq!(scale.position(&"c"), Some(50.0));
        assert_eq!(scale.position(&"z"), None);
    }

    #[test]
    fn test_band_padding() {
        let scale = BandScale::new(vec!["a", "b"], (0.0, 100.0)).padding(0.5);
        // step = 100 / (2 - 0.5 + 1) = 40
        assert!((scale.step() - 40.0).abs() < 1e-9);
        assert!((scale.bandwidth() - 20.0).abs() < 1e-9);
        // start = (100 - 40 * 1.5) / 2 = 20
        assert!((scale.position_at(0) - 20.0).abs() < 1e-9);
        assert!((scale.position_at(1) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_hours_around_circle() {
        let hours: Vec<String> = (0..24).map(|h| h.to_string()).collect();
        let scale = BandScale::new(hours, (0.0, 2.0 * PI))
            .padding_inner(0.36)
            .padding_outer(0.18);
        let step = 2.0 * PI / 24.0;
        assert!((scale.step() - step).abs() < 1e-12);
        assert!((scale.bandwidth() - 0.64 * step).abs() < 1e-12);
        assert!((scale.position(&"0".to_string()).unwrap() - 0.18 * step).abs() < 1e-12);
    }

    #[test]
    fn test_band_reversed_range() {
        let scale = BandScale::new(vec![1, 2], (100.0, 0.0));
        assert_eq!(scale.position(&1), Some(50.0));
        assert_eq!(scale.position(&2), Some(0.0));
    }
}
