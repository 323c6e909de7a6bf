//! Linear scale with round tick generation
//!
//! Tick steps are 1, 2 or 5 times a power of ten, picked so that roughly
//! `count` ticks cover the domain. `nice` widens the domain outward to the
//! nearest tick step.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// (first index, last index, increment) of the ticks covering [start, stop]
///
/// A negative increment `-k` means a step of `1/k`, which keeps small steps
/// exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let k = 10f64.powf(-power) / factor;
        i1 = (start * k).round();
        i2 = (stop * k).round();
        if i1 / k < start {
            i1 += 1.0;
        }
        if i2 / k > stop {
            i2 -= 1.0;
        }
        inc = -k;
    } else {
        let k = 10f64.powf(power) * factor;
        i1 = (start / k).round();
        i2 = (stop / k).round();
        if i1 * k < start {
            i1 += 1.0;
        }
        if i2 * k > stop {
            i2 -= 1.0;
        }
        inc = k;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Tick step for `count` ticks over [start, stop] (negative = reciprocal)
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Approximately `count` round values in [start, stop]
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || start.is_nan() || stop.is_nan() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if !(i2 >= i1) || !inc.is_finite() {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let value = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if reverse {
        (0..n).map(|i| value(i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| value(i1 + i as f64)).collect()
    }
}

/// Continuous scale mapping a numeric domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// Position of `x` in the domain as a fraction; a collapsed domain maps
    /// everything to the middle
    pub fn normalize(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span == 0.0 || span.is_nan() {
            return 0.5;
        }
        (x - d0) / span
    }

    pub fn scale(&self, x: f64) -> f64 {
        let (r0, r1) = self.range;
        r0 + self.normalize(x) * (r1 - r0)
    }

    pub fn invert(&self, y: f64) -> f64 {
        let (r0, r1) = self.range;
        let (d0, d1) = self.domain;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (y - r0) / (r1 - r0) * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count as f64)
    }

    /// Extend the domain to round values
    pub fn nice(&mut self, count: usize) -> &mut Self {
        let count = count as f64;
        let (mut d0, mut d1) = self.domain;
        let reversed = d1 < d0;
        if reversed {
            std::mem::swap(&mut d0, &mut d1);
        }
        let (mut start, mut stop) = (d0, d1);
        let mut previous_step: Option<f64> = None;

        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous_step == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous_step = Some(step);
        }

        if start.is_finite() && stop.is_finite() {
            self.domain = if reversed { (stop, start) } else { (start, stop) };
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_increment() {
        assert_eq!(tick_increment(0.0, 10.0, 10.0), 1.0);
        assert_eq!(tick_increment(0.0, 100.0, 10.0), 10.0);
        assert_eq!(tick_increment(0.0, 437.0, 10.0), 50.0);
        assert_eq!(tick_increment(0.0, 1.0, 10.0), -10.0);
        assert_eq!(tick_increment(0.0, 3.0, 5.0), -2.0);
    }

    #[test]
    fn test_ticks() {
        assert_eq!(
            ticks(0.0, 1000.0, 5.0),
            vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]
        );
        assert_eq!(ticks(0.0, 1.0, 5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(1.0, 0.0, 2.0), vec![1.0, 0.5, 0.0]);
        assert_eq!(ticks(0.0, 125.0, 5.0), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0]);
        assert_eq!(ticks(3.0, 3.0, 5.0), vec![3.0]);
        assert!(ticks(0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_scale_and_invert() {
        let scale = LinearScale::new((0.0, 200.0), (300.0, 0.0));
        assert_eq!(scale.scale(0.0), 300.0);
        assert_eq!(scale.scale(50.0), 225.0);
        assert_eq!(scale.scale(200.0), 0.0);
        assert_eq!(scale.invert(225.0), 50.0);
    }

    #[test]
    fn test_collapsed_domain() {
        let scale = LinearScale::new((0.0, 0.0), (0.0, 100.0));
        assert_eq!(scale.scale(0.0), 50.0);
    }

    #[test]
    fn test_nice() {
        let mut scale = LinearScale::new((0.0, 437.3), (0.0, 1.0));
        scale.nice(10);
        assert_eq!(scale.domain(), (0.0, 450.0));

        let mut scale = LinearScale::new((0.0, 0.93), (0.0, 1.0));
        scale.nice(10);
        assert_eq!(scale.domain(), (0.0, 1.0));

        let mut scale = LinearScale::new((12.0, 96.0), (0.0, 1.0));
        scale.nice(10);
        assert_eq!(scale.domain(), (10.0, 100.0));
    }
}
