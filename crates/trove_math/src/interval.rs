/// A closed range of keyframe times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if the interval contains nothing.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Grows the interval so it contains x.
    pub fn include(&self, x: f32) -> Interval {
        Interval::new(self.min.min(x), self.max.max(x))
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Smallest interval containing every value, or `EMPTY` for no values.
    pub fn enclosing(values: &[f32]) -> Interval {
        values.iter().fold(Interval::EMPTY, |acc, &x| acc.include(x))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        let interval = Interval::new(2.0, 7.0);
        assert_eq!(interval.size(), 5.0);
    }

    #[test]
    fn test_interval_include() {
        let interval = Interval::new(0.0, 10.0).include(12.0).include(-1.0);
        assert_eq!(interval, Interval::new(-1.0, 12.0));

        // Single point
        let point = Interval::EMPTY.include(3.0);
        assert!(!point.is_empty());
        assert_eq!(point.size(), 0.0);
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(empty.is_empty());
        assert!(Interval::new(1.0, 0.0).is_empty());
        assert!(!Interval::new(0.0, 0.0).is_empty());
    }

    #[test]
    fn test_interval_enclosing() {
        let interval = Interval::enclosing(&[0.5, -1.0, 3.0]);
        assert_eq!(interval, Interval::new(-1.0, 3.0));

        assert!(Interval::enclosing(&[]).is_empty());
    }

    #[test]
    fn test_interval_surrounding_empty() {
        let a = Interval::new(1.0, 5.0);
        let result = Interval::surrounding(&Interval::EMPTY, &a);
        assert_eq!(result, a);
    }
}
