//! Lower/upper bound pairs

use std::ops::{self, Bound};

/// A pair of bounds; a [`Bound::Unbounded`] side places no restriction
#[derive(Debug, Clone, PartialEq)]
pub struct Range<T> {
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<T> Range<T> {
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Self {
        Self { lower, upper }
    }

    /// Both bounds inclusive
    pub fn closed(from: T, to: T) -> Self {
        Self::new(Bound::Included(from), Bound::Included(to))
    }

    /// Both bounds exclusive
    pub fn open(from: T, to: T) -> Self {
        Self::new(Bound::Excluded(from), Bound::Excluded(to))
    }

    /// Inclusive lower, exclusive upper
    pub fn right_open(from: T, to: T) -> Self {
        Self::new(Bound::Included(from), Bound::Excluded(to))
    }

    /// Exclusive lower, inclusive upper
    pub fn left_open(from: T, to: T) -> Self {
        Self::new(Bound::Excluded(from), Bound::Included(to))
    }

    pub fn lower_bounded(lower: Bound<T>) -> Self {
        Self::new(lower, Bound::Unbounded)
    }

    pub fn upper_bounded(upper: Bound<T>) -> Self {
        Self::new(Bound::Unbounded, upper)
    }

    pub fn unbounded() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn lower(&self) -> &Bound<T> {
        &self.lower
    }

    pub fn upper(&self) -> &Bound<T> {
        &self.upper
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self.lower, Bound::Unbounded) && matches!(self.upper, Bound::Unbounded)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Range<U> {
        Range {
            lower: map_bound(self.lower, &mut f),
            upper: map_bound(self.upper, &mut f),
        }
    }
}

impl<T: PartialOrd> Range<T> {
    pub fn contains(&self, value: &T) -> bool {
        let above_lower = match &self.lower {
            Bound::Included(lower) => value >= lower,
            Bound::Excluded(lower) => value > lower,
            Bound::Unbounded => true,
        };
        let below_upper = match &self.upper {
            Bound::Included(upper) => value <= upper,
            Bound::Excluded(upper) => value < upper,
            Bound::Unbounded => true,
        };
        above_lower && below_upper
    }
}

fn map_bound<T, U>(bound: Bound<T>, f: &mut impl FnMut(T) -> U) -> Bound<U> {
    match bound {
        Bound::Included(value) => Bound::Included(f(value)),
        Bound::Excluded(value) => Bound::Excluded(f(value)),
        Bound::Unbounded => Bound::Unbounded,
    }
}

impl<T> From<ops::Range<T>> for Range<T> {
    fn from(range: ops::Range<T>) -> Self {
        Range::right_open(range.start, range.end)
    }
}

impl<T> From<ops::RangeInclusive<T>> for Range<T> {
    fn from(range: ops::RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Range::closed(start, end)
    }
}

impl<T> From<ops::RangeFrom<T>> for Range<T> {
    fn from(range: ops::RangeFrom<T>) -> Self {
        Range::lower_bounded(Bound::Included(range.start))
    }
}

impl<T> From<ops::RangeTo<T>> for Range<T> {
    fn from(range: ops::RangeTo<T>) -> Self {
        Range::upper_bounded(Bound::Excluded(range.end))
    }
}

impl<T> From<ops::RangeToInclusive<T>> for Range<T> {
    fn from(range: ops::RangeToInclusive<T>) -> Self {
        Range::upper_bounded(Bound::Included(range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_range_conversions() {
        assert_eq!(Range::from(5..10), Range::right_open(5, 10));
        assert_eq!(Range::from(5..=10), Range::closed(5, 10));
        assert_eq!(Range::from(5..), Range::new(Bound::Included(5), Bound::Unbounded));
        assert_eq!(Range::from(..10), Range::new(Bound::Unbounded, Bound::Excluded(10)));
        assert_eq!(Range::from(..=10), Range::new(Bound::Unbounded, Bound::Included(10)));
    }

    #[test]
    fn test_contains() {
        let range = Range::right_open(5, 10);
        assert!(range.contains(&5));
        assert!(range.contains(&9));
        assert!(!range.contains(&10));
        assert!(!range.contains(&4));

        assert!(Range::<i32>::unbounded().contains(&i32::MIN));
        assert!(Range::left_open(5, 10).contains(&10));
        assert!(!Range::open(5, 10).contains(&5));
    }

    #[test]
    fn test_map_keeps_bound_kinds() {
        let range = Range::left_open(1, 2).map(|v| v * 10);
        assert_eq!(range.lower(), &Bound::Excluded(10));
        assert_eq!(range.upper(), &Bound::Included(20));
        assert!(Range::<i32>::unbounded().is_unbounded());
    }
}
