//! Closed integer intervals for cumulative dimension values.

use crate::ValidationError;

/// A closed interval `[min, max]` of cumulative values.
///
/// Reported routes carry one range per visited node: the span of values the
/// cumul may take there without changing the finalised schedule at the route
/// ends. A range with `min == max` is a fixed value.
///
/// With the `serde` feature the range serialises as a two-element array,
/// matching the `[earliest, latest]` pairs used in requests.
///
/// # Examples
/// ```
/// use tsp_solver_core::CumulRange;
///
/// let window = CumulRange::new(5, 10)?;
/// let budget = CumulRange::up_to(8);
/// assert_eq!(window.intersect(budget), Some(CumulRange::new(5, 8)?));
/// assert!(window.contains(7));
/// # Ok::<(), tsp_solver_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "[u64; 2]", try_from = "[u64; 2]"))]
pub struct CumulRange {
    min: u64,
    max: u64,
}

impl CumulRange {
    /// Construct a range, rejecting `min > max`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedRange`] when `min > max`.
    pub const fn new(min: u64, max: u64) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The single value `value`.
    #[must_use]
    pub const fn point(value: u64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Every value from zero to `max` inclusive.
    #[must_use]
    pub const fn up_to(max: u64) -> Self {
        Self { min: 0, max }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> u64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> u64 {
        self.max
    }

    /// Whether `value` lies within the range.
    #[must_use]
    pub const fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }

    /// The overlap of two ranges, or `None` when they are disjoint.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(Self { min, max })
    }
}

impl From<CumulRange> for [u64; 2] {
    fn from(range: CumulRange) -> Self {
        [range.min, range.max]
    }
}

impl TryFrom<[u64; 2]> for CumulRange {
    type Error = ValidationError;

    fn try_from([min, max]: [u64; 2]) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}
