use crate::{CumulRange, ValidationError};

/// Permitted arrival interval at one location.
///
/// Requests carry windows as signed `[earliest, latest]` pairs.
/// [`TimeWindow::from_pair`] checks the pair before it reaches the routing
/// engine.
///
/// # Examples
/// ```
/// use tsp_solver_core::TimeWindow;
///
/// let window = TimeWindow::from_pair(1, [5, 10])?;
/// assert_eq!(window.earliest(), 5);
/// assert!(TimeWindow::from_pair(1, [10, 5]).is_err());
/// # Ok::<(), tsp_solver_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    range: CumulRange,
}

impl TimeWindow {
    /// Validate a request pair for location `node`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeWindow`] when either bound is
    /// negative or `earliest > latest`.
    pub fn from_pair(node: usize, [earliest, latest]: [i64; 2]) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimeWindow {
            node,
            earliest,
            latest,
        };
        let lower = u64::try_from(earliest).map_err(|_| invalid())?;
        let upper = u64::try_from(latest).map_err(|_| invalid())?;
        let range = CumulRange::new(lower, upper).map_err(|_| invalid())?;
        Ok(Self { range })
    }

    /// Earliest permitted arrival.
    #[must_use]
    pub const fn earliest(&self) -> u64 {
        self.range.min()
    }

    /// Latest permitted arrival.
    #[must_use]
    pub const fn latest(&self) -> u64 {
        self.range.max()
    }

    /// The window as a cumulative range.
    #[must_use]
    pub const fn range(&self) -> CumulRange {
        self.range
    }
}
