use std::cmp;

use crate::util::error::InvalidPolicy;

/// Controls how a [`GrowableBuffer`](super::GrowableBuffer) picks a new capacity when an append
/// finds it full.
///
/// The first growth from an unallocated buffer jumps straight to `initial_cap`. Every growth after
/// that scales the old capacity by `coefficient`, rounding half up, and adds `intercept`. The
/// result is always at least one more than the old capacity, so even a configuration that rounds
/// back down to the old value still makes progress.
///
/// # Examples
/// ```
/// # use study_collections::collections::contiguous::GrowthPolicy;
/// let policy = GrowthPolicy::default();
/// assert_eq!(policy.next_cap(0), Some(10));
/// assert_eq!(policy.next_cap(10), Some(15));
/// assert_eq!(policy.next_cap(15), Some(23));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    initial_cap: usize,
    coefficient: f64,
    intercept: usize,
}

impl GrowthPolicy {
    /// Capacity of the first allocation made by a growing append.
    pub const DEFAULT_INITIAL_CAP: usize = 10;

    /// Factor applied to the old capacity on each subsequent growth.
    pub const DEFAULT_COEFFICIENT: f64 = 1.5;

    /// Slots added on top of the scaled capacity.
    pub const DEFAULT_INTERCEPT: usize = 0;

    /// The policy used by [`GrowableBuffer::new`](super::GrowableBuffer::new).
    pub const DEFAULT: GrowthPolicy = GrowthPolicy {
        initial_cap: Self::DEFAULT_INITIAL_CAP,
        coefficient: Self::DEFAULT_COEFFICIENT,
        intercept: Self::DEFAULT_INTERCEPT,
    };

    /// Creates a new GrowthPolicy, checking that it describes amortized growth.
    ///
    /// # Errors
    /// Returns [`InvalidPolicy::ZeroInitialCap`] if `initial_cap` is zero and
    /// [`InvalidPolicy::BadCoefficient`] if `coefficient` is less than one, infinite or NaN.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowthPolicy;
    /// let doubling = GrowthPolicy::new(4, 2.0, 0).unwrap();
    /// assert_eq!(doubling.next_cap(4), Some(8));
    ///
    /// assert!(GrowthPolicy::new(0, 2.0, 0).is_err());
    /// assert!(GrowthPolicy::new(4, 0.5, 0).is_err());
    /// ```
    pub fn new(
        initial_cap: usize,
        coefficient: f64,
        intercept: usize,
    ) -> Result<GrowthPolicy, InvalidPolicy> {
        if initial_cap == 0 {
            return Err(InvalidPolicy::ZeroInitialCap);
        }
        if !coefficient.is_finite() || coefficient < 1.0 {
            return Err(InvalidPolicy::BadCoefficient(coefficient));
        }

        Ok(GrowthPolicy {
            initial_cap,
            coefficient,
            intercept,
        })
    }

    /// Capacity of the first allocation.
    pub const fn initial_cap(&self) -> usize {
        self.initial_cap
    }

    /// Factor applied on every growth after the first.
    pub const fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Extra slots added after scaling.
    pub const fn intercept(&self) -> usize {
        self.intercept
    }

    /// Returns the capacity to grow to from `old_cap`, or [`None`] if `old_cap` is already
    /// [`usize::MAX`]. The result isn't limited by the size of any particular element type.
    pub fn next_cap(&self, old_cap: usize) -> Option<usize> {
        if old_cap == 0 {
            return Some(self.initial_cap);
        }

        // Float to int casts saturate, so huge capacities clamp to usize::MAX.
        let scaled = (old_cap as f64 * self.coefficient + 0.5) as usize;
        Some(cmp::max(old_cap.checked_add(1)?, scaled.saturating_add(self.intercept)))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
