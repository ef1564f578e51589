//! Error types shared by the collections, one struct per failure with enums grouping the ways a
//! single operation can fail.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// An index was at or past the number of elements in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    /// The index that was requested.
    pub index: usize,
    /// The length of the collection at the time.
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// Raised by operations that require at least one element, such as popping or peeking at either
/// end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Operation requires an element, but the collection is empty!")]
pub struct EmptyContainer;

/// The requested capacity can't be represented, either because the memory layout would exceed
/// [`isize::MAX`] bytes or because the collection is already as large as it can get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// The global allocator returned null when asked for `cap` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Allocation of {cap} slots failed!")]
pub struct AllocFailed {
    /// The number of slots that were requested.
    pub cap: usize,
}

/// Every way that an explicit capacity change can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
#[allow(missing_docs)]
pub enum BufferError {
    CapacityOverflow(CapacityOverflow),
    AllocFailed(AllocFailed),
}

/// A [`GrowthPolicy`](crate::collections::contiguous::GrowthPolicy) was configured in a way that
/// can't guarantee growth.
#[derive(Debug, Clone, Copy, PartialEq, Display, Error)]
pub enum InvalidPolicy {
    /// A policy has to allocate something on its first growth.
    #[display("Initial capacity must be greater than zero!")]
    ZeroInitialCap,
    /// Coefficients below one would shrink the buffer.
    #[display("Growth coefficient {_0} must be finite and at least 1!")]
    BadCoefficient(#[error(not(source))] f64),
}
