use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem::{self, MaybeUninit};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

use super::GrowthPolicy;
use super::raw_block::RawBlock;
use crate::util::error::{BufferError, CapacityOverflow, EmptyContainer, IndexOutOfBounds};
use crate::util::result::ResultExtension;

/// An owning, contiguous and resizable sequence, built directly on top of the global allocator.
///
/// Storage is allocated lazily, the first time a value is pushed or the capacity is set
/// explicitly. When a push finds the buffer full, the new capacity comes from the buffer's
/// [`GrowthPolicy`], which by default starts at 10 and grows by a factor of 1.5 afterwards.
/// Capacity never changes unless a push needs more room or one of the capacity manipulation
/// methods is called, and in the latter case it is always exactly the value requested.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the GrowableBuffer.
/// - `c`: The requested capacity.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `at` | `O(1)` |
/// | `push_back` | `O(1)`*, `O(n)` |
/// | `pop_back` | `O(1)` |
/// | `front` / `back` | `O(1)` |
/// | `resize` | `O(min(n, c))`** |
/// | `clear` | `O(n)` |
/// | `clone` | `O(n)` |
///
/// \* If the GrowableBuffer doesn't have spare capacity for the new element, `push_back` will take
/// `O(n)`. Averaged over many pushes this is still `O(1)`.
///
/// \** Plus the cost of dropping any elements that no longer fit.
pub struct GrowableBuffer<T> {
    pub(crate) block: RawBlock<T>,
    pub(crate) len: usize,
    pub(crate) policy: GrowthPolicy,
}

impl<T> GrowableBuffer<T> {
    /// Creates a new GrowableBuffer with length and capacity 0, using the default
    /// [`GrowthPolicy`]. Nothing is allocated until the capacity changes.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let buf: GrowableBuffer<u8> = GrowableBuffer::new();
    /// assert_eq!(buf.len(), 0);
    /// assert_eq!(buf.cap(), 0);
    /// assert!(buf.first_ptr().is_null());
    /// ```
    pub const fn new() -> GrowableBuffer<T> {
        Self::with_policy(GrowthPolicy::DEFAULT)
    }

    /// Creates a new, unallocated GrowableBuffer which grows according to `policy`.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::{GrowableBuffer, GrowthPolicy};
    /// let policy = GrowthPolicy::new(2, 2.0, 0).unwrap();
    /// let mut buf = GrowableBuffer::with_policy(policy);
    /// buf.extend([1, 2, 3]);
    /// assert_eq!(buf.cap(), 4);
    /// ```
    pub const fn with_policy(policy: GrowthPolicy) -> GrowableBuffer<T> {
        GrowableBuffer {
            block: RawBlock::new(),
            len: 0,
            policy,
        }
    }

    /// Creates a new GrowableBuffer with capacity exactly equal to the provided value, allowing
    /// values to be added without reallocation.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<u8> = GrowableBuffer::with_cap(5);
    /// assert_eq!(buf.cap(), 5);
    /// buf.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(buf.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> GrowableBuffer<T> {
        let mut buf = Self::new();
        buf.resize(cap);
        buf
    }

    /// Returns the number of elements in the GrowableBuffer.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the GrowableBuffer contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<u8> = GrowableBuffer::new();
    /// assert!(buf.is_empty());
    /// buf.push_back(1);
    /// assert!(!buf.is_empty());
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots currently allocated. This is always at least
    /// [`len`](GrowableBuffer::len).
    pub const fn cap(&self) -> usize {
        self.block.cap
    }

    /// Returns the [`GrowthPolicy`] used when a push needs more room.
    pub const fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Pushes the provided value onto the end of the GrowableBuffer, growing it first if there is
    /// no spare capacity.
    ///
    /// # Panics
    /// Panics if the buffer can't grow without its memory layout exceeding [`isize::MAX`] bytes.
    /// If the allocator itself fails, [`handle_alloc_error`](std::alloc::handle_alloc_error) is
    /// called instead, which aborts by default.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf = GrowableBuffer::<u8>::new();
    /// for i in 0..=5 {
    ///     buf.push_back(i);
    /// }
    /// assert_eq!(&*buf, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push_back(&mut self, value: T) {
        if self.len == self.cap() {
            self.grow();
        }

        // SAFETY: There is at least one free slot, which is at index len and within the
        // allocation.
        unsafe { self.block.ptr.add(self.len).write(MaybeUninit::new(value)) }
        self.len += 1;
    }

    /// Removes the last value from the GrowableBuffer and returns it.
    ///
    /// # Panics
    /// Panics if the GrowableBuffer is empty. See [`try_pop_back`](GrowableBuffer::try_pop_back)
    /// for a non-panicking version.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<_> = (0..3).collect();
    /// assert_eq!(buf.pop_back(), 2);
    /// assert_eq!(buf.len(), 2);
    /// ```
    #[track_caller]
    pub fn pop_back(&mut self) -> T {
        self.try_pop_back().throw()
    }

    /// Removes the last value from the GrowableBuffer and returns it, or returns an
    /// [`EmptyContainer`] error if there is nothing to remove.
    ///
    /// # Errors
    /// Returns [`EmptyContainer`] if the GrowableBuffer has no elements.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<_> = (0..2).collect();
    /// assert_eq!(buf.try_pop_back(), Ok(1));
    /// assert_eq!(buf.try_pop_back(), Ok(0));
    /// assert!(buf.try_pop_back().is_err());
    /// ```
    pub const fn try_pop_back(&mut self) -> Result<T, EmptyContainer> {
        if self.len == 0 {
            return Err(EmptyContainer);
        }

        // Decrement len before reading.
        self.len -= 1;

        // SAFETY: The slot at the new len was initialized and is now outside of the live range,
        // so reading it moves the value out without it being dropped again.
        Ok(unsafe { self.block.ptr.add(self.len).read().assume_init() })
    }

    /// Returns a reference to the first element.
    ///
    /// # Panics
    /// Panics if the GrowableBuffer is empty.
    #[track_caller]
    pub fn front(&self) -> &T {
        self.try_front().throw()
    }

    /// Returns a reference to the last element.
    ///
    /// # Panics
    /// Panics if the GrowableBuffer is empty.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let buf: GrowableBuffer<_> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(*buf.front(), 1);
    /// assert_eq!(*buf.back(), 3);
    /// ```
    #[track_caller]
    pub fn back(&self) -> &T {
        self.try_back().throw()
    }

    /// Returns a mutable reference to the first element.
    ///
    /// # Panics
    /// Panics if the GrowableBuffer is empty.
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        self.first_mut().ok_or(EmptyContainer).throw()
    }

    /// Returns a mutable reference to the last element.
    ///
    /// # Panics
    /// Panics if the GrowableBuffer is empty.
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        self.last_mut().ok_or(EmptyContainer).throw()
    }

    /// Returns a reference to the first element, or an [`EmptyContainer`] error.
    ///
    /// # Errors
    /// Returns [`EmptyContainer`] if the GrowableBuffer has no elements.
    pub fn try_front(&self) -> Result<&T, EmptyContainer> {
        self.first().ok_or(EmptyContainer)
    }

    /// Returns a reference to the last element, or an [`EmptyContainer`] error.
    ///
    /// # Errors
    /// Returns [`EmptyContainer`] if the GrowableBuffer has no elements.
    pub fn try_back(&self) -> Result<&T, EmptyContainer> {
        self.last().ok_or(EmptyContainer)
    }

    /// Returns a pointer to the start of the allocation, or null if nothing is allocated. The
    /// pointer is only valid until the next reallocation and doesn't carry ownership.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf = GrowableBuffer::<u32>::new();
    /// assert!(buf.first_ptr().is_null());
    /// buf.push_back(7_u32);
    /// assert_eq!(unsafe { *buf.first_ptr() }, 7);
    /// ```
    pub const fn first_ptr(&self) -> *const T {
        if self.block.cap == 0 {
            ptr::null()
        } else {
            self.block.as_ptr().cast_const()
        }
    }

    /// Returns a pointer to the last element, or null if the GrowableBuffer is empty. Together with
    /// [`first_ptr`](GrowableBuffer::first_ptr) this forms an inclusive range over the elements.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let buf: GrowableBuffer<u32> = (1..=4).collect();
    /// let (first, last) = (buf.first_ptr(), buf.last_ptr());
    /// assert_eq!(unsafe { last.offset_from(first) }, 3);
    /// assert_eq!(unsafe { *last }, 4);
    /// ```
    pub const fn last_ptr(&self) -> *const T {
        if self.len == 0 {
            ptr::null()
        } else {
            // SAFETY: len - 1 is a live slot within the allocation.
            unsafe { self.block.as_ptr().add(self.len - 1).cast_const() }
        }
    }

    /// Returns a mutable pointer to the start of the allocation, or null if nothing is allocated.
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        if self.block.cap == 0 {
            ptr::null_mut()
        } else {
            self.block.as_ptr()
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let buf: GrowableBuffer<_> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(*buf.at(1), 2);
    /// ```
    #[track_caller]
    pub fn at(&self, index: usize) -> &T {
        self.get_checked(index).throw()
    }

    /// Returns a reference to the element at `index`, or an [`IndexOutOfBounds`] error.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn get_checked(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.get(index).ok_or(IndexOutOfBounds {
            index,
            len: self.len,
        })
    }

    /// Returns a reference to the element at `index` without checking bounds.
    ///
    /// # Safety
    /// `index` must be less than [`len`](GrowableBuffer::len). In debug builds this is asserted.
    pub unsafe fn at_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "unchecked access at {} with len {}", index, self.len);
        // SAFETY: The caller guarantees that index < len, so the slot is initialized.
        unsafe { self.block.ptr.add(index).as_ref().assume_init_ref() }
    }

    /// Returns a mutable reference to the element at `index` without checking bounds.
    ///
    /// # Safety
    /// `index` must be less than [`len`](GrowableBuffer::len). In debug builds this is asserted.
    pub unsafe fn at_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "unchecked access at {} with len {}", index, self.len);
        // SAFETY: The caller guarantees that index < len, so the slot is initialized, and the
        // mutable borrow of self makes this the only reference.
        unsafe { self.block.ptr.add(index).as_mut().assume_init_mut() }
    }

    /// Reallocates the GrowableBuffer to have a capacity of exactly `new_cap`, dropping any
    /// elements that don't fit. Resizing to zero releases the allocation entirely.
    ///
    /// # Panics
    /// Panics if the memory layout would exceed [`isize::MAX`] bytes. If the allocator fails,
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) is called.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<_> = (0..8).collect();
    /// buf.resize(3);
    /// assert_eq!(&*buf, &[0, 1, 2]);
    /// assert_eq!(buf.cap(), 3);
    ///
    /// buf.resize(0);
    /// assert_eq!(buf.len(), 0);
    /// assert!(buf.first_ptr().is_null());
    /// ```
    #[track_caller]
    pub fn resize(&mut self, new_cap: usize) {
        match self.try_resize(new_cap) {
            Ok(()) => (),
            Err(BufferError::AllocFailed(_)) => {
                // Layout was already validated by the failed attempt.
                let layout = RawBlock::<T>::make_layout(new_cap).throw();
                std::alloc::handle_alloc_error(layout)
            },
            Err(err) => Err::<(), _>(err).throw(),
        }
    }

    /// Fallible version of [`resize`](GrowableBuffer::resize). On error, the GrowableBuffer is
    /// left untouched.
    ///
    /// # Errors
    /// Returns [`BufferError::CapacityOverflow`] if the memory layout would exceed [`isize::MAX`]
    /// bytes and [`BufferError::AllocFailed`] if the global allocator couldn't provide the memory.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<u64> = (0..4).collect();
    /// assert!(buf.try_resize(usize::MAX).unwrap_err().is_capacity_overflow());
    /// assert_eq!(&*buf, &[0, 1, 2, 3]);
    /// ```
    pub fn try_resize(&mut self, new_cap: usize) -> Result<(), BufferError> {
        // SAFETY: len never exceeds the block's capacity and every slot below it is initialized.
        unsafe { self.block.relocate(&mut self.len, new_cap) }
    }

    /// Ensures that the GrowableBuffer has room for at least `extra` more elements. After calling
    /// this, the capacity will be >= len + extra. The capacity is set exactly, without consulting
    /// the [`GrowthPolicy`].
    ///
    /// # Panics
    /// Panics if `len + extra` overflows or the memory layout would exceed [`isize::MAX`] bytes.
    #[track_caller]
    pub fn reserve(&mut self, extra: usize) {
        let new_cap = self.len.checked_add(extra).ok_or(CapacityOverflow).throw();

        if new_cap <= self.cap() {
            return;
        }

        self.resize(new_cap);
    }

    /// Shrinks the GrowableBuffer so that its capacity is equal to its length.
    ///
    /// # Panics
    /// Only panics if the allocator fails, see [`resize`](GrowableBuffer::resize).
    pub fn shrink_to_fit(&mut self) {
        self.resize(self.len);
    }

    /// Drops every element, keeping the current allocation.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut buf: GrowableBuffer<_> = (0..12).collect();
    /// buf.clear();
    /// assert!(buf.is_empty());
    /// assert_eq!(buf.cap(), 15);
    /// ```
    pub fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);

        // SAFETY: All slots below the old len are initialized and, with len already reset, won't
        // be read or dropped again. If a drop panics, the rest are leaked.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.block.as_ptr(), len));
        }
    }

    /// Moves the contents out, leaving self as a fresh, unallocated GrowableBuffer with the same
    /// [`GrowthPolicy`].
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let mut a: GrowableBuffer<_> = (0..3).collect();
    /// let b = a.take();
    /// assert_eq!(&*b, &[0, 1, 2]);
    /// assert!(a.is_empty());
    /// assert_eq!(a.cap(), 0);
    /// ```
    pub const fn take(&mut self) -> GrowableBuffer<T> {
        mem::replace(self, Self::with_policy(self.policy))
    }

    /// Grows the allocation according to the [`GrowthPolicy`], so that at least one more element
    /// fits. If the policy asks for more than the maximum capacity for `T`, the maximum is used
    /// instead, as long as that's still growth.
    ///
    /// # Panics
    /// Panics if the GrowableBuffer is already at the maximum capacity for `T`.
    #[track_caller]
    pub(crate) fn grow(&mut self) {
        let old_cap = self.cap();
        let new_cap = self
            .policy
            .next_cap(old_cap)
            .map(|cap| cmp::min(cap, RawBlock::<T>::max_cap()))
            .filter(|&cap| cap > old_cap)
            .ok_or(CapacityOverflow)
            .throw();

        log::trace!("growing from {} to {} slots", old_cap, new_cap);
        self.resize(new_cap);
    }
}

impl<T: Clone> GrowableBuffer<T> {
    /// Creates a GrowableBuffer holding clones of every element of `values`, with capacity equal to
    /// their count.
    ///
    /// # Examples
    /// ```
    /// # use study_collections::collections::contiguous::GrowableBuffer;
    /// let buf = GrowableBuffer::from_slice(&["a", "b"]);
    /// assert_eq!(buf.cap(), 2);
    /// assert_eq!(&*buf, &["a", "b"]);
    /// ```
    pub fn from_slice(values: &[T]) -> GrowableBuffer<T> {
        let mut buf = Self::with_cap(values.len());
        buf.extend(values.iter().cloned());
        buf
    }
}

impl<T> Extend<T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for GrowableBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GrowableBuffer<T> {
    fn drop(&mut self) {
        // Drop the live values, the block then releases the memory itself.
        self.clear();
    }
}

impl<T> Deref for GrowableBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The block is valid and properly aligned for len initialized values, or dangling
        // and len is zero. The borrow checker prevents mutation while the slice lives.
        unsafe { slice::from_raw_parts(self.block.as_ptr().cast_const(), self.len) }
    }
}

impl<T> DerefMut for GrowableBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As with deref, and the mutable borrow of self makes the slice unique.
        unsafe { slice::from_raw_parts_mut(self.block.as_ptr(), self.len) }
    }
}

impl<T> Index<usize> for GrowableBuffer<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        self.at(index)
    }
}

impl<T> IndexMut<usize> for GrowableBuffer<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len;
        self.get_mut(index).ok_or(IndexOutOfBounds { index, len }).throw()
    }
}

impl<T> AsRef<[T]> for GrowableBuffer<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for GrowableBuffer<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for GrowableBuffer<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for GrowableBuffer<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone> Clone for GrowableBuffer<T> {
    /// Clones every element into a new GrowableBuffer with capacity tightened to the length of
    /// self. The [`GrowthPolicy`] is carried over.
    fn clone(&self) -> Self {
        let mut buf = Self::from_slice(self);
        buf.policy = self.policy;
        buf
    }
}

impl<T: PartialEq> PartialEq for GrowableBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for GrowableBuffer<T> {}

impl<T: Hash> Hash for GrowableBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug> Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("contents", &&**self)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug> Display for GrowableBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
