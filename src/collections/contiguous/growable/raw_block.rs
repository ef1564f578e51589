use std::alloc::{self, Layout};
use std::cmp;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};

use crate::util::error::{AllocFailed, BufferError, CapacityOverflow};

/// An exclusively owned block of `cap` uninitialized slots for values of type `T`.
///
/// RawBlock never drops the values it holds, that's up to the owner, which tracks how many of the
/// slots are initialized. Dropping a RawBlock only releases the allocation.
///
/// Every allocation and release made on behalf of a
/// [`GrowableBuffer`](super::GrowableBuffer) goes through this type, with
/// [`relocate`](RawBlock::relocate) being the one place where values change blocks.
pub(crate) struct RawBlock<T> {
    pub(crate) ptr: NonNull<MaybeUninit<T>>,
    pub(crate) cap: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> RawBlock<T> {
    /// Creates an unallocated block with no slots.
    pub(crate) const fn new() -> RawBlock<T> {
        RawBlock {
            ptr: NonNull::dangling(),
            cap: 0,
            _phantom: PhantomData,
        }
    }

    /// Allocates a block with exactly `cap` slots. A capacity of zero, or a zero-sized `T`, doesn't
    /// touch the allocator at all.
    ///
    /// # Errors
    /// Returns [`CapacityOverflow`] if the layout would exceed [`isize::MAX`] bytes and
    /// [`AllocFailed`] if the global allocator returns null.
    pub(crate) fn try_with_cap(cap: usize) -> Result<RawBlock<T>, BufferError> {
        let layout = Self::make_layout(cap)?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: Zero-sized layouts have been guarded against.
            let raw_ptr: *mut MaybeUninit<T> = unsafe { alloc::alloc(layout).cast() };
            NonNull::new(raw_ptr).ok_or(AllocFailed { cap })?
        };

        Ok(RawBlock {
            ptr,
            cap,
            _phantom: PhantomData,
        })
    }

    /// The largest number of slots a block of `T` can have.
    pub(crate) const fn max_cap() -> usize {
        match size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }

    /// A helper function to create a [`Layout`] for `cap` slots of `T`.
    pub(crate) fn make_layout(cap: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<MaybeUninit<T>>(cap).map_err(|_| CapacityOverflow)
    }

    pub(crate) const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr().cast()
    }

    /// Moves the values in slots `[0, min(len, new_cap))` into a freshly allocated block of exactly
    /// `new_cap` slots, drops any values that don't fit and then releases the old block. `len` is
    /// updated to the number of values kept.
    ///
    /// The new block is allocated before anything else happens, so on error both self and `len` are
    /// left exactly as they were.
    ///
    /// # Safety
    /// `len` must be no greater than `self.cap` and every slot below `len` must be initialized.
    ///
    /// # Errors
    /// See [`RawBlock::try_with_cap`].
    pub(crate) unsafe fn relocate(
        &mut self,
        len: &mut usize,
        new_cap: usize,
    ) -> Result<(), BufferError> {
        if new_cap == self.cap {
            return Ok(());
        }

        let fresh = RawBlock::<T>::try_with_cap(new_cap)?;
        let kept = cmp::min(*len, new_cap);

        // SAFETY: Both blocks are valid for at least `kept` slots and are separate allocations, or
        // dangling with T being zero-sized. Rust values are always safe to move with a bitwise
        // copy, as long as the source isn't used again, which is ensured by only dropping the old
        // slots at or above kept.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr().cast_const(), fresh.ptr.as_ptr(), kept);
        }

        let old = mem::replace(self, fresh);
        let old_len = mem::replace(len, kept);

        if old_len > kept {
            log::debug!("dropping {} values that don't fit in {} slots", old_len - kept, new_cap);
        }
        for i in kept..old_len {
            // SAFETY: Slots between kept and old_len are initialized and haven't been copied into
            // the new block, so this is their only drop. If a drop panics, old is still released
            // and the remaining values are leaked rather than double dropped.
            unsafe { ptr::drop_in_place(old.ptr.add(i).as_ptr().cast::<T>()) }
        }

        log::trace!("relocated {} values from {} to {} slots", kept, old.cap, new_cap);
        Ok(())
    }
}

impl<T> Drop for RawBlock<T> {
    fn drop(&mut self) {
        // A RawBlock only ever exists with a layout that has already been validated.
        let Ok(layout) = Self::make_layout(self.cap) else {
            return;
        };

        if layout.size() != 0 {
            // SAFETY: ptr is always allocated in the global allocator and layout is the same as
            // when allocated. Zero-sized layouts aren't allocated and are guarded against
            // deallocation.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

// SAFETY: RawBlocks are unique owners of their allocation, so they are safe to Send when T: Send.
unsafe impl<T: Send> Send for RawBlock<T> {}
// SAFETY: RawBlock exposes no interior mutability, so it can be Sync when T: Sync.
unsafe impl<T: Sync> Sync for RawBlock<T> {}
