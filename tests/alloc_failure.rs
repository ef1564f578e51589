use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

use study_collections::collections::contiguous::GrowableBuffer;
use study_collections::error::{AllocFailed, BufferError};

/// Forwards to the system allocator, except on threads that have asked for allocations to fail.
struct FlakyAllocator;

thread_local! {
    static FAIL_ALLOCS: Cell<bool> = const { Cell::new(false) };
}

fn should_fail() -> bool {
    FAIL_ALLOCS.try_with(Cell::get).unwrap_or(false)
}

// SAFETY: Every request is either refused with null or forwarded unchanged to System.
unsafe impl GlobalAlloc for FlakyAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if should_fail() {
            return ptr::null_mut();
        }
        // SAFETY: The caller upholds GlobalAlloc's contract, which System shares.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: ptr was allocated by System through this allocator with the same layout.
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if should_fail() {
            return ptr::null_mut();
        }
        // SAFETY: As with dealloc, the block and layout came from System.
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOCATOR: FlakyAllocator = FlakyAllocator;

/// Runs `f` with every allocation on the current thread failing.
fn with_failing_allocs<R>(f: impl FnOnce() -> R) -> R {
    FAIL_ALLOCS.with(|fail| fail.set(true));
    let result = f();
    FAIL_ALLOCS.with(|fail| fail.set(false));
    result
}

#[test]
fn failed_growth_leaves_buffer_intact() {
    let mut buf: GrowableBuffer<u64> = (0..4).collect();
    let old_ptr = buf.first_ptr();

    let result = with_failing_allocs(|| buf.try_resize(100));

    assert_eq!(result, Err(BufferError::AllocFailed(AllocFailed { cap: 100 })));
    assert_eq!(result.unwrap_err().to_string(), "Allocation of 100 slots failed!");
    assert_eq!(buf.first_ptr(), old_ptr, "The old block should still be in use.");
    assert_eq!(buf.cap(), 10);
    assert_eq!(&*buf, &[0, 1, 2, 3]);

    buf.resize(100);
    assert_eq!(buf.cap(), 100, "The buffer should still grow once memory is available.");
    assert_eq!(&*buf, &[0, 1, 2, 3]);
}

#[test]
fn failed_shrink_keeps_every_element() {
    let mut buf: GrowableBuffer<String> = (0..6).map(|i| i.to_string()).collect();

    let result = with_failing_allocs(|| buf.try_resize(2));

    assert!(result.is_err_and(|err| err.is_alloc_failed()));
    assert_eq!(buf.len(), 6, "Nothing should be dropped before the new block exists.");
    assert_eq!(buf.cap(), 10);
    assert_eq!(*buf.back(), "5");
}

#[test]
fn operations_without_allocation_still_work() {
    let mut buf: GrowableBuffer<u32> = GrowableBuffer::with_cap(3);

    // Nothing inside may panic, reporting the panic would need an allocation.
    let (popped, same_cap, released) = with_failing_allocs(|| {
        buf.push_back(1);
        buf.push_back(2);
        (buf.try_pop_back(), buf.try_resize(3), buf.try_resize(0))
    });

    assert_eq!(popped, Ok(2));
    assert_eq!(same_cap, Ok(()), "Resizing to the current capacity shouldn't allocate.");
    assert_eq!(released, Ok(()), "Releasing the block shouldn't allocate.");
    assert_eq!(buf.cap(), 0);
    assert!(buf.first_ptr().is_null());
}
