#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A bump allocator over a caller-supplied byte buffer.
///
/// Allocation aligns the cursor up, then advances it by the requested size.
/// When the rest of the buffer cannot satisfy a request the allocation fails
/// and the cursor is left untouched. Nothing is ever freed individually; the
/// whole buffer is released when the borrow `'a` ends.
///
/// # Examples
///
/// ```
/// use std::alloc::Layout;
///
/// let mut buffer = [0u8; 64];
/// let arena = fld::Arena::new(&mut buffer);
/// assert!(arena.alloc(Layout::new::<u64>()).is_some());
/// assert!(arena.alloc(Layout::from_size_align(128, 1).unwrap()).is_none());
/// assert_eq!(arena.used(), 8);
/// ```
pub struct Arena<'a> {
    start: NonNull<u8>,
    end: NonNull<u8>,
    ptr: Cell<NonNull<u8>>,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> Arena<'a> {
    /// Creates an arena that hands out memory from `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let range = buffer.as_mut_ptr_range();
        // Safety: slice pointers are never null, even for empty slices.
        let (start, end) = unsafe {
            (
                NonNull::new_unchecked(range.start),
                NonNull::new_unchecked(range.end),
            )
        };
        Arena {
            start,
            end,
            ptr: Cell::new(start),
            _marker: PhantomData,
        }
    }

    /// Allocate `layout.size()` bytes with the given alignment.
    ///
    /// Returns `None` if the remaining range cannot hold the request.
    #[inline]
    pub fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.ptr.get();
        let addr = ptr.as_ptr() as usize;
        let aligned = addr.checked_add(layout.align() - 1)? & !(layout.align() - 1);
        let new_addr = aligned.checked_add(layout.size())?;

        if new_addr > self.end.as_ptr() as usize {
            return None;
        }

        // Safety: aligned..new_addr lies within start..=end, so offsetting the
        // current pointer keeps the original buffer's provenance.
        unsafe {
            let out = ptr.as_ptr().add(aligned - addr);
            self.ptr.set(NonNull::new_unchecked(out.add(layout.size())));
            Some(NonNull::new_unchecked(out))
        }
    }

    /// Moves `value` into the arena.
    pub(crate) fn alloc_value<T>(&self, value: T) -> Option<NonNull<T>> {
        debug_assert!(!std::mem::needs_drop::<T>());
        let ptr = self.alloc(Layout::new::<T>())?.cast::<T>();
        // Safety: the region is freshly carved, sized and aligned for T.
        unsafe { ptr.as_ptr().write(value) };
        Some(ptr)
    }

    /// Reserves room for `len` contiguous values of `T` without initializing
    /// them.
    pub(crate) fn alloc_uninit_slice<T>(&self, len: usize) -> Option<NonNull<T>> {
        let layout = Layout::array::<T>(len).ok()?;
        Some(self.alloc(layout)?.cast::<T>())
    }

    /// Copies `text` plus a trailing NUL byte into the arena.
    ///
    /// The returned slice includes the terminator.
    pub(crate) fn alloc_source(&self, text: &str) -> Option<&'a [u8]> {
        let len = text.len().checked_add(1)?;
        let ptr = self.alloc_uninit_slice::<u8>(len)?;
        // Safety: ptr is valid for `len` bytes and does not overlap `text`,
        // which lives outside the arena buffer borrowed for 'a.
        unsafe {
            std::ptr::copy_nonoverlapping(text.as_ptr(), ptr.as_ptr(), text.len());
            ptr.as_ptr().add(text.len()).write(0);
            Some(std::slice::from_raw_parts(ptr.as_ptr(), len))
        }
    }

    /// Total size of the underlying buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.end.as_ptr() as usize - self.start.as_ptr() as usize
    }

    /// Bytes consumed so far, alignment padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.ptr.get().as_ptr() as usize - self.start.as_ptr() as usize
    }

    /// Bytes still available before alignment is taken into account.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end.as_ptr() as usize - self.ptr.get().as_ptr() as usize
    }
}

impl std::fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .finish()
    }
}

#[cfg(test)]
#[path = "./arena_tests.rs"]
mod tests;
