#![allow(unsafe_code)]

use crate::{Arena, Str, Value, ValueKind};
use std::alloc::Layout;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Maximum number of elements in a single array literal.
pub const MAX_ARRAY_ITEMS: usize = 128;

/// A homogeneous array of scalars packed into the arena.
///
/// Items are stored densely by element kind: `i64` for ints, `f64` for
/// floats, `bool` for booleans and [`Str`] for strings. The typed views
/// (`as_ints`, `as_floats`, ...) borrow that storage directly.
///
/// # Examples
///
/// ```
/// let src = "primes = [2, 3, 5, 7];";
/// let mut memory = vec![0u8; fld::estimate_memory(src)];
/// let doc = fld::parse(src, &mut memory)?;
/// let primes = doc.root().get_array("primes").unwrap();
///
/// assert_eq!(primes.kind(), fld::ValueKind::Int);
/// assert_eq!(primes.as_ints(), Some(&[2, 3, 5, 7][..]));
/// assert_eq!(primes.as_floats(), None);
/// # Ok::<(), fld::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct Array<'a> {
    kind: ValueKind,
    len: u32,
    items: NonNull<u8>,
    _marker: PhantomData<&'a [u8]>,
}

// SAFETY: items are immutable once the array is built and only hold
// Send + Sync data (numbers, bools, `Str`).
unsafe impl Send for Array<'_> {}
unsafe impl Sync for Array<'_> {}

impl<'a> Array<'a> {
    /// The array written as `[]`.
    pub(crate) const EMPTY: Array<'static> = Array {
        kind: ValueKind::Empty,
        len: 0,
        items: NonNull::dangling(),
        _marker: PhantomData,
    };

    /// Kind shared by every element. `Empty` for `[]`.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn typed<T>(&self, kind: ValueKind) -> Option<&'a [T]> {
        if self.len == 0 {
            return Some(&[]);
        }
        if self.kind != kind {
            return None;
        }
        // SAFETY: a non-empty array of `kind` was built by `ArrayBuf` with
        // `len` initialized elements of the matching layout.
        Some(unsafe { std::slice::from_raw_parts(self.items.cast::<T>().as_ptr(), self.len()) })
    }

    /// The items as integers. Empty arrays give an empty slice.
    #[inline]
    pub fn as_ints(&self) -> Option<&'a [i64]> {
        self.typed(ValueKind::Int)
    }

    #[inline]
    pub fn as_floats(&self) -> Option<&'a [f64]> {
        self.typed(ValueKind::Float)
    }

    #[inline]
    pub fn as_bools(&self) -> Option<&'a [bool]> {
        self.typed(ValueKind::Bool)
    }

    #[inline]
    pub fn as_strs(&self) -> Option<&'a [Str<'a>]> {
        self.typed(ValueKind::String)
    }

    /// Returns the element at `index` as a [`Value`].
    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        if index >= self.len() {
            return None;
        }
        match self.kind {
            ValueKind::Int => self.as_ints().map(|items| Value::Int(items[index])),
            ValueKind::Float => self.as_floats().map(|items| Value::Float(items[index])),
            ValueKind::Bool => self.as_bools().map(|items| Value::Bool(items[index])),
            ValueKind::String => self.as_strs().map(|items| Value::String(items[index])),
            _ => None,
        }
    }

    /// Returns an iterator over the elements as [`Value`]s.
    #[inline]
    pub fn iter(&self) -> ArrayIter<'a> {
        ArrayIter {
            array: *self,
            index: 0,
        }
    }
}

impl std::fmt::Debug for Array<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for Array<'a> {
    type Item = Value<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Array<'a> {
    type Item = Value<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`Array`].
#[derive(Clone)]
pub struct ArrayIter<'a> {
    array: Array<'a>,
    index: usize,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Value<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.array.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArrayIter<'_> {}

/// Storage layout of one element of the given kind, for scalar kinds only.
pub(crate) fn element_layout(kind: ValueKind) -> Option<Layout> {
    match kind {
        ValueKind::Int => Some(Layout::new::<i64>()),
        ValueKind::Float => Some(Layout::new::<f64>()),
        ValueKind::Bool => Some(Layout::new::<bool>()),
        ValueKind::String => Some(Layout::new::<Str<'static>>()),
        _ => None,
    }
}

/// Fixed-capacity packed buffer filled during the second array pass.
pub(crate) struct ArrayBuf<'a> {
    kind: ValueKind,
    items: NonNull<u8>,
    len: usize,
    cap: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> ArrayBuf<'a> {
    /// Reserves room for `cap` elements of `kind`. `None` when the arena is
    /// exhausted or `kind` is not a scalar.
    pub(crate) fn alloc(arena: &Arena<'a>, kind: ValueKind, cap: usize) -> Option<Self> {
        let element = element_layout(kind)?;
        let size = element.size().checked_mul(cap)?;
        let layout = Layout::from_size_align(size, element.align()).ok()?;
        let items = arena.alloc(layout)?;
        Some(ArrayBuf {
            kind,
            items,
            len: 0,
            cap,
            _marker: PhantomData,
        })
    }

    /// Appends `value`. Returns `false` without writing when the kind
    /// differs from the buffer's kind or the buffer is full.
    pub(crate) fn push(&mut self, value: Value<'a>) -> bool {
        if self.len == self.cap {
            return false;
        }
        // SAFETY: len < cap, and `alloc` sized the buffer for `cap` elements
        // of the layout matching `self.kind`.
        unsafe {
            match (self.kind, value) {
                (ValueKind::Int, Value::Int(v)) => self.write(v),
                (ValueKind::Float, Value::Float(v)) => self.write(v),
                (ValueKind::Bool, Value::Bool(v)) => self.write(v),
                (ValueKind::String, Value::String(v)) => self.write(v),
                _ => return false,
            }
        }
        self.len += 1;
        true
    }

    #[inline]
    unsafe fn write<T>(&mut self, value: T) {
        unsafe { self.items.cast::<T>().as_ptr().add(self.len).write(value) }
    }

    pub(crate) fn finish(self) -> Array<'a> {
        debug_assert_eq!(self.len, self.cap);
        Array {
            kind: self.kind,
            len: self.len as u32,
            items: self.items,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;
