#![allow(unsafe_code)]

//! Keys and string values as views into the arena copy of the source.

use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

/// Text of a key or string value.
///
/// A `(ptr, len)` pair pointing into the copy of the source held by the
/// arena, never into the caller's string, so it stays valid after that
/// string is dropped. Strings have no escape sequences, so the view is the
/// exact text between the quotes.
#[derive(Copy, Clone)]
pub struct Str<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _marker: PhantomData<&'a str>,
}

const _: () = assert!(std::mem::size_of::<Str<'_>>() == 16);

// SAFETY: a shared view of immutable UTF-8 bytes.
unsafe impl Send for Str<'_> {}
unsafe impl Sync for Str<'_> {}

impl<'a> Str<'a> {
    #[inline]
    pub(crate) fn from_borrowed(s: &'a str) -> Self {
        // SAFETY: a `&str` pointer is never null, even when empty.
        let ptr = unsafe { NonNull::new_unchecked(s.as_ptr() as *mut u8) };
        Self {
            ptr,
            len: s.len(),
            _marker: PhantomData,
        }
    }

    /// The text, with the full arena lifetime rather than the lifetime of
    /// this `Str`.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        // Safety: ptr/len were taken from a `&'a str`.
        unsafe {
            std::str::from_utf8_unchecked(std::slice::from_raw_parts(self.ptr.as_ptr(), self.len))
        }
    }

    /// Pointer and length, for locating the text inside the source copy.
    #[inline]
    pub(crate) fn as_raw_parts(&self) -> (NonNull<u8>, usize) {
        (self.ptr, self.len)
    }

    /// Copies the bytes into `buffer` followed by a NUL terminator.
    ///
    /// Returns `None` when `buffer` cannot hold the text plus terminator.
    /// Parsed strings never contain NUL, since a NUL byte ends the input.
    ///
    /// ```
    /// let mut memory = vec![0u8; fld::estimate_memory("name = \"fld\";")];
    /// let doc = fld::parse("name = \"fld\";", &mut memory)?;
    /// let name = doc.root().get_str("name").unwrap();
    ///
    /// let mut buf = [0u8; 8];
    /// assert_eq!(name.copy_to_cstr(&mut buf).unwrap().to_bytes(), b"fld");
    /// assert!(name.copy_to_cstr(&mut [0u8; 3]).is_none());
    /// # Ok::<(), fld::Error>(())
    /// ```
    pub fn copy_to_cstr<'b>(&self, buffer: &'b mut [u8]) -> Option<&'b CStr> {
        if buffer.len() <= self.len {
            return None;
        }
        buffer[..self.len].copy_from_slice(self.as_bytes());
        buffer[self.len] = 0;
        CStr::from_bytes_with_nul(&buffer[..=self.len]).ok()
    }
}

impl Deref for Str<'_> {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Str<'_> {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for Str<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Str<'_> {}

impl PartialEq<str> for Str<'_> {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Str<'_> {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<'a> From<&'a str> for Str<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::from_borrowed(s)
    }
}

impl From<Str<'_>> for String {
    #[inline]
    fn from(s: Str<'_>) -> Self {
        s.as_str().to_owned()
    }
}

#[cfg(test)]
#[path = "./str_tests.rs"]
mod tests;
