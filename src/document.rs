use crate::{Fields, Span, Str};
use std::ops::Deref;

/// A parsed FLD document.
///
/// Owns nothing itself: the fields, packed arrays and the copy of the source
/// text all live in the buffer passed to [`parse`](crate::parse), which stays
/// borrowed for `'a`. Dereferences to the top-level [`Fields`], so every
/// lookup and typed getter is available directly.
///
/// ```
/// let src = "name = \"demo\"; size = vec2(640, 480);";
/// let mut memory = vec![0u8; fld::estimate_memory(src)];
/// let doc = fld::parse(src, &mut memory)?;
///
/// assert_eq!(doc.get_str("name").unwrap(), "demo");
/// assert_eq!(doc.get_vec2("size"), Some([640.0, 480.0]));
/// assert!(doc.bytes_used() <= doc.capacity());
/// # Ok::<(), fld::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct Document<'a> {
    root: Fields<'a>,
    source: &'a str,
    bytes_used: usize,
    capacity: usize,
}

impl<'a> Document<'a> {
    pub(crate) fn new(
        root: Fields<'a>,
        source: &'a str,
        bytes_used: usize,
        capacity: usize,
    ) -> Self {
        Document {
            root,
            source,
            bytes_used,
            capacity,
        }
    }

    /// The top-level fields.
    #[inline]
    pub fn root(&self) -> Fields<'a> {
        self.root
    }

    /// The arena copy of the source text, without the NUL terminator.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Bytes of the caller's buffer consumed by the parse, padding included.
    #[inline]
    pub fn bytes_used(&self) -> usize {
        self.bytes_used
    }

    /// Size of the caller's buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Byte range of a key or string value within [`source`](Self::source).
    ///
    /// Returns `None` for strings that do not point into this document.
    pub fn span_of(&self, s: Str<'_>) -> Option<Span> {
        let (ptr, len) = s.as_raw_parts();
        let base = self.source.as_ptr() as usize;
        let start = (ptr.as_ptr() as usize).checked_sub(base)?;
        let end = start.checked_add(len)?;
        if end > self.source.len() {
            return None;
        }
        Some(Span::from_offsets(start, end))
    }
}

impl<'a> Deref for Document<'a> {
    type Target = Fields<'a>;

    #[inline]
    fn deref(&self) -> &Fields<'a> {
        &self.root
    }
}

impl std::fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.root.fmt(f)
    }
}
