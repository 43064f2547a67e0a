//! Source locations.

#[cfg(test)]
#[path = "./span_tests.rs"]
mod tests;

/// Byte range of a token in the source text, end exclusive.
///
/// Offsets index the text given to [`parse`](crate::parse), which is also
/// [`Document::source`](crate::Document::source). String payload spans
/// exclude the quotes.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Offsets into a parsed source, which `parse` caps at
    /// [`MAX_SOURCE_LEN`](crate::MAX_SOURCE_LEN).
    #[inline]
    pub(crate) fn from_offsets(start: usize, end: usize) -> Self {
        debug_assert!(end <= crate::MAX_SOURCE_LEN);
        Self::new(start as u32, end as u32)
    }

    /// Covers no bytes. Errors at the end of input have empty spans.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// Whether the byte at `offset` lies inside the span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The covered slice of `source`, or `None` when the span does not fit
    /// it.
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start as usize..self.end as usize)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(s: Span) -> Self {
        s.start as usize..s.end as usize
    }
}
