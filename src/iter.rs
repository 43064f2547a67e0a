use crate::{Field, Fields};

/// How a [`FieldIter`] walks the tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IterMode {
    /// Only the fields of the starting level.
    Fields,
    /// Every field in pre-order: an object field, then its children, then
    /// its following siblings.
    Recursive,
}

/// Iterator over the fields of a [`Fields`] list.
///
/// In recursive mode the walk descends into object values and climbs back
/// up through parent links, never above the level it started at.
///
/// ```
/// use fld::{FieldIter, IterMode};
///
/// let src = "a = 1; obj = { x = 2; y = { z = 3; }; }; b = 4;";
/// let mut memory = vec![0u8; fld::estimate_memory(src)];
/// let doc = fld::parse(src, &mut memory)?;
///
/// let keys: Vec<String> = FieldIter::new(doc.root(), IterMode::Recursive)
///     .map(|field| field.path())
///     .collect();
/// assert_eq!(keys, ["a", "obj", "obj.x", "obj.y", "obj.y.z", "b"]);
/// assert_eq!(doc.root().iter().count(), 3);
/// # Ok::<(), fld::Error>(())
/// ```
#[derive(Clone)]
pub struct FieldIter<'a> {
    next: Option<&'a Field<'a>>,
    last: Option<&'a Field<'a>>,
    mode: IterMode,
    depth: usize,
}

impl<'a> FieldIter<'a> {
    pub fn new(fields: Fields<'a>, mode: IterMode) -> Self {
        FieldIter {
            next: fields.first(),
            last: None,
            mode,
            depth: 0,
        }
    }

    #[inline]
    pub fn mode(&self) -> IterMode {
        self.mode
    }

    /// Nesting depth of the next field to be yielded, relative to the
    /// starting level.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The field most recently yielded.
    #[inline]
    pub fn current(&self) -> Option<&'a Field<'a>> {
        self.last
    }

    /// Dotted path of the field most recently yielded.
    pub fn path_of_last(&self) -> Option<String> {
        self.last.map(Field::path)
    }

    fn advance_recursive(&mut self, field: &'a Field<'a>) {
        if let Some(child) = field.children().first() {
            self.depth += 1;
            self.next = Some(child);
            return;
        }
        let mut cur = field;
        loop {
            if let Some(sibling) = cur.next() {
                self.next = Some(sibling);
                return;
            }
            if self.depth == 0 {
                break;
            }
            match cur.parent() {
                Some(parent) => {
                    self.depth -= 1;
                    cur = parent;
                }
                None => break,
            }
        }
        self.next = None;
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = &'a Field<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.next?;
        self.last = Some(field);
        match self.mode {
            IterMode::Fields => self.next = field.next(),
            IterMode::Recursive => self.advance_recursive(field),
        }
        Some(field)
    }
}

impl std::iter::FusedIterator for FieldIter<'_> {}

#[cfg(test)]
#[path = "./iter_tests.rs"]
mod tests;
