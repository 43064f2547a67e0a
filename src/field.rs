#![allow(unsafe_code)]

//! Field nodes and the linked lists that make up objects.

use crate::{Array, FieldIter, IterMode, Str, Value, ValueKind, Vector};
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Maximum length in bytes of a dotted path, for both lookup and
/// [`Field::path_into`].
pub const MAX_PATH_LENGTH: usize = 128;

/// A `key = value;` entry.
///
/// Fields live in the arena. Siblings are chained through `next` in source
/// order and every field records the field whose object value contains it,
/// so a path can be rebuilt from any node.
pub struct Field<'a> {
    key: Str<'a>,
    value: Value<'a>,
    next: Option<NonNull<Field<'a>>>,
    parent: Option<NonNull<Field<'a>>>,
}

// SAFETY: fields are never mutated once the parse returns, and the links
// only point at other fields in the same arena.
unsafe impl Send for Field<'_> {}
unsafe impl Sync for Field<'_> {}

impl<'a> Field<'a> {
    /// A field with no value yet. The parser fills the value in once it has
    /// been parsed and links `next` when the following sibling is known.
    #[inline]
    pub(crate) fn new(key: Str<'a>, parent: Option<NonNull<Field<'a>>>) -> Self {
        Field {
            key,
            value: Value::Empty,
            next: None,
            parent,
        }
    }

    /// Writes the value of a field that is still under construction.
    ///
    /// # Safety
    ///
    /// `this` must point to a live field with no outstanding references.
    #[inline]
    pub(crate) unsafe fn set_value(this: NonNull<Field<'a>>, value: Value<'a>) {
        unsafe { (*this.as_ptr()).value = value }
    }

    /// Links `next` after `this`.
    ///
    /// # Safety
    ///
    /// Same as [`Field::set_value`].
    #[inline]
    pub(crate) unsafe fn set_next(this: NonNull<Field<'a>>, next: NonNull<Field<'a>>) {
        unsafe { (*this.as_ptr()).next = Some(next) }
    }

    #[inline]
    pub fn key(&self) -> Str<'a> {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// The next sibling, in source order.
    #[inline]
    pub fn next(&self) -> Option<&'a Field<'a>> {
        // SAFETY: links point at fields in the arena, alive for 'a.
        self.next.map(|p| unsafe { p.as_ref() })
    }

    /// The field whose object holds this one. `None` at the top level.
    #[inline]
    pub fn parent(&self) -> Option<&'a Field<'a>> {
        // SAFETY: as for `next`.
        self.parent.map(|p| unsafe { p.as_ref() })
    }

    /// The children if the value is an object, otherwise an empty list.
    #[inline]
    pub fn children(&self) -> Fields<'a> {
        self.value.as_object().unwrap_or_default()
    }

    /// Number of enclosing objects.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.parent();
        while let Some(p) = cur {
            depth += 1;
            cur = p.parent();
        }
        depth
    }

    /// Writes the dotted path from the top level down to this field.
    pub fn write_path<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        // Top-down without recursion; the parser bounds the depth.
        let depth = self.depth();
        for up in (0..=depth).rev() {
            let mut field = self;
            for _ in 0..up {
                match field.parent() {
                    Some(parent) => field = parent,
                    None => break,
                }
            }
            if up != depth {
                out.write_char('.')?;
            }
            out.write_str(&field.key)?;
        }
        Ok(())
    }

    /// The dotted path from the top level down to this field.
    ///
    /// ```
    /// let src = "outer = { inner = { value = 123; }; };";
    /// let mut memory = vec![0u8; fld::estimate_memory(src)];
    /// let doc = fld::parse(src, &mut memory)?;
    /// let field = doc.root().get_path("outer.inner.value").unwrap();
    /// assert_eq!(field.path(), "outer.inner.value");
    /// # Ok::<(), fld::Error>(())
    /// ```
    pub fn path(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_path(&mut out);
        out
    }

    /// Writes the dotted path into `buf` without allocating.
    ///
    /// Returns `None` when the path is longer than [`MAX_PATH_LENGTH`] or
    /// does not fit in `buf`.
    pub fn path_into<'b>(&self, buf: &'b mut [u8]) -> Option<&'b str> {
        let limit = buf.len().min(MAX_PATH_LENGTH);
        let mut writer = SliceWriter {
            buf: &mut buf[..limit],
            len: 0,
        };
        if self.write_path(&mut writer).is_err() {
            return None;
        }
        let len = writer.len;
        std::str::from_utf8(&buf[..len]).ok()
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

struct SliceWriter<'b> {
    buf: &'b mut [u8],
    len: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// A list of sibling fields: the top level of a document or the contents
/// of an object.
///
/// Lookups are linear scans in source order. Duplicate keys are kept; the
/// first one wins.
///
/// The typed getters take a dotted path and never convert between kinds:
/// an `Int` is not returned by [`get_float`](Fields::get_float).
#[derive(Clone, Copy, Default)]
pub struct Fields<'a> {
    head: Option<NonNull<Field<'a>>>,
    _marker: PhantomData<&'a Field<'a>>,
}

// SAFETY: see `Field`.
unsafe impl Send for Fields<'_> {}
unsafe impl Sync for Fields<'_> {}

impl<'a> Fields<'a> {
    #[inline]
    pub(crate) fn from_head(head: Option<NonNull<Field<'a>>>) -> Self {
        Fields {
            head,
            _marker: PhantomData,
        }
    }

    /// The first field, if any.
    #[inline]
    pub fn first(&self) -> Option<&'a Field<'a>> {
        // SAFETY: the head points at a field in the arena, alive for 'a.
        self.head.map(|p| unsafe { p.as_ref() })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of fields at this level. Walks the list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over the fields at this level.
    #[inline]
    pub fn iter(&self) -> FieldIter<'a> {
        FieldIter::new(*self, IterMode::Fields)
    }

    /// Iterates over every field below this level in pre-order.
    #[inline]
    pub fn iter_recursive(&self) -> FieldIter<'a> {
        FieldIter::new(*self, IterMode::Recursive)
    }

    /// Finds the first field at this level named `key`.
    pub fn get(&self, key: &str) -> Option<&'a Field<'a>> {
        self.iter().find(|field| field.key == *key)
    }

    /// Follows a dotted path such as `"outer.inner.value"`.
    ///
    /// Every component but the last must name an object. Empty paths, empty
    /// components and paths longer than [`MAX_PATH_LENGTH`] find nothing.
    pub fn get_path(&self, path: &str) -> Option<&'a Field<'a>> {
        if path.is_empty() || path.len() > MAX_PATH_LENGTH {
            return None;
        }
        let mut components = path.split('.');
        let mut field = self.get(components.next()?)?;
        for component in components {
            let Value::Object(children) = field.value else {
                return None;
            };
            field = children.get(component)?;
        }
        Some(field)
    }

    #[inline]
    pub fn get_value(&self, path: &str) -> Option<&'a Value<'a>> {
        self.get_path(path).map(|field| &field.value)
    }

    #[inline]
    pub fn has_field(&self, path: &str) -> bool {
        self.get_path(path).is_some()
    }

    /// Kind of the value at `path`, `Empty` when there is none.
    #[inline]
    pub fn kind_of(&self, path: &str) -> ValueKind {
        self.get_path(path)
            .map_or(ValueKind::Empty, |field| field.kind())
    }

    #[inline]
    pub fn get_str(&self, path: &str) -> Option<Str<'a>> {
        self.get_value(path)?.as_str()
    }

    #[inline]
    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get_value(path)?.as_int()
    }

    #[inline]
    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get_value(path)?.as_float()
    }

    #[inline]
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_value(path)?.as_bool()
    }

    #[inline]
    pub fn get_array(&self, path: &str) -> Option<Array<'a>> {
        self.get_value(path)?.as_array()
    }

    /// Number of items of the array at `path`.
    #[inline]
    pub fn array_len(&self, path: &str) -> Option<usize> {
        self.get_array(path).map(|array| array.len())
    }

    #[inline]
    pub fn get_object(&self, path: &str) -> Option<Fields<'a>> {
        self.get_value(path)?.as_object()
    }

    #[inline]
    pub fn get_vector(&self, path: &str) -> Option<Vector> {
        self.get_value(path)?.as_vector()
    }

    #[inline]
    pub fn get_vec2(&self, path: &str) -> Option<[f32; 2]> {
        self.get_value(path)?.as_vec2()
    }

    #[inline]
    pub fn get_vec3(&self, path: &str) -> Option<[f32; 3]> {
        self.get_value(path)?.as_vec3()
    }

    #[inline]
    pub fn get_vec4(&self, path: &str) -> Option<[f32; 4]> {
        self.get_value(path)?.as_vec4()
    }

    /// The first `count` components of the vector at `path`, whatever its
    /// declared arity, provided it has at least that many.
    pub fn get_vec_components(&self, path: &str, count: usize) -> Option<&'a [f32]> {
        match self.get_value(path)? {
            Value::Vector(v) => v.components().get(..count),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for Fields<'a> {
    type Item = &'a Field<'a>;
    type IntoIter = FieldIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Fields<'a> {
    type Item = &'a Field<'a>;
    type IntoIter = FieldIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|field| (field.key, field.value)))
            .finish()
    }
}

#[cfg(test)]
#[path = "./field_tests.rs"]
mod tests;
