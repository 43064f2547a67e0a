//! Tagged values produced by the parser.

use crate::{Array, Fields, Str};
use std::fmt;

/// The kind of a [`Value`], also used as the element kind of an [`Array`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum ValueKind {
    /// No value. Reported for missing fields and as the element kind of `[]`.
    Empty,
    String,
    Int,
    Float,
    Bool,
    Array,
    Vec2,
    Vec3,
    Vec4,
    Object,
}

impl ValueKind {
    /// Lower-case name, as used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Object => "object",
        }
    }

    /// Kind of a vector with the given number of components.
    pub fn vector(arity: usize) -> Option<ValueKind> {
        match arity {
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            _ => None,
        }
    }

    /// Kinds an [`Array`] may hold.
    #[inline]
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::String | Self::Int | Self::Float | Self::Bool)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `vec2`, `vec3` or `vec4` literal.
///
/// Components are stored as four `f32` regardless of arity; unused trailing
/// components are zero.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Vector {
    components: [f32; 4],
    arity: u8,
}

impl Vector {
    pub(crate) fn new(components: [f32; 4], arity: u8) -> Vector {
        debug_assert!((2..=4).contains(&arity));
        Vector { components, arity }
    }

    /// Number of declared components, 2 to 4.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity as usize
    }

    /// The declared components.
    #[inline]
    pub fn components(&self) -> &[f32] {
        &self.components[..self.arity as usize]
    }

    /// All four storage slots, zero padded.
    #[inline]
    pub fn raw(&self) -> [f32; 4] {
        self.components
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        ValueKind::vector(self.arity()).unwrap_or(ValueKind::Vec4)
    }

    /// The first `N` components, if the vector declares exactly `N`.
    #[inline]
    pub fn to_array<const N: usize>(&self) -> Option<[f32; N]> {
        if N != self.arity as usize {
            return None;
        }
        let mut out = [0.0; N];
        out.copy_from_slice(&self.components[..N]);
        Some(out)
    }
}

/// A parsed value.
///
/// Values are small and `Copy`; strings, array items and object children
/// live in the arena and are borrowed for `'a`.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    Empty,
    String(Str<'a>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Array<'a>),
    Vector(Vector),
    /// Children of an object, in source order.
    Object(Fields<'a>),
}

impl<'a> Value<'a> {
    /// Gets the kind of the value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::String(..) => ValueKind::String,
            Value::Int(..) => ValueKind::Int,
            Value::Float(..) => ValueKind::Float,
            Value::Bool(..) => ValueKind::Bool,
            Value::Array(..) => ValueKind::Array,
            Value::Vector(v) => v.kind(),
            Value::Object(..) => ValueKind::Object,
        }
    }

    /// Returns a borrowed string if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<Str<'a>> {
        match self {
            Value::String(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    ///
    /// Floats are not converted.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float value.
    ///
    /// Integers are not converted.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<Array<'a>> {
        match self {
            Value::Array(a) => Some(*a),
            _ => None,
        }
    }

    /// Returns the children if this is an object. `{}` yields an empty list.
    #[inline]
    pub fn as_object(&self) -> Option<Fields<'a>> {
        match self {
            Value::Object(fields) => Some(*fields),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vector(&self) -> Option<Vector> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// Components of a `vec2`. Other arities return `None`.
    #[inline]
    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        self.as_vector()?.to_array()
    }

    /// Components of a `vec3`. Other arities return `None`.
    #[inline]
    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        self.as_vector()?.to_array()
    }

    /// Components of a `vec4`. Other arities return `None`.
    #[inline]
    pub fn as_vec4(&self) -> Option<[f32; 4]> {
        self.as_vector()?.to_array()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("Empty"),
            Value::String(s) => fmt::Debug::fmt(s, f),
            Value::Int(i) => fmt::Debug::fmt(i, f),
            Value::Float(v) => fmt::Debug::fmt(v, f),
            Value::Bool(b) => fmt::Debug::fmt(b, f),
            Value::Array(a) => fmt::Debug::fmt(a, f),
            Value::Vector(v) => {
                write!(f, "{}", v.kind())?;
                f.debug_list().entries(v.components()).finish()
            }
            Value::Object(fields) => fmt::Debug::fmt(fields, f),
        }
    }
}

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;
