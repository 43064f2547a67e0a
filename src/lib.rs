//! A parser for FLD, a small statically typed configuration format, that
//! builds its whole tree inside a buffer supplied by the caller.
//!
//! FLD documents are `key = value;` fields. Values are strings, 64-bit
//! integers, floats, booleans, homogeneous scalar arrays, `vec2`/`vec3`/`vec4`
//! float vectors and nested objects. Comments use `//` and `/* */`.
//!
//! Nothing is heap allocated while parsing: the source text is copied into
//! the buffer and every node is bump allocated after it. Size the buffer with
//! [`estimate_memory`].
//!
//! # Examples
//!
//! ```
//! let src = r#"
//! // window settings
//! title = "FLD demo";
//! window = {
//!     size = vec2(1280, 720);
//!     vsync = true;
//! };
//! layers = ["background", "world", "ui"];
//! "#;
//!
//! let mut memory = vec![0u8; fld::estimate_memory(src)];
//! let doc = fld::parse(src, &mut memory)?;
//!
//! assert_eq!(doc.get_str("title").unwrap(), "FLD demo");
//! assert_eq!(doc.get_vec2("window.size"), Some([1280.0, 720.0]));
//! assert_eq!(doc.get_bool("window.vsync"), Some(true));
//! assert_eq!(doc.array_len("layers"), Some(3));
//! assert_eq!(doc.kind_of("missing"), fld::ValueKind::Empty);
//! # Ok::<(), fld::Error>(())
//! ```
//!
//! Errors carry the position of the offending token:
//!
//! ```
//! let src = "invalid = };";
//! let mut memory = vec![0u8; fld::estimate_memory(src)];
//! let err = fld::parse(src, &mut memory).unwrap_err();
//!
//! assert!(err.kind.is_unexpected_token());
//! assert_eq!((err.line, err.column), (1, 11));
//! assert_eq!(err.to_string(), "expected a value, found a right brace at line 1, column 11");
//! ```

#[cfg(feature = "tracing")]
macro_rules! debug_event {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_event {
    ($($arg:tt)*) => {};
}

mod arena;
mod array;
mod document;
mod error;
mod field;
mod iter;
mod lexer;
mod parser;
mod span;
mod str;
mod value;

pub use arena::Arena;
pub use array::{Array, ArrayIter, MAX_ARRAY_ITEMS};
pub use document::Document;
pub use error::{Error, ErrorKind};
pub use field::{Field, Fields, MAX_PATH_LENGTH};
pub use iter::{FieldIter, IterMode};
pub use lexer::MAX_NUMBER_LEN;
pub use parser::{MAX_NESTING_DEPTH, MAX_SOURCE_LEN, estimate_memory, parse};
pub use span::Span;
pub use str::Str;
pub use value::{Value, ValueKind, Vector};

#[cfg(feature = "serde")]
pub mod impl_serde;
