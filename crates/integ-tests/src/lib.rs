#![allow(missing_docs)]

use codespan_reporting::diagnostic::{Diagnostic, Label};
use fld::{Document, Fields, Value};
use std::fmt::Write;

pub type File<'s> = codespan_reporting::files::SimpleFile<&'static str, &'s str>;

pub fn emit_diags(
    f: &File<'_>,
    error: impl IntoIterator<Item = Diagnostic<()>>,
) -> String {
    let mut output = codespan_reporting::term::termcolor::NoColor::new(Vec::new());

    for diag in error {
        codespan_reporting::term::emit_to_write_style(
            &mut output,
            &codespan_reporting::term::Config::default(),
            f,
            &diag,
        )
        .expect("failed to emit diagnostic");
    }

    String::from_utf8(output.into_inner()).unwrap()
}

/// Parses `src` into a buffer sized by `estimate_memory` and hands the
/// document to `f`. A parse error panics with the rendered diagnostic.
pub fn with_document<R>(name: &'static str, src: &str, f: impl FnOnce(Document<'_>) -> R) -> R {
    let mut memory = vec![0u8; fld::estimate_memory(src)];
    match fld::parse(src, &mut memory) {
        Ok(doc) => f(doc),
        Err(err) => {
            let file = File::new(name, src);
            let rendered = emit_diags(&file, Some(err.to_diagnostic(())));
            panic!("unexpected parse error:\n{rendered}");
        }
    }
}

/// Parses `src`, which must fail, and returns the error with its rendered
/// diagnostic.
pub fn parse_err(name: &'static str, src: &str) -> (fld::Error, String) {
    let mut memory = vec![0u8; fld::estimate_memory(src)];
    match fld::parse(src, &mut memory) {
        Ok(doc) => panic!("expected a parse error, got {doc:?}"),
        Err(err) => {
            let file = File::new(name, src);
            let rendered = emit_diags(&file, Some(err.to_diagnostic(())));
            (err, rendered)
        }
    }
}

/// One line per field in pre-order, indented two spaces per level.
pub fn render_tree(fields: Fields<'_>) -> String {
    let mut out = String::new();
    let base = fields.first().map_or(0, |f| f.depth());
    for field in fields.iter_recursive() {
        let indent = (field.depth() - base) * 2;
        match field.value() {
            Value::Object(_) => {
                writeln!(out, "{:indent$}{}: object", "", field.key()).unwrap();
            }
            value => {
                writeln!(out, "{:indent$}{}: {} = {value:?}", "", field.key(), field.kind())
                    .unwrap();
            }
        }
    }
    out
}

/// A note for every key, labelled at the key's location in the source.
pub fn key_notes(doc: &Document<'_>) -> Vec<Diagnostic<()>> {
    doc.iter_recursive()
        .filter_map(|field| {
            let span = doc.span_of(field.key())?;
            Some(
                Diagnostic::note()
                    .with_code(field.kind().as_str())
                    .with_message(field.path())
                    .with_labels(vec![Label::primary((), span)]),
            )
        })
        .collect()
}
