//! Rendering of plist values.
//!
//! Two layouts exist. Multi-line output puts every entry on its own line,
//! indented with tabs. Single-line output is used for compact records such as
//! `{isa = PBXBuildFile; fileRef = ABC /* main.swift */; }`.

use crate::value::{PlistString, PlistValue};

/// How a container value is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Everything on the current line.
    SingleLine,
    /// One entry per line; `indent` is the tab depth of the line holding the opening brace.
    MultiLine { indent: usize },
}

impl Layout {
    fn nested(self) -> Self {
        match self {
            Self::SingleLine => Self::SingleLine,
            Self::MultiLine { indent } => Self::MultiLine { indent: indent + 1 },
        }
    }
}

/// Whether `value` must be written in double quotes.
///
/// Bare values may only contain ASCII alphanumerics and `_ $ / : .`, must not
/// be empty, and must not contain `//` or `___`.
pub fn needs_quotes(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.'));
    !safe || value.contains("//") || value.contains("___")
}

/// Escape the body of a quoted string (without the surrounding quotes).
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\U{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

/// Write a scalar, quoting it when required or when `force_quotes` is set.
pub fn write_scalar(out: &mut String, value: &str, force_quotes: bool) {
    if force_quotes || needs_quotes(value) {
        out.push('"');
        out.push_str(&escape(value));
        out.push('"');
    } else {
        out.push_str(value);
    }
}

/// Write a string and its inline comment, if any.
pub fn write_string(out: &mut String, value: &PlistString) {
    write_scalar(out, value.as_str(), value.is_quoted());
    if let Some(comment) = value.comment() {
        write_comment(out, comment);
    }
}

/// Append ` /* comment */`.
pub fn write_comment(out: &mut String, comment: &str) {
    out.push_str(" /* ");
    out.push_str(comment);
    out.push_str(" */");
}

pub fn write_value(out: &mut String, value: &PlistValue, layout: Layout) {
    match value {
        PlistValue::String(s) => write_string(out, s),
        PlistValue::Array(items) => write_array(out, items, layout),
        PlistValue::Dictionary(dict) => write_dictionary(out, dict.iter(), layout),
    }
}

pub fn write_array(out: &mut String, items: &[PlistValue], layout: Layout) {
    match layout {
        Layout::SingleLine => {
            out.push('(');
            for item in items {
                write_value(out, item, layout);
                out.push_str(", ");
            }
            out.push(')');
        }
        Layout::MultiLine { indent } => {
            out.push_str("(\n");
            for item in items {
                push_indent(out, indent + 1);
                write_value(out, item, layout.nested());
                out.push_str(",\n");
            }
            push_indent(out, indent);
            out.push(')');
        }
    }
}

/// Write dictionary entries in the order given.
pub fn write_dictionary<'a, I>(out: &mut String, entries: I, layout: Layout)
where
    I: IntoIterator<Item = (&'a PlistString, &'a PlistValue)>,
{
    match layout {
        Layout::SingleLine => {
            out.push('{');
            for (key, value) in entries {
                write_string(out, key);
                out.push_str(" = ");
                write_value(out, value, layout);
                out.push_str("; ");
            }
            out.push('}');
        }
        Layout::MultiLine { indent } => {
            out.push_str("{\n");
            for (key, value) in entries {
                push_indent(out, indent + 1);
                write_string(out, key);
                out.push_str(" = ");
                write_value(out, value, layout.nested());
                out.push_str(";\n");
            }
            push_indent(out, indent);
            out.push('}');
        }
    }
}

pub fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Render a standalone value in multi-line layout, followed by a newline.
pub fn to_plist_string(value: &PlistValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, Layout::MultiLine { indent: 0 });
    out.push('\n');
    out
}
