// JSON text reading/writing for decoded save trees.
//
// serde_json numbers cannot hold NaN or +/-Infinity, and save files do
// contain them. Inside a tree they travel as `{"$float": "NaN"}` markers;
// the reader turns bare tokens into markers and the writer turns markers
// back into tokens or `null` depending on `NanPolicy`.
use std::borrow::Cow;
use std::fmt::Write as _;

use serde_json::Value;

use crate::Document;

pub const FLOAT_MARKER: &str = "$float";

const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// One tab per nesting level
    #[default]
    Tab,
    /// No whitespace at all
    Minified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NanPolicy {
    /// Write `NaN`, `Infinity`, `-Infinity` as bare tokens (not strict JSON)
    #[default]
    Preserve,
    /// Write non-finite floats as `null`
    Null,
}

impl NanPolicy {
    pub fn from_convert_to_null(convert: bool) -> Self {
        if convert { NanPolicy::Null } else { NanPolicy::Preserve }
    }

    pub fn allows_nan(self) -> bool {
        self == NanPolicy::Preserve
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOpts {
    pub indent: Indent,
    pub nan: NanPolicy,
}

impl JsonOpts {
    pub fn minified(nan: NanPolicy) -> Self {
        Self { indent: Indent::Minified, nan }
    }
}

/// Marker value for a non-finite float; finite input becomes a plain number.
pub fn float_value(f: f64) -> Value {
    if let Some(n) = serde_json::Number::from_f64(f) {
        return Value::Number(n);
    }
    let token = if f.is_nan() {
        "NaN"
    } else if f.is_sign_negative() {
        "-Infinity"
    } else {
        "Infinity"
    };
    let mut m = serde_json::Map::with_capacity(1);
    m.insert(FLOAT_MARKER.to_string(), Value::String(token.to_string()));
    Value::Object(m)
}

/// Token carried by a non-finite marker, if `v` is one.
pub fn non_finite_token(v: &Value) -> Option<&'static str> {
    let obj = v.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    let s = obj.get(FLOAT_MARKER)?.as_str()?;
    NON_FINITE_TOKENS.iter().copied().find(|t| *t == s)
}

/// Parses JSON text, accepting bare `NaN`/`Infinity`/`-Infinity` tokens.
pub fn parse_document(text: &str) -> Result<Document, serde_json::Error> {
    serde_json::from_str(&mark_non_finite(text))
}

pub fn write_document(doc: &Document, opts: &JsonOpts) -> String {
    let mut out = String::new();
    write_value_json(doc, 0, &mut out, opts).ok();
    if opts.indent == Indent::Tab {
        out.push('\n');
    }
    out
}

fn write_value_json(
    v: &Value,
    depth: usize,
    out: &mut String,
    opts: &JsonOpts,
) -> std::fmt::Result {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write!(out, "{}", n)?,
        Value::String(s) => write_str_json(s, out),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return Ok(());
            }
            out.push('[');
            for (i, it) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1, opts);
                write_value_json(it, depth + 1, out, opts)?;
            }
            newline(out, depth, opts);
            out.push(']');
        }
        Value::Object(obj) => {
            if let Some(token) = non_finite_token(v) {
                match opts.nan {
                    NanPolicy::Preserve => out.push_str(token),
                    NanPolicy::Null => out.push_str("null"),
                }
                return Ok(());
            }
            if obj.is_empty() {
                out.push_str("{}");
                return Ok(());
            }
            out.push('{');
            for (i, (name, val)) in obj.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1, opts);
                write_str_json(name, out);
                out.push(':');
                if opts.indent == Indent::Tab {
                    out.push(' ');
                }
                write_value_json(val, depth + 1, out, opts)?;
            }
            newline(out, depth, opts);
            out.push('}');
        }
    }
    Ok(())
}

fn newline(out: &mut String, depth: usize, opts: &JsonOpts) {
    if opts.indent == Indent::Tab {
        out.push('\n');
        for _ in 0..depth {
            out.push('\t');
        }
    }
}

fn write_str_json(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// Rewrites bare non-finite tokens (outside string literals) into markers.
fn mark_non_finite(text: &str) -> Cow<'_, str> {
    if !text.contains("NaN") && !text.contains("Infinity") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 64);
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            write!(out, "{{\"{}\":\"{}\"}}", FLOAT_MARKER, token).ok();
            rest = &rest[token.len()..];
            continue;
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    Cow::Owned(out)
}
