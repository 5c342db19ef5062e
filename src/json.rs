// Author: Dustin Pilgrim
// License: MIT

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::ast::{Field, Literal, Value};

/// Render a parsed value as canonical JSON.
///
/// Converts every semi-JSON construct to its strict JSON spelling:
/// - Null (either spelling) → `null`
/// - Booleans → `true` / `false`
/// - Integers → plain decimal digits
/// - Decimals → the shortest text that round-trips the value
/// - Strings → double quoted, control characters escaped
/// - Objects → `{"key":value,...}` in written order, duplicates kept
/// - Arrays → `[value,...]`
/// - Dates → a quoted `YYYY-MM-DDThh:mm:ssZ` stamp, fields verbatim
///
/// The output carries no whitespace at all.
///
/// # Examples
/// ```
/// use semijson::{json, parse_str};
///
/// # fn main() -> Result<(), semijson::SemiJsonError> {
/// let value = parse_str("{ key: 'value' }")?;
/// assert_eq!(json::to_json(&value), r#"{"key":"value"}"#);
/// # Ok(())
/// # }
/// ```
pub fn to_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

impl Value {
    /// Render this value as canonical JSON text.
    pub fn to_json(&self) -> String {
        to_json(self)
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Literal(literal) => write_literal(literal, out),
        Value::Object(fields) => write_object(fields, out),
        Value::Array(values) => write_array(values, out),
        Value::Date(date) => {
            out.push('"');
            out.push_str(&date.to_string());
            out.push('"');
        }
    }
}

fn write_literal(literal: &Literal, out: &mut String) {
    match literal {
        Literal::Null => out.push_str("null"),
        Literal::Bool(true) => out.push_str("true"),
        Literal::Bool(false) => out.push_str("false"),
        Literal::String(s) => write_string(s, out),
        Literal::Decimal(n) => out.push_str(&n.to_string()),
        Literal::Integer(n) => out.push_str(&n.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_object(fields: &[Field], out: &mut String) {
    out.push('{');
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_string(&field.key, out);
        out.push(':');
        write_value(&field.value, out);
    }
    out.push('}');
}

fn write_array(values: &[Value], out: &mut String) {
    out.push('[');
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_value(value, out);
    }
    out.push(']');
}

/// Streamed serde support, mirroring the canonical renderer. Duplicate
/// object keys go out as written; dates go out as their stamp string.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Literal(Literal::Null) => serializer.serialize_unit(),
            Value::Literal(Literal::Bool(b)) => serializer.serialize_bool(*b),
            Value::Literal(Literal::String(s)) => serializer.serialize_str(s),
            Value::Literal(Literal::Decimal(n)) => serializer.serialize_f64(*n),
            Value::Literal(Literal::Integer(n)) => serializer.serialize_i64(*n),
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for field in fields {
                    map.serialize_entry(&field.key, &field.value)?;
                }
                map.end()
            }
            Value::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Date(date) => serializer.serialize_str(&date.to_string()),
        }
    }
}
