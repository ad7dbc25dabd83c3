//! Encode catalog values as text.
//!
//! Two formats are produced here: catalog text, which the parser reads back
//! into an equal tree, and JSON. YAML, TOML and CBOR are handled by the CLI
//! tool (bincatalog) using dedicated libraries.

use crate::error::EncodeError;
use crate::record::Record;
use crate::tokenizer::is_name;
use crate::units::UnitFamily;
use crate::Value;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Catalog text (canonical)
    Catalog,
    /// JSON (standard)
    Json,
}

/// Encode a value to a string in the specified format.
///
/// Catalog output is written as is: keys that are not valid property names
/// and non-finite numbers produce text the parser rejects. Use [`try_encode`]
/// when the tree was built in code rather than parsed.
pub fn encode(value: &Value, format: Format) -> String {
    match format {
        Format::Catalog => encode_catalog(value, 0),
        Format::Json => encode_json(value, 0),
    }
}

/// Encode a value, refusing catalog output that would not parse back.
///
/// JSON output never fails.
pub fn try_encode(value: &Value, format: Format) -> Result<String, EncodeError> {
    if format == Format::Catalog {
        check_catalog(value)?;
    }
    Ok(encode(value, format))
}

fn check_catalog(value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Number(n) if !n.is_finite() => Err(EncodeError::NonFinite(*n)),
        Value::Array(arr) => arr.iter().try_for_each(check_catalog),
        Value::Record(rec) => rec
            .iter()
            .filter(|(k, _)| UnitFamily::parse_unit_key(k).is_none())
            .try_for_each(|(k, v)| {
                if !is_name(k) {
                    return Err(EncodeError::InvalidKey(k.to_string()));
                }
                check_catalog(v)
            }),
        _ => Ok(()),
    }
}

// =============================================================================
// Catalog Encoder
// =============================================================================

fn encode_catalog(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::Boolean(true) => "true".to_string(),
        Value::Boolean(false) => "false".to_string(),
        Value::Number(n) => encode_catalog_number(*n),
        Value::String(s) => encode_catalog_string(s),
        Value::Array(arr) => {
            if arr.is_empty() {
                "[ ]".to_string()
            } else if arr.iter().all(is_simple_value) {
                let items: Vec<String> = arr.iter().map(|v| encode_catalog(v, 0)).collect();
                format!("[ {} ]", items.join(" "))
            } else {
                let items: Vec<String> = arr
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_catalog(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join("\n"), pad)
            }
        }
        Value::Record(rec) => {
            let items: Vec<String> = rec
                .iter()
                .filter(|(k, _)| UnitFamily::parse_unit_key(k).is_none())
                .map(|(k, v)| {
                    let mut line = format!("{}{} {}", pad1, k, encode_catalog(v, indent + 1));
                    let units = declared_units(rec, k);
                    if !units.is_empty() {
                        line.push_str(&format!(" <{}>", units.join(" ")));
                    }
                    line
                })
                .collect();
            if items.is_empty() {
                "{ }".to_string()
            } else {
                format!("{{\n{}\n{}}}", items.join("\n"), pad)
            }
        }
    }
}

/// Units attached to `property`, in classification order.
///
/// Unit keys whose property is absent have nowhere to go and are dropped.
fn declared_units<'a>(rec: &'a Record, property: &str) -> Vec<&'a str> {
    UnitFamily::ALL
        .into_iter()
        .filter_map(|family| rec.get_string(&family.unit_key(property)))
        .collect()
}

fn is_simple_value(v: &Value) -> bool {
    matches!(v, Value::Number(_) | Value::String(_) | Value::Boolean(_))
}

fn encode_catalog_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        format!("{}", n)
    }
}

fn encode_catalog_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::Boolean(true) => "true".to_string(),
        Value::Boolean(false) => "false".to_string(),
        Value::Number(n) => {
            if n.is_nan() || n.is_infinite() {
                "null".to_string() // JSON doesn't support NaN/Infinity
            } else {
                format!("{}", n)
            }
        }
        Value::String(s) => encode_json_string(s),
        Value::Array(arr) => {
            if arr.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = arr
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_json(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        Value::Record(rec) => {
            if rec.is_empty() {
                "{}".to_string()
            } else {
                let items: Vec<String> = rec
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}{}: {}",
                            pad1,
                            encode_json_string(k),
                            encode_json(v, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
