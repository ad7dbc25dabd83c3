//! TOML transcoding: convert catalog values to TOML text.
//!
//! Mapping from catalog to TOML:
//!   - Value::Boolean       -> TOML boolean
//!   - Value::Number        -> TOML integer when whole, else TOML float
//!   - Value::String        -> TOML string
//!   - Value::Array         -> TOML array (records inside become inline tables)
//!   - Value::Record        -> TOML table
//!
//! Lossy edges:
//!   - TOML requires the top-level value to be a table; a top-level array errors.
//!   - Unit keys contain `%` and are written as quoted keys.

use super::exact_integer;
use libcatalog::{Record, Value};
use toml_edit::{DocumentMut, Formatted, InlineTable, Item, Table};

/// Encode a catalog Value as a TOML string.
pub fn encode(value: &Value) -> Result<String, String> {
    match value {
        Value::Record(rec) => {
            let mut doc = DocumentMut::new();
            for (key, item) in record_to_table(rec).iter() {
                doc[key] = item.clone();
            }
            Ok(doc.to_string())
        }
        _ => Err("TOML requires the top-level value to be a record".to_string()),
    }
}

fn record_to_table(rec: &Record) -> Table {
    let mut table = Table::new();
    for (k, v) in rec.iter() {
        let item = match v {
            Value::Record(inner) => Item::Table(record_to_table(inner)),
            other => Item::Value(value_to_toml(other)),
        };
        table.insert(k, item);
    }
    table
}

fn value_to_toml(value: &Value) -> toml_edit::Value {
    match value {
        Value::Boolean(b) => toml_edit::Value::Boolean(Formatted::new(*b)),
        Value::Number(n) => match exact_integer(*n) {
            Some(i) => toml_edit::Value::Integer(Formatted::new(i)),
            None => toml_edit::Value::Float(Formatted::new(*n)),
        },
        Value::String(s) => toml_edit::Value::String(Formatted::new(s.clone())),
        Value::Array(arr) => toml_edit::Value::Array(arr.iter().map(value_to_toml).collect()),
        Value::Record(rec) => {
            let mut inline = InlineTable::new();
            for (k, v) in rec.iter() {
                inline.insert(k, value_to_toml(v));
            }
            toml_edit::Value::InlineTable(inline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcatalog::{parse_array, parse_record};

    #[test]
    fn test_encode_record() {
        let rec = parse_record("{ Name \"Io\" Radius 1821.6 <km> Orbit { Period 1.769 <d> } }")
            .unwrap();
        let toml = encode(&Value::Record(rec)).unwrap();
        let doc: DocumentMut = toml.parse().unwrap();
        assert_eq!(doc["Name"].as_str(), Some("Io"));
        assert_eq!(doc["Radius"].as_float(), Some(1821.6));
        assert_eq!(doc["Radius%Length"].as_str(), Some("km"));
        assert_eq!(doc["Orbit"]["Period%Time"].as_str(), Some("d"));
    }

    #[test]
    fn test_records_in_arrays_become_inline_tables() {
        let rec = parse_record("{ Rings [ { Inner 1 } { Inner 2 } ] }").unwrap();
        let toml = encode(&Value::Record(rec)).unwrap();
        let doc: DocumentMut = toml.parse().unwrap();
        let rings = doc["Rings"].as_array().unwrap();
        assert_eq!(rings.len(), 2);
        let inner = rings
            .get(1)
            .and_then(|v| v.as_inline_table())
            .and_then(|t| t.get("Inner"))
            .and_then(|v| v.as_integer());
        assert_eq!(inner, Some(2));
    }

    #[test]
    fn test_top_level_array_is_rejected() {
        let arr = parse_array("[ 1 2 ]").unwrap();
        assert!(encode(&Value::Array(arr)).is_err());
    }
}
