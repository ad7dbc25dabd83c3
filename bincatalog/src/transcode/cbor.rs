//! CBOR transcoding: convert catalog values to CBOR binary data.
//!
//! Mapping from catalog to CBOR:
//!   - Value::Boolean -> CBOR bool (simple values 20/21)
//!   - Value::Number  -> CBOR integer when whole, else CBOR float
//!   - Value::String  -> CBOR text string
//!   - Value::Array   -> CBOR array
//!   - Value::Record  -> CBOR map with text string keys, in property order

use super::exact_integer;
use ciborium::value::Value as CborValue;
use libcatalog::Value;

/// Encode a catalog Value as CBOR bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&value_to_cbor(value), &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn value_to_cbor(value: &Value) -> CborValue {
    match value {
        Value::Boolean(b) => CborValue::Bool(*b),
        Value::Number(n) => match exact_integer(*n) {
            Some(i) => CborValue::Integer(i.into()),
            None => CborValue::Float(*n),
        },
        Value::String(s) => CborValue::Text(s.clone()),
        Value::Array(arr) => CborValue::Array(arr.iter().map(value_to_cbor).collect()),
        Value::Record(rec) => CborValue::Map(
            rec.iter()
                .map(|(k, v)| (CborValue::Text(k.to_string()), value_to_cbor(v)))
                .collect(),
        ),
    }
}
