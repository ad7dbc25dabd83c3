//! YAML transcoding: convert catalog values to YAML text.
//!
//! Mapping from catalog to YAML:
//!   - Value::Boolean      -> YAML bool
//!   - Value::Number       -> YAML integer when whole, else YAML float
//!                            (including .nan, .inf, -.inf)
//!   - Value::String       -> YAML string
//!   - Value::Array        -> YAML sequence
//!   - Value::Record       -> YAML mapping, in property order
//!
//! Unit keys (`Radius%Length`) are ordinary mapping keys.

use super::exact_integer;
use libcatalog::Value;

/// Encode a catalog Value as a YAML string.
pub fn encode(value: &Value) -> Result<String, String> {
    serde_yaml::to_string(&value_to_yaml(value)).map_err(|e| format!("YAML encode error: {}", e))
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Boolean(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => match exact_integer(*n) {
            Some(i) => serde_yaml::Value::Number(serde_yaml::Number::from(i)),
            None => serde_yaml::Value::Number(serde_yaml::Number::from(*n)),
        },
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(arr) => serde_yaml::Value::Sequence(arr.iter().map(value_to_yaml).collect()),
        Value::Record(rec) => {
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in rec.iter() {
                map.insert(serde_yaml::Value::String(k.to_string()), value_to_yaml(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}
