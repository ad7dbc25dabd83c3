//! Encoders for output formats that need a third-party library.

pub mod cbor;
pub mod toml;
pub mod yaml;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The number as an integer, if it is one exactly.
///
/// Catalog numbers are all floating point; formats with a separate integer
/// type get whole numbers written as integers.
fn exact_integer(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}
