//! Records and their typed getters.
//!
//! A [`Record`] maps unique property names to owned values. The getters in
//! this module never fail loudly: a missing key and a value of the wrong shape
//! both come back as `None`, so callers can treat malformed configuration the
//! same way as absent configuration.

use crate::color::Color;
use crate::path::{HomeDirExpander, PathExpander};
use crate::value::Value;
use indexmap::IndexMap;
use nalgebra::{RealField, Vector2, Vector3, Vector4};
use num_traits::NumCast;
use std::path::PathBuf;

/// A mapping from unique property names to owned values.
///
/// Iteration follows insertion order; equality ignores it.
#[derive(Clone, Default, PartialEq)]
pub struct Record {
    entries: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property by exact name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert a property, replacing (and returning) any previous value.
    ///
    /// A replaced key keeps its original position in iteration order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Property names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ------------------------------------------------------------------------
    // Typed getters
    // ------------------------------------------------------------------------

    /// Retrieve a number, converted to the requested numeric type.
    ///
    /// Works for `f64`, `f32` and the integer types; integer targets truncate
    /// toward zero and yield `None` when the number is out of range.
    pub fn get_number<T: NumCast>(&self, key: &str) -> Option<T> {
        self.get(key)?.as_number().and_then(T::from)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Retrieve a string as a filesystem path, expanding a leading `~`.
    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_path_with(key, &HomeDirExpander)
    }

    /// Retrieve a string as a filesystem path using a custom expander.
    pub fn get_path_with(&self, key: &str, expander: &dyn PathExpander) -> Option<PathBuf> {
        self.get_string(key).map(|s| expander.expand(s))
    }

    pub fn get_vector2<T: RealField>(&self, key: &str) -> Option<Vector2<T>> {
        let [x, y] = self.get_numbers::<2>(key)?;
        Some(Vector2::new(nalgebra::convert(x), nalgebra::convert(y)))
    }

    pub fn get_vector3<T: RealField>(&self, key: &str) -> Option<Vector3<T>> {
        let [x, y, z] = self.get_numbers::<3>(key)?;
        Some(Vector3::new(
            nalgebra::convert(x),
            nalgebra::convert(y),
            nalgebra::convert(z),
        ))
    }

    pub fn get_vector4<T: RealField>(&self, key: &str) -> Option<Vector4<T>> {
        let [x, y, z, w] = self.get_numbers::<4>(key)?;
        Some(Vector4::new(
            nalgebra::convert(x),
            nalgebra::convert(y),
            nalgebra::convert(z),
            nalgebra::convert(w),
        ))
    }

    /// Retrieve a color.
    ///
    /// Accepted forms, tried in order: `[r g b a]` and `[r g b]` with
    /// components in `[0, 1]`, then `"#RRGGBB"` or `"#RRGGBBAA"`.
    pub fn get_color(&self, key: &str) -> Option<Color> {
        if let Some([r, g, b, a]) = self.get_numbers::<4>(key) {
            return Some(Color::from_unit_rgba(r, g, b, a));
        }
        if let Some([r, g, b]) = self.get_numbers::<3>(key) {
            return Some(Color::from_unit_rgb(r, g, b));
        }
        Color::parse_hex(self.get_string(key)?)
    }

    /// An array of exactly `N` numbers.
    pub(crate) fn get_numbers<const N: usize>(&self, key: &str) -> Option<[f64; N]> {
        let arr = self.get(key)?.as_array()?;
        if arr.len() != N {
            return None;
        }
        let mut out = [0.0; N];
        for (slot, v) in out.iter_mut().zip(arr) {
            *slot = v.as_number()?;
        }
        Some(out)
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rec = Record::new();
        rec.extend(iter);
        rec
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut rec = Record::new();
        rec.set("Radius", 6378.14);
        rec.set("Texture", "earth.*");
        rec.set("Clickable", true);
        rec.set("Axis", vec![Value::from(0), Value::from(0), Value::from(1)]);
        rec.set("Mixed", vec![Value::from(0), Value::from("y"), Value::from(1)]);
        rec
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut rec = sample();
        let old = rec.set("Radius", 1.0);
        assert_eq!(old, Some(Value::Number(6378.14)));
        assert_eq!(rec.len(), 5);
        assert_eq!(rec.keys().next(), Some("Radius"));
        assert_eq!(rec.get_number::<f64>("Radius"), Some(1.0));
    }

    #[test]
    fn test_remove_and_contains() {
        let mut rec = sample();
        assert!(rec.contains_key("Texture"));
        assert_eq!(rec.remove("Texture"), Some(Value::from("earth.*")));
        assert!(!rec.contains_key("Texture"));
        assert_eq!(rec.remove("Texture"), None);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Record = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        let b: Record = [("b", 2.0), ("a", 1.0)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_number_overloads() {
        let rec = sample();
        assert_eq!(rec.get_number::<f64>("Radius"), Some(6378.14));
        assert_eq!(rec.get_number::<f32>("Radius"), Some(6378.14f64 as f32));
        assert_eq!(rec.get_number::<i32>("Radius"), Some(6378));
        assert_eq!(rec.get_number::<u32>("Radius"), Some(6378));
        assert_eq!(rec.get_number::<f64>("Texture"), None);
        assert_eq!(rec.get_number::<f64>("Missing"), None);
    }

    #[test]
    fn test_negative_number_out_of_unsigned_range() {
        let mut rec = Record::new();
        rec.set("Offset", -3.0);
        assert_eq!(rec.get_number::<u32>("Offset"), None);
        assert_eq!(rec.get_number::<i32>("Offset"), Some(-3));
    }

    #[test]
    fn test_string_and_bool() {
        let rec = sample();
        assert_eq!(rec.get_string("Texture"), Some("earth.*"));
        assert_eq!(rec.get_bool("Clickable"), Some(true));
        assert_eq!(rec.get_bool("Radius"), None);
        assert_eq!(rec.get_string("Clickable"), None);
    }

    #[test]
    fn test_vectors_require_exact_length() {
        let rec = sample();
        assert_eq!(rec.get_vector3::<f64>("Axis"), Some(Vector3::new(0.0, 0.0, 1.0)));
        assert_eq!(rec.get_vector3::<f32>("Axis"), Some(Vector3::new(0.0f32, 0.0, 1.0)));
        assert_eq!(rec.get_vector2::<f64>("Axis"), None);
        assert_eq!(rec.get_vector4::<f64>("Axis"), None);
        assert_eq!(rec.get_vector3::<f64>("Mixed"), None);
        assert_eq!(rec.get_vector3::<f64>("Radius"), None);
    }

    #[test]
    fn test_vector_components_are_positional() {
        let mut rec = Record::new();
        rec.set("Pos", vec![Value::from(1), Value::from(2)]);
        rec.set("Quad", vec![Value::from(4), Value::from(3), Value::from(2), Value::from(1)]);
        assert_eq!(rec.get_vector2::<f64>("Pos"), Some(Vector2::new(1.0, 2.0)));
        assert_eq!(
            rec.get_vector4::<f64>("Quad"),
            Some(Vector4::new(4.0, 3.0, 2.0, 1.0))
        );
    }

    #[test]
    fn test_color_forms() {
        let mut rec = Record::new();
        rec.set("Rgba", vec![Value::from(1), Value::from(0.5), Value::from(0), Value::from(0.5)]);
        rec.set("Rgb", vec![Value::from(0), Value::from(0), Value::from(1)]);
        rec.set("Hex", "#FF8000");
        rec.set("Bad", "#FF80");
        assert_eq!(rec.get_color("Rgba"), Some(Color::new(255, 128, 0, 128)));
        assert_eq!(rec.get_color("Rgb"), Some(Color::new(0, 0, 255, 255)));
        assert_eq!(rec.get_color("Hex"), Some(Color::new(255, 128, 0, 255)));
        assert_eq!(rec.get_color("Bad"), None);
        assert_eq!(rec.get_color("Missing"), None);
    }

    #[test]
    fn test_path_uses_expander() {
        struct Prefix;
        impl PathExpander for Prefix {
            fn expand(&self, path: &str) -> PathBuf {
                PathBuf::from("/data").join(path)
            }
        }
        let mut rec = Record::new();
        rec.set("Catalog", "stars.dat");
        assert_eq!(
            rec.get_path_with("Catalog", &Prefix),
            Some(PathBuf::from("/data/stars.dat"))
        );
        assert_eq!(rec.get_path("Catalog"), Some(PathBuf::from("stars.dat")));
        assert_eq!(rec.get_path("Missing"), None);
    }

    #[test]
    fn test_getters_do_not_mutate() {
        let rec = sample();
        let before = rec.clone();
        for _ in 0..2 {
            let _ = rec.get_vector3::<f64>("Axis");
            let _ = rec.get_color("Axis");
            let _ = rec.get_number::<i32>("Radius");
        }
        assert_eq!(rec, before);
    }
}
