//! Physical unit families and their registries.
//!
//! Each family has a canonical unit that every scale factor is expressed in:
//!
//! | family | canonical unit |
//! |--------|----------------|
//! | length | kilometer      |
//! | time   | day            |
//! | angle  | degree         |
//! | mass   | Earth mass     |
//!
//! A unit name is classified by asking the registries in a fixed order
//! (length, time, angle, mass); the first registry that knows the name wins.

use std::fmt;

pub const KM_PER_AU: f64 = 149_597_870.7;
pub const KM_PER_LY: f64 = 9_460_730_472_580.8;
pub const LY_PER_PARSEC: f64 = 3.26167;
pub const KM_PER_PARSEC: f64 = KM_PER_LY * LY_PER_PARSEC;
pub const EARTH_RADIUS_KM: f64 = 6378.14;
pub const JUPITER_RADIUS_KM: f64 = 71_492.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_YEAR: f64 = 365.25;

pub const EARTH_MASS_KG: f64 = 5.976e24;
pub const JUPITER_MASS_EARTHS: f64 = 317.83;

/// A physical dimension understood by the catalog format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Length,
    Time,
    Angle,
    Mass,
}

impl UnitFamily {
    /// All families in classification priority order.
    pub const ALL: [UnitFamily; 4] = [
        UnitFamily::Length,
        UnitFamily::Time,
        UnitFamily::Angle,
        UnitFamily::Mass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitFamily::Length => "Length",
            UnitFamily::Time => "Time",
            UnitFamily::Angle => "Angle",
            UnitFamily::Mass => "Mass",
        }
    }

    /// The record key holding the unit declared for `property`.
    pub fn unit_key(self, property: &str) -> String {
        format!("{}%{}", property, self.name())
    }

    /// Split a synthetic unit key into its property and family.
    pub fn parse_unit_key(key: &str) -> Option<(&str, UnitFamily)> {
        let (property, family) = key.rsplit_once('%')?;
        let family = UnitFamily::ALL.into_iter().find(|f| f.name() == family)?;
        Some((property, family))
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knows the units of one family.
pub trait UnitRegistry {
    /// Factor converting a quantity in `unit` to the family's canonical unit.
    fn scale_factor(&self, unit: &str) -> Option<f64>;

    fn is_unit(&self, unit: &str) -> bool {
        self.scale_factor(unit).is_some()
    }
}

/// The four registries, one per family.
pub trait UnitSystem {
    fn registry(&self, family: UnitFamily) -> &dyn UnitRegistry;

    /// The family of `unit`, asking registries in priority order.
    ///
    /// A name known to several registries resolves to the first of length,
    /// time, angle, mass that knows it.
    fn classify(&self, unit: &str) -> Option<UnitFamily> {
        UnitFamily::ALL
            .into_iter()
            .find(|&family| self.registry(family).is_unit(unit))
    }

    /// Canonical factor of `unit`, provided it belongs to `family`.
    fn scale_factor(&self, family: UnitFamily, unit: &str) -> Option<f64> {
        self.registry(family).scale_factor(unit)
    }
}

/// A fixed table of unit names and canonical factors.
#[derive(Debug, Clone, Copy)]
pub struct UnitTable {
    entries: &'static [(&'static str, f64)],
}

impl UnitTable {
    pub const fn new(entries: &'static [(&'static str, f64)]) -> Self {
        Self { entries }
    }

    pub fn units(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl UnitRegistry for UnitTable {
    fn scale_factor(&self, unit: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, factor)| *factor)
    }
}

pub static LENGTH_UNITS: UnitTable = UnitTable::new(&[
    ("mm", 1.0e-6),
    ("cm", 1.0e-5),
    ("m", 1.0e-3),
    ("km", 1.0),
    ("rE", EARTH_RADIUS_KM),
    ("rJ", JUPITER_RADIUS_KM),
    ("AU", KM_PER_AU),
    ("au", KM_PER_AU),
    ("ly", KM_PER_LY),
    ("pc", KM_PER_PARSEC),
    ("kpc", 1.0e3 * KM_PER_PARSEC),
    ("Mpc", 1.0e6 * KM_PER_PARSEC),
]);

pub static TIME_UNITS: UnitTable = UnitTable::new(&[
    ("s", 1.0 / SECONDS_PER_DAY),
    ("min", 1.0 / 1440.0),
    ("h", 1.0 / 24.0),
    ("d", 1.0),
    ("y", DAYS_PER_YEAR),
]);

pub static ANGLE_UNITS: UnitTable = UnitTable::new(&[
    ("mas", 1.0 / 3_600_000.0),
    ("arcsec", 1.0 / 3600.0),
    ("arcmin", 1.0 / 60.0),
    ("deg", 1.0),
    ("hRA", 15.0),
    ("rad", 180.0 / std::f64::consts::PI),
]);

pub static MASS_UNITS: UnitTable = UnitTable::new(&[
    ("kg", 1.0 / EARTH_MASS_KG),
    ("mE", 1.0),
    ("mJ", JUPITER_MASS_EARTHS),
]);

/// The astronomical unit tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUnits;

pub static STANDARD_UNITS: StandardUnits = StandardUnits;

impl UnitSystem for StandardUnits {
    fn registry(&self, family: UnitFamily) -> &dyn UnitRegistry {
        match family {
            UnitFamily::Length => &LENGTH_UNITS,
            UnitFamily::Time => &TIME_UNITS,
            UnitFamily::Angle => &ANGLE_UNITS,
            UnitFamily::Mass => &MASS_UNITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_standard_units() {
        let units = StandardUnits;
        assert_eq!(units.classify("AU"), Some(UnitFamily::Length));
        assert_eq!(units.classify("min"), Some(UnitFamily::Time));
        assert_eq!(units.classify("mas"), Some(UnitFamily::Angle));
        assert_eq!(units.classify("mJ"), Some(UnitFamily::Mass));
        assert_eq!(units.classify("bogus"), None);
        assert_eq!(units.classify("Au"), None);
    }

    #[test]
    fn test_standard_tables_are_disjoint() {
        let tables = [&LENGTH_UNITS, &TIME_UNITS, &ANGLE_UNITS, &MASS_UNITS];
        for (i, a) in tables.iter().enumerate() {
            for b in &tables[i + 1..] {
                for unit in a.units() {
                    assert!(!b.is_unit(unit), "{} is in two families", unit);
                }
            }
        }
    }

    #[test]
    fn test_scale_factors() {
        let units = StandardUnits;
        assert_eq!(units.scale_factor(UnitFamily::Length, "km"), Some(1.0));
        assert_eq!(units.scale_factor(UnitFamily::Length, "AU"), Some(KM_PER_AU));
        assert_eq!(units.scale_factor(UnitFamily::Time, "y"), Some(365.25));
        assert_eq!(units.scale_factor(UnitFamily::Angle, "hRA"), Some(15.0));
        assert_eq!(units.scale_factor(UnitFamily::Mass, "mE"), Some(1.0));
        assert_eq!(units.scale_factor(UnitFamily::Mass, "km"), None);
    }

    #[test]
    fn test_priority_breaks_ties() {
        struct Overlapping;
        static SHARED_A: UnitTable = UnitTable::new(&[("x", 2.0)]);
        static SHARED_B: UnitTable = UnitTable::new(&[("x", 3.0), ("y", 4.0)]);
        static EMPTY: UnitTable = UnitTable::new(&[]);
        impl UnitSystem for Overlapping {
            fn registry(&self, family: UnitFamily) -> &dyn UnitRegistry {
                match family {
                    UnitFamily::Length => &EMPTY,
                    UnitFamily::Time => &SHARED_B,
                    UnitFamily::Angle => &SHARED_A,
                    UnitFamily::Mass => &SHARED_B,
                }
            }
        }
        assert_eq!(Overlapping.classify("x"), Some(UnitFamily::Time));
        assert_eq!(Overlapping.classify("y"), Some(UnitFamily::Time));
    }

    #[test]
    fn test_unit_keys() {
        assert_eq!(UnitFamily::Angle.unit_key("Inclination"), "Inclination%Angle");
        assert_eq!(
            UnitFamily::parse_unit_key("SemiMajorAxis%Length"),
            Some(("SemiMajorAxis", UnitFamily::Length))
        );
        assert_eq!(UnitFamily::parse_unit_key("Radius"), None);
        assert_eq!(UnitFamily::parse_unit_key("Radius%Volume"), None);
    }
}
