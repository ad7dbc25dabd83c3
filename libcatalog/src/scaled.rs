//! Unit-scaled retrieval.
//!
//! A property may carry a units section, stored by the parser under a
//! synthetic `property%Family` key. The getters here read the raw number, look
//! up the declared unit's canonical factor and rescale into the unit the
//! caller asks for:
//!
//! ```text
//! declared = factor of key%Family, else default_scale (0.0 means 1.0)
//! result   = raw * declared / output_scale
//! ```
//!
//! Scales are expressed in the family's canonical unit (see [`crate::units`]),
//! so `output_scale = KM_PER_AU` yields astronomical units and
//! `output_scale = 1.0` yields kilometers.

use crate::record::Record;
use crate::units::{UnitFamily, UnitSystem, STANDARD_UNITS};
use nalgebra::{RealField, Unit, UnitQuaternion, Vector3};
use num_traits::Float;

/// A view of a record that resolves declared units against a unit system.
#[derive(Clone, Copy)]
pub struct Scaled<'a> {
    record: &'a Record,
    units: &'a dyn UnitSystem,
}

impl Record {
    /// Scaled getters using the standard unit tables.
    pub fn scaled(&self) -> Scaled<'_> {
        self.scaled_with(&STANDARD_UNITS)
    }

    /// Scaled getters using a custom unit system.
    pub fn scaled_with<'a>(&'a self, units: &'a dyn UnitSystem) -> Scaled<'a> {
        Scaled {
            record: self,
            units,
        }
    }
}

impl<'a> Scaled<'a> {
    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// Retrieve a length, rescaled so that one output unit is `output_scale` km.
    pub fn get_length<T: Float>(
        &self,
        key: &str,
        output_scale: f64,
        default_scale: f64,
    ) -> Option<T> {
        self.get_scalar(UnitFamily::Length, key, output_scale, default_scale)
    }

    /// Retrieve a time, rescaled so that one output unit is `output_scale` days.
    pub fn get_time<T: Float>(
        &self,
        key: &str,
        output_scale: f64,
        default_scale: f64,
    ) -> Option<T> {
        self.get_scalar(UnitFamily::Time, key, output_scale, default_scale)
    }

    /// Retrieve an angle, rescaled so that one output unit is `output_scale` degrees.
    pub fn get_angle<T: Float>(
        &self,
        key: &str,
        output_scale: f64,
        default_scale: f64,
    ) -> Option<T> {
        self.get_scalar(UnitFamily::Angle, key, output_scale, default_scale)
    }

    /// Retrieve a mass, rescaled so that one output unit is `output_scale` Earth masses.
    pub fn get_mass<T: Float>(
        &self,
        key: &str,
        output_scale: f64,
        default_scale: f64,
    ) -> Option<T> {
        self.get_scalar(UnitFamily::Mass, key, output_scale, default_scale)
    }

    /// Retrieve a 3-vector of lengths, each component rescaled like [`get_length`](Self::get_length).
    pub fn get_length_vector<T: RealField>(
        &self,
        key: &str,
        output_scale: f64,
        default_scale: f64,
    ) -> Option<Vector3<T>> {
        let [x, y, z] = self.record.get_numbers::<3>(key)?;
        let factor = self.factor(UnitFamily::Length, key, output_scale, default_scale);
        Some(Vector3::new(
            nalgebra::convert(x * factor),
            nalgebra::convert(y * factor),
            nalgebra::convert(z * factor),
        ))
    }

    /// Retrieve `[longitude latitude altitude]`.
    ///
    /// Longitude and latitude come back in degrees, altitude in kilometers.
    /// Components without a declared unit are returned as written.
    pub fn get_spherical_tuple<T: RealField>(&self, key: &str) -> Option<Vector3<T>> {
        let [lon, lat, alt] = self.record.get_numbers::<3>(key)?;
        let angle = self.declared_scale(UnitFamily::Angle, key).unwrap_or(1.0);
        let length = self.declared_scale(UnitFamily::Length, key).unwrap_or(1.0);
        Some(Vector3::new(
            nalgebra::convert(lon * angle),
            nalgebra::convert(lat * angle),
            nalgebra::convert(alt * length),
        ))
    }

    /// Retrieve `[angle x y z]` as a rotation of `angle` about the axis.
    ///
    /// The angle is in degrees unless an angle unit is declared. Returns
    /// `None` for a zero-length axis.
    pub fn get_rotation<T: RealField>(&self, key: &str) -> Option<UnitQuaternion<T>> {
        let [angle, x, y, z] = self.record.get_numbers::<4>(key)?;
        let degrees = angle * self.declared_scale(UnitFamily::Angle, key).unwrap_or(1.0);
        let axis = Vector3::new(
            nalgebra::convert::<f64, T>(x),
            nalgebra::convert(y),
            nalgebra::convert(z),
        );
        let axis = Unit::try_new(axis, nalgebra::zero())?;
        Some(UnitQuaternion::from_axis_angle(
            &axis,
            nalgebra::convert(degrees.to_radians()),
        ))
    }

    /// Canonical factor of the length unit declared for `key`, in km.
    pub fn get_length_scale(&self, key: &str) -> Option<f64> {
        self.declared_scale(UnitFamily::Length, key)
    }

    /// Canonical factor of the time unit declared for `key`, in days.
    pub fn get_time_scale(&self, key: &str) -> Option<f64> {
        self.declared_scale(UnitFamily::Time, key)
    }

    /// Canonical factor of the angle unit declared for `key`, in degrees.
    pub fn get_angle_scale(&self, key: &str) -> Option<f64> {
        self.declared_scale(UnitFamily::Angle, key)
    }

    /// Canonical factor of the mass unit declared for `key`, in Earth masses.
    pub fn get_mass_scale(&self, key: &str) -> Option<f64> {
        self.declared_scale(UnitFamily::Mass, key)
    }

    fn get_scalar<T: Float>(
        &self,
        family: UnitFamily,
        key: &str,
        output_scale: f64,
        default_scale: f64,
    ) -> Option<T> {
        let raw = self.record.get(key)?.as_number()?;
        T::from(raw * self.factor(family, key, output_scale, default_scale))
    }

    fn factor(&self, family: UnitFamily, key: &str, output_scale: f64, default_scale: f64) -> f64 {
        let declared = self.declared_scale(family, key).unwrap_or(if default_scale == 0.0 {
            1.0
        } else {
            default_scale
        });
        declared / output_scale
    }

    fn declared_scale(&self, family: UnitFamily, key: &str) -> Option<f64> {
        let unit = self.record.get_string(&family.unit_key(key))?;
        self.units.scale_factor(family, unit)
    }
}
