//! Geodetic to local tangent plane conversion.
//!
//! Positions arrive as WGS84 longitude/latitude/altitude and are projected into an
//! East-North-Up frame anchored at a configurable [`ReferencePoint`]. The heavy lifting
//! (ellipsoid to ECEF, ECEF difference rotated into the local frame) is done by
//! `nav_types`; this module only validates input and fixes the axis order.

use crate::error::GeoError;
use nav_types::{ECEF, ENU, WGS84};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Geodetic origin of the local Cartesian frame.
///
/// The default is the fixed session origin used by the desktop viewer
/// (120°E, 60°N at the ellipsoid surface). It is not derived from the replay file,
/// so absolute local coordinates depend on this choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Longitude in decimal degrees
    #[serde(default = "default_reference_longitude")]
    pub longitude_deg: f64,
    /// Latitude in decimal degrees
    #[serde(default = "default_reference_latitude")]
    pub latitude_deg: f64,
    /// Height above the ellipsoid in meters
    #[serde(default)]
    pub altitude_m: f64,
}

fn default_reference_longitude() -> f64 {
    120.0
}

fn default_reference_latitude() -> f64 {
    60.0
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self {
            longitude_deg: default_reference_longitude(),
            latitude_deg: default_reference_latitude(),
            altitude_m: 0.0,
        }
    }
}

impl ReferencePoint {
    pub fn new(longitude_deg: f64, latitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            longitude_deg,
            latitude_deg,
            altitude_m,
        }
    }

    /// Checks that the origin itself is a valid geodetic position.
    pub fn validate(&self) -> Result<(), GeoError> {
        check_geodetic(self.longitude_deg, self.latitude_deg, self.altitude_m)
    }

    /// Projects a geodetic position into this origin's East-North-Up frame.
    pub fn to_local(
        &self,
        longitude_deg: f64,
        latitude_deg: f64,
        altitude_m: f64,
    ) -> Result<LocalPosition, GeoError> {
        geodetic_to_local(longitude_deg, latitude_deg, altitude_m, self)
    }

    fn ecef(&self) -> ECEF<f64> {
        WGS84::from_degrees_and_meters(self.latitude_deg, self.longitude_deg, self.altitude_m)
            .into()
    }
}

/// A position in the local frame, in meters: x = east, y = north, z = up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LocalPosition {
    pub const ORIGIN: LocalPosition = LocalPosition {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn east(&self) -> f64 {
        self.x
    }

    pub fn north(&self) -> f64 {
        self.y
    }

    pub fn up(&self) -> f64 {
        self.z
    }

    /// Linear interpolation `self + f * (other - self)`, applied per axis.
    pub fn lerp(&self, other: &LocalPosition, f: f64) -> LocalPosition {
        *self + (*other - *self) * f
    }

    pub fn distance_to(&self, other: &LocalPosition) -> f64 {
        let d = *other - *self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }
}

impl Add for LocalPosition {
    type Output = LocalPosition;

    fn add(self, rhs: LocalPosition) -> LocalPosition {
        LocalPosition::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for LocalPosition {
    type Output = LocalPosition;

    fn sub(self, rhs: LocalPosition) -> LocalPosition {
        LocalPosition::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for LocalPosition {
    type Output = LocalPosition;

    fn mul(self, f: f64) -> LocalPosition {
        LocalPosition::new(self.x * f, self.y * f, self.z * f)
    }
}

impl fmt::Display for LocalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1},{:.1},{:.1}]", self.x, self.y, self.z)
    }
}

/// Converts longitude/latitude/altitude into the East-North-Up frame of `reference`.
///
/// Deterministic and uncached. Non-finite input and latitudes outside [-90, 90] are
/// rejected so that callers can skip the offending record.
pub fn geodetic_to_local(
    longitude_deg: f64,
    latitude_deg: f64,
    altitude_m: f64,
    reference: &ReferencePoint,
) -> Result<LocalPosition, GeoError> {
    check_geodetic(longitude_deg, latitude_deg, altitude_m)?;
    reference.validate()?;

    let target: ECEF<f64> =
        WGS84::from_degrees_and_meters(latitude_deg, longitude_deg, altitude_m).into();

    // the difference of two ECEF positions is expressed in the frame of the subtrahend
    let enu: ENU<f64> = target - reference.ecef();

    Ok(LocalPosition::new(enu.east(), enu.north(), enu.up()))
}

fn check_geodetic(longitude_deg: f64, latitude_deg: f64, altitude_m: f64) -> Result<(), GeoError> {
    if !longitude_deg.is_finite() {
        return Err(GeoError::non_finite("longitude", longitude_deg));
    }
    if !latitude_deg.is_finite() {
        return Err(GeoError::non_finite("latitude", latitude_deg));
    }
    if !altitude_m.is_finite() {
        return Err(GeoError::non_finite("altitude", altitude_m));
    }
    if !(-90.0..=90.0).contains(&latitude_deg) {
        return Err(GeoError::LatitudeOutOfRange(latitude_deg));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferencePoint {
        ReferencePoint::new(120.0, 60.0, 0.0)
    }

    #[test]
    fn test_reference_maps_to_origin() {
        let p = geodetic_to_local(120.0, 60.0, 0.0, &reference()).unwrap();
        assert!(p.distance_to(&LocalPosition::ORIGIN) < 1e-6);
    }

    #[test]
    fn test_axes_are_east_north_up() {
        let r = reference();

        let east = r.to_local(120.001, 60.0, 0.0).unwrap();
        assert!(east.x > 50.0 && east.x < 60.0, "east offset was {}", east);
        assert!(east.y.abs() < 1.0);

        let north = r.to_local(120.0, 60.001, 0.0).unwrap();
        assert!(north.y > 100.0 && north.y < 120.0, "north offset was {}", north);
        assert!(north.x.abs() < 1e-6);

        let up = r.to_local(120.0, 60.0, 1000.0).unwrap();
        assert!((up.z - 1000.0).abs() < 1e-6);
        assert!(up.x.abs() < 1e-6 && up.y.abs() < 1e-6);
    }

    #[test]
    fn test_west_and_south_are_negative() {
        let r = reference();
        assert!(r.to_local(119.999, 60.0, 0.0).unwrap().x < 0.0);
        assert!(r.to_local(120.0, 59.999, 0.0).unwrap().y < 0.0);
    }

    #[test]
    fn test_relative_geometry_is_independent_of_origin() {
        let a = ReferencePoint::new(120.0, 60.0, 0.0);
        let b = ReferencePoint::new(120.0005, 60.0005, 0.0);

        let d_a = a
            .to_local(120.001, 60.001, 1000.0)
            .unwrap()
            .distance_to(&a.to_local(120.002, 60.001, 1000.0).unwrap());
        let d_b = b
            .to_local(120.001, 60.001, 1000.0)
            .unwrap()
            .distance_to(&b.to_local(120.002, 60.001, 1000.0).unwrap());

        assert!((d_a - d_b).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let r = reference();
        assert!(matches!(
            r.to_local(f64::NAN, 60.0, 0.0),
            Err(GeoError::NonFinite { .. })
        ));
        assert!(matches!(
            r.to_local(120.0, 60.0, f64::INFINITY),
            Err(GeoError::NonFinite { .. })
        ));
        assert_eq!(
            r.to_local(120.0, 95.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(95.0))
        );
    }

    #[test]
    fn test_lerp() {
        let a = LocalPosition::new(0.0, 10.0, 100.0);
        let b = LocalPosition::new(10.0, 20.0, 0.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), LocalPosition::new(5.0, 15.0, 50.0));
    }
}
