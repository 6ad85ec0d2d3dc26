use crate::error::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

/// A point in 3-dimensional state space, e.g. the state of the Lorenz system
/// at some instant. Every component is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    coords: [f64; 3],
}

impl DataPoint {
    pub const ORIGIN: DataPoint = DataPoint {
        coords: [0.0, 0.0, 0.0],
    };

    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Ok(Self {
            coords: [
                require_finite("x", x)?,
                require_finite("y", y)?,
                require_finite("z", z)?,
            ],
        })
    }

    /// Caller guarantees every component is finite.
    pub(crate) fn from_finite(coords: [f64; 3]) -> Self {
        debug_assert!(coords.iter().all(|c| c.is_finite()));
        Self { coords }
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    pub fn to_array(&self) -> [f64; 3] {
        self.coords
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::from(self.coords)
    }

    /// Component-by-component sum. Fails if a component overflows.
    pub fn add_point(&self, delta: &DataPoint) -> Result<DataPoint> {
        Self::try_from(self.to_vector() + delta.to_vector())
    }

    pub fn norm(&self) -> f64 {
        self.to_vector().norm()
    }

    pub fn distance(&self, other: &DataPoint) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }
}

pub(crate) fn require_finite(coordinate: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFinite { coordinate, value })
    }
}

impl TryFrom<[f64; 3]> for DataPoint {
    type Error = Error;

    fn try_from(p: [f64; 3]) -> Result<Self> {
        Self::new(p[0], p[1], p[2])
    }
}

impl TryFrom<Vector3<f64>> for DataPoint {
    type Error = Error;

    fn try_from(v: Vector3<f64>) -> Result<Self> {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<DataPoint> for [f64; 3] {
    fn from(p: DataPoint) -> Self {
        p.to_array()
    }
}

impl Add for DataPoint {
    type Output = Result<DataPoint>;

    fn add(self, rhs: DataPoint) -> Result<DataPoint> {
        self.add_point(&rhs)
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x(), self.y(), self.z())
    }
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <[f64; 3]>::deserialize(deserializer)?;
        DataPoint::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan_and_infinity_per_coordinate() {
        assert!(DataPoint::new(1.0, 2.0, 3.0).is_ok());
        match DataPoint::new(f64::NAN, 0.0, 0.0) {
            Err(Error::NonFinite { coordinate, value }) => {
                assert_eq!(coordinate, "x");
                assert!(value.is_nan());
            }
            other => panic!("expected NonFinite error, got {other:?}"),
        }
        let err = DataPoint::new(0.0, f64::INFINITY, 0.0).unwrap_err();
        assert!(err.to_string().starts_with("y must be a finite number"));
        let err = DataPoint::new(0.0, 0.0, f64::NEG_INFINITY).unwrap_err();
        assert!(err.to_string().starts_with("z must be a finite number"));
    }

    #[test]
    fn addition_is_componentwise() {
        let a = DataPoint::new(1.0, 2.0, 3.0).unwrap();
        let b = DataPoint::new(-1.0, 0.5, 10.0).unwrap();
        let sum = (a + b).expect("finite sum");
        assert_eq!(sum.to_array(), [0.0, 2.5, 13.0]);
        assert_eq!(a.add_point(&b).unwrap(), sum);
    }

    #[test]
    fn addition_overflow_is_an_error() {
        let big = DataPoint::new(f64::MAX, 0.0, 0.0).unwrap();
        assert!((big + big).is_err());
    }

    #[test]
    fn display_matches_tuple_format() {
        let p = DataPoint::new(1.0, -2.5, 20.0).unwrap();
        assert_eq!(p.to_string(), "[1, -2.5, 20]");
    }

    #[test]
    fn norm_and_distance() {
        let p = DataPoint::new(3.0, 4.0, 0.0).unwrap();
        assert!((p.norm() - 5.0).abs() < 1e-12);
        assert!((p.distance(&DataPoint::ORIGIN) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn deserializes_from_array_and_validates() {
        #[derive(Deserialize)]
        struct Holder {
            p: DataPoint,
        }
        let ok: Holder = toml::from_str("p = [1.0, 1.0, 20.0]").expect("parse");
        assert_eq!(ok.p.to_array(), [1.0, 1.0, 20.0]);
        assert!(toml::from_str::<Holder>("p = [1.0, nan, 20.0]").is_err());
        assert!(toml::from_str::<Holder>("p = [1.0, 2.0]").is_err());
    }
}
