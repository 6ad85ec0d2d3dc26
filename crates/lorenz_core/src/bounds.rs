use crate::error::{Error, Result};
use crate::point::DataPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens when something inside a box tries to move across one of its
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundType {
    /// The boundary has no effect.
    #[default]
    Permeable,
    /// Values past a bound are mirrored back into the interval.
    Reflective,
    /// Values past a bound re-enter from the opposite side.
    Periodic,
}

impl BoundType {
    /// Maps `v` into `[min, max]` according to this policy.
    ///
    /// Overshoots larger than the interval width are folded (reflective) or
    /// wrapped (periodic) as many times as needed, so the result always lies
    /// in the interval for the non-permeable policies.
    pub fn apply(self, v: f64, min: f64, max: f64) -> f64 {
        if self == BoundType::Permeable || (min <= v && v <= max) {
            return v;
        }
        let width = max - min;
        if width <= 0.0 {
            return min;
        }
        let folded = match self {
            BoundType::Permeable => v,
            BoundType::Reflective => {
                let d = (v - min).rem_euclid(2.0 * width);
                if d <= width {
                    min + d
                } else {
                    min + (2.0 * width - d)
                }
            }
            BoundType::Periodic => min + (v - min).rem_euclid(width),
        };
        folded.clamp(min, max)
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundType::Permeable => "PERMEABLE",
            BoundType::Reflective => "REFLECTIVE",
            BoundType::Periodic => "PERIODIC",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn bound_names(self) -> (&'static str, &'static str) {
        match self {
            Axis::X => ("x0", "x1"),
            Axis::Y => ("y0", "y1"),
            Axis::Z => ("z0", "z1"),
        }
    }
}

/// One side of a [`DataBox`]: an interval with its boundary policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAxisBounds")]
pub struct AxisBounds {
    min: f64,
    max: f64,
    bound_type: BoundType,
}

#[derive(Deserialize)]
struct RawAxisBounds {
    min: f64,
    max: f64,
    #[serde(default)]
    bound_type: BoundType,
}

impl TryFrom<RawAxisBounds> for AxisBounds {
    type Error = Error;

    fn try_from(raw: RawAxisBounds) -> Result<Self> {
        AxisBounds::new(raw.min, raw.max, raw.bound_type)
    }
}

impl AxisBounds {
    /// `v0` and `v1` may be given in either order.
    pub fn new(v0: f64, v1: f64, bound_type: BoundType) -> Result<Self> {
        Self::named(("min", "max"), v0, v1, bound_type)
    }

    /// Caller guarantees `min <= max`, both finite.
    pub(crate) fn from_finite(min: f64, max: f64, bound_type: BoundType) -> Self {
        debug_assert!(min.is_finite() && max.is_finite() && min <= max);
        Self {
            min,
            max,
            bound_type,
        }
    }

    fn named(
        names: (&'static str, &'static str),
        v0: f64,
        v1: f64,
        bound_type: BoundType,
    ) -> Result<Self> {
        if !v0.is_finite() {
            return Err(Error::InvalidBound {
                name: names.0,
                value: v0,
            });
        }
        if !v1.is_finite() {
            return Err(Error::InvalidBound {
                name: names.1,
                value: v1,
            });
        }
        Ok(Self {
            min: v0.min(v1),
            max: v0.max(v1),
            bound_type,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn apply(&self, v: f64) -> f64 {
        self.bound_type.apply(v, self.min, self.max)
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    fn cover(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

/// Axis-aligned rectangular prism in state space, with a boundary policy on
/// each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataBox {
    x: AxisBounds,
    y: AxisBounds,
    z: AxisBounds,
}

impl DataBox {
    pub fn new(x: AxisBounds, y: AxisBounds, z: AxisBounds) -> Self {
        Self { x, y, z }
    }

    /// Box spanned by two opposite corners; every boundary is permeable.
    pub fn from_corners(p0: &DataPoint, p1: &DataPoint) -> Self {
        let axis = |a: f64, b: f64| {
            AxisBounds::from_finite(a.min(b), a.max(b), BoundType::Permeable)
        };
        Self {
            x: axis(p0.x(), p1.x()),
            y: axis(p0.y(), p1.y()),
            z: axis(p0.z(), p1.z()),
        }
    }

    /// Cube with sides of length `size` centred on `center`; every boundary
    /// is permeable.
    pub fn centered(center: DataPoint, size: f64) -> Result<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(Error::InvalidParameter {
                name: "size",
                value: size,
                requirement: "a finite number > 0",
            });
        }
        let half = 0.5 * size;
        let axis = |c: f64| AxisBounds::new(c - half, c + half, BoundType::Permeable);
        Ok(Self {
            x: axis(center.x())?,
            y: axis(center.y())?,
            z: axis(center.z())?,
        })
    }

    /// Same box with `bound_type` on all three axes.
    pub fn with_bound_type(mut self, bound_type: BoundType) -> Self {
        for axis in Axis::ALL {
            self.axis_mut(axis).bound_type = bound_type;
        }
        self
    }

    pub fn axis(&self, axis: Axis) -> &AxisBounds {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisBounds {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Replaces the bounds of one axis. `v0` and `v1` may be given in
    /// either order; on error the box is unchanged.
    pub fn set_bounds(
        &mut self,
        axis: Axis,
        v0: f64,
        v1: f64,
        bound_type: BoundType,
    ) -> Result<()> {
        *self.axis_mut(axis) = AxisBounds::named(axis.bound_names(), v0, v1, bound_type)?;
        Ok(())
    }

    pub fn min_point(&self) -> DataPoint {
        DataPoint::from_finite([self.x.min, self.y.min, self.z.min])
    }

    pub fn max_point(&self) -> DataPoint {
        DataPoint::from_finite([self.x.max, self.y.max, self.z.max])
    }

    pub fn apply_axis(&self, axis: Axis, v: f64) -> f64 {
        self.axis(axis).apply(v)
    }

    /// Maps a raw state through each axis's policy in place.
    pub fn apply_to(&self, p: &mut [f64; 3]) {
        for axis in Axis::ALL {
            let i = axis.index();
            p[i] = self.apply_axis(axis, p[i]);
        }
    }

    pub fn apply_bounds(&self, p: &DataPoint) -> DataPoint {
        let mut coords = p.to_array();
        self.apply_to(&mut coords);
        DataPoint::from_finite(coords)
    }

    pub fn contains(&self, p: &DataPoint) -> bool {
        self.x.contains(p.x()) && self.y.contains(p.y()) && self.z.contains(p.z())
    }

    /// Enlarges the box by the minimum amount needed for `p` to be inside it
    /// or on its boundary.
    pub fn cover(&mut self, p: &DataPoint) {
        self.x.cover(p.x());
        self.y.cover(p.y());
        self.z.cover(p.z());
    }

    pub fn cover_box(&mut self, other: &DataBox) {
        self.cover(&other.min_point());
        self.cover(&other.max_point());
    }
}

impl fmt::Display for DataBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ min={}, max={}, bounds=[{}, {}, {}]}}",
            self.min_point(),
            self.max_point(),
            self.x.bound_type,
            self.y.bound_type,
            self.z.bound_type
        )
    }
}
