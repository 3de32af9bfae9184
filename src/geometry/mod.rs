//! Geometry types for staged coordinates.
//!
//! [`Point3`] is a single `(x, y, z)` record and [`PointSet`] the ordered
//! collection read from an input file.

pub mod point;
pub mod point_set;

pub use point::Point3;
pub use point_set::PointSet;
