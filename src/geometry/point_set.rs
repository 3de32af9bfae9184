//! Ordered collection of points read from an input file.
//!
//! Index `i` of a `PointSet` is global row `i` of the coordinate store.

use crate::geometry::point::Point3;
use crate::stage_error::StageError;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointSet {
    points: Vec<Point3>,
}

impl PointSet {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at global index `row`.
    pub fn try_get(&self, row: usize) -> Result<&Point3, StageError> {
        self.points.get(row).ok_or(StageError::RowOutOfBounds {
            row,
            len: self.points.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    pub fn into_inner(self) -> Vec<Point3> {
        self.points
    }
}

impl From<Vec<Point3>> for PointSet {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
