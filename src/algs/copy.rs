//! Copy a rank's owned slice of a point set into the coordinate store.

use crate::data::multi_vector::MultiVector;
use crate::data::storage::Storage;
use crate::geometry::PointSet;
use crate::stage_error::StageError;

/// For every global row in `store`'s owned range, write point `row`'s
/// `x, y, z` into columns 0, 1, 2. Returns the number of rows copied.
///
/// The owned range is checked against `points` before anything is written,
/// so a map larger than the point set fails with
/// [`StageError::RowOutOfBounds`] and leaves the store untouched. An empty
/// range copies nothing.
pub fn copy_owned_points<S>(
    points: &PointSet,
    store: &mut MultiVector<f64, S>,
) -> Result<usize, StageError>
where
    S: Storage<f64>,
{
    let range = store.map().my_range();
    if let Some(high) = range.high() {
        if high >= points.len() {
            return Err(StageError::RowOutOfBounds {
                row: high,
                len: points.len(),
            });
        }
    }

    for row in range.iter() {
        let p = points.try_get(row)?;
        for (column, value) in p.to_array().into_iter().enumerate() {
            store.replace_global_value(row, column, value)?;
        }
    }
    log::debug!(
        "rank {}: copied {} rows {}",
        store.map().rank(),
        range.len(),
        range
    );
    Ok(range.len())
}
