//! Row-distributed dense multi-vector.
//!
//! A `MultiVector` has `map.num_global()` rows and a fixed number of columns.
//! Each rank stores only the rows its [`LinearMap`] range owns, row-major in a
//! flat [`Storage`] buffer: local row `l`, column `c` lives at
//! `l * num_columns + c`. Rows are addressed by global index; touching a row
//! owned by another rank is an error, never a remote write.

use std::fmt::Display;
use std::io::Write;
use std::marker::PhantomData;

use itertools::Itertools;
use num_traits::Zero;

use crate::data::storage::{Storage, VecStorage};
use crate::partition::LinearMap;
use crate::stage_error::StageError;

#[derive(Clone, Debug)]
pub struct MultiVector<V, S: Storage<V> = VecStorage<V>> {
    map: LinearMap,
    num_columns: usize,
    storage: S,
    _marker: PhantomData<V>,
}

impl<V, S> MultiVector<V, S>
where
    V: Copy + Zero,
    S: Storage<V>,
{
    /// Allocate zero-filled local rows for `map` with `num_columns` columns.
    pub fn new(map: LinearMap, num_columns: usize) -> Result<Self, StageError> {
        if num_columns == 0 {
            return Err(StageError::ZeroColumns);
        }
        let storage = S::with_len(map.num_local() * num_columns, V::zero());
        log::debug!(
            "rank {}: multi-vector with {} local rows x {} columns",
            map.rank(),
            map.num_local(),
            num_columns
        );
        Ok(Self {
            map,
            num_columns,
            storage,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn map(&self) -> &LinearMap {
        &self.map
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    #[inline]
    pub fn num_local_rows(&self) -> usize {
        self.map.num_local()
    }

    #[inline]
    pub fn num_global_rows(&self) -> usize {
        self.map.num_global()
    }

    fn offset(&self, row: usize, column: usize) -> Result<usize, StageError> {
        if column >= self.num_columns {
            return Err(StageError::ColumnOutOfRange {
                column,
                num_columns: self.num_columns,
            });
        }
        let local = self
            .map
            .global_to_local(row)
            .ok_or(StageError::RowNotOwned {
                row,
                rank: self.map.rank(),
            })?;
        Ok(local * self.num_columns + column)
    }

    /// Overwrite the entry at global `row`, `column`.
    pub fn replace_global_value(
        &mut self,
        row: usize,
        column: usize,
        value: V,
    ) -> Result<(), StageError> {
        let off = self.offset(row, column)?;
        self.storage.write_at(off, &[value])
    }

    /// Entry at global `row`, `column`.
    pub fn global_value(&self, row: usize, column: usize) -> Result<V, StageError> {
        let off = self.offset(row, column)?;
        Ok(self.storage.slice_at(off, 1)?[0])
    }

    /// Values of local row `local` (0-based within this rank).
    pub fn local_row(&self, local: usize) -> Result<&[V], StageError> {
        let offset = local
            .checked_mul(self.num_columns)
            .ok_or(StageError::StorageRange {
                offset: local,
                len: self.num_columns,
            })?;
        self.storage.slice_at(offset, self.num_columns)
    }

    /// `(global row, values)` for every locally stored row, in order.
    pub fn local_rows(&self) -> impl Iterator<Item = (usize, &[V])> + '_ {
        self.map
            .my_range()
            .iter()
            .zip(self.storage.as_slice().chunks_exact(self.num_columns))
    }

    /// Write one line per local row, values separated by spaces.
    pub fn write_local_view<W: Write>(&self, out: &mut W) -> Result<(), StageError>
    where
        V: Display,
    {
        for (_, row) in self.local_rows() {
            writeln!(out, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
