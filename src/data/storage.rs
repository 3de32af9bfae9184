//! Pluggable storage for multi-vector buffers.
//!
//! This trait abstracts how a [`MultiVector`](crate::data::multi_vector::MultiVector)
//! keeps its flat local buffer. Only CPU-slice semantics are required.

use core::fmt::{self, Debug};

use crate::stage_error::StageError;

/// Contiguous, indexable storage for `V` with slice access.
pub trait Storage<V>: Debug {
    /// Construct a buffer of `len`, filled with `fill`.
    fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone;

    /// Current length in elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entire read-only buffer.
    fn as_slice(&self) -> &[V];

    /// Entire mutable buffer.
    fn as_mut_slice(&mut self) -> &mut [V];

    /// Copy `src` into the range `[offset .. offset + src.len())`.
    fn write_at(&mut self, offset: usize, src: &[V]) -> Result<(), StageError>
    where
        V: Clone,
    {
        let len = src.len();
        let end = offset
            .checked_add(len)
            .ok_or(StageError::StorageRange { offset, len })?;
        let dst = self
            .as_mut_slice()
            .get_mut(offset..end)
            .ok_or(StageError::StorageRange { offset, len })?;
        dst.clone_from_slice(src);
        Ok(())
    }

    /// Read-only view of `[offset .. offset + len)`.
    fn slice_at(&self, offset: usize, len: usize) -> Result<&[V], StageError> {
        let end = offset
            .checked_add(len)
            .ok_or(StageError::StorageRange { offset, len })?;
        self.as_slice()
            .get(offset..end)
            .ok_or(StageError::StorageRange { offset, len })
    }
}

/// `Vec`-backed storage (default).
#[derive(Clone)]
pub struct VecStorage<V>(pub(crate) Vec<V>);

impl<V> Debug for VecStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecStorage")
            .field("len", &self.0.len())
            .finish()
    }
}

impl<V> Storage<V> for VecStorage<V> {
    fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone,
    {
        Self(vec![fill; len])
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_slice(&self) -> &[V] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [V] {
        &mut self.0
    }
}

impl<V> From<Vec<V>> for VecStorage<V> {
    fn from(v: Vec<V>) -> Self {
        Self(v)
    }
}

impl<V> VecStorage<V> {
    pub fn into_inner(self) -> Vec<V> {
        self.0
    }
}
