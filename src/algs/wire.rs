//! Fixed, little-endian wire records for rank-to-rank exchanges.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::mem::size_of;

use crate::partition::OwnedRange;
use crate::stage_error::StageError;

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

/// Decode a received byte buffer into owned records.
///
/// Copies through `pod_read_unaligned` since receive buffers carry no
/// alignment guarantee.
pub fn decode_records<T: Pod>(bytes: &[u8]) -> Result<Vec<T>, StageError> {
    let width = size_of::<T>();
    if width == 0 || bytes.len() % width != 0 {
        return Err(StageError::Communication(format!(
            "{} bytes is not a whole number of {width}-byte records",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

pub fn expect_exact_len(actual: usize, expected: usize) -> Result<(), StageError> {
    if actual == expected {
        Ok(())
    } else {
        Err(StageError::Communication(format!(
            "expected {expected} bytes, got {actual}"
        )))
    }
}

/// All multi-byte integers in these structs are **little-endian** on the wire.
/// We store them pre-LE with `.to_le()` and decode with `.from_le()`.

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u64, // count of following records
}

impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u64).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u64::from_le(self.n_le) as usize
    }
}

/// A rank's owned global range `[start, end)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireRange {
    pub start_le: u64,
    pub end_le: u64,
}

impl WireRange {
    pub fn new(range: OwnedRange) -> Self {
        Self {
            start_le: (range.start as u64).to_le(),
            end_le: (range.end as u64).to_le(),
        }
    }
    pub fn range(&self) -> OwnedRange {
        OwnedRange::new(
            u64::from_le(self.start_le) as usize,
            u64::from_le(self.end_le) as usize,
        )
    }
}

const_assert_eq!(size_of::<WireCount>(), 8);
const_assert_eq!(size_of::<WireRange>(), 16);
