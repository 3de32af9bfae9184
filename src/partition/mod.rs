//! Contiguous row partitions over a process group.

pub mod linear;

pub use linear::{LinearMap, OwnedRange};
