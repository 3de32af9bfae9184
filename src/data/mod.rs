//! Distributed data containers.
//!
//! - [`storage`]: the flat buffer abstraction.
//! - [`multi_vector`]: row-distributed multi-vector over a linear map.

pub mod multi_vector;
pub mod storage;

pub use multi_vector::MultiVector;
pub use storage::{Storage, VecStorage};
