//! Input and console output helpers.
//!
//! - [`point_file`]: reads `x y z` records into a [`PointSet`](crate::geometry::PointSet).
//! - [`root_writer`]: a writer that only prints on the root rank.

pub mod point_file;
pub mod root_writer;

pub use point_file::{PointFileReader, write_echo};
pub use root_writer::RootOnly;
