#![cfg_attr(docsrs, feature(doc_cfg))]
//! # coord-stage
//!
//! coord-stage reads a fixed number of 3D points from a text file and loads
//! them into a row-distributed, 3-column [`MultiVector`](data::MultiVector)
//! whose rows are split across a process group by a contiguous
//! [`LinearMap`](partition::LinearMap). Each rank copies exactly the rows it
//! owns; the staged store is the hand-off point for an external partitioner.
//!
//! ## Process groups
//! The group is an injected [`Communicator`](algs::communicator::Communicator):
//! - `NoComm` for a single process,
//! - `LocalComm` for several ranks as threads of one process,
//! - `MpiComm` with the `mpi-support` feature.
//!
//! ## Usage
//! ```rust
//! use coord_stage::prelude::*;
//!
//! let cfg = StageConfig { num_points: 2, ..Default::default() };
//! let staged = stage_from_reader(&cfg, &NoComm, "0 0 0\n1 2 3".as_bytes(),
//!                                Vec::new(), Vec::new()).unwrap();
//! assert_eq!(staged.store.global_value(1, 2), Ok(3.0));
//! ```
//!
//! ## Errors
//! All public APIs return [`StageError`](stage_error::StageError) instead of
//! panicking. Only a missing input file maps to exit code 1.

pub mod algs;
pub mod config;
pub mod data;
pub mod geometry;
pub mod io;
pub mod partition;
pub mod stage;
pub mod stage_error;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::communicator::{CommTag, Communicator, LocalComm, NoComm, Wait};
    pub use crate::algs::{copy_owned_points, gather_to_root, verify_cover, verify_partition};
    pub use crate::config::{COORD_COLUMNS, DEFAULT_INPUT, DEFAULT_NUM_POINTS, StageConfig};
    pub use crate::data::{MultiVector, Storage, VecStorage};
    pub use crate::geometry::{Point3, PointSet};
    pub use crate::io::{PointFileReader, RootOnly, write_echo};
    pub use crate::partition::{LinearMap, OwnedRange};
    pub use crate::stage::{
        StagedCoordinates, stage_from_path, stage_from_reader, stage_points, write_range_report,
    };
    pub use crate::stage_error::StageError;
}
