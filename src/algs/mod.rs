//! Staging algorithms and the process-group plumbing they run on.

pub mod communicator;
pub mod copy;
pub mod gather;
pub mod verify;
pub mod wire;

pub use copy::copy_owned_points;
pub use gather::gather_to_root;
pub use verify::{verify_cover, verify_partition};
