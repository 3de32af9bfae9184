//! StageError: unified error type for coord-stage public APIs
//!
//! Every fallible operation in the crate returns `Result<_, StageError>` so
//! callers (and the `stage-coords` binary) decide how to report and exit.

use thiserror::Error;

/// Unified error type for coordinate staging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The input file could not be opened.
    #[error("Error opening file `{path}`: {reason}")]
    InputOpen { path: String, reason: String },
    /// Reading from an already opened input failed.
    #[error("Error reading input: {0}")]
    InputRead(String),
    /// A token in the input could not be parsed as a coordinate.
    #[error("Record {record}: cannot parse `{token}` as a coordinate")]
    MalformedRecord { record: usize, token: String },
    /// The input ended before the configured number of points was read.
    #[error("Input holds {found} complete points, expected {expected}")]
    ShortInput { expected: usize, found: usize },
    /// A communicator reported zero ranks.
    #[error("Process group has no ranks")]
    EmptyGroup,
    /// A rank (for example the configured root) does not exist in the group.
    #[error("Rank {rank} is outside a group of {size} ranks")]
    InvalidRank { rank: usize, size: usize },
    /// A global row handed to the copier has no point behind it.
    #[error("Global row {row} is outside the point set of length {len}")]
    RowOutOfBounds { row: usize, len: usize },
    /// A global row is not stored on this rank.
    #[error("Global row {row} is not owned by rank {rank}")]
    RowNotOwned { row: usize, rank: usize },
    /// A multi-vector needs at least one column.
    #[error("Multi-vector must have at least one column")]
    ZeroColumns,
    /// Column index beyond the store's column count.
    #[error("Column {column} is out of range for {num_columns} columns")]
    ColumnOutOfRange { column: usize, num_columns: usize },
    /// No rank owns this global index.
    #[error("Partition gap: global index {index} is owned by no rank")]
    PartitionGap { index: usize },
    /// Two ranks claim the same global index.
    #[error("Partition overlap: global index {index} owned by ranks {first} and {second}")]
    PartitionOverlap {
        index: usize,
        first: usize,
        second: usize,
    },
    /// A rank claims indices past the end of the global index space.
    #[error("Rank {rank} owns up to {end}, past the global size {num_global}")]
    PartitionOutOfRange {
        rank: usize,
        end: usize,
        num_global: usize,
    },
    /// A storage access fell outside the backing buffer.
    #[error("Storage range out of bounds: offset={offset}, len={len}")]
    StorageRange { offset: usize, len: usize },
    /// Message passing between ranks failed.
    #[error("Communication error: {0}")]
    Communication(String),
    /// Writing console output failed.
    #[error("Output error: {0}")]
    Output(String),
}

impl StageError {
    /// Process exit code for this error: 1 when the input could not be
    /// opened, 2 for every other staging failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            StageError::InputOpen { .. } => 1,
            _ => 2,
        }
    }
}

impl From<std::io::Error> for StageError {
    fn from(e: std::io::Error) -> Self {
        StageError::Output(e.to_string())
    }
}
