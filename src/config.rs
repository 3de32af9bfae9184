//! Run configuration for coordinate staging.
//!
//! The defaults reproduce the classic fixed setup: ten points read from
//! `pointDataInput.txt`, echoed from rank 0.

use std::path::PathBuf;

use crate::stage_error::StageError;

/// Default input file name.
pub const DEFAULT_INPUT: &str = "pointDataInput.txt";
/// Default number of points to read.
pub const DEFAULT_NUM_POINTS: usize = 10;
/// Columns of the coordinate store: x, y, z.
pub const COORD_COLUMNS: usize = 3;

/// Settings for one staging run; missing fields take their defaults when
/// deserialized.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Input file with whitespace separated `x y z` records.
    pub input: PathBuf,
    /// Number of points (and global rows) to stage.
    pub num_points: usize,
    /// Rank that prints the point echo.
    pub root: usize,
    /// Print every rank's local store rows after the copy.
    pub echo_store: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            num_points: DEFAULT_NUM_POINTS,
            root: 0,
            echo_store: false,
        }
    }
}

impl StageConfig {
    /// Check the configuration against a group of `size` ranks.
    pub fn validate(&self, size: usize) -> Result<(), StageError> {
        if size == 0 {
            return Err(StageError::EmptyGroup);
        }
        if self.root >= size {
            return Err(StageError::InvalidRank {
                rank: self.root,
                size,
            });
        }
        Ok(())
    }
}
