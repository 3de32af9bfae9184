//! Reader for whitespace separated `x y z` point records.
//!
//! Records are grouped from the token stream, so line layout does not matter:
//! `"0 0 0\n1 0 0"` and `"0 0 0 1\n0 0"` read the same two points.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::geometry::{Point3, PointSet};
use crate::stage_error::StageError;

/// Reads a fixed number of points from text input.
#[derive(Clone, Copy, Debug)]
pub struct PointFileReader {
    num_points: usize,
}

impl PointFileReader {
    pub fn new(num_points: usize) -> Self {
        Self { num_points }
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Open `path` and read `num_points` records from it.
    ///
    /// An unopenable file is [`StageError::InputOpen`]; nothing else is
    /// attempted in that case.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<PointSet, StageError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| StageError::InputOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::debug!("opened {}", path.display());
        self.read(file)
    }

    /// Parse `num_points` records from `reader`.
    ///
    /// Fewer complete records than requested is [`StageError::ShortInput`].
    /// Tokens past the last requested record are ignored with a warning.
    pub fn read<R: Read>(&self, mut reader: R) -> Result<PointSet, StageError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| StageError::InputRead(e.to_string()))?;

        let mut tokens = text.split_whitespace();
        let mut points = Vec::with_capacity(self.num_points);
        for record in 0..self.num_points {
            let mut xyz = [0.0f64; 3];
            for value in xyz.iter_mut() {
                let token = tokens.next().ok_or(StageError::ShortInput {
                    expected: self.num_points,
                    found: record,
                })?;
                *value = token.parse().map_err(|_| StageError::MalformedRecord {
                    record,
                    token: token.to_string(),
                })?;
            }
            points.push(Point3::from(xyz));
        }

        let trailing = tokens.count();
        if trailing > 0 {
            log::warn!(
                "ignoring {trailing} trailing token(s) after {} points",
                self.num_points
            );
        }
        log::info!("read {} points", points.len());
        Ok(PointSet::new(points))
    }
}

/// Write the human readable point listing, numbering points from 1.
pub fn write_echo<W: Write>(points: &PointSet, out: &mut W) -> Result<(), StageError> {
    writeln!(out, "Coordinates of the points:")?;
    for (i, p) in points.iter().enumerate() {
        writeln!(out, "Point {}: {}", i + 1, p)?;
    }
    Ok(())
}
