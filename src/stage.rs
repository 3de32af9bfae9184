//! End-to-end staging of one rank's coordinates.
//!
//! Every rank runs the same sequence:
//! 1. read the point file (failure to open stops here, before any store work),
//! 2. build the linear map and verify the partition collectively on the root,
//! 3. echo the points (root rank only) and report the owned range,
//! 4. allocate the 3-column store and copy the owned rows,
//! 5. optionally print the local store rows.
//!
//! The only collective is step 2 and nothing before it writes output, so a
//! failing writer on one rank never leaves the others waiting.

use std::io::{Read, Write};

use crate::algs::communicator::Communicator;
use crate::algs::copy::copy_owned_points;
use crate::algs::verify::verify_partition;
use crate::config::{COORD_COLUMNS, StageConfig};
use crate::data::multi_vector::MultiVector;
use crate::geometry::PointSet;
use crate::io::{PointFileReader, RootOnly, write_echo};
use crate::partition::LinearMap;
use crate::stage_error::StageError;

/// Result of a staging run on one rank.
#[derive(Clone, Debug)]
pub struct StagedCoordinates {
    /// All points read from the input (every rank reads the full file).
    pub points: PointSet,
    pub map: LinearMap,
    /// This rank's rows of the coordinate store.
    pub store: MultiVector<f64>,
    /// Rows copied into `store`.
    pub copied: usize,
}

/// Stage from the configured input file.
pub fn stage_from_path<C, E, D>(
    cfg: &StageConfig,
    comm: &C,
    echo: E,
    debug: D,
) -> Result<StagedCoordinates, StageError>
where
    C: Communicator,
    E: Write,
    D: Write,
{
    cfg.validate(comm.size())?;
    let points = PointFileReader::new(cfg.num_points).open(&cfg.input)?;
    stage_points(cfg, comm, points, echo, debug)
}

/// Stage from an already opened reader; `cfg.input` is ignored.
pub fn stage_from_reader<C, R, E, D>(
    cfg: &StageConfig,
    comm: &C,
    reader: R,
    echo: E,
    debug: D,
) -> Result<StagedCoordinates, StageError>
where
    C: Communicator,
    R: Read,
    E: Write,
    D: Write,
{
    cfg.validate(comm.size())?;
    let points = PointFileReader::new(cfg.num_points).read(reader)?;
    stage_points(cfg, comm, points, echo, debug)
}

/// Stage an in-memory point set over `cfg.num_points` global rows.
///
/// `echo` receives the point listing on the root rank only; `debug` receives
/// this rank's range report (and local store rows with `cfg.echo_store`).
pub fn stage_points<C, E, D>(
    cfg: &StageConfig,
    comm: &C,
    points: PointSet,
    echo: E,
    mut debug: D,
) -> Result<StagedCoordinates, StageError>
where
    C: Communicator,
    E: Write,
    D: Write,
{
    cfg.validate(comm.size())?;
    let map = LinearMap::new(cfg.num_points, comm)?;
    verify_partition(&map, comm, cfg.root)?;

    let mut echo = RootOnly::new(echo, comm.rank(), cfg.root);
    write_echo(&points, &mut echo)?;
    echo.flush()?;
    write_range_report(&map, &mut debug)?;

    let mut store = MultiVector::new(map, COORD_COLUMNS)?;
    let copied = copy_owned_points(&points, &mut store)?;
    if cfg.echo_store {
        store.write_local_view(&mut debug)?;
    }
    debug.flush()?;

    Ok(StagedCoordinates {
        points,
        map,
        store,
        copied,
    })
}

/// Per-rank ownership report:
///
/// ```text
/// myRank: 1; lowGlobIndx: 4
/// myRank: 1; highGlobIndx: 6
/// ```
///
/// An empty range prints `none` for both bounds.
pub fn write_range_report<W: Write>(map: &LinearMap, out: &mut W) -> Result<(), StageError> {
    let show = |v: Option<usize>| v.map_or_else(|| "none".to_string(), |i| i.to_string());
    let rank = map.rank();
    writeln!(out, "myRank: {rank}; lowGlobIndx: {}", show(map.min_global()))?;
    writeln!(out, "myRank: {rank}; highGlobIndx: {}", show(map.max_global()))?;
    Ok(())
}
