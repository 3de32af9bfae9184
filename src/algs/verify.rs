//! Check that rank ranges tile the global index space.

use itertools::Itertools;

use crate::algs::communicator::{CommTag, Communicator};
use crate::algs::gather::gather_to_root;
use crate::algs::wire::WireRange;
use crate::partition::{LinearMap, OwnedRange};
use crate::stage_error::StageError;

/// Tag pair used by [`verify_partition`].
pub const RANGE_TAG: CommTag = CommTag::new(0x5200);

/// `ranges[k]` is rank `k`'s range. Succeeds iff the non-empty ranges are
/// pairwise disjoint, stay inside `[0, num_global)`, and leave no index
/// unowned.
pub fn verify_cover(ranges: &[OwnedRange], num_global: usize) -> Result<(), StageError> {
    if let Some((rank, r)) = ranges.iter().find_position(|r| r.end > num_global) {
        return Err(StageError::PartitionOutOfRange {
            rank,
            end: r.end,
            num_global,
        });
    }

    // Sweep by start; `covered` is the end of everything seen so far and
    // `last_owner` the rank that reached it.
    let mut covered = 0;
    let mut last_owner = 0;
    for (rank, r) in ranges
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .sorted_by_key(|(rank, r)| (r.start, *rank))
    {
        if r.start > covered {
            return Err(StageError::PartitionGap { index: covered });
        }
        if r.start < covered {
            return Err(StageError::PartitionOverlap {
                index: r.start,
                first: last_owner,
                second: rank,
            });
        }
        covered = r.end;
        last_owner = rank;
    }
    if covered < num_global {
        return Err(StageError::PartitionGap { index: covered });
    }
    Ok(())
}

/// Collective: gather every rank's owned range on `root` and verify there.
///
/// Non-root ranks return `Ok(())` once their range is delivered.
pub fn verify_partition<C: Communicator>(
    map: &LinearMap,
    comm: &C,
    root: usize,
) -> Result<(), StageError> {
    let mine = [WireRange::new(map.my_range())];
    let Some(gathered) = gather_to_root(comm, &mine, root, RANGE_TAG)? else {
        return Ok(());
    };
    let ranges = gathered
        .iter()
        .enumerate()
        .map(|(rank, recs)| {
            recs.first().map(WireRange::range).ok_or_else(|| {
                StageError::Communication(format!("rank {rank} sent no range"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    verify_cover(&ranges, map.num_global())?;
    log::info!(
        "partition of {} rows over {} ranks verified: {}",
        map.num_global(),
        ranges.len(),
        ranges.iter().join(" ")
    );
    Ok(())
}
