//! Gather per-rank slices of plain-old-data records on one root rank.

use std::mem::size_of;

use bytemuck::Pod;

use crate::algs::communicator::{CommTag, Communicator, Wait};
use crate::algs::wire::{WireCount, cast_slice, decode_records, expect_exact_len};
use crate::stage_error::StageError;

/// Collect every rank's `local` slice on `root`.
///
/// Each non-root rank sends a [`WireCount`] on `tag`, then its payload on
/// `tag + 1`. Root receives from every peer in rank order and returns
/// `Some(slices)` indexed by rank; every other rank returns `None`. All ranks
/// meet at a barrier before returning, so the tags are free again afterwards.
pub fn gather_to_root<T, C>(
    comm: &C,
    local: &[T],
    root: usize,
    tag: CommTag,
) -> Result<Option<Vec<Vec<T>>>, StageError>
where
    T: Pod,
    C: Communicator,
{
    let size = comm.size();
    if root >= size {
        return Err(StageError::InvalidRank { rank: root, size });
    }

    let gathered = if comm.rank() == root {
        Some(receive_all(comm, local, root, tag))
    } else {
        let count = [WireCount::new(local.len())];
        comm.isend(root, tag, cast_slice(&count)).wait();
        comm.isend(root, tag.offset(1), cast_slice(local)).wait();
        None
    };
    comm.barrier();
    gathered.transpose()
}

fn receive_all<T, C>(
    comm: &C,
    local: &[T],
    root: usize,
    tag: CommTag,
) -> Result<Vec<Vec<T>>, StageError>
where
    T: Pod,
    C: Communicator,
{
    let mut all = Vec::with_capacity(comm.size());
    for peer in 0..comm.size() {
        if peer == root {
            all.push(local.to_vec());
            continue;
        }
        let count_len = size_of::<WireCount>();
        let count_bytes = comm
            .irecv(peer, tag, count_len)
            .wait()
            .ok_or_else(|| StageError::Communication(format!("no count from rank {peer}")))?;
        expect_exact_len(count_bytes.len(), count_len)?;
        let n = decode_records::<WireCount>(&count_bytes)?
            .first()
            .map(WireCount::get)
            .unwrap_or(0);

        let payload_len = n * size_of::<T>();
        let payload = comm
            .irecv(peer, tag.offset(1), payload_len)
            .wait()
            .ok_or_else(|| StageError::Communication(format!("no payload from rank {peer}")))?;
        expect_exact_len(payload.len(), payload_len)?;
        all.push(decode_records(&payload)?);
    }
    Ok(all)
}
