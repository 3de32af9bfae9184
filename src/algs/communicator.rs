//! Thin façade over the process group a staging run executes on.
//!
//! Three backends implement [`Communicator`]:
//! - [`NoComm`]: a single process, rank 0 of 1.
//! - [`LocalComm`]: `n` ranks inside one process (one thread per rank),
//!   exchanging messages through a shared mailbox.
//! - `MpiComm` (feature `mpi-support`): the MPI world communicator.
//!
//! Messages are *contiguous byte slices*. All handles are **waitable**;
//! callers `.wait()` before they trust a receive buffer.

use std::sync::{Arc, Barrier};
use std::thread::JoinHandle;

use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;

/// Message tag, namespaced per collective so concurrent exchanges never mix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommTag(u16);

impl CommTag {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    /// Derived tag `self + delta` for multi-message protocols.
    pub const fn offset(self, delta: u16) -> Self {
        Self(self.0.wrapping_add(delta))
    }

    #[cfg(feature = "mpi-support")]
    fn as_mpi(self) -> i32 {
        i32::from(self.0)
    }
}

/// Process-group interface used by the staging pipeline.
pub trait Communicator {
    /// Handle returned by `isend`.
    type SendHandle: Wait;
    /// Handle returned by `irecv`.
    type RecvHandle: Wait;

    /// This process's rank in `0..size()`.
    fn rank(&self) -> usize;
    /// Number of ranks in the group.
    fn size(&self) -> usize;
    /// Block until every rank has reached the barrier.
    fn barrier(&self);

    fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) -> Self::SendHandle;
    /// Post a receive of `len` bytes from `peer`.
    fn irecv(&self, peer: usize, tag: CommTag, len: usize) -> Self::RecvHandle;
}

/// Anything that can be waited on.
pub trait Wait {
    /// Wait for completion and return the received data (if any).
    fn wait(self) -> Option<Vec<u8>>;
}

/// Single-process group: rank 0 of 1, messages go nowhere.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Wait for () {
    fn wait(self) -> Option<Vec<u8>> {
        None
    }
}

impl Communicator for NoComm {
    type SendHandle = ();
    type RecvHandle = ();

    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn barrier(&self) {}
    fn isend(&self, _peer: usize, _tag: CommTag, _buf: &[u8]) -> Self::SendHandle {}
    fn irecv(&self, _peer: usize, _tag: CommTag, _len: usize) -> Self::RecvHandle {}
}

// --- LocalComm: in-process ranks, one thread each ---
type Key = (usize, usize, u16); // (src, dst, tag)

#[derive(Debug)]
struct Shared {
    size: usize,
    mailbox: DashMap<Key, Bytes>,
    barrier: Barrier,
}

/// One rank of an in-process group built by [`LocalComm::group`].
///
/// A sender blocks while a previous message with the same `(src, dst, tag)`
/// is still unclaimed, so repeated sends on one tag are delivered in order.
#[derive(Clone, Debug)]
pub struct LocalComm {
    rank: usize,
    shared: Arc<Shared>,
}

impl LocalComm {
    /// Build `size` connected ranks. Hand each one to its own thread.
    pub fn group(size: usize) -> Vec<LocalComm> {
        let shared = Arc::new(Shared {
            size,
            mailbox: DashMap::new(),
            barrier: Barrier::new(size.max(1)),
        });
        (0..size)
            .map(|rank| LocalComm {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

pub struct LocalHandle {
    buf: Arc<Mutex<Option<Vec<u8>>>>,
    handle: Option<JoinHandle<()>>,
}

impl Wait for LocalHandle {
    fn wait(mut self) -> Option<Vec<u8>> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.buf.lock().take()
    }
}

impl Communicator for LocalComm {
    type SendHandle = ();
    type RecvHandle = LocalHandle;

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn barrier(&self) {
        self.shared.barrier.wait();
    }

    fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) -> Self::SendHandle {
        let key = (self.rank, peer, tag.get());
        let mut data = Some(Bytes::copy_from_slice(buf));
        while data.is_some() {
            match self.shared.mailbox.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(data.take().unwrap_or_default());
                }
                Entry::Occupied(_) => {}
            }
            if data.is_some() {
                std::thread::yield_now();
            }
        }
    }

    fn irecv(&self, peer: usize, tag: CommTag, len: usize) -> Self::RecvHandle {
        let key = (peer, self.rank, tag.get());
        let buf = Arc::new(Mutex::new(None));
        let buf_clone = Arc::clone(&buf);
        let shared = Arc::clone(&self.shared);
        let handle = std::thread::spawn(move || {
            loop {
                if let Some((_, bytes)) = shared.mailbox.remove(&key) {
                    let take = len.min(bytes.len());
                    *buf_clone.lock() = Some(bytes[..take].to_vec());
                    break;
                }
                std::thread::yield_now();
            }
        });
        LocalHandle {
            buf,
            handle: Some(handle),
        }
    }
}

/// Keep the first `count` bytes of a receive buffer, as reported by the
/// transport. A negative count yields an empty buffer.
#[cfg(any(test, feature = "mpi-support"))]
fn received_prefix(mut buf: Vec<u8>, count: i32) -> Vec<u8> {
    buf.truncate(usize::try_from(count).unwrap_or(0));
    buf
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::{CommTag, Communicator, Wait, received_prefix};
    use crate::stage_error::StageError;
    use mpi::collective::CommunicatorCollectives;
    use mpi::datatype::Equivalence;
    use mpi::environment::Universe;
    use mpi::point_to_point::{Destination, Source};
    use mpi::topology::{Communicator as MpiCommunicator, SimpleCommunicator};

    /// MPI world communicator. Dropping it finalizes MPI.
    ///
    /// Sends and receives complete eagerly; the returned handles only carry
    /// the received bytes, cut to the length the sender actually sent.
    pub struct MpiComm {
        world: SimpleCommunicator,
        rank: usize,
        size: usize,
        _universe: Universe,
    }

    impl MpiComm {
        pub fn new() -> Result<Self, StageError> {
            let universe = mpi::initialize()
                .ok_or_else(|| StageError::Communication("MPI was already initialized".into()))?;
            let world = universe.world();
            let rank = world.rank() as usize;
            let size = world.size() as usize;
            Ok(Self {
                world,
                rank,
                size,
                _universe: universe,
            })
        }
    }

    pub struct MpiHandle(Option<Vec<u8>>);

    impl Wait for MpiHandle {
        fn wait(self) -> Option<Vec<u8>> {
            self.0
        }
    }

    impl Communicator for MpiComm {
        type SendHandle = MpiHandle;
        type RecvHandle = MpiHandle;

        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        fn barrier(&self) {
            self.world.barrier();
        }

        fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) -> MpiHandle {
            self.world
                .process_at_rank(peer as i32)
                .send_with_tag(buf, tag.as_mpi());
            MpiHandle(None)
        }

        fn irecv(&self, peer: usize, tag: CommTag, len: usize) -> MpiHandle {
            let mut buf = vec![0u8; len];
            let status = self
                .world
                .process_at_rank(peer as i32)
                .receive_into_with_tag(&mut buf[..], tag.as_mpi());
            let count = status.count(u8::equivalent_datatype());
            MpiHandle(Some(received_prefix(buf, count)))
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
