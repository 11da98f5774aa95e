//! The communicator, rank and size of whichever team is currently
//! cooperating on one subtree. A `TeamContext` owns its communicator: when
//! the recursion frame that created it returns, the communicator is
//! released by the normal `Drop` path rather than by an explicit call.

use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use crate::geometry::Point;

pub struct TeamContext {
    pub comm: SimpleCommunicator,
    pub rank: i32,
    pub size: i32,
}

impl TeamContext {
    pub fn new(comm: SimpleCommunicator) -> Self {
        let rank = comm.rank();
        let size = comm.size();
        TeamContext { comm, rank, size }
    }

    /// Refreshes each rank's local point count via an all-gather of one
    /// integer per rank. Called at the start of every recursion frame
    /// rather than cached, since the local count changes after every split.
    pub fn gather_counts(&self, local_count: i64) -> Vec<i64> {
        let mut counts = vec![0i64; self.size as usize];
        self.comm.all_gather_into(&local_count, &mut counts[..]);
        counts
    }

    /// Addresses the `k`-th element of a sequence distributed contiguously
    /// across the team according to `counts`, and broadcasts it to every
    /// rank. Used both for plain "first point" addressing (no ordering
    /// requirement on `segment`) and, by the median selector, for addressing
    /// a globally sorted sequence.
    pub fn select_at(&self, segment: &[Point], counts: &[i64], k: i64, n_dims: usize) -> Point {
        let mut acc = 0i64;
        let mut owner = 0i32;
        let mut offset = 0i64;
        for (r, &c) in counts.iter().enumerate() {
            if k < acc + c {
                owner = r as i32;
                offset = k - acc;
                break;
            }
            acc += c;
        }

        let mut buf = vec![0.0f64; n_dims];
        if self.rank == owner {
            buf.copy_from_slice(&segment[offset as usize]);
        }
        self.comm.process_at_rank(owner).broadcast_into(&mut buf[..]);
        buf
    }
}
