//! Team splitting and data redistribution (C8).
//!
//! The source this is grounded on computes send/receive counts for the
//! post-split exchange but stops short of performing it. This module
//! completes that step: after computing where each point must land, it
//! performs the actual point-to-point exchange and forms the two
//! subcommunicators.

use mpi::topology::{Color, SimpleCommunicator};
use mpi::traits::*;

use crate::error::BallTreeError;
use crate::geometry::Point;
use crate::team::TeamContext;

pub struct SplitOutcome {
    pub sub_comm: SimpleCommunicator,
    pub local_points: Vec<Point>,
    pub is_left: bool,
}

/// Start index (inclusive) of subteam-local rank `r` out of `p` over `n`.
fn block_low(r: i64, p: i64, n: i64) -> i64 {
    (n * r) / p
}

/// Buckets `local` (a contiguous slice of a globally ordered half starting
/// at `global_offset` out of `n_global`) by which of `p_dest` destination
/// ranks owns its block under block decomposition.
fn bucket_by_blocks(local: Vec<Point>, global_offset: i64, n_global: i64, p_dest: i64) -> Vec<Vec<Point>> {
    let mut buckets: Vec<Vec<Point>> = vec![Vec::new(); p_dest.max(0) as usize];
    if p_dest == 0 {
        return buckets;
    }
    for (i, pt) in local.into_iter().enumerate() {
        let g = global_offset + i as i64;
        let mut lo = 0i64;
        let mut hi = p_dest - 1;
        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if block_low(mid, p_dest, n_global) <= g {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        buckets[lo as usize].push(pt);
    }
    buckets
}

/// Splits the team into a left subteam `[0, size/2)` and a right subteam
/// `[size/2, size)`, exchanges each rank's left/right partition so every
/// rank ends up owning a near-equal block of the subteam it now belongs to,
/// and forms the new subcommunicator. Requires `team.size >= 2`; the
/// `team.size == 1` case recurses sequentially on the same rank instead and
/// never calls this function.
pub fn split_and_redistribute(
    team: &TeamContext,
    left_local: Vec<Point>,
    right_local: Vec<Point>,
    n_dims: usize,
) -> Result<SplitOutcome, BallTreeError> {
    if team.size < 2 {
        return Err(BallTreeError::InvariantViolation {
            what: "split_and_redistribute called on a team of size 1".into(),
        });
    }

    let left_counts = team.gather_counts(left_local.len() as i64);
    let right_counts = team.gather_counts(right_local.len() as i64);

    let n_left_global: i64 = left_counts.iter().sum();
    let n_right_global: i64 = right_counts.iter().sum();

    let p_left = (team.size / 2) as i64;
    let p_right = team.size as i64 - p_left;

    let left_offset: i64 = left_counts[..team.rank as usize].iter().sum();
    let right_offset: i64 = right_counts[..team.rank as usize].iter().sum();

    let left_buckets = bucket_by_blocks(left_local, left_offset, n_left_global, p_left);
    let right_buckets = bucket_by_blocks(right_local, right_offset, n_right_global, p_right);

    // Destination j < p_left is a left-subteam rank (absolute rank j);
    // destination j >= p_left is right-subteam rank (absolute rank j).
    let mut combined: Vec<Vec<Point>> = Vec::with_capacity(team.size as usize);
    combined.extend(left_buckets);
    combined.extend(right_buckets);

    let received = exchange(team, combined, n_dims);
    let local_points: Vec<Point> = received.into_iter().flatten().collect();

    let is_left = (team.rank as i64) < p_left;
    let color = if is_left { 0 } else { 1 };
    let sub_comm = team
        .comm
        .split_by_color(Color::with_value(color))
        .ok_or_else(|| BallTreeError::Collective("split_by_color returned no communicator".into()))?;

    Ok(SplitOutcome { sub_comm, local_points, is_left })
}

fn exchange(team: &TeamContext, mut outgoing: Vec<Vec<Point>>, n_dims: usize) -> Vec<Vec<Point>> {
    let p = team.size as usize;
    let mut received: Vec<Vec<Point>> = vec![Vec::new(); p];

    for r in 0..team.size {
        if r == team.rank {
            received[team.rank as usize] = std::mem::take(&mut outgoing[team.rank as usize]);
            for dest in 0..team.size {
                if dest != team.rank {
                    let flat: Vec<f64> = outgoing[dest as usize].iter().flatten().copied().collect();
                    team.comm.process_at_rank(dest).send(&flat[..]);
                }
            }
        } else {
            let (buf, _status) = team.comm.process_at_rank(r).receive_vec::<f64>();
            received[r as usize] = buf.chunks(n_dims).map(|c| c.to_vec()).collect();
        }
        team.comm.barrier();
    }

    received
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_by_blocks_covers_all_points() {
        let local: Vec<Point> = (0..10).map(|i| vec![i as f64]).collect();
        let buckets = bucket_by_blocks(local, 0, 10, 3);
        let total: usize = buckets.iter().map(|b| b.len()).sum();
        assert_eq!(total, 10);
        for (i, bucket) in buckets.iter().enumerate() {
            let expected = (block_low(i as i64 + 1, 3, 10) - block_low(i as i64, 3, 10)) as usize;
            assert_eq!(bucket.len(), expected);
        }
    }

    #[test]
    fn bucket_by_blocks_respects_global_offset() {
        let local: Vec<Point> = (5..10).map(|i| vec![i as f64]).collect();
        let buckets = bucket_by_blocks(local, 5, 10, 3);
        let total: usize = buckets.iter().map(|b| b.len()).sum();
        assert_eq!(total, 5);
    }
}
