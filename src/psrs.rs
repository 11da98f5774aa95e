//! Distributed sort of a team's orthogonal projections by their first
//! coordinate: parallel sort by regular sampling (PSRS), with a naive
//! all-gather fallback when the team is too small relative to its point
//! count for regular sampling to produce useful pivots.
//!
//! Redistribution uses a round-based point-to-point exchange (rank `r`
//! sends its per-destination buckets during round `r`, everyone else
//! receives) rather than a single variable-count collective, matching the
//! all-to-all pattern this crate's distributed sort elsewhere builds on.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mpi::traits::*;

use crate::geometry::Point;
use crate::team::TeamContext;

pub struct SortedProjections {
    /// This rank's locally sorted segment of the globally sorted sequence.
    /// For the naive path every rank holds the *entire* sequence, not just
    /// its segment.
    pub segment: Vec<Point>,
    /// Segment sizes per rank after the exchange. Unused (empty) for the
    /// naive path, since there the addressing is purely local.
    pub counts: Vec<i64>,
    pub naive: bool,
}

fn sort_by_key0(v: &mut [Point]) {
    v.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
}

/// Exchanges `n_dims`-wide point buffers team-wide in `team.size` rounds:
/// in round `r`, rank `r` sends `outgoing[dest]` to every other rank and
/// every other rank receives it. Returns, for this rank, the list of
/// segments received from each source rank in source-rank order.
fn round_based_exchange(team: &TeamContext, mut outgoing: Vec<Vec<Point>>, n_dims: usize) -> Vec<Vec<Point>> {
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

/// All-gather fallback used when `n_global < team.size^2`: every rank ends
/// up holding the entire team's projections, sorted.
pub fn naive_gather(team: &TeamContext, local: &[Point], n_dims: usize) -> Vec<Point> {
    let p = team.size as usize;
    let outgoing: Vec<Vec<Point>> = (0..p).map(|_| local.to_vec()).collect();
    // Every destination receives the same local set in the naive path.
    let received = round_based_exchange(team, outgoing, n_dims);

    let mut merged: Vec<Point> = received.into_iter().flatten().collect();
    sort_by_key0(&mut merged);
    merged
}

fn k_way_merge(segments: Vec<Vec<Point>>) -> Vec<Point> {
    struct HeapItem(f64, usize, usize);
    impl PartialEq for HeapItem {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for HeapItem {}
    impl PartialOrd for HeapItem {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }
    impl Ord for HeapItem {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.partial_cmp(other).unwrap_or(std::cmp::Ordering::Equal)
        }
    }

    let total: usize = segments.iter().map(|s| s.len()).sum();
    let mut heap: BinaryHeap<Reverse<HeapItem>> = BinaryHeap::new();
    for (si, seg) in segments.iter().enumerate() {
        if !seg.is_empty() {
            heap.push(Reverse(HeapItem(seg[0][0], si, 0)));
        }
    }

    let mut out = Vec::with_capacity(total);
    while let Some(Reverse(HeapItem(_, si, idx))) = heap.pop() {
        out.push(segments[si][idx].clone());
        if idx + 1 < segments[si].len() {
            heap.push(Reverse(HeapItem(segments[si][idx + 1][0], si, idx + 1)));
        }
    }
    out
}

/// Parallel sort by regular sampling. Assumes `n_global >= team.size^2`.
fn psrs_sort(team: &TeamContext, mut local: Vec<Point>, n_dims: usize) -> (Vec<Point>, Vec<i64>) {
    let p = team.size as usize;

    // Phase 1: local sort.
    sort_by_key0(&mut local);

    // Phase 2: regular sampling, p samples at stride n_local/p.
    let n_local = local.len();
    let step = if p > 0 { n_local / p } else { 0 };
    let mut local_samples = vec![f64::INFINITY; p];
    if n_local > 0 {
        for (i, sample) in local_samples.iter_mut().enumerate() {
            let idx = (i * step).min(n_local - 1);
            *sample = local[idx][0];
        }
    }
    let mut global_samples = vec![0.0f64; p * p];
    team.comm.all_gather_into(&local_samples[..], &mut global_samples[..]);
    global_samples.sort_by(|a, b| a.partial_cmp(b).unwrap());

    // Phase 3: p - 1 pivots at stride p, starting at index p.
    let n_pivots = p.saturating_sub(1);
    let mut pivots = vec![0.0f64; n_pivots];
    for (i, pivot) in pivots.iter_mut().enumerate() {
        *pivot = global_samples[(i + 1) * p];
    }

    // Phase 4a: bucket the locally sorted array by pivot, lower rank wins ties.
    let mut buckets: Vec<Vec<Point>> = vec![Vec::new(); p];
    for pt in local.into_iter() {
        let mut dest = n_pivots;
        for (j, pivot) in pivots.iter().enumerate() {
            if pt[0] <= *pivot {
                dest = j;
                break;
            }
        }
        buckets[dest].push(pt);
    }

    // Phase 4b: exchange bucket data; each received segment is itself
    // sorted, since it is a contiguous slice of a sorted local array.
    let received = round_based_exchange(team, buckets, n_dims);
    let merged = k_way_merge(received);

    let local_len = merged.len() as i64;
    let mut new_counts = vec![0i64; p];
    team.comm.all_gather_into(&local_len, &mut new_counts[..]);

    (merged, new_counts)
}

/// Sorts a team's projections, selecting the naive or PSRS path by the
/// `n_global < team.size^2` predicate.
pub fn sort_team_projections(team: &TeamContext, local: Vec<Point>, counts: &[i64], n_dims: usize) -> SortedProjections {
    let n_global: i64 = counts.iter().sum();
    let p = team.size as i64;

    if n_global < p * p {
        let full = naive_gather(team, &local, n_dims);
        SortedProjections { segment: full, counts: Vec::new(), naive: true }
    } else {
        let (segment, new_counts) = psrs_sort(team, local, n_dims);
        SortedProjections { segment, counts: new_counts, naive: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_way_merge_produces_sorted_output() {
        let segments = vec![
            vec![vec![1.0], vec![4.0], vec![7.0]],
            vec![vec![2.0], vec![3.0]],
            vec![vec![0.0], vec![10.0]],
        ];
        let merged = k_way_merge(segments);
        let keys: Vec<f64> = merged.iter().map(|p| p[0]).collect();
        assert_eq!(keys, vec![0.0, 1.0, 2.0, 3.0, 4.0, 7.0, 10.0]);
    }

    #[test]
    fn sort_by_key0_is_stable_on_first_coordinate() {
        let mut v = vec![vec![3.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]];
        sort_by_key0(&mut v);
        let keys: Vec<f64> = v.iter().map(|p| p[0]).collect();
        assert_eq!(keys, vec![1.0, 2.0, 3.0]);
    }
}
