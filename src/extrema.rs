//! Finding the point of a team's set furthest from a given point, and the
//! furthest squared distance from a given point — the two all-gather based
//! reductions used to locate the splitting line endpoints and the node
//! radius.

use mpi::traits::*;

use crate::geometry::{distance, Point};
use crate::team::TeamContext;

/// Returns the point in the team's local sets (over all ranks) furthest
/// from `p`. Ties are broken by lowest rank, then lowest local index: the
/// scan below uses strict `>` throughout, so the first maximum encountered
/// in rank-then-index order always wins.
pub fn furthest_from(team: &TeamContext, local_points: &[Point], p: &[f64]) -> Point {
    let n_dims = p.len();

    let mut best_dist = -1.0f64;
    let mut best_idx: i64 = -1;
    for (i, pt) in local_points.iter().enumerate() {
        let d = distance(pt, p);
        if d > best_dist {
            best_dist = d;
            best_idx = i as i64;
        }
    }

    let mut local_candidate = vec![0.0f64; n_dims + 1];
    if best_idx >= 0 {
        local_candidate[..n_dims].copy_from_slice(&local_points[best_idx as usize]);
    }
    local_candidate[n_dims] = best_dist;

    let mut gathered = vec![0.0f64; (n_dims + 1) * team.size as usize];
    team.comm.all_gather_into(&local_candidate[..], &mut gathered[..]);

    let mut winner_rank = 0usize;
    let mut winner_dist = f64::NEG_INFINITY;
    for r in 0..team.size as usize {
        let d = gathered[r * (n_dims + 1) + n_dims];
        if d > winner_dist {
            winner_dist = d;
            winner_rank = r;
        }
    }

    gathered[winner_rank * (n_dims + 1)..winner_rank * (n_dims + 1) + n_dims].to_vec()
}

/// Returns the furthest squared distance from `p` to any point the team
/// holds locally, reduced across the whole team.
pub fn max_distance_sq(team: &TeamContext, local_points: &[Point], p: &[f64]) -> f64 {
    let local_max = local_points
        .iter()
        .map(|pt| distance(pt, p))
        .fold(f64::NEG_INFINITY, f64::max);

    let mut all = vec![0.0f64; team.size as usize];
    team.comm.all_gather_into(&local_max, &mut all[..]);
    all.into_iter().fold(f64::NEG_INFINITY, f64::max)
}
