//! The recursion driver (C9): orchestrates every other component to turn a
//! team's point set into ball tree node records.

use tracing::debug_span;

use crate::error::BallTreeError;
use crate::geometry::Point;
use crate::team::TeamContext;
use crate::{extrema, median, partition, projection, psrs, split};

#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: u64,
    pub center: Point,
    pub radius: f64,
    pub left_id: Option<u64>,
    pub right_id: Option<u64>,
}

/// Builds the subtree rooted at `node_id` for the points currently owned by
/// `team`, appending every node this rank creates to `nodes`.
///
/// Recursion terminates when the team's global point count drops to 1 (a
/// leaf) or to 0 (a rank with nothing left to do). A team of size 1 recurses
/// sequentially on both halves without forming a subcommunicator; a team of
/// size >= 2 splits into two subteams via [`split::split_and_redistribute`]
/// and each subteam recurses only on its own half.
pub fn build_tree(
    team: &TeamContext,
    points: Vec<Point>,
    node_id: u64,
    n_dims: usize,
    nodes: &mut Vec<NodeRecord>,
) -> Result<(), BallTreeError> {
    let span = debug_span!("team", rank = team.rank, size = team.size, node_id);
    let _enter = span.enter();
    tracing::debug!("ENTERED");

    let counts = team.gather_counts(points.len() as i64);
    let n_global: i64 = counts.iter().sum();
    tracing::debug!(n_global, "COUNTS_KNOWN");

    if n_global == 0 {
        return Err(BallTreeError::EmptyTeam { rank: team.rank });
    }

    if n_global == 1 {
        if let Some(point) = points.into_iter().next() {
            nodes.push(NodeRecord {
                id: node_id,
                center: point,
                radius: 0.0,
                left_id: None,
                right_id: None,
            });
        }
        return Ok(());
    }

    let first_point = team.select_at(&points, &counts, 0, n_dims);
    let a = extrema::furthest_from(team, &points, &first_point);
    let b = extrema::furthest_from(team, &points, &a);
    tracing::debug!("ENDPOINTS_FOUND");

    let projections = projection::compute_projections(&points, &a, &b);
    tracing::debug!("PROJECTED");

    let sorted = psrs::sort_team_projections(team, projections.clone(), &counts, n_dims);
    tracing::debug!(naive = sorted.naive, "SORTED");

    let center = median::compute_center(team, &sorted, n_global, n_dims);
    tracing::debug!("CENTER_KNOWN");

    let radius = extrema::max_distance_sq(team, &points, &center).sqrt();

    let left_id = 2 * node_id + 1;
    let right_id = 2 * node_id + 2;

    if team.rank == 0 {
        nodes.push(NodeRecord {
            id: node_id,
            center: center.clone(),
            radius,
            left_id: Some(left_id),
            right_id: Some(right_id),
        });
    }

    let (left_points, right_points) = partition::partition_points(points, &projections, &center);
    tracing::debug!(
        left_local = left_points.len(),
        right_local = right_points.len(),
        "PARTITIONED"
    );

    if team.size == 1 {
        tracing::debug!("SPLIT (sequential, no subcommunicator)");
        build_tree(team, left_points, left_id, n_dims, nodes)?;
        build_tree(team, right_points, right_id, n_dims, nodes)?;
    } else {
        let outcome = split::split_and_redistribute(team, left_points, right_points, n_dims)?;
        tracing::debug!(
            local_points = outcome.local_points.len(),
            is_left = outcome.is_left,
            "REDISTRIBUTED"
        );
        let sub_team = TeamContext::new(outcome.sub_comm);
        let child_id = if outcome.is_left { left_id } else { right_id };
        tracing::debug!(sub_size = sub_team.size, "SPLIT");
        build_tree(&sub_team, outcome.local_points, child_id, n_dims, nodes)?;
    }

    Ok(())
}
