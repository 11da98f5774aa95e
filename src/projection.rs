//! Local (no-communication) computation of the one-dimensional projections
//! used as the sort key for the distributed median search.

use crate::geometry::{orthogonal_projection, sub_points, Point};

/// Projects every point in `points` onto the line through `a` with
/// direction `b - a`. Element 0 of each returned projection is the sort key
/// the distributed sort (C5) and the median selector (C6) both use.
pub fn compute_projections(points: &[Point], a: &[f64], b: &[f64]) -> Vec<Point> {
    let n_dims = a.len();
    let mut u = vec![0.0; n_dims];
    sub_points(b, a, &mut u);

    points
        .iter()
        .map(|p| {
            let mut proj = vec![0.0; n_dims];
            orthogonal_projection(&u, a, p, &mut proj);
            proj
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_onto_line() {
        let points = vec![vec![1.0, 5.0], vec![3.0, -2.0]];
        let projections = compute_projections(&points, &[0.0, 0.0], &[2.0, 0.0]);
        assert_eq!(projections[0], vec![1.0, 0.0]);
        assert_eq!(projections[1], vec![3.0, 0.0]);
    }
}
