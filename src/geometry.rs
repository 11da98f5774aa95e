//! Scalar geometry primitives shared by every component that touches points.
//!
//! A point is just a `Vec<f64>`: dimensionality `d` is fixed for a run but is
//! not known at compile time, so a const-generic array does not fit here the
//! way it does for the fixed-3D points elsewhere in this crate's history.

pub type Point = Vec<f64>;

/// Squared Euclidean distance between `p` and `q`.
pub fn distance(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// `out = b - a`, component-wise.
pub fn sub_points(b: &[f64], a: &[f64], out: &mut [f64]) {
    for i in 0..a.len() {
        out[i] = b[i] - a[i];
    }
}

/// `out = (p + q) / 2`, component-wise.
pub fn middle_point(p: &[f64], q: &[f64], out: &mut [f64]) {
    for i in 0..p.len() {
        out[i] = 0.5 * (p[i] + q[i]);
    }
}

/// Owned convenience wrapper around [`middle_point`].
pub fn middle_point_owned(p: &[f64], q: &[f64]) -> Point {
    let mut out = vec![0.0; p.len()];
    middle_point(p, q, &mut out);
    out
}

/// Orthogonal projection of `p` onto the line through `a` with direction `ba`.
///
/// `t` is clamped to 0 when `ba` is degenerate (a == b), which leaves the
/// projection pinned at `a` rather than producing NaN.
pub fn orthogonal_projection(ba: &[f64], a: &[f64], p: &[f64], out: &mut [f64]) {
    let n_dims = a.len();
    let mut ap = vec![0.0; n_dims];
    sub_points(p, a, &mut ap);

    let num: f64 = ap.iter().zip(ba.iter()).map(|(x, y)| x * y).sum();
    let den: f64 = ba.iter().map(|x| x * x).sum();
    let t = if den > 0.0 { num / den } else { 0.0 };

    for i in 0..n_dims {
        out[i] = a[i] + t * ba[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_squared() {
        assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
    }

    #[test]
    fn sub_points_basic() {
        let mut out = vec![0.0; 2];
        sub_points(&[3.0, 5.0], &[1.0, 1.0], &mut out);
        assert_eq!(out, vec![2.0, 4.0]);
    }

    #[test]
    fn middle_point_basic() {
        let out = middle_point_owned(&[0.0, 0.0], &[2.0, 4.0]);
        assert_eq!(out, vec![1.0, 2.0]);
    }

    #[test]
    fn projection_onto_axis() {
        let mut ba = vec![0.0; 2];
        sub_points(&[2.0, 0.0], &[0.0, 0.0], &mut ba);
        let mut out = vec![0.0; 2];
        orthogonal_projection(&ba, &[0.0, 0.0], &[1.0, 5.0], &mut out);
        assert_eq!(out, vec![1.0, 0.0]);
    }

    #[test]
    fn projection_degenerate_line_pins_to_a() {
        let ba = vec![0.0, 0.0];
        let mut out = vec![0.0; 2];
        orthogonal_projection(&ba, &[1.0, 1.0], &[5.0, 5.0], &mut out);
        assert_eq!(out, vec![1.0, 1.0]);
    }
}
