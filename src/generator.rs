//! Deterministic point generation: the external "collaborator" that stands
//! in for a real input parser. Every rank derives the same global sequence
//! from `seed` and takes its own block-decomposed slice, so no rank ever
//! needs to receive points from another to begin the build.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Point;

/// Start index (inclusive) of rank `r`'s block out of `size` ranks over `n` items.
pub fn block_low(rank: i32, size: i32, n: usize) -> usize {
    ((n as i64) * (rank as i64) / (size as i64)) as usize
}

fn generate_all(n_dims: usize, n_points_global: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_points_global)
        .map(|_| (0..n_dims).map(|_| rng.gen::<f64>()).collect())
        .collect()
}

/// Returns this rank's block-decomposed slice of a deterministically
/// generated point set in `[0, 1)^n_dims`.
pub fn get_points(n_dims: usize, n_points_global: usize, seed: u64, rank: i32, size: i32) -> Vec<Point> {
    let all = generate_all(n_dims, n_points_global, seed);
    let low = block_low(rank, size, n_points_global);
    let high = block_low(rank + 1, size, n_points_global);
    all[low..high].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_decomposition_covers_exactly_once() {
        let n = 17usize;
        let size = 4;
        let mut total = 0usize;
        for r in 0..size {
            total += block_low(r + 1, size, n) - block_low(r, size, n);
        }
        assert_eq!(total, n);
    }

    #[test]
    fn deterministic_for_same_seed() {
        let a = get_points(3, 10, 42, 0, 1);
        let b = get_points(3, 10, 42, 0, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn slices_concatenate_to_full_sequence() {
        let n_dims = 2;
        let n = 9;
        let seed = 7;
        let size = 3;
        let whole = generate_all(n_dims, n, seed);
        let mut reconstructed = Vec::new();
        for r in 0..size {
            reconstructed.extend(get_points(n_dims, n, seed, r, size));
        }
        assert_eq!(whole, reconstructed);
    }
}
