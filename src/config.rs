//! Command-line surface and run configuration.
//!
//! The algorithm itself treats its inputs as already given; this module is
//! the thin collaborator that turns `argv` into a validated [`RunConfig`].

use argh::FromArgs;

use crate::error::BallTreeError;

#[derive(FromArgs, Debug)]
/// Build a distributed ball tree over deterministically generated points.
pub struct RunArgs {
    /// number of coordinates per point
    #[argh(positional)]
    pub n_dims: usize,

    /// total number of points across all ranks
    #[argh(positional)]
    pub n_points: usize,

    /// seed for the deterministic point generator
    #[argh(positional)]
    pub seed: u64,

    /// raise the tracing verbosity beyond RUST_LOG
    #[argh(switch, short = 'v')]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub n_dims: usize,
    pub n_points: usize,
    pub seed: u64,
    pub verbose: bool,
}

impl RunConfig {
    pub fn from_args(args: RunArgs) -> Result<Self, BallTreeError> {
        if args.n_dims == 0 {
            return Err(BallTreeError::MalformedInput {
                reason: "n_dims must be at least 1".into(),
            });
        }
        if args.n_points == 0 {
            return Err(BallTreeError::MalformedInput {
                reason: "n_points must be at least 1".into(),
            });
        }
        Ok(RunConfig {
            n_dims: args.n_dims,
            n_points: args.n_points,
            seed: args.seed,
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dims() {
        let args = RunArgs { n_dims: 0, n_points: 10, seed: 1, verbose: false };
        assert!(RunConfig::from_args(args).is_err());
    }

    #[test]
    fn rejects_zero_points() {
        let args = RunArgs { n_dims: 3, n_points: 0, seed: 1, verbose: false };
        assert!(RunConfig::from_args(args).is_err());
    }

    #[test]
    fn accepts_valid_args() {
        let args = RunArgs { n_dims: 3, n_points: 10, seed: 1, verbose: false };
        let cfg = RunConfig::from_args(args).unwrap();
        assert_eq!(cfg.n_dims, 3);
        assert_eq!(cfg.n_points, 10);
    }
}
