//! Fatal error conditions for the distributed ball tree build.
//!
//! Every error here is unrecoverable: the policy described by the rest of
//! this crate is that a rank which hits one of these aborts the whole job.
//! `main` is the only place that matches on `BallTreeError` and turns it
//! into a process exit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BallTreeError {
    #[error("rank {rank}: team entered with no owning rank for its points")]
    EmptyTeam { rank: i32 },

    #[error("invariant violated: {what}")]
    InvariantViolation { what: String },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("collective operation failed: {0}")]
    Collective(String),
}
