//! Error taxonomy for the core crate.

use crate::models::LngLat;
use thiserror::Error;

/// Errors surfaced by geometry primitives and the route finder.
///
/// Invalid input is rejected eagerly and is always distinguishable from an
/// unreachable destination, which is *not* an error (see
/// [`crate::pathfinder::RouteResult::ok`]).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A region must have at least 3 vertices to form a closed polygon.
    #[error("region '{name}' must have at least 3 vertices, got {vertices}")]
    MalformedRegion { name: String, vertices: usize },

    /// The drone can only travel along the 16 compass bearings.
    #[error("angle {0} is not a multiple of 22.5 in [0, 360)")]
    InvalidAngle(f64),

    /// Zero-distance routes must be special-cased by the caller.
    #[error("start and end positions are the same: {0}")]
    IdenticalPositions(LngLat),

    /// An unexpected failure inside the search loop, re-signaled with its
    /// original cause attached.
    #[error("route search aborted")]
    Search(#[source] Box<CoreError>),

    /// Cost arithmetic produced a non-finite score.
    #[error("non-finite score at {0}")]
    NonFiniteScore(LngLat),
}
