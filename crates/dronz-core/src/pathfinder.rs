//! A* route finder over the continuous lng/lat plane.
//!
//! States are positions, not a pre-built graph: the 16 candidate moves out
//! of a position are generated lazily per expansion and filtered against
//! the configured no-fly zones. Nodes live in an arena (index-addressed
//! vector plus a position→index map) so the priority queue, the visited map
//! and the predecessor chain all share them without ownership ambiguity.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::CoreError;
use crate::geometry::{self, ANGLE_MULTIPLE};
use crate::models::{LngLat, NamedRegion};

/// Number of permitted travel bearings (multiples of 22.5 degrees).
pub const COMPASS_DIRECTIONS: usize = 16;

/// Sentinel angle used by the legacy flightpath file format for a hover.
pub const HOVER_ANGLE: f64 = 999.0;

/// Default ceiling on node expansions per search.
///
/// The plane is continuous, so a destination sealed off by no-fly zones
/// would otherwise never exhaust the open set. Hitting the ceiling is
/// reported as "no route", not as an error.
pub const DEFAULT_MAX_EXPANSIONS: usize = 500_000;

/// Travel bearing of a single move.
///
/// `Hover` marks the zero-distance moves at the start and at the
/// destination; it only ever becomes an angle (999) at serialization time,
/// never in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bearing {
    /// One of the 16 compass bearings, in degrees.
    Heading(f64),
    /// No bearing: the drone holds its position for one tick.
    Hover,
}

impl Bearing {
    /// The bearing angle in degrees, or `None` when hovering.
    pub fn angle_degrees(&self) -> Option<f64> {
        match self {
            Bearing::Heading(angle) => Some(*angle),
            Bearing::Hover => None,
        }
    }

    /// The angle as written to the legacy flightpath files (hover = 999).
    pub fn legacy_angle(&self) -> f64 {
        self.angle_degrees().unwrap_or(HOVER_ANGLE)
    }

    pub fn is_hover(&self) -> bool {
        matches!(self, Bearing::Hover)
    }
}

/// A position reached during the search, the bearing that reached it, and
/// the tick at which it was generated.
///
/// Ticks restore chronological order after the backward path
/// reconstruction; they carry no other meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub position: LngLat,
    pub bearing: Bearing,
    pub ticks_since_start: u64,
}

/// Outcome of one [`PathFinder::find_route`] invocation.
///
/// `ok == false` means the open set was exhausted (or the expansion ceiling
/// was hit) without reaching the destination; it is a negative result, not
/// an error, so batch callers can log and move on.
#[derive(Debug, Clone)]
pub struct RouteResult {
    pub ok: bool,
    /// Order this route belongs to, attached by the caller for traceability.
    pub order_no: String,
    /// Chronological moves, start hover first, destination hover last.
    pub route: Vec<Direction>,
    /// Number of nodes popped from the open set, for diagnostics.
    pub nodes_visited: usize,
}

impl RouteResult {
    fn not_found(nodes_visited: usize) -> Self {
        Self {
            ok: false,
            order_no: String::new(),
            route: Vec::new(),
            nodes_visited,
        }
    }

    /// Attach the order number this route was computed for.
    pub fn with_order_no(mut self, order_no: impl Into<String>) -> Self {
        self.order_no = order_no.into();
        self
    }
}

/// Total-ordered f64 wrapper so scores can key a `BinaryHeap`.
#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Exact-position key for the visited map (bit patterns, not tolerances).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PosKey(u64, u64);

impl From<&LngLat> for PosKey {
    fn from(position: &LngLat) -> Self {
        Self(position.lng.to_bits(), position.lat.to_bits())
    }
}

/// Arena-stored search node. Predecessor references point backwards only,
/// so the chain is acyclic by construction.
#[derive(Debug, Clone)]
struct Node {
    direction: Direction,
    previous: Option<usize>,
    g_score: f64,
    f_score: f64,
}

/// Open-set entry; the arena node keeps the authoritative scores, stale
/// heap entries are skipped on pop (lazy deletion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    index: usize,
    g_score: FloatOrd,
    f_score: FloatOrd,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Finds drone routes between two positions, avoiding the configured
/// no-fly zones.
///
/// A `PathFinder` holds no mutable state across invocations: each search
/// owns its queue and maps, so one instance may serve concurrent searches
/// behind a shared reference.
#[derive(Debug, Clone)]
pub struct PathFinder {
    no_fly_zones: Vec<NamedRegion>,
    max_expansions: usize,
}

impl PathFinder {
    pub fn new(no_fly_zones: Vec<NamedRegion>) -> Self {
        Self {
            no_fly_zones,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }

    /// Override the expansion ceiling (see [`DEFAULT_MAX_EXPANSIONS`]).
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Computes a route between two positions.
    ///
    /// Returns an error for invalid input (identical endpoints, malformed
    /// regions); an unreachable destination is reported through
    /// [`RouteResult::ok`] instead. Failures inside the search loop are
    /// re-signaled as [`CoreError::Search`] with the cause attached.
    pub fn find_route(&self, from: LngLat, to: LngLat) -> Result<RouteResult, CoreError> {
        if from == to {
            return Err(CoreError::IdenticalPositions(from));
        }
        for zone in &self.no_fly_zones {
            if zone.vertices.len() < 3 {
                return Err(CoreError::MalformedRegion {
                    name: zone.name.clone(),
                    vertices: zone.vertices.len(),
                });
            }
        }

        self.search(from, to)
            .map_err(|cause| CoreError::Search(Box::new(cause)))
    }

    fn search(&self, from: LngLat, to: LngLat) -> Result<RouteResult, CoreError> {
        let mut arena: Vec<Node> = Vec::new();
        let mut index_by_pos: HashMap<PosKey, usize> = HashMap::new();
        let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
        let mut closed: HashSet<usize> = HashSet::new();
        let mut ticks: u64 = 0;

        let start_f = geometry::distance(&from, &to);
        arena.push(Node {
            direction: Direction {
                position: from,
                bearing: Bearing::Hover,
                ticks_since_start: 0,
            },
            previous: None,
            g_score: 0.0,
            f_score: start_f,
        });
        index_by_pos.insert(PosKey::from(&from), 0);
        open_set.push(Reverse(OpenNode {
            index: 0,
            g_score: FloatOrd(0.0),
            f_score: FloatOrd(start_f),
        }));

        let mut expansions = 0usize;
        let mut nodes_visited = 0usize;

        while let Some(Reverse(current)) = open_set.pop() {
            let current_idx = current.index;
            if closed.contains(&current_idx) {
                continue;
            }
            if current.f_score.0 > arena[current_idx].f_score {
                // Stale entry superseded by a later relaxation.
                continue;
            }
            closed.insert(current_idx);
            nodes_visited += 1;

            let current_pos = arena[current_idx].direction.position;
            if geometry::is_close(&current_pos, &to) {
                ticks += 1;
                return Ok(reconstruct_route(
                    &arena,
                    current_idx,
                    to,
                    ticks,
                    nodes_visited,
                ));
            }

            expansions += 1;
            if expansions > self.max_expansions {
                tracing::warn!(
                    expansions,
                    "expansion ceiling reached, reporting destination as unreachable"
                );
                return Ok(RouteResult::not_found(nodes_visited));
            }

            let current_g = arena[current_idx].g_score;

            'bearings: for i in 0..COMPASS_DIRECTIONS {
                let angle = i as f64 * ANGLE_MULTIPLE;
                let next_pos = geometry::next_position(&current_pos, angle)?;

                for zone in &self.no_fly_zones {
                    if geometry::is_in_region(&next_pos, zone)? {
                        continue 'bearings;
                    }
                }

                let tentative_g = current_g + geometry::distance(&current_pos, &next_pos);
                let tentative_f = tentative_g + geometry::distance(&next_pos, &to);
                if !tentative_g.is_finite() || !tentative_f.is_finite() {
                    return Err(CoreError::NonFiniteScore(next_pos));
                }

                let key = PosKey::from(&next_pos);
                let next_idx = *index_by_pos.entry(key).or_insert_with(|| {
                    arena.push(Node {
                        direction: Direction {
                            position: next_pos,
                            bearing: Bearing::Heading(angle),
                            ticks_since_start: 0,
                        },
                        previous: None,
                        g_score: f64::INFINITY,
                        f_score: f64::INFINITY,
                    });
                    arena.len() - 1
                });

                if closed.contains(&next_idx) {
                    continue;
                }

                if tentative_g < arena[next_idx].g_score {
                    ticks += 1;
                    let node = &mut arena[next_idx];
                    node.previous = Some(current_idx);
                    node.g_score = tentative_g;
                    node.f_score = tentative_f;
                    node.direction = Direction {
                        position: next_pos,
                        bearing: Bearing::Heading(angle),
                        ticks_since_start: ticks,
                    };
                    open_set.push(Reverse(OpenNode {
                        index: next_idx,
                        g_score: FloatOrd(tentative_g),
                        f_score: FloatOrd(tentative_f),
                    }));
                }
            }
        }

        Ok(RouteResult::not_found(nodes_visited))
    }
}

/// Walks the predecessor chain from the goal node back to the start,
/// appends the mandatory destination hover, and restores chronological
/// order by sorting on the tick counter.
fn reconstruct_route(
    arena: &[Node],
    goal_idx: usize,
    to: LngLat,
    final_tick: u64,
    nodes_visited: usize,
) -> RouteResult {
    let mut route = vec![Direction {
        position: to,
        bearing: Bearing::Hover,
        ticks_since_start: final_tick,
    }];

    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        route.push(arena[idx].direction);
        cursor = arena[idx].previous;
    }

    route.sort_by_key(|direction| direction.ticks_since_start);

    RouteResult {
        ok: true,
        order_no: String::new(),
        route,
        nodes_visited,
    }
}
