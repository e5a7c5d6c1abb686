//! Starlane graph collaborator.
//!
//! The pathfinder only consumes the [`StarlaneGraph`] trait. [`StarlaneMap`] is
//! the in-memory adapter used by hosts that already hold system positions and
//! lane lists, and by the test-suite.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};

/// Numeric identifier for a star system.
pub type SystemId = i64;

/// Cartesian coordinates for a star system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SystemPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Read-only view of systems and the starlanes between them.
///
/// Implementations must be immutable for the duration of a search. The cost of
/// traversing a lane is the linear distance between its endpoints, so
/// [`StarlaneGraph::lower_bound`] must never exceed the true remaining path
/// distance.
pub trait StarlaneGraph {
    /// Whether `system` is part of the graph.
    fn contains(&self, system: SystemId) -> bool;

    /// Systems directly connected to `system` by a starlane.
    fn neighbors(&self, system: SystemId) -> &[SystemId];

    /// Number of hops on the shortest lane path, or `-1` when disconnected.
    fn jump_distance(&self, from: SystemId, to: SystemId) -> i64;

    /// Straight-line distance between two systems.
    fn linear_distance(&self, from: SystemId, to: SystemId) -> f64;

    /// Admissible estimate of the remaining path distance.
    fn lower_bound(&self, from: SystemId, to: SystemId) -> f64 {
        self.linear_distance(from, to)
    }

    /// Length of the shortest lane path ignoring fuel and travel policy.
    fn shortest_path_distance(&self, from: SystemId, to: SystemId) -> Option<f64> {
        if from == to {
            return Some(0.0);
        }

        let mut distances: HashMap<SystemId, f64> = HashMap::new();
        let mut queue = BinaryHeap::new();
        distances.insert(from, 0.0);
        queue.push(QueueEntry::new(from, 0.0));

        while let Some(entry) = queue.pop() {
            let FloatOrd(current) = entry.cost;
            if current > distances.get(&entry.node).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            if entry.node == to {
                return Some(current);
            }

            for &next in self.neighbors(entry.node) {
                let next_cost = current + self.linear_distance(entry.node, next);
                if next_cost < distances.get(&next).copied().unwrap_or(f64::INFINITY) {
                    distances.insert(next, next_cost);
                    queue.push(QueueEntry::new(next, next_cost));
                }
            }
        }

        None
    }
}

/// In-memory starlane graph with precomputed connected components.
#[derive(Debug, Clone, Default)]
pub struct StarlaneMap {
    positions: HashMap<SystemId, SystemPosition>,
    adjacency: Arc<HashMap<SystemId, Vec<SystemId>>>,
    components: HashMap<SystemId, usize>,
}

impl StarlaneMap {
    /// Build a map from positioned systems and bidirectional lanes.
    ///
    /// Lanes referencing a system that was not declared are rejected.
    /// Self-lanes and duplicates are dropped.
    pub fn from_parts<S, L>(systems: S, lanes: L) -> Result<Self>
    where
        S: IntoIterator<Item = (SystemId, SystemPosition)>,
        L: IntoIterator<Item = (SystemId, SystemId)>,
    {
        let positions: HashMap<SystemId, SystemPosition> = systems.into_iter().collect();
        let mut adjacency: HashMap<SystemId, Vec<SystemId>> =
            positions.keys().map(|&id| (id, Vec::new())).collect();

        for (a, b) in lanes {
            for id in [a, b] {
                if !positions.contains_key(&id) {
                    return Err(Error::UnknownSystem { id });
                }
            }
            if a == b {
                continue;
            }
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        // Sorted, deduplicated neighbour lists keep search order deterministic.
        for targets in adjacency.values_mut() {
            targets.sort_unstable();
            targets.dedup();
        }

        let components = label_components(&adjacency);
        debug!(
            systems = positions.len(),
            components = components.values().collect::<HashSet<_>>().len(),
            "built starlane map"
        );

        Ok(Self {
            positions,
            adjacency: Arc::new(adjacency),
            components,
        })
    }

    /// Number of systems in the map.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a system, if known.
    pub fn position(&self, system: SystemId) -> Option<SystemPosition> {
        self.positions.get(&system).copied()
    }

    /// Iterate over all system identifiers in ascending order.
    pub fn system_ids(&self) -> Vec<SystemId> {
        let mut ids: Vec<SystemId> = self.positions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Whether two systems share a connected component.
    pub fn connected(&self, a: SystemId, b: SystemId) -> bool {
        match (self.components.get(&a), self.components.get(&b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

impl StarlaneGraph for StarlaneMap {
    fn contains(&self, system: SystemId) -> bool {
        self.positions.contains_key(&system)
    }

    fn neighbors(&self, system: SystemId) -> &[SystemId] {
        self.adjacency
            .get(&system)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn jump_distance(&self, from: SystemId, to: SystemId) -> i64 {
        if !self.connected(from, to) {
            return -1;
        }
        if from == to {
            return 0;
        }

        let mut hops: HashMap<SystemId, i64> = HashMap::from([(from, 0)]);
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            let depth = hops[&current];
            for &next in self.neighbors(current) {
                if hops.contains_key(&next) {
                    continue;
                }
                if next == to {
                    return depth + 1;
                }
                hops.insert(next, depth + 1);
                queue.push_back(next);
            }
        }

        -1
    }

    fn linear_distance(&self, from: SystemId, to: SystemId) -> f64 {
        match (self.positions.get(&from), self.positions.get(&to)) {
            (Some(a), Some(b)) => a.distance_to(b),
            _ => 0.0,
        }
    }
}

fn label_components(adjacency: &HashMap<SystemId, Vec<SystemId>>) -> HashMap<SystemId, usize> {
    let mut ids: Vec<SystemId> = adjacency.keys().copied().collect();
    ids.sort_unstable();

    let mut components = HashMap::with_capacity(ids.len());
    let mut next_label = 0usize;
    for id in ids {
        if components.contains_key(&id) {
            continue;
        }
        components.insert(id, next_label);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for &next in adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]) {
                if !components.contains_key(&next) {
                    components.insert(next, next_label);
                    queue.push_back(next);
                }
            }
        }
        next_label += 1;
    }
    components
}

/// Total order over `f64` for use as a heap key.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub(crate) f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
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

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: SystemId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: SystemId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
