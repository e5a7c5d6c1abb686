//! Per-turn supply snapshot.
//!
//! The supply network itself is computed elsewhere. This module only defines
//! the read-only [`SupplyOracle`] view the pathfinder consumes, plus the
//! immutable [`SupplySnapshot`] that is built once per turn and shared by
//! reference between every search of that turn.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{StarlaneGraph, SystemId};

/// Signed supply distance reported for systems that cannot reach supply.
pub const UNREACHABLE_SUPPLY_DISTANCE: i64 = i64::MIN;

/// Read-only supply and visibility queries for one empire on one turn.
pub trait SupplyOracle {
    /// Whether `system` lies inside the empire's supply network.
    fn is_supplied(&self, system: SystemId) -> bool;

    /// `0` when supplied, `-n` when the nearest supplied system is `n` hops away.
    fn distance_from_supply(&self, system: SystemId) -> i64;

    /// Whether the empire holds a standing claim that keeps the lane
    /// `from -> to` safe to travel even though it is contested.
    fn preserves_travel(&self, from: SystemId, to: SystemId) -> bool;

    /// Whether the empire has ever observed `system`.
    fn has_been_observed(&self, system: SystemId) -> bool;
}

/// Immutable supply snapshot for a single turn.
#[derive(Debug, Clone, Default)]
pub struct SupplySnapshot {
    turn: u32,
    supplied: HashSet<SystemId>,
    distances: HashMap<SystemId, i64>,
    preserved_lanes: HashSet<(SystemId, SystemId)>,
    observed: HashSet<SystemId>,
}

impl SupplySnapshot {
    /// Start an empty snapshot for `turn`.
    pub fn new(turn: u32) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Mark systems as supplied. Supplied systems are implicitly observed.
    pub fn with_supplied(mut self, systems: impl IntoIterator<Item = SystemId>) -> Self {
        for system in systems {
            self.supplied.insert(system);
            self.observed.insert(system);
            self.distances.remove(&system);
        }
        self
    }

    /// Mark systems as observed at least once.
    pub fn with_observed(mut self, systems: impl IntoIterator<Item = SystemId>) -> Self {
        self.observed.extend(systems);
        self
    }

    /// Record a contested lane that remains safe for this empire.
    pub fn with_preserved_lane(mut self, a: SystemId, b: SystemId) -> Self {
        self.preserved_lanes.insert(lane_key(a, b));
        self
    }

    /// Override the hop distance outside supply for a single system.
    pub fn with_supply_distance(mut self, system: SystemId, hops_outside: u32) -> Self {
        if !self.supplied.contains(&system) {
            self.distances.insert(system, -i64::from(hops_outside));
        }
        self
    }

    /// Derive the signed distance from supply for every system of `graph` by a
    /// multi-source breadth-first search from the supplied set.
    pub fn with_ranges_from<G: StarlaneGraph + ?Sized>(mut self, graph: &G) -> Self {
        let mut seeds: Vec<SystemId> = self.supplied.iter().copied().collect();
        seeds.sort_unstable();

        let mut hops: HashMap<SystemId, i64> = seeds.iter().map(|&s| (s, 0)).collect();
        let mut queue: VecDeque<SystemId> = seeds.into_iter().collect();
        while let Some(current) = queue.pop_front() {
            let depth = hops[&current];
            for &next in graph.neighbors(current) {
                if hops.contains_key(&next) {
                    continue;
                }
                hops.insert(next, depth + 1);
                queue.push_back(next);
            }
        }

        for (system, depth) in hops {
            if depth > 0 {
                self.distances.insert(system, -depth);
            }
        }
        self
    }

    /// Supplied systems in ascending id order.
    pub fn supplied_systems(&self) -> Vec<SystemId> {
        let mut ids: Vec<SystemId> = self.supplied.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl SupplyOracle for SupplySnapshot {
    fn is_supplied(&self, system: SystemId) -> bool {
        self.supplied.contains(&system)
    }

    fn distance_from_supply(&self, system: SystemId) -> i64 {
        if self.supplied.contains(&system) {
            return 0;
        }
        self.distances
            .get(&system)
            .copied()
            .unwrap_or(UNREACHABLE_SUPPLY_DISTANCE)
    }

    fn preserves_travel(&self, from: SystemId, to: SystemId) -> bool {
        self.preserved_lanes.contains(&lane_key(from, to))
    }

    fn has_been_observed(&self, system: SystemId) -> bool {
        self.observed.contains(&system)
    }
}

fn lane_key(a: SystemId, b: SystemId) -> (SystemId, SystemId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
