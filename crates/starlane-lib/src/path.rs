//! Fuel-constrained resupply pathfinding.
//!
//! The search is an A* over `(system, distance, fuel)` labels rather than over
//! systems. Several labels may coexist for one system; a new label is dropped
//! only when an existing label for the same system has both lower-or-equal
//! distance and greater-or-equal fuel. Labels are stored once in an arena and
//! linked to their parent, so extending a path never mutates an existing one.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::error::{ensure_fuel, Error, Result};
use crate::fuel::legal_hop;
use crate::graph::{FloatOrd, StarlaneGraph, SystemId};
use crate::policy::TravelPolicy;
use crate::supply::SupplyOracle;

/// Relative slack allowed when checking the heuristic against the true
/// shortest distance, to absorb floating-point summation error.
const HEURISTIC_TOLERANCE: f64 = 1e-9;

/// Inputs for a single resupply search.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub start: SystemId,
    pub target: SystemId,
    /// Fuel currently in the tank.
    pub fuel: f64,
    pub max_fuel: f64,
    pub policy: TravelPolicy,
    /// Fuel that must remain on arrival for the target to count as reached.
    pub min_fuel_at_target: f64,
    /// Systems the route may not pass through. The start is never filtered.
    pub avoid: HashSet<SystemId>,
}

impl PathRequest {
    /// Request with no arrival requirement, no avoided systems and the
    /// default travel policy.
    pub fn new(start: SystemId, target: SystemId, fuel: f64, max_fuel: f64) -> Self {
        Self {
            start,
            target,
            fuel,
            max_fuel,
            policy: TravelPolicy::default(),
            min_fuel_at_target: 0.0,
            avoid: HashSet::new(),
        }
    }

    pub fn with_policy(mut self, policy: TravelPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_min_fuel_at_target(mut self, fuel: f64) -> Self {
        self.min_fuel_at_target = fuel;
        self
    }

    pub fn avoiding(mut self, systems: impl IntoIterator<Item = SystemId>) -> Self {
        self.avoid.extend(systems);
        self
    }

    fn validate<G: StarlaneGraph + ?Sized>(&self, graph: &G) -> Result<()> {
        for id in [self.start, self.target] {
            if !graph.contains(id) {
                return Err(Error::UnknownSystem { id });
            }
        }
        ensure_fuel("fuel", self.fuel)?;
        ensure_fuel("max_fuel", self.max_fuel)?;
        ensure_fuel("min_fuel_at_target", self.min_fuel_at_target)?;
        Ok(())
    }
}

/// A planned route. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub total_distance: f64,
    pub fuel_at_arrival: f64,
    /// Ordered systems including start and target.
    pub systems: Vec<SystemId>,
}

impl PathResult {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.systems.len().saturating_sub(1)
    }

    /// First system after the start, if the route leaves it at all.
    pub fn next_hop(&self) -> Option<SystemId> {
        self.systems.get(1).copied()
    }
}

/// A `(distance, fuel)` pair recorded for one system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelLabel {
    pub distance: f64,
    pub fuel: f64,
}

impl FuelLabel {
    /// At least as short and at least as much fuel as `other`.
    pub fn covers(&self, other: &FuelLabel) -> bool {
        self.distance <= other.distance && self.fuel >= other.fuel
    }

    /// Covers `other` and is strictly better in one criterion.
    pub fn dominates(&self, other: &FuelLabel) -> bool {
        self.covers(other) && (self.distance < other.distance || self.fuel > other.fuel)
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub expanded: usize,
    pub policy_rejected: usize,
    /// Hops refused because the next system is on the request's avoid list.
    pub avoided: usize,
    pub fuel_exhausted: usize,
    pub dominated: usize,
    pub pruned_by_detour: usize,
}

/// Result of a search together with its diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub path: Option<PathResult>,
    pub stats: SearchStats,
    /// Non-dominated labels per system when the search stopped.
    pub frontiers: BTreeMap<SystemId, Vec<FuelLabel>>,
}

/// Find the shortest admissible route that respects the fuel model.
///
/// Returns `Ok(None)` when no route exists under the request's policy, fuel
/// and detour bound.
pub fn find_path_with_resupply<G, S>(
    graph: &G,
    supply: &S,
    request: &PathRequest,
    config: &SearchConfig,
) -> Result<Option<PathResult>>
where
    G: StarlaneGraph + ?Sized,
    S: SupplyOracle + ?Sized,
{
    Ok(run_search(graph, supply, request, config, false)?.path)
}

/// Like [`find_path_with_resupply`], returning counters and final frontiers.
pub fn search_with_resupply<G, S>(
    graph: &G,
    supply: &S,
    request: &PathRequest,
    config: &SearchConfig,
) -> Result<SearchReport>
where
    G: StarlaneGraph + ?Sized,
    S: SupplyOracle + ?Sized,
{
    run_search(graph, supply, request, config, true)
}

#[derive(Debug, Clone, Copy)]
struct Label {
    system: SystemId,
    distance: f64,
    fuel: f64,
    parent: Option<usize>,
    live: bool,
}

impl Label {
    fn key(&self) -> FuelLabel {
        FuelLabel {
            distance: self.distance,
            fuel: self.fuel,
        }
    }
}

fn run_search<G, S>(
    graph: &G,
    supply: &S,
    request: &PathRequest,
    config: &SearchConfig,
    collect_frontiers: bool,
) -> Result<SearchReport>
where
    G: StarlaneGraph + ?Sized,
    S: SupplyOracle + ?Sized,
{
    request.validate(graph)?;
    config.validate()?;

    let PathRequest {
        start,
        target,
        fuel,
        max_fuel,
        policy,
        min_fuel_at_target,
        ref avoid,
    } = *request;

    let mut report = SearchReport::default();

    if start == target && fuel >= min_fuel_at_target {
        report.path = Some(PathResult {
            total_distance: 0.0,
            fuel_at_arrival: fuel,
            systems: vec![start],
        });
        return Ok(report);
    }

    if graph.jump_distance(start, target) < 0 || avoid.contains(&target) {
        debug!(start, target, "target unreachable; skipping search");
        return Ok(report);
    }

    let Some(shortest) = graph.shortest_path_distance(start, target) else {
        debug!(start, target, "no lane path to target");
        return Ok(report);
    };

    if max_fuel == 0.0 {
        warn!(start, target, "fleet has no fuel capacity; only supplied hops are possible");
    }

    let start_estimate = lower_bound(graph, start, target);
    assert!(
        start_estimate <= shortest + HEURISTIC_TOLERANCE * shortest.max(1.0),
        "lower bound {start_estimate} from {start} to {target} exceeds shortest distance {shortest}"
    );

    let limit = config.detour_limit(shortest);
    debug!(
        start,
        target,
        fuel,
        max_fuel,
        %policy,
        shortest,
        limit,
        "starting resupply search"
    );

    let mut arena: Vec<Label> = vec![Label {
        system: start,
        distance: 0.0,
        fuel,
        parent: None,
        live: true,
    }];
    let mut frontiers: HashMap<SystemId, Vec<usize>> = HashMap::from([(start, vec![0])]);
    let mut queue = BinaryHeap::new();
    let mut sequence = 0usize;
    queue.push(SearchEntry::new(0, start_estimate, fuel, sequence));

    while let Some(entry) = queue.pop() {
        let current = arena[entry.label];
        if !current.live {
            continue;
        }

        if current.system == target && current.fuel >= min_fuel_at_target {
            report.path = Some(reconstruct_path(&arena, entry.label));
            break;
        }

        report.stats.expanded += 1;
        let from_supplied = supply.is_supplied(current.system);

        for &next in graph.neighbors(current.system) {
            if avoid.contains(&next) {
                report.stats.avoided += 1;
                continue;
            }
            if !policy.admits(current.system, next, supply) {
                report.stats.policy_rejected += 1;
                continue;
            }

            let Some(next_fuel) =
                legal_hop(from_supplied, supply.is_supplied(next), current.fuel, max_fuel)
            else {
                report.stats.fuel_exhausted += 1;
                continue;
            };

            let next_distance = current.distance + graph.linear_distance(current.system, next);
            let estimate = next_distance + lower_bound(graph, next, target);
            if estimate > limit {
                report.stats.pruned_by_detour += 1;
                trace!(from = current.system, to = next, estimate, limit, "pruned detour");
                continue;
            }

            let candidate = FuelLabel {
                distance: next_distance,
                fuel: next_fuel,
            };
            let recorded = frontiers.entry(next).or_default();
            if recorded.iter().any(|&idx| arena[idx].key().covers(&candidate)) {
                report.stats.dominated += 1;
                continue;
            }

            // Retire labels the new one dominates so each frontier stays a
            // Pareto set.
            recorded.retain(|&idx| {
                let keep = !candidate.covers(&arena[idx].key());
                if !keep {
                    arena[idx].live = false;
                }
                keep
            });

            let idx = arena.len();
            arena.push(Label {
                system: next,
                distance: next_distance,
                fuel: next_fuel,
                parent: Some(entry.label),
                live: true,
            });
            recorded.push(idx);

            sequence += 1;
            queue.push(SearchEntry::new(idx, estimate, next_fuel, sequence));
        }
    }

    debug!(
        start,
        target,
        found = report.path.is_some(),
        expanded = report.stats.expanded,
        dominated = report.stats.dominated,
        pruned = report.stats.pruned_by_detour,
        labels = arena.len(),
        "resupply search finished"
    );

    if collect_frontiers {
        report.frontiers = frontiers
            .into_iter()
            .map(|(system, labels)| {
                (
                    system,
                    labels.into_iter().map(|idx| arena[idx].key()).collect(),
                )
            })
            .collect();
    }

    Ok(report)
}

fn lower_bound<G: StarlaneGraph + ?Sized>(graph: &G, from: SystemId, to: SystemId) -> f64 {
    let estimate = graph.lower_bound(from, to);
    assert!(
        estimate.is_finite() && estimate >= 0.0,
        "lower bound from {from} to {to} must be finite and non-negative, got {estimate}"
    );
    estimate
}

fn reconstruct_path(arena: &[Label], goal: usize) -> PathResult {
    let mut systems = Vec::new();
    let mut current = Some(goal);
    while let Some(idx) = current {
        systems.push(arena[idx].system);
        current = arena[idx].parent;
    }
    systems.reverse();

    PathResult {
        total_distance: arena[goal].distance,
        fuel_at_arrival: arena[goal].fuel,
        systems,
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct SearchEntry {
    label: usize,
    estimate: FloatOrd,
    fuel: FloatOrd,
    sequence: usize,
}

impl SearchEntry {
    fn new(label: usize, estimate: f64, fuel: f64, sequence: usize) -> Self {
        Self {
            label,
            estimate: FloatOrd(estimate),
            fuel: FloatOrd(fuel),
            sequence,
        }
    }
}

impl Ord for SearchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest estimate first, then most fuel, then insertion order.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| self.fuel.cmp(&other.fuel))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for SearchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominance_requires_a_strict_improvement() {
        let a = FuelLabel {
            distance: 1.0,
            fuel: 2.0,
        };
        let b = FuelLabel {
            distance: 2.0,
            fuel: 2.0,
        };
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(a.covers(&a));
        assert!(!a.dominates(&a));

        let c = FuelLabel {
            distance: 0.5,
            fuel: 1.0,
        };
        assert!(!a.covers(&c));
        assert!(!c.covers(&a));
    }

    #[test]
    fn search_entries_pop_lowest_estimate_then_most_fuel() {
        let mut heap = BinaryHeap::new();
        heap.push(SearchEntry::new(0, 5.0, 1.0, 0));
        heap.push(SearchEntry::new(1, 3.0, 0.0, 1));
        heap.push(SearchEntry::new(2, 3.0, 2.0, 2));
        heap.push(SearchEntry::new(3, 3.0, 2.0, 3));

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.label)).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
    }

    #[test]
    fn path_result_helpers() {
        let result = PathResult {
            total_distance: 2.0,
            fuel_at_arrival: 1.0,
            systems: vec![4, 5, 6],
        };
        assert_eq!(result.hop_count(), 2);
        assert_eq!(result.next_hop(), Some(5));

        let stay = PathResult {
            total_distance: 0.0,
            fuel_at_arrival: 1.0,
            systems: vec![4],
        };
        assert_eq!(stay.hop_count(), 0);
        assert_eq!(stay.next_hop(), None);
    }
}
