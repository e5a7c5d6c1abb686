//! Route advice for fleets.
//!
//! This module provides:
//! - [`FleetState`] - The fleet fields a route depends on
//! - [`RouteOptions`] - Per-call overrides (policy, return guarantee, avoided systems)
//! - [`RouteAdvisor`] - Resolves a fleet's travel policy and delegates to the
//!   resupply pathfinder
//! - [`resupply_stops`] - Systems along a route where the fleet refuels
//!
//! Repair and supply lookups live in `repair`, parallel planning of many
//! fleets in `batch`.
//!
//! # Example
//!
//! ```
//! use starlane_lib::{
//!     AdvisorConfig, FleetState, MissionIntent, RouteAdvisor, RouteOptions, StarlaneMap,
//!     SupplySnapshot, SystemPosition,
//! };
//!
//! let map = StarlaneMap::from_parts(
//!     (1..=3).map(|id| (id, SystemPosition::new(id as f64, 0.0, 0.0))),
//!     [(1, 2), (2, 3)],
//! )?;
//! let supply = SupplySnapshot::new(1).with_supplied([1, 2, 3]);
//! let advisor = RouteAdvisor::new(&map, &supply, AdvisorConfig::default())?;
//!
//! let fleet = FleetState::new(1, 1, 2.0, 2.0, MissionIntent::Transit);
//! let plan = advisor.plan_route(&fleet, 3, &RouteOptions::default())?;
//! assert_eq!(plan.map(|p| p.systems), Some(vec![1, 2, 3]));
//! # Ok::<(), starlane_lib::Error>(())
//! ```

mod batch;
mod repair;

pub use batch::RouteRequest;
pub use repair::{RepairSite, ThreatMap};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::graph::{StarlaneGraph, SystemId};
use crate::path::{find_path_with_resupply, PathRequest, PathResult};
use crate::policy::{MissionIntent, TravelPolicy};
use crate::supply::{SupplyOracle, UNREACHABLE_SUPPLY_DISTANCE};

/// Arrival reserve no fleet can hold; used when a target cannot reach supply.
const UNREACHABLE_RETURN_FUEL: f64 = f64::MAX;

/// Identifier for a fleet.
pub type FleetId = i64;

/// Fleet fields consumed by route planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetState {
    pub id: FleetId,
    pub current_system: SystemId,
    pub fuel: f64,
    pub max_fuel: f64,
    pub mission: MissionIntent,
    /// Combat strength used when judging whether a route is safe enough.
    #[serde(default)]
    pub combat_rating: f64,
}

impl FleetState {
    pub fn new(
        id: FleetId,
        current_system: SystemId,
        fuel: f64,
        max_fuel: f64,
        mission: MissionIntent,
    ) -> Self {
        Self {
            id,
            current_system,
            fuel,
            max_fuel,
            mission,
            combat_rating: 0.0,
        }
    }

    pub fn with_combat_rating(mut self, rating: f64) -> Self {
        self.combat_rating = rating;
        self
    }
}

/// Per-call route overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// Use this policy instead of the one implied by the fleet's mission.
    pub policy_override: Option<TravelPolicy>,
    /// Require enough fuel at the target to get back into supply.
    ///
    /// Relies on the snapshot's supply distances. A target with no recorded
    /// distance (see [`SupplySnapshot::with_ranges_from`]) is never reachable
    /// under this option.
    ///
    /// [`SupplySnapshot::with_ranges_from`]: crate::supply::SupplySnapshot::with_ranges_from
    pub ensure_return: bool,
    /// Explicit arrival fuel requirement; takes precedence over `ensure_return`.
    pub min_fuel_at_target: Option<f64>,
    pub avoid: HashSet<SystemId>,
}

impl RouteOptions {
    pub fn with_policy(mut self, policy: TravelPolicy) -> Self {
        self.policy_override = Some(policy);
        self
    }

    pub fn ensuring_return(mut self) -> Self {
        self.ensure_return = true;
        self
    }
}

/// Orchestrates route planning for fleets against one turn's supply snapshot.
pub struct RouteAdvisor<'a, G: ?Sized, S: ?Sized> {
    graph: &'a G,
    supply: &'a S,
    config: AdvisorConfig,
}

impl<'a, G, S> RouteAdvisor<'a, G, S>
where
    G: StarlaneGraph + ?Sized,
    S: SupplyOracle + ?Sized,
{
    /// Create an advisor after validating `config`.
    pub fn new(graph: &'a G, supply: &'a S, config: AdvisorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            supply,
            config,
        })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Plan a route for `fleet` to `target`.
    ///
    /// `Ok(None)` means the target cannot be reached this turn.
    pub fn plan_route(
        &self,
        fleet: &FleetState,
        target: SystemId,
        options: &RouteOptions,
    ) -> Result<Option<PathResult>> {
        let request = self.path_request(fleet, target, options);
        debug!(
            fleet = fleet.id,
            mission = ?fleet.mission,
            policy = %request.policy,
            min_fuel = request.min_fuel_at_target,
            "planning route"
        );
        find_path_with_resupply(self.graph, self.supply, &request, &self.config.search)
    }

    /// Immediate move order toward `target`: the second system of the planned
    /// route, or the fleet's current system when no route exists.
    pub fn next_hop(&self, fleet: &FleetState, target: SystemId) -> Result<SystemId> {
        let plan = self.plan_route(fleet, target, &RouteOptions::default())?;
        Ok(plan
            .and_then(|path| path.next_hop())
            .unwrap_or(fleet.current_system))
    }

    fn path_request(
        &self,
        fleet: &FleetState,
        target: SystemId,
        options: &RouteOptions,
    ) -> PathRequest {
        let policy = options
            .policy_override
            .unwrap_or_else(|| fleet.mission.travel_policy());
        let min_fuel_at_target = match options.min_fuel_at_target {
            Some(fuel) => fuel,
            None if options.ensure_return => self.return_fuel(target),
            None => 0.0,
        };

        PathRequest {
            start: fleet.current_system,
            target,
            fuel: fleet.fuel,
            max_fuel: fleet.max_fuel,
            policy,
            min_fuel_at_target,
            avoid: options.avoid.clone(),
        }
    }

    /// Fuel needed at `target` to hop back into supply.
    ///
    /// The final hop into supply is free, so a target `n` hops outside supply
    /// needs `n - 1` units.
    fn return_fuel(&self, target: SystemId) -> f64 {
        let distance = self.supply.distance_from_supply(target);
        if distance == UNREACHABLE_SUPPLY_DISTANCE {
            warn!(system = target, "no supply distance; return cannot be guaranteed");
            return UNREACHABLE_RETURN_FUEL;
        }
        (-distance.min(0) - 1).max(0) as f64
    }
}

/// Systems after the start of `path` where the fleet is refuelled.
pub fn resupply_stops<S: SupplyOracle + ?Sized>(path: &PathResult, supply: &S) -> Vec<SystemId> {
    path.systems
        .iter()
        .skip(1)
        .copied()
        .filter(|&system| supply.is_supplied(system))
        .collect()
}
