//! Supply and drydock lookups built on top of the route planner.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::{StarlaneGraph, SystemId};
use crate::policy::{MissionIntent, TravelPolicy};
use crate::supply::SupplyOracle;

use super::{FleetState, RouteAdvisor, RouteOptions};

/// Estimated enemy strength present in each system.
pub type ThreatMap = HashMap<SystemId, f64>;

/// A system where fleets can be repaired.
pub type RepairSite = SystemId;

impl<'a, G, S> RouteAdvisor<'a, G, S>
where
    G: StarlaneGraph + ?Sized,
    S: SupplyOracle + ?Sized,
{
    /// Closest supplied system by lane hops, ignoring fuel and travel policy.
    ///
    /// Returns `from` itself when it is supplied. Ties at the same depth go to
    /// the lowest system id.
    pub fn nearest_supplied_system(&self, from: SystemId) -> Result<Option<SystemId>> {
        if !self.graph.contains(from) {
            return Err(Error::UnknownSystem { id: from });
        }

        let mut seen: HashSet<SystemId> = HashSet::from([from]);
        let mut layer = vec![from];
        while !layer.is_empty() {
            if let Some(found) = layer
                .iter()
                .copied()
                .filter(|&system| self.supply.is_supplied(system))
                .min()
            {
                return Ok(Some(found));
            }

            let mut next_layer = Vec::new();
            for &system in &layer {
                for &next in self.graph.neighbors(system) {
                    if seen.insert(next) {
                        next_layer.push(next);
                    }
                }
            }
            layer = next_layer;
        }

        Ok(None)
    }

    /// Nearest drydock the fleet can reach without facing more threat than
    /// its combat rating can absorb.
    ///
    /// Sites are tried in order of lane hops (then id). For each one the route
    /// is planned under the repair travel policy and the threat of every system
    /// after the start is summed. The first site where
    /// `combat_rating >= repair_safety_ratio * threat` wins.
    pub fn nearest_viable_repair_system(
        &self,
        fleet: &FleetState,
        sites: &[RepairSite],
        threats: &ThreatMap,
    ) -> Result<Option<SystemId>> {
        let mut candidates: Vec<(i64, SystemId)> = sites
            .iter()
            .map(|&site| (self.graph.jump_distance(fleet.current_system, site), site))
            .filter(|&(jumps, _)| jumps >= 0)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let options = RouteOptions::default().with_policy(repair_policy());
        let ratio = self.config.repair_safety_ratio;

        for (jumps, site) in candidates {
            let Some(path) = self.plan_route(fleet, site, &options)? else {
                trace!(fleet = fleet.id, site, "no route to repair site");
                continue;
            };

            let threat: f64 = path
                .systems
                .iter()
                .skip(1)
                .map(|system| threats.get(system).copied().unwrap_or(0.0))
                .sum();

            if fleet.combat_rating >= ratio * threat {
                debug!(fleet = fleet.id, site, jumps, threat, "selected repair site");
                return Ok(Some(site));
            }
            trace!(
                fleet = fleet.id,
                site,
                threat,
                rating = fleet.combat_rating,
                "repair route too dangerous"
            );
        }

        Ok(None)
    }
}

fn repair_policy() -> TravelPolicy {
    MissionIntent::Repair.travel_policy()
}
