//! Parallel route planning for many fleets sharing one supply snapshot.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::graph::{StarlaneGraph, SystemId};
use crate::path::PathResult;
use crate::supply::SupplyOracle;

use super::{FleetState, RouteAdvisor, RouteOptions};

/// One fleet's routing question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub fleet: FleetState,
    pub target: SystemId,
    #[serde(default)]
    pub options: RouteOptions,
}

impl RouteRequest {
    pub fn new(fleet: FleetState, target: SystemId) -> Self {
        Self {
            fleet,
            target,
            options: RouteOptions::default(),
        }
    }
}

impl<'a, G, S> RouteAdvisor<'a, G, S>
where
    G: StarlaneGraph + Sync + ?Sized,
    S: SupplyOracle + Sync + ?Sized,
{
    /// Plan every request in parallel. Results keep the order of `requests`.
    ///
    /// Each search only reads the graph and snapshot, so requests share them
    /// without locking.
    pub fn plan_routes(&self, requests: &[RouteRequest]) -> Vec<Result<Option<PathResult>>> {
        debug!(requests = requests.len(), "planning route batch");
        requests
            .par_iter()
            .map(|request| self.plan_route(&request.fleet, request.target, &request.options))
            .collect()
    }
}
