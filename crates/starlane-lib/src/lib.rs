//! Starlane library entry points.
//!
//! This crate plans fuel-constrained fleet routes across a starlane graph.
//! Fuel is only replenished inside an empire's supply network, and which lanes
//! a fleet may use depends on the risk policy of its mission. Hosts provide the
//! graph and the per-turn supply snapshot through the [`StarlaneGraph`] and
//! [`SupplyOracle`] traits and should go through [`RouteAdvisor`] or
//! [`find_path_with_resupply`] rather than reimplementing the search.

pub mod config;
pub mod error;
pub mod fuel;
pub mod graph;
pub mod logging;
pub mod path;
pub mod policy;
pub mod routing;
pub mod supply;

pub use config::{AdvisorConfig, SearchConfig};
pub use error::{Error, Result};
pub use fuel::{hop_outcome, project_route_fuel, FuelProjection};
pub use graph::{StarlaneGraph, StarlaneMap, SystemId, SystemPosition};
pub use logging::init_tracing;
pub use path::{
    find_path_with_resupply, search_with_resupply, FuelLabel, PathRequest, PathResult,
    SearchReport, SearchStats,
};
pub use policy::{MissionIntent, TravelPolicy};
pub use routing::{
    resupply_stops, FleetId, FleetState, RepairSite, RouteAdvisor, RouteOptions, RouteRequest,
    ThreatMap,
};
pub use supply::{SupplyOracle, SupplySnapshot};
