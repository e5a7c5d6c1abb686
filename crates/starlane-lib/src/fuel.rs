//! Fuel model for single hops and whole routes.
//!
//! A hop touching supply at either end leaves the fleet with a full tank. A
//! hop entirely outside supply burns one unit. A hop that would leave the tank
//! negative cannot be taken.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_fuel, Result};
use crate::graph::SystemId;
use crate::supply::SupplyOracle;

/// Fuel burnt by one hop taken entirely outside supply.
pub const FUEL_PER_UNSUPPLIED_HOP: f64 = 1.0;

/// Fuel remaining after a hop. Negative results mark an illegal hop.
///
/// ```
/// use starlane_lib::fuel::hop_outcome;
///
/// assert_eq!(hop_outcome(true, false, 0.0, 3.0), 3.0);
/// assert_eq!(hop_outcome(false, true, 0.0, 3.0), 3.0);
/// assert_eq!(hop_outcome(false, false, 2.0, 3.0), 1.0);
/// assert!(hop_outcome(false, false, 0.0, 3.0) < 0.0);
/// ```
pub fn hop_outcome(from_supplied: bool, to_supplied: bool, fuel_in: f64, max_fuel: f64) -> f64 {
    if from_supplied || to_supplied {
        max_fuel
    } else {
        fuel_in - FUEL_PER_UNSUPPLIED_HOP
    }
}

/// Fuel remaining after a hop, or `None` when the hop is illegal.
pub fn legal_hop(
    from_supplied: bool,
    to_supplied: bool,
    fuel_in: f64,
    max_fuel: f64,
) -> Option<f64> {
    let fuel_out = hop_outcome(from_supplied, to_supplied, fuel_in, max_fuel);
    (fuel_out >= 0.0).then_some(fuel_out)
}

/// Fuel projection for a single hop of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelProjection {
    pub from: SystemId,
    pub to: SystemId,
    pub fuel_before: f64,
    pub fuel_after: f64,
    /// Set when the hop touched supply and the tank was refilled.
    pub refueled: bool,
}

/// Replay the fuel model hop by hop along `route`.
///
/// Returns `Ok(None)` at the first hop the fleet could not legally take.
pub fn project_route_fuel<S: SupplyOracle + ?Sized>(
    route: &[SystemId],
    supply: &S,
    fuel: f64,
    max_fuel: f64,
) -> Result<Option<Vec<FuelProjection>>> {
    ensure_fuel("fuel", fuel)?;
    ensure_fuel("max_fuel", max_fuel)?;

    let mut projections = Vec::with_capacity(route.len().saturating_sub(1));
    let mut remaining = fuel;
    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let from_supplied = supply.is_supplied(from);
        let to_supplied = supply.is_supplied(to);
        let Some(after) = legal_hop(from_supplied, to_supplied, remaining, max_fuel) else {
            return Ok(None);
        };

        projections.push(FuelProjection {
            from,
            to,
            fuel_before: remaining,
            fuel_after: after,
            refueled: from_supplied || to_supplied,
        });
        remaining = after;
    }

    Ok(Some(projections))
}
