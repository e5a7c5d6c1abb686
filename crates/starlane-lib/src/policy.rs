use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::SystemId;
use crate::supply::SupplyOracle;

/// Risk policy deciding which starlanes a fleet may use this turn.
///
/// Variants are ordered from most to least restrictive; every lane admitted by
/// a policy is also admitted by each later one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TravelPolicy {
    /// Only lanes whose destination is inside supply.
    Cautious,
    /// Supplied destinations, or lanes the empire holds a safe claim on.
    #[default]
    SomewhatCautious,
    /// As somewhat-cautious, plus lanes into never-observed systems.
    Risky,
    /// Every lane.
    Unrestricted,
}

impl TravelPolicy {
    /// All policies, most restrictive first.
    pub const ALL: [TravelPolicy; 4] = [
        TravelPolicy::Cautious,
        TravelPolicy::SomewhatCautious,
        TravelPolicy::Risky,
        TravelPolicy::Unrestricted,
    ];

    /// Whether the lane `from -> to` may be traversed under this policy.
    pub fn admits<S: SupplyOracle + ?Sized>(
        self,
        from: SystemId,
        to: SystemId,
        supply: &S,
    ) -> bool {
        match self {
            TravelPolicy::Cautious => supply.is_supplied(to),
            TravelPolicy::SomewhatCautious => {
                supply.is_supplied(to) || supply.preserves_travel(from, to)
            }
            TravelPolicy::Risky => {
                TravelPolicy::SomewhatCautious.admits(from, to, supply)
                    || !supply.has_been_observed(to)
            }
            TravelPolicy::Unrestricted => true,
        }
    }
}

impl fmt::Display for TravelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TravelPolicy::Cautious => "cautious",
            TravelPolicy::SomewhatCautious => "somewhat_cautious",
            TravelPolicy::Risky => "risky",
            TravelPolicy::Unrestricted => "unrestricted",
        };
        f.write_str(value)
    }
}

/// Purpose of a fleet's current mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissionIntent {
    Exploration,
    Colonisation,
    Outpost,
    #[default]
    Transit,
    Resupply,
    Repair,
    Military,
    Invasion,
    Secure,
}

impl MissionIntent {
    /// Travel policy the fleet uses while on this mission.
    pub fn travel_policy(self) -> TravelPolicy {
        match self {
            MissionIntent::Colonisation | MissionIntent::Outpost => TravelPolicy::Cautious,
            MissionIntent::Transit | MissionIntent::Resupply | MissionIntent::Repair => {
                TravelPolicy::SomewhatCautious
            }
            MissionIntent::Exploration => TravelPolicy::Risky,
            MissionIntent::Military | MissionIntent::Invasion | MissionIntent::Secure => {
                TravelPolicy::Unrestricted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supply::SupplySnapshot;

    fn snapshot() -> SupplySnapshot {
        SupplySnapshot::new(3)
            .with_supplied([1, 2])
            .with_observed([3, 4])
            .with_preserved_lane(2, 3)
    }

    #[test]
    fn cautious_requires_supplied_destination() {
        let supply = snapshot();
        assert!(TravelPolicy::Cautious.admits(5, 1, &supply));
        assert!(!TravelPolicy::Cautious.admits(2, 3, &supply));
    }

    #[test]
    fn somewhat_cautious_honours_preserved_lanes() {
        let supply = snapshot();
        assert!(TravelPolicy::SomewhatCautious.admits(2, 3, &supply));
        assert!(TravelPolicy::SomewhatCautious.admits(3, 2, &supply));
        assert!(!TravelPolicy::SomewhatCautious.admits(3, 4, &supply));
    }

    #[test]
    fn risky_accepts_unobserved_systems_only() {
        let supply = snapshot();
        assert!(TravelPolicy::Risky.admits(4, 9, &supply));
        assert!(!TravelPolicy::Risky.admits(3, 4, &supply));
    }

    #[test]
    fn unrestricted_admits_everything() {
        let supply = snapshot();
        assert!(TravelPolicy::Unrestricted.admits(3, 4, &supply));
    }

    #[test]
    fn admitted_lanes_are_nested() {
        let supply = snapshot();
        for from in 1..=6 {
            for to in 1..=6 {
                for pair in TravelPolicy::ALL.windows(2) {
                    if pair[0].admits(from, to, &supply) {
                        assert!(
                            pair[1].admits(from, to, &supply),
                            "{} admits {from}->{to} but {} does not",
                            pair[0],
                            pair[1]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn mission_mapping_is_closed() {
        assert_eq!(MissionIntent::Exploration.travel_policy(), TravelPolicy::Risky);
        assert_eq!(MissionIntent::Outpost.travel_policy(), TravelPolicy::Cautious);
        assert_eq!(MissionIntent::Invasion.travel_policy(), TravelPolicy::Unrestricted);
        assert_eq!(MissionIntent::default().travel_policy(), TravelPolicy::SomewhatCautious);
    }
}
