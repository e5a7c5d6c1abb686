//! Tunables for the resupply search and route advisor.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default multiple of the shortest lane distance a detour may reach.
pub const DEFAULT_DETOUR_FACTOR: f64 = 2.0;

/// Default absolute detour allowance added to the shortest lane distance.
pub const DEFAULT_DETOUR_BUDGET: f64 = 5000.0;

/// Default ratio of fleet rating to route threat required for repair trips.
pub const DEFAULT_REPAIR_SAFETY_RATIO: f64 = 1.0;

/// Search tunables.
///
/// Candidates whose predicted total distance exceeds
/// `max(detour_factor * shortest, shortest + detour_budget)` are pruned. This
/// bounds the search at the cost of missing very long refuelling detours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub detour_factor: f64,
    pub detour_budget: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            detour_factor: DEFAULT_DETOUR_FACTOR,
            detour_budget: DEFAULT_DETOUR_BUDGET,
        }
    }
}

impl SearchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.detour_factor.is_finite() || self.detour_factor < 1.0 {
            return Err(Error::invalid_config(format!(
                "detour_factor must be finite and at least 1, got {}",
                self.detour_factor
            )));
        }
        if !self.detour_budget.is_finite() || self.detour_budget < 0.0 {
            return Err(Error::invalid_config(format!(
                "detour_budget must be finite and non-negative, got {}",
                self.detour_budget
            )));
        }
        Ok(())
    }

    /// Longest predicted distance a candidate may have before it is pruned.
    pub fn detour_limit(&self, shortest: f64) -> f64 {
        (self.detour_factor * shortest).max(shortest + self.detour_budget)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Route advisor tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub search: SearchConfig,
    /// Minimum `fleet rating / route threat` for a repair trip to be viable.
    pub repair_safety_ratio: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            repair_safety_ratio: DEFAULT_REPAIR_SAFETY_RATIO,
        }
    }
}

impl AdvisorConfig {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if !self.repair_safety_ratio.is_finite() || self.repair_safety_ratio < 0.0 {
            return Err(Error::invalid_config(format!(
                "repair_safety_ratio must be finite and non-negative, got {}",
                self.repair_safety_ratio
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
