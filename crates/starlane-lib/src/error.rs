use thiserror::Error;

use crate::graph::SystemId;

/// Convenient result alias for the starlane library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// An unreachable target is not an error; the pathfinder reports it as
/// `Ok(None)`. Errors are reserved for inputs that indicate a bookkeeping bug
/// upstream.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a system id is not part of the starlane graph.
    #[error("unknown system id: {id}")]
    UnknownSystem { id: SystemId },

    /// Raised when a fuel quantity is negative or not finite.
    #[error("invalid {field}: {value} (must be finite and non-negative)")]
    InvalidFuel { field: &'static str, value: f64 },

    /// Raised when a search or advisor configuration fails validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for configuration parse errors.
    #[error(transparent)]
    ConfigParse(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Reject negative or non-finite fuel values without clamping them.
pub(crate) fn ensure_fuel(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidFuel { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_fuel_accepts_zero_and_positive() {
        assert!(ensure_fuel("fuel", 0.0).is_ok());
        assert!(ensure_fuel("fuel", 3.5).is_ok());
    }

    #[test]
    fn ensure_fuel_rejects_negative_and_nan() {
        let err = ensure_fuel("max_fuel", -1.0).unwrap_err();
        assert!(format!("{err}").contains("max_fuel"));
        assert!(matches!(
            ensure_fuel("fuel", f64::NAN),
            Err(Error::InvalidFuel { field: "fuel", .. })
        ));
        assert!(ensure_fuel("fuel", f64::INFINITY).is_err());
    }
}
