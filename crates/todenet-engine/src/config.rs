//! Propagation configuration.

use crate::error::{Error, Result};

/// Default number of rounds.
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Default propagation rate. Deployments tune this anywhere up to ~0.2;
/// the engine treats it as a required caller-supplied value, not a hidden
/// constant.
pub const DEFAULT_RATE: f64 = 0.01;

/// Configuration for one propagation run.
///
/// Both the per-edge increment and the self-commit term are divided by
/// `iterations`, so a node's total self-contribution over a full run equals
/// exactly its commit regardless of the round count chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationConfig {
    /// Number of synchronous rounds. Must be at least 1.
    pub iterations: u32,
    /// How strongly a source's prior-round activation feeds its outgoing
    /// edges. Must be finite and non-negative.
    pub rate: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            rate: DEFAULT_RATE,
        }
    }
}

impl PropagationConfig {
    /// Create a configuration.
    pub fn new(iterations: u32, rate: f64) -> Self {
        Self { iterations, rate }
    }

    /// Validate the configuration at the engine boundary.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(Error::InvalidArgument(
                "iterations must be at least 1".to_string(),
            ));
        }
        if !self.rate.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "rate must be finite, got {}",
                self.rate
            )));
        }
        if self.rate < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "rate must be non-negative, got {}",
                self.rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = PropagationConfig::default();
        assert_eq!(config.iterations, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_iterations_rejected() {
        let config = PropagationConfig::new(0, 0.2);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn bad_rates_rejected() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.1] {
            let config = PropagationConfig::new(3, rate);
            assert!(
                matches!(config.validate(), Err(Error::InvalidArgument(_))),
                "rate {} should be rejected",
                rate
            );
        }
    }

    #[test]
    fn zero_rate_is_valid() {
        assert!(PropagationConfig::new(1, 0.0).validate().is_ok());
    }
}
