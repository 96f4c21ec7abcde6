use crate::defaults::*;
use serde::{Deserialize, Serialize};

fn default_verbose() -> i8 {
    VERBOSE
}
fn default_solver_tolerance() -> f64 {
    SOLVER_TOLERANCE
}
fn default_solver_restart() -> usize {
    SOLVER_RESTART
}
fn default_solver_max_cycles() -> usize {
    SOLVER_MAX_CYCLES
}
fn default_propagation_tolerance() -> f64 {
    PROPAGATION_TOLERANCE
}
fn default_solver_config() -> SolverConfig {
    SolverConfig::default()
}
fn default_propagation_config() -> PropagationConfig {
    PropagationConfig::default()
}

/// Configuration of a Green's function evaluation. Every field has a
/// default, so an empty input deserializes to a working configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GfConfig {
    #[serde(default = "default_verbose")]
    pub verbose: i8,
    #[serde(default = "default_solver_config")]
    pub solver: SolverConfig,
    #[serde(default = "default_propagation_config")]
    pub propagation: PropagationConfig,
}

impl Default for GfConfig {
    fn default() -> Self {
        GfConfig {
            verbose: default_verbose(),
            solver: default_solver_config(),
            propagation: default_propagation_config(),
        }
    }
}

/// Settings of the iterative solver for the frequency-domain response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_solver_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_solver_restart")]
    pub restart: usize,
    #[serde(default = "default_solver_max_cycles")]
    pub max_cycles: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: default_solver_tolerance(),
            restart: default_solver_restart(),
            max_cycles: default_solver_max_cycles(),
        }
    }
}

/// Settings of the time-domain propagation. The tolerance is applied as
/// both the relative and the absolute tolerance of the integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationConfig {
    #[serde(default = "default_propagation_tolerance")]
    pub tolerance: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        PropagationConfig {
            tolerance: default_propagation_tolerance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let config: GfConfig = toml::from_str("").unwrap();
        assert_eq!(config, GfConfig::default());
        assert_eq!(config.solver.tolerance, SOLVER_TOLERANCE);
        assert_eq!(config.propagation.tolerance, PROPAGATION_TOLERANCE);
    }

    #[test]
    fn partial_input_keeps_remaining_defaults() {
        let config: GfConfig = toml::from_str("[solver]\nrestart = 10\n").unwrap();
        assert_eq!(config.solver.restart, 10);
        assert_eq!(config.solver.max_cycles, SOLVER_MAX_CYCLES);
        assert_eq!(config.verbose, VERBOSE);
    }
}
