// src/simulation/config.rs

//! Simulator configuration

use crate::validation::DEFAULT_NORM_TOLERANCE;

/// Configuration for the `Simulator`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Number of shots drawn by `Simulator::run_configured_shots`.
    ///
    /// Default: 1024
    pub shots: u64,

    /// Random number generator seed for reproducibility
    ///
    /// If None, sampling draws from the thread-local generator.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Largest register the simulator accepts. The vector holds `2^n` amplitudes.
    ///
    /// Default: 16
    pub max_qubits: usize,

    /// Tolerance used when checking whether the input state is normalized.
    ///
    /// Default: 1e-9
    pub norm_tolerance: f64,

    /// Log a warning when the input state is not normalized. The simulation runs either way.
    ///
    /// Default: true
    pub warn_on_unnormalized_input: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            seed: None,
            max_qubits: 16,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            warn_on_unnormalized_input: true,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproducible runs: fixed seed 42.
    pub fn deterministic() -> Self {
        Self {
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Larger shot count for smoother histograms.
    pub fn accurate() -> Self {
        Self {
            shots: 10_000,
            ..Default::default()
        }
    }

    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    pub fn with_unnormalized_warning(mut self, enabled: bool) -> Self {
        self.warn_on_unnormalized_input = enabled;
        self
    }
}
