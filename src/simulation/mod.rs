// src/simulation/mod.rs

//! Runs a `Circuit` against an `InputState`, column by column.
//!
//! `Simulator` owns the configuration and produces the per-column trace of
//! amplitude vectors. The internal `SimulationEngine` owns the working vector
//! for the duration of one call, and the sampler turns a final vector into a
//! shot histogram.

mod config;
pub(crate) mod engine;
mod results;
mod sampler;

pub use config::SimulatorConfig;
pub use results::{to_bitstring, Histogram, MeasurementReadout, StepSnapshot};
pub use sampler::{sample, sample_seeded};

use crate::circuits::{Circuit, CircuitDescription};
use crate::core::{Amplitude, InputState, QlabError, Result};
use crate::operations::{Gate, GateType};
use crate::validation::check_normalization;
use engine::SimulationEngine;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How `M` gates are treated during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeasurementMode {
    /// `M` reports its qubit's outcome probabilities without collapsing.
    #[default]
    Probability,
    /// `M` is skipped; outcomes come from sampling the final vector.
    Shots,
}

/// The main simulator orchestrating the execution of circuits.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs the circuit and returns one snapshot per non-empty column.
    ///
    /// Columns are executed in increasing order; within a column gates run in
    /// insertion order (they touch disjoint qubits, so the order does not change
    /// the result). The input is copied and never mutated.
    ///
    /// # Returns
    /// * `Ok(trace)` with snapshots in column order. Empty columns (and, in
    ///   shots mode, columns holding only `M` gates) have no snapshot.
    /// * `Err(QlabError)` if the circuit is too large, the input length is not
    ///   `2^num_qubits`, a gate refers to a missing qubit, or two gates in the
    ///   same column share a qubit.
    pub fn simulate(&self, circuit: &Circuit, input: &InputState, mode: MeasurementMode) -> Result<Vec<StepSnapshot>> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.config.max_qubits {
            return Err(QlabError::TooManyQubits {
                num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }
        let mut engine = SimulationEngine::init(num_qubits, input.vector())?;
        let columns = schedule(circuit)?;

        if self.config.warn_on_unnormalized_input {
            if let Err(QlabError::NotNormalized { norm_squared }) =
                check_normalization(input.vector(), Some(self.config.norm_tolerance))
            {
                warn!("input state is not normalized (norm² = {:.6}); simulating as given", norm_squared);
            }
        }

        debug!(
            "simulating {} gates on {} qubits over {} occupied columns ({:?} mode)",
            circuit.len(),
            num_qubits,
            columns.len(),
            mode
        );

        let mut trace = Vec::new();
        for (&col, gates) in &columns {
            if mode == MeasurementMode::Shots && gates.iter().all(|g| g.gate_type() == GateType::M) {
                continue;
            }
            let readouts: Vec<MeasurementReadout> = gates
                .iter()
                .filter_map(|gate| engine.apply_gate(gate, mode))
                .collect();
            debug!("column {}: {} gates, {} readouts", col, gates.len(), readouts.len());
            trace.push(StepSnapshot {
                col,
                vector: engine.state().to_vec(),
                readouts,
            });
        }
        Ok(trace)
    }

    /// Builds a circuit from its description, then simulates it.
    ///
    /// # Errors
    /// `UnknownGateType` for an unregistered gate name, plus everything
    /// `Circuit::from_description` and `simulate` report.
    pub fn simulate_description(
        &self,
        description: &CircuitDescription,
        input: &InputState,
        mode: MeasurementMode,
    ) -> Result<Vec<StepSnapshot>> {
        let circuit = Circuit::from_description(description)?;
        self.simulate(&circuit, input, mode)
    }

    /// Simulates in shots mode and samples the final vector `shots` times.
    ///
    /// The sampler is seeded from the configuration when a seed is set.
    pub fn run_shots(&self, circuit: &Circuit, input: &InputState, shots: u64) -> Result<Histogram> {
        let trace = self.simulate(circuit, input, MeasurementMode::Shots)?;
        let final_state = final_vector(&trace, input);
        sample_seeded(&final_state, shots, self.config.seed)
    }

    /// `run_shots` with the configured shot count.
    pub fn run_configured_shots(&self, circuit: &Circuit, input: &InputState) -> Result<Histogram> {
        self.run_shots(circuit, input, self.config.shots)
    }
}

/// Simulates with a default `Simulator`.
pub fn simulate(circuit: &Circuit, input: &InputState, mode: MeasurementMode) -> Result<Vec<StepSnapshot>> {
    Simulator::new().simulate(circuit, input, mode)
}

/// The vector after the last executed column, or a copy of the input when
/// nothing ran.
pub fn final_vector(trace: &[StepSnapshot], input: &InputState) -> Vec<Amplitude> {
    trace
        .last()
        .map(|snapshot| snapshot.vector.clone())
        .unwrap_or_else(|| input.to_vector())
}

/// Buckets gates by column, re-validating each against the circuit's current
/// qubit count and rejecting same-column overlap.
///
/// Only columns holding gates get a bucket; iteration is in column order.
fn schedule(circuit: &Circuit) -> Result<BTreeMap<usize, Vec<&Gate>>> {
    let num_qubits = circuit.num_qubits();
    let mut columns: BTreeMap<usize, Vec<&Gate>> = BTreeMap::new();
    for gate in circuit.gates() {
        gate.validate(num_qubits)?;
        columns.entry(gate.col()).or_default().push(gate);
    }

    for (&col, gates) in &columns {
        let mut occupied = vec![false; num_qubits];
        for qubit in gates.iter().flat_map(|g| g.qubits()) {
            if occupied[qubit] {
                return Err(QlabError::ColumnConflict { col, qubit });
            }
            occupied[qubit] = true;
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::operations::GateKind;
    use crate::validation::norm_squared;
    use approx::assert_abs_diff_eq;
    use num_traits::{One, Zero};
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn bell_circuit() -> Result<Circuit> {
        CircuitBuilder::new(2)
            .single(GateKind::H, 0, 0)
            .controlled(GateKind::Cx, 0, 1, 1)
            .measure(0, 2)
            .measure(1, 2)
            .build()
    }

    #[test]
    fn test_empty_circuit_has_empty_trace() -> Result<()> {
        let circuit = Circuit::new(2, 4);
        let input = InputState::new(2);
        let trace = simulate(&circuit, &input, MeasurementMode::Probability)?;
        assert!(trace.is_empty());
        assert_eq!(final_vector(&trace, &input), input.to_vector());
        Ok(())
    }

    #[test]
    fn test_bell_trace_and_readouts() -> Result<()> {
        let circuit = bell_circuit()?;
        let trace = simulate(&circuit, &InputState::new(2), MeasurementMode::Probability)?;
        assert_eq!(trace.iter().map(|s| s.col).collect::<Vec<_>>(), vec![0, 1, 2]);

        let bell = &trace[1].vector;
        assert_abs_diff_eq!(bell[0].re, FRAC_1_SQRT_2, epsilon = TEST_TOLERANCE);
        assert_abs_diff_eq!(bell[3].re, FRAC_1_SQRT_2, epsilon = TEST_TOLERANCE);
        assert!(bell[1].is_zero() && bell[2].is_zero());

        let readouts = &trace[2].readouts;
        assert_eq!(readouts.len(), 2);
        for readout in readouts {
            assert_abs_diff_eq!(readout.p0, 0.5, epsilon = TEST_TOLERANCE);
            assert_abs_diff_eq!(readout.p1, 0.5, epsilon = TEST_TOLERANCE);
        }
        assert_eq!(readouts[0].gate, circuit.gates()[2].id());
        // Measurement leaves the vector untouched.
        assert_eq!(trace[2].vector, trace[1].vector);
        Ok(())
    }

    #[test]
    fn test_shots_mode_skips_measure_only_columns() -> Result<()> {
        let trace = simulate(&bell_circuit()?, &InputState::new(2), MeasurementMode::Shots)?;
        assert_eq!(trace.len(), 2);
        assert!(trace.iter().all(|s| s.readouts.is_empty()));
        Ok(())
    }

    #[test]
    fn test_empty_columns_are_skipped() -> Result<()> {
        let circuit = CircuitBuilder::new(1)
            .single(GateKind::X, 0, 1)
            .single(GateKind::X, 0, 4)
            .cols(6)
            .build()?;
        let trace = simulate(&circuit, &InputState::new(1), MeasurementMode::Probability)?;
        assert_eq!(trace.iter().map(|s| s.col).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(trace[1].vector, vec![Amplitude::one(), Amplitude::zero()]);
        Ok(())
    }

    #[test]
    fn test_huge_column_count_only_visits_occupied_columns() -> Result<()> {
        let empty = Circuit::new(1, usize::MAX);
        assert!(simulate(&empty, &InputState::new(1), MeasurementMode::Probability)?.is_empty());

        let circuit = CircuitBuilder::new(1)
            .single(GateKind::X, 0, 7)
            .single(GateKind::H, 0, usize::MAX - 1)
            .build()?;
        assert_eq!(circuit.num_cols(), usize::MAX);
        let trace = simulate(&circuit, &InputState::new(1), MeasurementMode::Probability)?;
        assert_eq!(trace.iter().map(|s| s.col).collect::<Vec<_>>(), vec![7, usize::MAX - 1]);
        assert_abs_diff_eq!(trace[1].vector[1].re, -FRAC_1_SQRT_2, epsilon = TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_column_conflict() -> Result<()> {
        let circuit = CircuitBuilder::new(2)
            .single(GateKind::H, 0, 3)
            .controlled(GateKind::Cx, 0, 1, 3)
            .build()?;
        assert_eq!(
            simulate(&circuit, &InputState::new(2), MeasurementMode::Probability),
            Err(QlabError::ColumnConflict { col: 3, qubit: 0 })
        );
        Ok(())
    }

    #[test]
    fn test_dimension_mismatch() -> Result<()> {
        let circuit = bell_circuit()?;
        assert_eq!(
            simulate(&circuit, &InputState::new(3), MeasurementMode::Probability),
            Err(QlabError::DimensionMismatch { expected: 4, actual: 8 })
        );
        Ok(())
    }

    #[test]
    fn test_max_qubits_enforced() {
        let simulator = Simulator::with_config(SimulatorConfig::new().with_max_qubits(2));
        let circuit = Circuit::new(3, 1);
        assert_eq!(
            simulator.simulate(&circuit, &InputState::new(3), MeasurementMode::Probability),
            Err(QlabError::TooManyQubits { num_qubits: 3, max_qubits: 2 })
        );
    }

    #[test]
    fn test_input_is_not_mutated_and_unnormalized_runs() -> Result<()> {
        let circuit = CircuitBuilder::new(1).single(GateKind::H, 0, 0).build()?;
        let mut input = InputState::new(1);
        input.set_vector(vec![Amplitude::new(2.0, 0.0), Amplitude::zero()]);
        let before = input.clone();
        let trace = simulate(&circuit, &input, MeasurementMode::Probability)?;
        assert_eq!(input, before);
        // Unitaries preserve whatever norm the input had.
        assert_abs_diff_eq!(norm_squared(&trace[0].vector), 4.0, epsilon = TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_run_shots_seeded() -> Result<()> {
        let simulator = Simulator::with_config(SimulatorConfig::deterministic().with_shots(500));
        let circuit = bell_circuit()?;
        let input = InputState::new(2);
        let first = simulator.run_configured_shots(&circuit, &input)?;
        let second = simulator.run_shots(&circuit, &input, 500)?;
        assert_eq!(first, second);
        assert_eq!(first.total(), 500);
        assert_eq!(first.count("01") + first.count("10"), 0);
        Ok(())
    }
}
