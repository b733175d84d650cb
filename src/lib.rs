// src/lib.rs

//! `qlab` - A statevector simulation engine for educational quantum circuits
//!
//! Circuits are grids of gates placed on qubit wires and time columns. The
//! simulator evolves a dense amplitude vector column by column, records a
//! snapshot after every non-empty column, and can sample shot histograms from
//! the final vector. Bit `q` of a basis index is the value of qubit `q`.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{Amplitude, GateId, InputState, QlabError, QubitPreset, Result};
pub use operations::{Gate, GateKind, GateParams, GateType};
pub use circuits::{Circuit, CircuitBuilder, CircuitDescription, GateRecord};
pub use simulation::{
    final_vector,
    sample,
    sample_seeded,
    simulate,
    to_bitstring,
    Histogram,
    MeasurementMode,
    MeasurementReadout,
    Simulator,
    SimulatorConfig,
    StepSnapshot,
};
pub use validation::{check_normalization, norm_squared, normalize};

// Example 1: Bell pair
// Builds |Φ+⟩ with H and CX, inspects the measurement readouts, then samples shots.
/// ```
/// use qlab::{CircuitBuilder, GateKind, InputState, MeasurementMode, Simulator, SimulatorConfig, QlabError};
///
/// let circuit = CircuitBuilder::new(2)
///     .single(GateKind::H, 0, 0)
///     .controlled(GateKind::Cx, 0, 1, 1)
///     .measure(0, 2)
///     .measure(1, 2)
///     .build()?;
/// println!("{}", circuit);
///
/// let simulator = Simulator::with_config(SimulatorConfig::deterministic());
/// let trace = simulator.simulate(&circuit, &InputState::new(2), MeasurementMode::Probability)?;
/// assert_eq!(trace.len(), 3);
/// for readout in &trace[2].readouts {
///     assert!((readout.p0 - 0.5).abs() < 1e-9);
/// }
///
/// let histogram = simulator.run_shots(&circuit, &InputState::new(2), 1000)?;
/// assert_eq!(histogram.total(), 1000);
/// assert_eq!(histogram.count("01") + histogram.count("10"), 0);
/// # Ok::<(), QlabError>(())
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: Hadamard test
// Estimates the eigenphase t of |1⟩ under CRZ(2πt) from the ancilla's readout.
/// ```
/// use qlab::{CircuitBuilder, GateKind, InputState, MeasurementMode, QubitPreset, simulate, QlabError};
/// use std::f64::consts::PI;
///
/// let t = 0.5;
/// let circuit = CircuitBuilder::new(2)
///     .single(GateKind::H, 0, 0)
///     .controlled(GateKind::Crz { theta: 2.0 * PI * t }, 0, 1, 1)
///     .single(GateKind::H, 0, 2)
///     .measure(0, 3)
///     .build()?;
/// let input = InputState::from_presets(&[QubitPreset::Zero, QubitPreset::One]);
/// let trace = simulate(&circuit, &input, MeasurementMode::Probability)?;
///
/// let p0 = trace[3].readouts[0].p0;
/// assert!((p0 - (1.0 + (PI * t).cos()) / 2.0).abs() < 1e-12);
/// # Ok::<(), QlabError>(())
/// ```
#[doc(hidden)]
const _: () = ();
