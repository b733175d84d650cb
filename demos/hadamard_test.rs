//! Hadamard test: reads the eigenphase of |1⟩ under a controlled Z-rotation
//! from the ancilla's measurement probabilities.
//!
//! The ancilla (q0) ends with P(0) = (1 + cos(π·t)) / 2 for CRZ angle 2π·t.

use qlab::{CircuitBuilder, GateKind, InputState, MeasurementMode, QlabError, QubitPreset, Simulator};
use std::f64::consts::PI;

fn main() -> Result<(), QlabError> {
    println!("--- qlab Example: Hadamard Test ---");

    // q1 starts in |1⟩, an eigenstate of RZ.
    let input = InputState::from_presets(&[QubitPreset::Zero, QubitPreset::One]);
    let simulator = Simulator::new();

    for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let circuit = CircuitBuilder::new(2)
            .single(GateKind::H, 0, 0)
            .controlled(GateKind::Crz { theta: 2.0 * PI * t }, 0, 1, 1)
            .single(GateKind::H, 0, 2)
            .measure(0, 3)
            .build()?;
        if t == 0.0 {
            println!("\nCircuit Definition:\n{}", circuit);
        }

        let trace = simulator.simulate(&circuit, &input, MeasurementMode::Probability)?;
        for readout in trace.iter().flat_map(|snapshot| &snapshot.readouts) {
            let expected = (1.0 + (PI * t).cos()) / 2.0;
            println!(
                "t = {:.2}: P(q{}=0) = {:.6} (expected {:.6}), P(q{}=1) = {:.6}",
                t, readout.qubit, readout.p0, expected, readout.qubit, readout.p1
            );
        }
    }

    Ok(())
}
