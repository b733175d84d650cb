//! Bell pair: prints the per-column state trace, then a shot histogram.
//!
//! Only |00⟩ and |11⟩ should ever be drawn, each about half the time.

use qlab::{
    to_bitstring, CircuitBuilder, GateKind, InputState, MeasurementMode, QlabError, Simulator, SimulatorConfig,
};

fn main() -> Result<(), QlabError> {
    println!("--- qlab Example: Bell Pair Histogram ---");

    let circuit = CircuitBuilder::new(2)
        .single(GateKind::H, 0, 0)
        .controlled(GateKind::Cx, 0, 1, 1)
        .measure(0, 2)
        .measure(1, 2)
        .build()?;
    println!("\nCircuit Definition:\n{}", circuit);

    let simulator = Simulator::with_config(SimulatorConfig::deterministic().with_shots(2048));
    let input = InputState::new(2);

    let trace = simulator.simulate(&circuit, &input, MeasurementMode::Probability)?;
    for snapshot in &trace {
        println!("\nAfter column {}:", snapshot.col);
        for (index, amplitude) in snapshot.vector.iter().enumerate() {
            println!("  |{}⟩: {:.4}", to_bitstring(index, circuit.num_qubits()), amplitude);
        }
        for readout in &snapshot.readouts {
            println!("  M on q{}: P(0) = {:.4}, P(1) = {:.4}", readout.qubit, readout.p0, readout.p1);
        }
    }

    let histogram = simulator.run_configured_shots(&circuit, &input)?;
    println!("\n{}", histogram);
    println!("P(q0=0) from shots: {:.3}", histogram.qubit_zero_probability(0));

    Ok(())
}
