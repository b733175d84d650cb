// src/simulation/engine.rs
use crate::core::{Amplitude, QlabError, Result};
use crate::core::complex::{magnitude_squared, phase};
use crate::operations::{Gate, GateKind};
use crate::simulation::MeasurementMode;
use crate::simulation::results::MeasurementReadout;
use log::trace;
use num_traits::{One, Zero};
use std::f64::consts::FRAC_1_SQRT_2;

/// 2×2 complex matrix acting on one target qubit, row-major.
pub(crate) type Matrix2 = [[Amplitude; 2]; 2];

/// What a gate does to the amplitude vector.
enum GateAction {
    /// 2×2 matrix on the single target, gated by the controls.
    Unitary(Matrix2),
    /// Exchange of the two targets, gated by the controls.
    Swap,
    /// Non-collapsing readout of the single target.
    Measure,
}

impl GateAction {
    fn of(kind: &GateKind) -> Self {
        // Controlled kinds share the matrix of their base gate. The control
        // mask is applied separately.
        match *kind {
            GateKind::X | GateKind::Cx => GateAction::Unitary(pauli_x()),
            GateKind::Y => GateAction::Unitary(pauli_y()),
            GateKind::Z | GateKind::Cz => GateAction::Unitary(pauli_z()),
            GateKind::H => GateAction::Unitary(hadamard()),
            GateKind::Rz { theta } | GateKind::Crz { theta } => GateAction::Unitary(rz_matrix(theta)),
            GateKind::Cp { phi } => GateAction::Unitary(phase_matrix(phi)),
            GateKind::Swap | GateKind::Cswap => GateAction::Swap,
            GateKind::Measure => GateAction::Measure,
        }
    }
}

/// Owns the working amplitude vector for one `simulate` call.
///
/// Bit `q` of a basis index (value `1 << q`) is the value of qubit `q`.
pub(crate) struct SimulationEngine {
    state: Vec<Amplitude>,
}

impl SimulationEngine {
    /// Copies `input` into a fresh working vector.
    ///
    /// # Errors
    /// * `TooManyQubits` if `2^num_qubits` does not fit in a `usize`.
    /// * `DimensionMismatch` if `input.len() != 2^num_qubits`.
    pub(crate) fn init(num_qubits: usize, input: &[Amplitude]) -> Result<Self> {
        let expected = u32::try_from(num_qubits)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or(QlabError::TooManyQubits { num_qubits, max_qubits: usize::BITS as usize - 1 })?;
        if input.len() != expected {
            return Err(QlabError::DimensionMismatch { expected, actual: input.len() });
        }
        Ok(Self { state: input.to_vec() })
    }

    /// Applies one gate in place. Measurement gates in probability mode yield
    /// a readout and leave the vector untouched; in shots mode they are skipped.
    pub(crate) fn apply_gate(&mut self, gate: &Gate, mode: MeasurementMode) -> Option<MeasurementReadout> {
        let control_mask = gate.control_mask();
        trace!("applying {}", gate);
        // Arity was checked at validation, so the target indexing holds.
        match GateAction::of(gate.kind()) {
            GateAction::Unitary(matrix) => {
                self.apply_single_qubit_gate(gate.targets()[0], control_mask, &matrix);
                None
            }
            GateAction::Swap => {
                self.apply_swap(gate.targets()[0], gate.targets()[1], control_mask);
                None
            }
            GateAction::Measure => match mode {
                MeasurementMode::Probability => {
                    let qubit = gate.targets()[0];
                    let (p0, p1) = self.measure_probabilities(qubit);
                    trace!("measure q{}: p0={:.6} p1={:.6}", qubit, p0, p1);
                    Some(MeasurementReadout { gate: gate.id(), qubit, p0, p1 })
                }
                MeasurementMode::Shots => None,
            },
        }
    }

    /// Applies `matrix` to every amplitude pair differing only at `target`,
    /// skipping pairs whose control bits are not all 1.
    fn apply_single_qubit_gate(&mut self, target: usize, control_mask: usize, matrix: &Matrix2) {
        let bit = 1usize << target;
        for i in 0..self.state.len() {
            // Visit each pair from its lower index, the one with the target bit clear.
            if i & bit != 0 || i & control_mask != control_mask {
                continue;
            }
            let j = i | bit;
            // Both inputs are read before either write.
            let psi_0 = self.state[i];
            let psi_1 = self.state[j];
            self.state[i] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            self.state[j] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Exchanges the amplitudes of indices that differ by swapping bits `a` and `b`.
    fn apply_swap(&mut self, a: usize, b: usize, control_mask: usize) {
        let (bit_a, bit_b) = (1usize << a, 1usize << b);
        for i in 0..self.state.len() {
            // Each pair once: bit a set, bit b clear.
            if i & bit_a == 0 || i & bit_b != 0 || i & control_mask != control_mask {
                continue;
            }
            // Partner has bit a clear and bit b set.
            self.state.swap(i, i ^ bit_a ^ bit_b);
        }
    }

    /// `(p0, p1)` for `qubit` with `p1 = 1 − p0`. No collapse.
    fn measure_probabilities(&self, qubit: usize) -> (f64, f64) {
        let bit = 1usize << qubit;
        // Total weight of the half of the basis where `qubit` reads 0.
        let p0: f64 = self
            .state
            .iter()
            .enumerate()
            .filter(|(i, _)| i & bit == 0)
            .map(|(_, &c)| magnitude_squared(c))
            .sum();
        (p0, 1.0 - p0)
    }

    /// Current amplitudes.
    pub(crate) fn state(&self) -> &[Amplitude] {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: Vec<Amplitude>) -> Result<()> {
        if state.len() != self.state.len() {
            return Err(QlabError::DimensionMismatch { expected: self.state.len(), actual: state.len() });
        }
        self.state = state;
        Ok(())
    }
}

/// Bit flip.
fn pauli_x() -> Matrix2 {
    [
        [Amplitude::zero(), Amplitude::one()],
        [Amplitude::one(), Amplitude::zero()],
    ]
}

fn pauli_y() -> Matrix2 {
    let i = Amplitude::i();
    [
        [Amplitude::zero(), -i],
        [i, Amplitude::zero()],
    ]
}

/// Phase flip, `diag(1, -1)`.
fn pauli_z() -> Matrix2 {
    [
        [Amplitude::one(), Amplitude::zero()],
        [Amplitude::zero(), -Amplitude::one()],
    ]
}

/// Maps |0⟩ to |+⟩ and |1⟩ to |−⟩.
fn hadamard() -> Matrix2 {
    let h = Amplitude::new(FRAC_1_SQRT_2, 0.0);
    [
        [h, h],
        [h, -h],
    ]
}

/// `RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})`: relative phase `e^{iθ}` on |1⟩.
/// The symmetric split matters once the gate is controlled, since the control
/// then turns the global phase into an observable relative one.
fn rz_matrix(theta: f64) -> Matrix2 {
    [
        [phase(-theta / 2.0), Amplitude::zero()],
        [Amplitude::zero(), phase(theta / 2.0)],
    ]
}

/// `diag(1, e^{iφ})`
fn phase_matrix(phi: f64) -> Matrix2 {
    [
        [Amplitude::one(), Amplitude::zero()],
        [Amplitude::zero(), phase(phi)],
    ]
}
