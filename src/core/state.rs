// src/core/state.rs

use super::complex::Amplitude;
use super::error::{QlabError, Result};
use num_traits::{One, Zero};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::str::FromStr;

/// The initial state a circuit is simulated from.
///
/// Holds a dense amplitude vector; bit `i` of an index is the value of qubit `i`.
/// The vector may be replaced wholesale by the caller. Normalization is never
/// enforced here: callers check it with `validation::norm_squared` and decide.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    num_qubits: usize,
    state_vector: Vec<Amplitude>,
}

impl InputState {
    /// Creates the all-zero basis state |0…0⟩ for `num_qubits` qubits.
    ///
    /// # Panics
    /// If `2^num_qubits` does not fit in a `usize`. Use `try_new` for
    /// qubit counts that come from outside the program.
    pub fn new(num_qubits: usize) -> Self {
        match Self::try_new(num_qubits) {
            Ok(state) => state,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible `new`.
    ///
    /// # Errors
    /// `TooManyQubits` if `2^num_qubits` does not fit in a `usize`.
    pub fn try_new(num_qubits: usize) -> Result<Self> {
        let dim = u32::try_from(num_qubits)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or(QlabError::TooManyQubits {
                num_qubits,
                max_qubits: usize::BITS as usize - 1,
            })?;
        let mut state_vector = vec![Amplitude::zero(); dim];
        state_vector[0] = Amplitude::one();
        Ok(Self {
            num_qubits,
            state_vector,
        })
    }

    /// Builds the product state described by one preset per qubit.
    /// `presets[k]` describes qubit `k`.
    pub fn from_presets(presets: &[QubitPreset]) -> Self {
        let mut state_vector = vec![Amplitude::one()];
        // Each new qubit is the next more-significant bit.
        for preset in presets {
            let [a0, a1] = preset.amplitudes();
            let mut next = Vec::with_capacity(state_vector.len() * 2);
            next.extend(state_vector.iter().map(|amp| amp * a0));
            next.extend(state_vector.iter().map(|amp| amp * a1));
            state_vector = next;
        }
        Self {
            num_qubits: presets.len(),
            state_vector,
        }
    }

    /// Number of qubits the stored vector was sized for.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Read-only view of the stored amplitudes.
    pub fn vector(&self) -> &[Amplitude] {
        &self.state_vector
    }

    /// Owned copy of the stored amplitudes.
    pub fn to_vector(&self) -> Vec<Amplitude> {
        self.state_vector.clone()
    }

    /// Replaces the stored vector without renormalizing it.
    ///
    /// The length is not checked against `num_qubits`; a mismatch is reported
    /// by `simulate` as `DimensionMismatch`. A power-of-two length updates the
    /// recorded qubit count.
    pub fn set_vector(&mut self, vector: Vec<Amplitude>) {
        if vector.len().is_power_of_two() {
            self.num_qubits = vector.len().trailing_zeros() as usize;
        }
        self.state_vector = vector;
    }

    pub fn dim(&self) -> usize {
        self.state_vector.len()
    }
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputState[")?;
        for (i, c) in self.state_vector.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

/// Single-qubit starting configurations offered by the input editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QubitPreset {
    /// |0⟩
    Zero,
    /// |1⟩
    One,
    /// |+⟩ = (|0⟩ + |1⟩)/√2
    Plus,
    /// |−⟩ = (|0⟩ − |1⟩)/√2
    Minus,
}

impl QubitPreset {
    /// Amplitudes of |0⟩ and |1⟩ for this preset.
    pub fn amplitudes(&self) -> [Amplitude; 2] {
        match self {
            QubitPreset::Zero => [Amplitude::one(), Amplitude::zero()],
            QubitPreset::One => [Amplitude::zero(), Amplitude::one()],
            QubitPreset::Plus => [
                Amplitude::new(FRAC_1_SQRT_2, 0.0),
                Amplitude::new(FRAC_1_SQRT_2, 0.0),
            ],
            QubitPreset::Minus => [
                Amplitude::new(FRAC_1_SQRT_2, 0.0),
                Amplitude::new(-FRAC_1_SQRT_2, 0.0),
            ],
        }
    }
}

impl FromStr for QubitPreset {
    type Err = QlabError;

    /// Accepts the ket labels used by the lab definitions (`|0⟩`, `|+⟩`, …),
    /// their ASCII spellings (`|0>`, `|->`) and the bare symbol.
    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .trim()
            .trim_start_matches('|')
            .trim_end_matches(['⟩', '>']);
        match inner {
            "0" => Ok(QubitPreset::Zero),
            "1" => Ok(QubitPreset::One),
            "+" => Ok(QubitPreset::Plus),
            "-" | "−" => Ok(QubitPreset::Minus),
            _ => Err(QlabError::InvalidPreset {
                text: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for QubitPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QubitPreset::Zero => "|0⟩",
            QubitPreset::One => "|1⟩",
            QubitPreset::Plus => "|+⟩",
            QubitPreset::Minus => "|−⟩",
        };
        f.write_str(label)
    }
}
