//! Error handling logic

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier assigned to a gate when it is placed into a `Circuit`.
/// Ids are handed out monotonically and never reused within one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u64);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gate({})", self.0)
    }
}

/// Errors raised while building circuits, simulating them, or sampling outcomes.
///
/// The first group is raised at gate construction time and is recoverable by
/// fixing the input. The second group is fatal for the `simulate` or `sample`
/// call that raised it; no partial trace is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QlabError {
    /// A target or control index lies outside `[0, num_qubits)`.
    #[error("Invalid qubit index {qubit} for {num_qubits}-qubit circuit")]
    InvalidQubitIndex {
        /// Offending index
        qubit: usize,
        /// Qubit count the gate was checked against
        num_qubits: usize,
    },

    /// A qubit appears more than once among a gate's targets and controls.
    #[error("Qubit {qubit} is used more than once by the same gate")]
    QubitConflict {
        /// First repeated index
        qubit: usize,
    },

    /// The gate type requires an angle and none was supplied.
    #[error("Gate {gate} requires parameter '{param}'")]
    MissingParameter {
        /// Canonical type name, e.g. "CRZ"
        gate: String,
        /// Missing angle name, "theta" or "phi"
        param: String,
    },

    /// Wrong number of targets or controls for the gate type.
    #[error("Gate {gate} expects {expected} {role}, got {found}")]
    ArityMismatch {
        /// Canonical type name
        gate: String,
        /// "targets" or "controls"
        role: String,
        /// Accepted count, e.g. "2" or "at least 1"
        expected: String,
        /// Count actually supplied
        found: usize,
    },

    /// The gate type name is not in the registry.
    #[error("Unknown gate type '{name}'")]
    UnknownGateType {
        /// Name as it appeared in the description
        name: String,
    },

    /// Input vector length does not equal `2^num_qubits`.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// `2^num_qubits` of the circuit
        expected: usize,
        /// Length of the supplied vector
        actual: usize,
    },

    /// Two gates in the same column act on the same qubit.
    #[error("Column {col} has more than one gate acting on qubit {qubit}")]
    ColumnConflict {
        /// Column holding both gates
        col: usize,
        /// Shared qubit
        qubit: usize,
    },

    /// The column index leaves no room for the circuit's column count.
    #[error("Column {col} is out of range")]
    ColumnOutOfRange {
        /// Requested column
        col: usize,
    },

    /// The dense vector for this many qubits exceeds the configured limit.
    #[error("{num_qubits} qubits exceeds the configured maximum of {max_qubits}")]
    TooManyQubits {
        /// Requested qubit count
        num_qubits: usize,
        /// Largest count accepted
        max_qubits: usize,
    },

    /// The amplitude vector is empty or its length is not a power of two.
    #[error("Invalid state dimension {len}, expected a non-zero power of 2")]
    InvalidDimension {
        /// Length of the rejected vector
        len: usize,
    },

    /// Every amplitude is zero, so no outcome can be drawn.
    #[error("State vector has zero norm")]
    ZeroNorm,

    /// The state is not normalized within the requested tolerance.
    #[error("State vector not normalized, sum of |amplitude|^2 = {norm_squared}")]
    NotNormalized {
        /// Measured `Σ |amplitude|²`
        norm_squared: f64,
    },

    /// No gate with that id exists in the circuit.
    #[error("{id} not found in circuit")]
    GateNotFound {
        /// Id that was looked up
        id: GateId,
    },

    /// The text does not name a known single-qubit preset.
    #[error("Unknown qubit preset '{text}'")]
    InvalidPreset {
        /// Unparsed input
        text: String,
    },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, QlabError>;
