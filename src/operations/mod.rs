// src/operations/mod.rs

//! The gate catalog and the validated `Gate` value placed into circuits.
//!
//! `GateType` is the static registry: every type answers its shape (how many
//! targets, how many controls, which angle it needs) from one exhaustive match,
//! so adding a type forces validation, matrix application and rendering to be
//! updated together. `GateKind` is the typed form that carries the angle for
//! parameterized types and nothing for fixed ones.

use crate::core::{GateId, QlabError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed catalog of gate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateType {
    X,
    Y,
    Z,
    H,
    /// Measurement in the computational basis.
    M,
    /// Z-axis rotation.
    Rz,
    Cx,
    Cz,
    /// Controlled phase.
    Cp,
    /// Controlled Z-axis rotation.
    Crz,
    Swap,
    Cswap,
}

/// Name of the single real angle a parameterized gate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamName {
    Theta,
    Phi,
}

impl ParamName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::Theta => "theta",
            ParamName::Phi => "phi",
        }
    }
}

/// Shape of a gate type: qubit roles and angle requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateShape {
    /// Exact number of target qubits.
    pub targets: usize,
    /// Fewest controls the type accepts.
    pub min_controls: usize,
    /// Most controls the type accepts; `None` means any number.
    pub max_controls: Option<usize>,
    /// Required angle, if any.
    pub param: Option<ParamName>,
}

impl GateShape {
    const fn fixed(targets: usize, param: Option<ParamName>) -> Self {
        Self { targets, min_controls: 0, max_controls: Some(0), param }
    }

    // Controlled types take one control in the catalog; more may be added.
    const fn controlled(targets: usize, param: Option<ParamName>) -> Self {
        Self { targets, min_controls: 1, max_controls: None, param }
    }

    /// Qubits touched by a gate of this shape with its minimum control count.
    pub fn arity(&self) -> usize {
        self.targets + self.min_controls
    }

    fn accepts_controls(&self, n: usize) -> bool {
        n >= self.min_controls && self.max_controls.is_none_or(|max| n <= max)
    }

    fn describe_controls(&self) -> String {
        match self.max_controls {
            Some(max) if max == self.min_controls => max.to_string(),
            Some(max) => format!("{}..={}", self.min_controls, max),
            None => format!("at least {}", self.min_controls),
        }
    }
}

impl GateType {
    /// Every registered type, in catalog order.
    pub const ALL: [GateType; 12] = [
        GateType::X,
        GateType::Y,
        GateType::Z,
        GateType::H,
        GateType::M,
        GateType::Rz,
        GateType::Cx,
        GateType::Cz,
        GateType::Cp,
        GateType::Crz,
        GateType::Swap,
        GateType::Cswap,
    ];

    pub fn shape(&self) -> GateShape {
        use ParamName::{Phi, Theta};
        match self {
            GateType::X | GateType::Y | GateType::Z | GateType::H | GateType::M => {
                GateShape::fixed(1, None)
            }
            GateType::Rz => GateShape::fixed(1, Some(Theta)),
            GateType::Cx | GateType::Cz => GateShape::controlled(1, None),
            GateType::Cp => GateShape::controlled(1, Some(Phi)),
            GateType::Crz => GateShape::controlled(1, Some(Theta)),
            GateType::Swap => GateShape::fixed(2, None),
            GateType::Cswap => GateShape::controlled(2, None),
        }
    }

    /// Canonical type name as used in circuit descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            GateType::X => "X",
            GateType::Y => "Y",
            GateType::Z => "Z",
            GateType::H => "H",
            GateType::M => "M",
            GateType::Rz => "RZ",
            GateType::Cx => "CX",
            GateType::Cz => "CZ",
            GateType::Cp => "CP",
            GateType::Crz => "CRZ",
            GateType::Swap => "SWAP",
            GateType::Cswap => "CSWAP",
        }
    }

    /// Label drawn on the target wire.
    pub fn symbol(&self) -> &'static str {
        match self {
            GateType::X | GateType::Cx => "X",
            GateType::Y => "Y",
            GateType::Z | GateType::Cz => "Z",
            GateType::H => "H",
            GateType::M => "M",
            GateType::Rz | GateType::Crz => "Rz",
            GateType::Cp => "P",
            GateType::Swap | GateType::Cswap => "x",
        }
    }
}

impl FromStr for GateType {
    type Err = QlabError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CNOT" => Ok(GateType::Cx),
            name => GateType::ALL
                .iter()
                .copied()
                .find(|ty| ty.name() == name)
                .ok_or_else(|| QlabError::UnknownGateType { name: s.to_string() }),
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open-ended parameter record as it appears in circuit descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GateParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi: Option<f64>,
}

impl GateParams {
    fn get(&self, name: ParamName) -> Option<f64> {
        match name {
            ParamName::Theta => self.theta,
            ParamName::Phi => self.phi,
        }
    }
}

/// A gate type together with exactly the angle it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateKind {
    X,
    Y,
    Z,
    H,
    Measure,
    Rz { theta: f64 },
    Cx,
    Cz,
    Cp { phi: f64 },
    Crz { theta: f64 },
    Swap,
    Cswap,
}

impl GateKind {
    /// Builds the typed kind, pulling the required angle out of `params`.
    ///
    /// # Errors
    /// `MissingParameter` if the type needs an angle that `params` lacks.
    pub fn from_type(ty: GateType, params: &GateParams) -> Result<Self> {
        let angle = |name: ParamName| {
            params.get(name).ok_or_else(|| QlabError::MissingParameter {
                gate: ty.name().to_string(),
                param: name.as_str().to_string(),
            })
        };
        Ok(match ty {
            GateType::X => GateKind::X,
            GateType::Y => GateKind::Y,
            GateType::Z => GateKind::Z,
            GateType::H => GateKind::H,
            GateType::M => GateKind::Measure,
            GateType::Rz => GateKind::Rz { theta: angle(ParamName::Theta)? },
            GateType::Cx => GateKind::Cx,
            GateType::Cz => GateKind::Cz,
            GateType::Cp => GateKind::Cp { phi: angle(ParamName::Phi)? },
            GateType::Crz => GateKind::Crz { theta: angle(ParamName::Theta)? },
            GateType::Swap => GateKind::Swap,
            GateType::Cswap => GateKind::Cswap,
        })
    }

    pub fn gate_type(&self) -> GateType {
        match self {
            GateKind::X => GateType::X,
            GateKind::Y => GateType::Y,
            GateKind::Z => GateType::Z,
            GateKind::H => GateType::H,
            GateKind::Measure => GateType::M,
            GateKind::Rz { .. } => GateType::Rz,
            GateKind::Cx => GateType::Cx,
            GateKind::Cz => GateType::Cz,
            GateKind::Cp { .. } => GateType::Cp,
            GateKind::Crz { .. } => GateType::Crz,
            GateKind::Swap => GateType::Swap,
            GateKind::Cswap => GateType::Cswap,
        }
    }

    /// The angle back in description form.
    pub fn params(&self) -> GateParams {
        match *self {
            GateKind::Rz { theta } | GateKind::Crz { theta } => GateParams { theta: Some(theta), phi: None },
            GateKind::Cp { phi } => GateParams { theta: None, phi: Some(phi) },
            _ => GateParams::default(),
        }
    }
}

/// A validated gate: kind, qubit roles and scheduling column.
///
/// Targets and controls are pairwise disjoint and every index is below the
/// qubit count the gate was validated against. Controls are kept sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    id: Option<GateId>,
    kind: GateKind,
    targets: Vec<usize>,
    controls: Vec<usize>,
    col: usize,
}

impl Gate {
    /// Creates a gate for a circuit of `num_qubits` qubits.
    ///
    /// # Errors
    /// * `ArityMismatch` if the target or control count does not fit the type.
    /// * `InvalidQubitIndex` if any index is `>= num_qubits`.
    /// * `QubitConflict` if a qubit is listed twice across targets and controls.
    pub fn new(
        kind: GateKind,
        targets: Vec<usize>,
        mut controls: Vec<usize>,
        col: usize,
        num_qubits: usize,
    ) -> Result<Self> {
        let ty = kind.gate_type();
        let shape = ty.shape();
        if targets.len() != shape.targets {
            return Err(QlabError::ArityMismatch {
                gate: ty.name().to_string(),
                role: "targets".to_string(),
                expected: shape.targets.to_string(),
                found: targets.len(),
            });
        }
        if !shape.accepts_controls(controls.len()) {
            return Err(QlabError::ArityMismatch {
                gate: ty.name().to_string(),
                role: "controls".to_string(),
                expected: shape.describe_controls(),
                found: controls.len(),
            });
        }
        controls.sort_unstable();
        let gate = Self { id: None, kind, targets, controls, col };
        gate.validate(num_qubits)?;
        Ok(gate)
    }

    /// Shorthand for `GateKind::from_type` followed by `Gate::new`.
    pub fn from_type(
        ty: GateType,
        params: &GateParams,
        targets: Vec<usize>,
        controls: Vec<usize>,
        col: usize,
        num_qubits: usize,
    ) -> Result<Self> {
        let kind = GateKind::from_type(ty, params)?;
        Self::new(kind, targets, controls, col, num_qubits)
    }

    /// Checks index bounds and role disjointness against `num_qubits`.
    pub fn validate(&self, num_qubits: usize) -> Result<()> {
        let mut seen = Vec::with_capacity(self.targets.len() + self.controls.len());
        for qubit in self.qubits() {
            if qubit >= num_qubits {
                return Err(QlabError::InvalidQubitIndex { qubit, num_qubits });
            }
            if seen.contains(&qubit) {
                return Err(QlabError::QubitConflict { qubit });
            }
            seen.push(qubit);
        }
        Ok(())
    }

    /// Id assigned by the owning circuit, `None` until the gate is placed.
    pub fn id(&self) -> Option<GateId> {
        self.id
    }

    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn gate_type(&self) -> GateType {
        self.kind.gate_type()
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn controls(&self) -> &[usize] {
        &self.controls
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// All qubits the gate touches, targets first.
    pub fn qubits(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets.iter().chain(self.controls.iter()).copied()
    }

    /// Bit mask with every control bit set.
    pub fn control_mask(&self) -> usize {
        self.controls.iter().fold(0, |mask, &q| mask | (1usize << q))
    }

    pub(crate) fn assign_id(&mut self, id: GateId) {
        self.id = Some(id);
    }

    pub(crate) fn add_control(&mut self, qubit: usize, num_qubits: usize) -> Result<()> {
        let shape = self.gate_type().shape();
        if !shape.accepts_controls(self.controls.len() + 1) {
            return Err(QlabError::ArityMismatch {
                gate: self.gate_type().name().to_string(),
                role: "controls".to_string(),
                expected: shape.describe_controls(),
                found: self.controls.len() + 1,
            });
        }
        let mut candidate = self.clone();
        candidate.controls.push(qubit);
        candidate.controls.sort_unstable();
        candidate.validate(num_qubits)?;
        *self = candidate;
        Ok(())
    }

    pub(crate) fn remove_control(&mut self, qubit: usize) -> Result<()> {
        let shape = self.gate_type().shape();
        if !self.controls.contains(&qubit) {
            return Ok(());
        }
        if !shape.accepts_controls(self.controls.len() - 1) {
            return Err(QlabError::ArityMismatch {
                gate: self.gate_type().name().to_string(),
                role: "controls".to_string(),
                expected: shape.describe_controls(),
                found: self.controls.len() - 1,
            });
        }
        self.controls.retain(|&q| q != qubit);
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gate_type())?;
        match self.kind {
            GateKind::Rz { theta } | GateKind::Crz { theta } => write!(f, "(θ={:.4})", theta)?,
            GateKind::Cp { phi } => write!(f, "(φ={:.4})", phi)?,
            _ => {}
        }
        write!(f, " col={} targets={:?}", self.col, self.targets)?;
        if !self.controls.is_empty() {
            write!(f, " controls={:?}", self.controls)?;
        }
        Ok(())
    }
}
