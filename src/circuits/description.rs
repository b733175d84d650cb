// src/circuits/description.rs

//! Plain circuit description exchanged with the editing collaborator.
//!
//! Mirrors the lab JSON shape: `{numQubits, numCols, gates: [{type, col,
//! targets, controls, params}]}`. Gate type names stay strings here so an
//! unknown type is reported when the description is turned into a `Circuit`.

use super::Circuit;
use crate::core::Result;
use crate::operations::{Gate, GateParams, GateType};
use serde::{Deserialize, Serialize};

/// One gate as described by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    #[serde(rename = "type")]
    pub gate_type: String,
    pub col: usize,
    pub targets: Vec<usize>,
    #[serde(default)]
    pub controls: Vec<usize>,
    #[serde(default)]
    pub params: GateParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitDescription {
    pub num_qubits: usize,
    #[serde(default)]
    pub num_cols: usize,
    #[serde(default)]
    pub gates: Vec<GateRecord>,
}

impl Circuit {
    /// Builds a circuit from a description, validating every gate.
    ///
    /// # Errors
    /// `UnknownGateType` for an unregistered type name, plus any gate
    /// construction error (`InvalidQubitIndex`, `QubitConflict`,
    /// `MissingParameter`, `ArityMismatch`).
    pub fn from_description(desc: &CircuitDescription) -> Result<Self> {
        let mut circuit = Circuit::new(desc.num_qubits, desc.num_cols);
        for record in &desc.gates {
            let ty: GateType = record.gate_type.parse()?;
            let gate = Gate::from_type(
                ty,
                &record.params,
                record.targets.clone(),
                record.controls.clone(),
                record.col,
                desc.num_qubits,
            )?;
            circuit.add_gate(gate)?;
        }
        Ok(circuit)
    }

    /// The inverse of `from_description`, gates in insertion order.
    pub fn to_description(&self) -> CircuitDescription {
        CircuitDescription {
            num_qubits: self.num_qubits,
            num_cols: self.num_cols,
            gates: self
                .gates
                .iter()
                .map(|g| GateRecord {
                    gate_type: g.gate_type().name().to_string(),
                    col: g.col(),
                    targets: g.targets().to_vec(),
                    controls: g.controls().to_vec(),
                    params: g.kind().params(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QlabError;
    use crate::operations::GateKind;

    const SWAP_TEST: &str = r#"{
        "numQubits": 3,
        "numCols": 5,
        "gates": [
            { "type": "H", "col": 0, "targets": [0], "controls": [], "params": {} },
            { "type": "CSWAP", "col": 1, "targets": [1, 2], "controls": [0], "params": {} },
            { "type": "H", "col": 2, "targets": [0], "controls": [], "params": {} },
            { "type": "M", "col": 3, "targets": [0], "controls": [], "params": {} }
        ]
    }"#;

    #[test]
    fn test_parse_lab_json() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let desc: CircuitDescription = serde_json::from_str(SWAP_TEST)?;
        let circuit = Circuit::from_description(&desc)?;
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_cols(), 5);
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.gates_at_col(1)[0].gate_type(), GateType::Cswap);
        Ok(())
    }

    #[test]
    fn test_optional_fields_default() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = r#"{ "numQubits": 3, "numCols": 8, "gates": [
            { "type": "SWAP", "col": 6, "targets": [0, 2] },
            { "type": "CP", "col": 1, "targets": [0], "controls": [1], "params": { "phi": 1.5 } }
        ]}"#;
        let desc: CircuitDescription = serde_json::from_str(json)?;
        let circuit = Circuit::from_description(&desc)?;
        assert_eq!(circuit.gates()[1].kind(), &GateKind::Cp { phi: 1.5 });
        Ok(())
    }

    #[test]
    fn test_unknown_type_rejected() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = r#"{ "numQubits": 1, "numCols": 1, "gates": [
            { "type": "T", "col": 0, "targets": [0] }
        ]}"#;
        let desc: CircuitDescription = serde_json::from_str(json)?;
        assert_eq!(
            Circuit::from_description(&desc).err(),
            Some(QlabError::UnknownGateType { name: "T".to_string() })
        );
        Ok(())
    }

    #[test]
    fn test_missing_angle_rejected() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = r#"{ "numQubits": 2, "gates": [
            { "type": "CRZ", "col": 1, "targets": [1], "controls": [0], "params": {} }
        ]}"#;
        let desc: CircuitDescription = serde_json::from_str(json)?;
        assert!(matches!(
            Circuit::from_description(&desc),
            Err(QlabError::MissingParameter { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_description_preserves_gates() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let desc: CircuitDescription = serde_json::from_str(SWAP_TEST)?;
        let circuit = Circuit::from_description(&desc)?;
        assert_eq!(circuit.to_description(), desc);
        Ok(())
    }
}
