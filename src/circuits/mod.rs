// src/circuits/mod.rs

//! Defines the column-scheduled `Circuit` the simulator consumes.
//!
//! A circuit holds its gates in insertion order for stable iteration; execution
//! order is driven by each gate's column. `numCols` grows to fit placed gates.

mod description;

pub use description::{CircuitDescription, GateRecord};

use crate::core::{GateId, QlabError, Result};
use crate::operations::{Gate, GateKind};
use log::debug;
use std::fmt;

/// A set of gates placed on a grid of `num_qubits` wires by `num_cols` columns.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// Wire count; every placed gate's qubits are below it.
    num_qubits: usize,
    /// Grid width. Always past the last occupied column, may have empty trailing columns.
    num_cols: usize,
    /// Insertion-ordered; ids are unique.
    gates: Vec<Gate>,
    /// Next id handed out by `add_gate`. Ids are never reused.
    next_id: u64,
}

impl Circuit {
    /// Creates an empty circuit.
    pub fn new(num_qubits: usize, num_cols: usize) -> Self {
        Self {
            num_qubits,
            num_cols,
            gates: Vec::new(),
            next_id: 1,
        }
    }

    /// Places a gate, assigning it the next unused id.
    ///
    /// The gate is re-validated against this circuit's qubit count, and
    /// `num_cols` grows so the gate's column fits.
    ///
    /// # Errors
    /// Any `Gate::validate` error, or `ColumnOutOfRange` if `col + 1`
    /// does not fit a column count.
    pub fn add_gate(&mut self, mut gate: Gate) -> Result<GateId> {
        gate.validate(self.num_qubits)?;
        let cols_needed = gate
            .col()
            .checked_add(1)
            .ok_or(QlabError::ColumnOutOfRange { col: gate.col() })?;
        // Ids are only consumed once the gate is known to fit.
        let id = GateId(self.next_id);
        self.next_id += 1;
        gate.assign_id(id);
        self.num_cols = self.num_cols.max(cols_needed);
        debug!("placed {} as {}", gate, id);
        self.gates.push(gate);
        Ok(id)
    }

    /// Removes the gate with that id. No-op if absent.
    pub fn remove_gate(&mut self, id: GateId) -> Option<Gate> {
        let pos = self.gates.iter().position(|g| g.id() == Some(id))?;
        Some(self.gates.remove(pos))
    }

    /// All gates in `col`, in insertion order.
    pub fn gates_at_col(&self, col: usize) -> Vec<&Gate> {
        self.gates.iter().filter(|g| g.col() == col).collect()
    }

    /// Looks up a placed gate by id.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id() == Some(id))
    }

    /// Adds a control wire to a placed controlled gate.
    pub fn add_control(&mut self, id: GateId, qubit: usize) -> Result<()> {
        let num_qubits = self.num_qubits;
        self.gate_mut(id)?.add_control(qubit, num_qubits)
    }

    /// Removes a control wire. Fails if the gate would drop below the
    /// catalog's minimum control count.
    pub fn remove_control(&mut self, id: GateId, qubit: usize) -> Result<()> {
        self.gate_mut(id)?.remove_control(qubit)
    }

    fn gate_mut(&mut self, id: GateId) -> Result<&mut Gate> {
        self.gates
            .iter_mut()
            .find(|g| g.id() == Some(id))
            .ok_or(QlabError::GateNotFound { id })
    }

    /// Changes the wire count. Gates touching a removed wire are dropped and
    /// their ids returned.
    pub fn set_num_qubits(&mut self, num_qubits: usize) -> Vec<GateId> {
        let mut dropped = Vec::new();
        // Growing keeps every gate; only a shrink can drop any.
        self.gates.retain(|g| {
            let fits = g.qubits().all(|q| q < num_qubits);
            if !fits {
                dropped.extend(g.id());
            }
            fits
        });
        if !dropped.is_empty() {
            debug!("resizing to {} qubits dropped {} gates", num_qubits, dropped.len());
        }
        self.num_qubits = num_qubits;
        dropped
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Grid width, including empty trailing columns.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Gates in insertion order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of placed gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
///
/// The first construction error is kept and reported by `build`.
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<QlabError>,
}

impl CircuitBuilder {
    /// Starts an empty circuit on `num_qubits` wires with no columns.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits, 0),
            error: None,
        }
    }

    /// Places a gate of `kind` at `col`.
    pub fn gate(mut self, kind: GateKind, targets: &[usize], controls: &[usize], col: usize) -> Self {
        // After the first failure later calls are no-ops.
        if self.error.is_none() {
            let placed = Gate::new(kind, targets.to_vec(), controls.to_vec(), col, self.circuit.num_qubits)
                .and_then(|gate| self.circuit.add_gate(gate));
            if let Err(e) = placed {
                self.error = Some(e);
            }
        }
        self
    }

    /// Single-target uncontrolled gate.
    pub fn single(self, kind: GateKind, target: usize, col: usize) -> Self {
        self.gate(kind, &[target], &[], col)
    }

    /// Single-target gate under one control.
    pub fn controlled(self, kind: GateKind, control: usize, target: usize, col: usize) -> Self {
        self.gate(kind, &[target], &[control], col)
    }

    /// Measurement of one qubit.
    pub fn measure(self, target: usize, col: usize) -> Self {
        self.gate(GateKind::Measure, &[target], &[], col)
    }

    /// Ensures at least `num_cols` columns even if trailing ones are empty.
    pub fn cols(mut self, num_cols: usize) -> Self {
        self.circuit.num_cols = self.circuit.num_cols.max(num_cols);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Result<Circuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_qubits = self.num_qubits;
        let num_cols = self.num_cols;
        writeln!(f, "qlab::Circuit[{} gates on {} qubits x {} columns]", self.gates.len(), num_qubits, num_cols)?;
        if num_qubits == 0 || num_cols == 0 {
            return Ok(());
        }
        if num_qubits > MAX_DRAWN_WIRES {
            return writeln!(f, "(too many wires to draw)");
        }

        // Labels are left-aligned to the widest one, `q{n-1}: `.
        let max_label_width = format!("q{}", num_qubits - 1).len();
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';
        // Wider grids only draw the columns that hold gates.
        const MAX_DRAWN_COLS: usize = 64;
        const MAX_DRAWN_WIRES: usize = 64;

        let drawn: Vec<usize> = if num_cols <= MAX_DRAWN_COLS {
            (0..num_cols).collect()
        } else {
            let mut occupied: Vec<usize> = self.gates.iter().map(|g| g.col()).collect();
            occupied.sort_unstable();
            occupied.dedup();
            occupied
        };

        // op_grid[row][pos] is the wire segment of drawn column `pos`, v_connect[row][pos] the connector below it.
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); drawn.len()]; num_qubits];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; drawn.len()]; num_qubits];

        // Centers `symbol` in a GATE_WIDTH wire segment, truncating long ones.
        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        for gate in &self.gates {
            // Placed gates always sit in a drawn column.
            let Ok(c) = drawn.binary_search(&gate.col()) else {
                continue;
            };
            let ty = gate.gate_type();
            for &t in gate.targets() {
                op_grid[t][c] = format_gate(ty.symbol());
            }
            for &ctrl in gate.controls() {
                op_grid[ctrl][c] = format_gate("@");
            }
            // Join multi-qubit gates with a vertical wire.
            if gate.qubits().nth(1).is_some() {
                let r_min = gate.qubits().min().unwrap_or(0);
                let r_max = gate.qubits().max().unwrap_or(0);
                for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                    row_vec[c] = V_WIRE;
                }
            }
        }

        // One wire row per qubit, each followed by its connector row except the last.
        for r in 0..num_qubits {
            let label = format!("q{}: ", r);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for c in 0..drawn.len() {
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), v_connect[r][c], " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
