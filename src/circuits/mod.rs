// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! gate applications (`qfact::gates::GateOp`).
//!
//! This module provides the `Circuit` structure: the ordered gate sequence
//! plus the measurement map from qubits to classical output bit positions.
//! A circuit describes what to execute; it never executes anything itself.

use crate::gates::GateOp;
use crate::core::QubitId;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An ordered sequence of gate applications plus a measurement map.
///
/// The circuit exclusively owns its gate sequence. The order is critical:
/// gates are applied to the state vector in exactly this sequence, and the
/// measurement map is read only after the final gate.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// The unique set of qubits involved across all operations and
    /// measurements in this circuit.
    qubits: HashSet<QubitId>,

    /// The ordered sequence of gate applications defining the circuit.
    operations: Vec<GateOp>,

    /// Measurement map: (qubit, classical bit position). The measured value
    /// of an execution is the integer whose bit `c` equals the collapsed
    /// value of the qubit mapped to `c`.
    measurements: Vec<(QubitId, usize)>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            qubits: HashSet::new(),
            operations: Vec::new(),
            measurements: Vec::new(),
        }
    }

    /// Appends a single gate application to the circuit's sequence,
    /// registering any qubits it mentions.
    pub fn add_gate(&mut self, op: GateOp) {
        for qubit in op.involved_qubits() {
            self.qubits.insert(qubit);
        }
        self.operations.push(op);
    }

    /// Appends multiple gate applications from an iterator.
    pub fn add_gates<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = GateOp>,
    {
        for op in ops {
            self.add_gate(op);
        }
    }

    /// Maps `qubit` to classical bit position `classical_bit` in the
    /// measured outcome.
    pub fn measure(&mut self, qubit: QubitId, classical_bit: usize) {
        self.qubits.insert(qubit);
        self.measurements.push((qubit, classical_bit));
    }

    /// Returns a reference to the set of unique qubits involved in this circuit.
    pub fn qubits(&self) -> &HashSet<QubitId> {
        &self.qubits
    }

    /// Returns the ordered sequence of gate applications.
    pub fn operations(&self) -> &[GateOp] {
        &self.operations
    }

    /// Returns the measurement map.
    pub fn measurements(&self) -> &[(QubitId, usize)] {
        &self.measurements
    }

    /// Width of the classical output register: one past the highest mapped
    /// classical bit position, or 0 when nothing is measured.
    pub fn classical_width(&self) -> usize {
        self.measurements
            .iter()
            .map(|(_, c)| c + 1)
            .max()
            .unwrap_or(0)
    }

    /// Returns the total number of gate applications in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no gate applications.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// Implement Default for convenient creation of empty circuits.
impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances
/// using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single gate application to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn gate(mut self, op: GateOp) -> Self {
        self.circuit.add_gate(op);
        self
    }

    /// Adds multiple gate applications from an iterator.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn gates<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = GateOp>,
    {
        self.circuit.add_gates(ops);
        self
    }

    /// Maps `qubit` to classical bit `classical_bit` in the measured outcome.
    pub fn measure(mut self, qubit: QubitId, classical_bit: usize) -> Self {
        self.circuit.measure(qubit, classical_bit);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

// Implement Default for convenient creation of builders.
impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() && self.measurements.is_empty() {
            return writeln!(f, "qfact::Circuit[0 operations on 0 qubits]");
        }

        // --- Setup ---
        let ops = &self.operations;
        // One trailing column for the measurement map, when present.
        let num_cols = ops.len() + usize::from(!self.measurements.is_empty());

        // Get sorted list of unique qubits and create row map
        let mut sorted_qubits: Vec<QubitId> = self.qubits.iter().cloned().collect();
        sorted_qubits.sort();
        let num_qubits = sorted_qubits.len();
        let qubit_to_row: HashMap<QubitId, usize> = sorted_qubits
            .iter()
            .enumerate()
            .map(|(i, q)| (*q, i))
            .collect();

        // Determine label width
        let max_label_width = sorted_qubits
            .iter()
            .map(|q| format!("{}", q).len())
            .max()
            .unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        // Grid dimensions and padding
        const GATE_WIDTH: usize = 5; // e.g. "──H──"
        const WIRE: &str = "─────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][col] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_cols]; num_qubits];
        // v_connect[row][col] stores the vertical connector char below this row
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_cols]; num_qubits];

        // Helper to format a gate symbol centred on the wire
        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre = total_dashes / 2;
                let post = total_dashes - pre;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre),
                    symbol,
                    H_WIRE.to_string().repeat(post)
                )
            }
        }

        // --- Populate Grids ---
        for (t, op) in ops.iter().enumerate() {
            let mut rows: Vec<usize> = Vec::new();
            for target in &op.targets {
                if let Some(r) = qubit_to_row.get(target) {
                    op_grid[*r][t] = format_gate(op.gate.name());
                    rows.push(*r);
                }
            }
            if let Some(control) = &op.control {
                if let Some(r) = qubit_to_row.get(control) {
                    op_grid[*r][t] = format_gate("@");
                    rows.push(*r);
                }
            }
            // Vertical connection lines between the involved rows
            if let (Some(&r_min), Some(&r_max)) = (rows.iter().min(), rows.iter().max()) {
                for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }
        if !self.measurements.is_empty() {
            let t = num_cols - 1;
            for (qubit, _) in &self.measurements {
                if let Some(r) = qubit_to_row.get(qubit) {
                    op_grid[*r][t] = format_gate("M");
                }
            }
        }

        // --- Format Output String ---
        writeln!(
            f,
            "qfact::Circuit[{} operations, {} measured of {} qubits]",
            ops.len(),
            self.measurements.len(),
            num_qubits
        )?;
        for r in 0..num_qubits {
            // Print qubit label row
            let label = format!("{}: ", sorted_qubits[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            // Print vertical connector row (if not the last qubit)
            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_cols {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre = padding_needed / 2;
                    let post = padding_needed - pre;
                    write!(f, "{}{}{}", " ".repeat(pre), connector, " ".repeat(post))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
