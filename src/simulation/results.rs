// src/simulation/results.rs
use crate::core::complex::magnitude_squared;
use crate::core::{Amplitude, GateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Marginal outcome probabilities of one measurement gate, computed without collapse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReadout {
    /// Id of the `M` gate, `None` if it was never placed in a circuit
    pub gate: Option<GateId>,
    /// Measured qubit
    pub qubit: usize,
    /// Probability of reading 0
    pub p0: f64,
    /// Probability of reading 1, `1 − p0`
    pub p1: f64,
}

/// The amplitude vector after one non-empty column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Column that was just executed
    pub col: usize,
    /// Owned copy of the working vector; never shared with the engine.
    pub vector: Vec<Amplitude>,
    /// Measurement gates evaluated in this column (probability mode only).
    #[serde(default)]
    pub readouts: Vec<MeasurementReadout>,
}

impl StepSnapshot {
    /// `|amplitude|²` per basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.vector.iter().map(|&c| magnitude_squared(c)).collect()
    }

    /// Marginal probability that `qubit` reads 0.
    pub fn qubit_zero_probability(&self, qubit: usize) -> f64 {
        let mask = 1usize << qubit;
        self.vector
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, &c)| magnitude_squared(c))
            .sum()
    }
}

/// Shot counts keyed by bitstring. The rightmost character is qubit 0.
///
/// Only outcomes that occurred are stored; every stored count is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Histogram {
    num_qubits: usize,
    counts: BTreeMap<String, u64>,
}

impl Histogram {
    pub(crate) fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            counts: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, index: usize, count: u64) {
        if count > 0 {
            self.counts.insert(to_bitstring(index, self.num_qubits), count);
        }
    }

    /// Count for one bitstring, 0 if it never occurred.
    pub fn count(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts, equal to the number of shots drawn.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Relative frequency of one bitstring.
    pub fn probability(&self, bitstring: &str) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(bitstring) as f64 / total as f64,
        }
    }

    /// Fraction of shots in which `qubit` read 0.
    pub fn qubit_zero_probability(&self, qubit: usize) -> f64 {
        let total = self.total();
        if total == 0 || qubit >= self.num_qubits {
            return 0.0;
        }
        let pos = self.num_qubits - 1 - qubit;
        let zeros: u64 = self
            .counts
            .iter()
            .filter(|(bits, _)| bits.as_bytes()[pos] == b'0')
            .map(|(_, &c)| c)
            .sum();
        zeros as f64 / total as f64
    }

    /// The `n` most frequent outcomes, most frequent first; ties keep bitstring order.
    pub fn top_outcomes(&self, n: usize) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self.counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// All recorded outcomes in bitstring order.
    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        writeln!(f, "Histogram ({} shots):", total)?;
        if self.counts.is_empty() {
            writeln!(f, "  No shots were drawn.")?;
        }
        for (bits, count) in self.top_outcomes(self.counts.len()) {
            writeln!(f, "  |{}⟩: {} ({:.1}%)", bits, count, count as f64 / total as f64 * 100.0)?;
        }
        Ok(())
    }
}

/// Fixed-width binary label of a basis index; the rightmost character is qubit 0.
pub fn to_bitstring(index: usize, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_bitstring_width_and_order() {
        assert_eq!(to_bitstring(1, 3), "001");
        assert_eq!(to_bitstring(6, 3), "110");
        assert_eq!(to_bitstring(0, 1), "0");
    }

    #[test]
    fn test_histogram_queries() {
        let mut hist = Histogram::new(2);
        hist.record(0b00, 30);
        hist.record(0b01, 50);
        hist.record(0b10, 20);
        hist.record(0b11, 0);
        assert_eq!(hist.total(), 100);
        assert_eq!(hist.count("11"), 0);
        assert!(!hist.counts().contains_key("11"));
        assert_abs_diff_eq!(hist.probability("01"), 0.5);
        // q0 reads 0 in "00" and "10"
        assert_abs_diff_eq!(hist.qubit_zero_probability(0), 0.5);
        assert_abs_diff_eq!(hist.qubit_zero_probability(1), 0.8);
        assert_eq!(hist.top_outcomes(2), vec![("01", 50), ("00", 30)]);
    }

    #[test]
    fn test_snapshot_marginals() {
        let amp = Amplitude::new(FRAC_1_SQRT_2, 0.0);
        let snapshot = StepSnapshot {
            col: 0,
            vector: vec![amp, Amplitude::new(0.0, 0.0), Amplitude::new(0.0, 0.0), amp],
            readouts: Vec::new(),
        };
        assert_abs_diff_eq!(snapshot.qubit_zero_probability(0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(snapshot.probabilities().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
}
