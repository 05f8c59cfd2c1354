//! Circuit builder for QEcho
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for echo circuits. The first invalid gate is remembered
//! and reported by `build()`.

use crate::circuit::{Circuit, FrozenCircuit};
use crate::error::{QechoError, QechoResult};
use crate::gate::{Gate, TwoQubitGate};
use crate::types::{Angle, Exponent, QubitId};

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    /// Internal circuit being built
    circuit: Circuit,

    /// First rejected gate, if any
    error: Option<QechoError>,
}

impl CircuitBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a new circuit builder
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            error: None,
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
            error: None,
        }
    }

    /// Push a gate, keeping the first failure
    pub fn gate(mut self, gate: Gate) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.add_gate(gate) {
                self.error = Some(e);
            }
        }
        self
    }

    // ========================================================================
    // Gates
    // ========================================================================

    /// Add phased XZ gate
    /// Gantree: phased_xz(self, q, x, z, a) -> Self // PhXZ 추가
    pub fn phased_xz(self, qubit: QubitId, x: Exponent, z: Exponent, a: Exponent) -> Self {
        self.gate(Gate::PhasedXz(qubit, x, z, a))
    }

    /// Add FSim gate
    pub fn fsim(self, q0: QubitId, q1: QubitId, theta: Angle, phi: Angle) -> Self {
        self.gate(Gate::FSim(q0, q1, theta, phi))
    }

    /// Add CZ gate
    pub fn cz(self, q0: QubitId, q1: QubitId) -> Self {
        self.gate(Gate::Cz(q0, q1))
    }

    /// Add the configured coupler on a pair
    pub fn coupler(self, kind: TwoQubitGate, q0: QubitId, q1: QubitId) -> Self {
        self.gate(kind.gate(q0, q1))
    }

    /// Add a keyed measurement
    /// Gantree: measure(self, qs, key) -> Self // 측정 추가
    pub fn measure(self, qubits: Vec<QubitId>, key: impl Into<String>) -> Self {
        self.gate(Gate::Measure(qubits, key.into()))
    }

    /// Measure every qubit under one key
    pub fn measure_all(self, key: impl Into<String>) -> Self {
        let qubits: Vec<QubitId> = (0..self.circuit.num_qubits()).collect();
        self.measure(qubits, key)
    }

    // ========================================================================
    // Layer Operations
    // ========================================================================

    /// Add a batch of gates that form one layer
    pub fn layer(mut self, gates: impl IntoIterator<Item = Gate>) -> Self {
        for gate in gates {
            self = self.gate(gate);
        }
        self
    }

    /// Append a whole circuit
    pub fn extend(mut self, other: &Circuit) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.append(other) {
                self.error = Some(e);
            }
        }
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build and return the circuit
    /// Gantree: build(self) -> Result<Circuit> // 빌드
    pub fn build(self) -> QechoResult<Circuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }

    /// Build and freeze
    pub fn build_frozen(self) -> QechoResult<FrozenCircuit> {
        self.build()?.freeze()
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }
}

// ============================================================================
// Tests
// ============================================================================
