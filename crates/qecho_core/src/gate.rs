//! Quantum gate definitions for QEcho
//!
//! Gantree: L1_Circuit → Gate
//!
//! The gate set needed by random-rotation echo circuits: phased XZ
//! single-qubit gates, FSim/CZ couplers and a keyed measurement.

use crate::error::{QechoError, QechoResult};
use crate::types::{canonical_bits, Angle, Exponent, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Quantum gate enumeration
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================
    /// Phased XZ gate: Z^z · Z^a · X^x · Z^-a (exponents in half turns)
    /// Gantree: PhasedXz(QubitId, x, z, a) // 위상 XZ
    PhasedXz(QubitId, Exponent, Exponent, Exponent),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Fermionic simulation gate FSim(theta, phi)
    /// Gantree: FSim(QubitId, QubitId, theta, phi) // FSim
    FSim(QubitId, QubitId, Angle, Angle),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    // ========================================================================
    // Measurement
    // ========================================================================
    /// Measure a set of qubits under a result key
    /// Gantree: Measure(Vec<QubitId>, key) // 측정
    Measure(Vec<QubitId>, String),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::PhasedXz(q, _, _, _) => vec![*q],
            Gate::FSim(a, b, _, _) | Gate::Cz(a, b) => vec![*a, *b],
            Gate::Measure(qs, _) => qs.clone(),
        }
    }

    /// Check if gate is single-qubit
    pub fn is_single_qubit(&self) -> bool {
        matches!(self, Gate::PhasedXz(..))
    }

    /// Check if gate is two-qubit
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Gate::FSim(..) | Gate::Cz(..))
    }

    /// Check if gate is measurement
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure(..))
    }

    /// Get gate name
    pub fn name(&self) -> &'static str {
        match self {
            Gate::PhasedXz(..) => "phased_xz",
            Gate::FSim(..) => "fsim",
            Gate::Cz(..) => "cz",
            Gate::Measure(..) => "measure",
        }
    }

    /// Numeric parameters in declaration order
    pub fn params(&self) -> Vec<f64> {
        match self {
            Gate::PhasedXz(_, x, z, a) => vec![*x, *z, *a],
            Gate::FSim(_, _, theta, phi) => vec![*theta, *phi],
            Gate::Cz(..) | Gate::Measure(..) => vec![],
        }
    }

    /// Re-target the gate onto other qubits
    pub fn on(&self, qubits: &[QubitId]) -> QechoResult<Gate> {
        let expected = self.qubits().len();
        if qubits.len() != expected && !self.is_measurement() {
            return Err(QechoError::InvalidGate(format!(
                "{} acts on {} qubits, got {}",
                self.name(),
                expected,
                qubits.len()
            )));
        }
        Ok(match self {
            Gate::PhasedXz(_, x, z, a) => Gate::PhasedXz(qubits[0], *x, *z, *a),
            Gate::FSim(_, _, theta, phi) => Gate::FSim(qubits[0], qubits[1], *theta, *phi),
            Gate::Cz(..) => Gate::Cz(qubits[0], qubits[1]),
            Gate::Measure(_, key) => Gate::Measure(qubits.to_vec(), key.clone()),
        })
    }

    // ========================================================================
    // Inversion
    // ========================================================================

    /// Inverse gate
    /// Gantree: inverse(&self) -> Result<Gate> // 역게이트
    ///
    /// `PhasedXz(x, z, a)⁻¹ = PhasedXz(-x, -z, a + z)`,
    /// `FSim(θ, φ)⁻¹ = FSim(-θ, -φ)`. Measurements have no inverse.
    pub fn inverse(&self) -> QechoResult<Gate> {
        match self {
            Gate::PhasedXz(q, x, z, a) => Ok(Gate::PhasedXz(*q, -x, -z, a + z)),
            Gate::FSim(q0, q1, theta, phi) => Ok(Gate::FSim(*q0, *q1, -theta, -phi)),
            Gate::Cz(q0, q1) => Ok(Gate::Cz(*q0, *q1)),
            Gate::Measure(_, key) => Err(QechoError::NotInvertible(format!(
                "measurement '{}'",
                key
            ))),
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate qubit range, distinct operands and finite parameters
    pub fn validate(&self, num_qubits: usize) -> QechoResult<()> {
        let qubits = self.qubits();
        for &qubit in &qubits {
            if qubit >= num_qubits {
                return Err(QechoError::QubitOutOfRange { qubit, num_qubits });
            }
        }

        let mut sorted = qubits.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != qubits.len() {
            return Err(QechoError::InvalidGate(format!(
                "{} repeats a qubit: {:?}",
                self.name(),
                qubits
            )));
        }

        if let Gate::Measure(qs, key) = self {
            if qs.is_empty() || key.is_empty() {
                return Err(QechoError::InvalidGate(
                    "measurement needs qubits and a key".into(),
                ));
            }
        }

        for value in self.params() {
            if !value.is_finite() {
                return Err(QechoError::InvalidGate(format!(
                    "{} has non-finite parameter {}",
                    self.name(),
                    value
                )));
            }
        }

        Ok(())
    }
}

impl Hash for Gate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.qubits().hash(state);
        for value in self.params() {
            canonical_bits(value).hash(state);
        }
        if let Gate::Measure(_, key) = self {
            key.hash(state);
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::PhasedXz(q, x, z, a) => write!(f, "PhXZ(a={},x={},z={}) q[{}]", a, x, z, q),
            Gate::FSim(q0, q1, theta, phi) => {
                write!(f, "FSim({:.4},{:.4}) q[{}],q[{}]", theta, phi, q0, q1)
            }
            Gate::Cz(q0, q1) => write!(f, "CZ q[{}],q[{}]", q0, q1),
            Gate::Measure(qs, key) => write!(f, "M('{}') {:?}", key, qs),
        }
    }
}

// ============================================================================
// Two-Qubit Gate Choice
// ============================================================================

/// Coupler used between interacting qubit pairs
/// Gantree: TwoQubitGate // 2Q 게이트 선택
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TwoQubitGate {
    /// FSim(theta, phi)
    FSim {
        /// Swap angle
        theta: Angle,
        /// Conditional phase
        phi: Angle,
    },
    /// CZ
    Cz,
}

impl TwoQubitGate {
    /// Create gate for given qubit pair
    pub fn gate(&self, a: QubitId, b: QubitId) -> Gate {
        match *self {
            TwoQubitGate::FSim { theta, phi } => Gate::FSim(a, b, theta, phi),
            TwoQubitGate::Cz => Gate::Cz(a, b),
        }
    }
}

impl Default for TwoQubitGate {
    fn default() -> Self {
        use crate::constants::loschmidt::{FSIM_PHI, FSIM_THETA};
        TwoQubitGate::FSim {
            theta: FSIM_THETA,
            phi: FSIM_PHI,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(gate: &Gate) -> u64 {
        let mut hasher = DefaultHasher::new();
        gate.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_gate_qubits() {
        assert_eq!(Gate::PhasedXz(0, 0.5, 0.0, 0.25).qubits(), vec![0]);
        assert_eq!(Gate::FSim(0, 1, 0.1, 0.0).qubits(), vec![0, 1]);
        assert_eq!(Gate::Measure(vec![0, 1, 2], "z".into()).qubits(), vec![0, 1, 2]);
    }

    #[test]
    fn test_gate_classification() {
        assert!(Gate::PhasedXz(0, 0.5, 0.0, 0.0).is_single_qubit());
        assert!(Gate::Cz(0, 1).is_two_qubit());
        assert!(Gate::Measure(vec![0], "m".into()).is_measurement());
    }

    #[test]
    fn test_phased_xz_inverse() {
        let gate = Gate::PhasedXz(3, 0.5, 0.25, 1.5);
        let inv = gate.inverse().unwrap();
        assert_eq!(inv, Gate::PhasedXz(3, -0.5, -0.25, 1.75));
    }

    #[test]
    fn test_fsim_inverse() {
        let gate = Gate::FSim(0, 1, 0.3, 0.1);
        assert_eq!(gate.inverse().unwrap(), Gate::FSim(0, 1, -0.3, -0.1));
    }

    #[test]
    fn test_measure_not_invertible() {
        let gate = Gate::Measure(vec![0], "z".into());
        assert!(matches!(gate.inverse(), Err(QechoError::NotInvertible(_))));
    }

    #[test]
    fn test_validate() {
        assert!(Gate::Cz(0, 1).validate(2).is_ok());
        assert!(Gate::Cz(0, 2).validate(2).is_err());
        assert!(Gate::Cz(1, 1).validate(2).is_err());
        assert!(Gate::PhasedXz(0, f64::NAN, 0.0, 0.0).validate(1).is_err());
        assert!(Gate::Measure(vec![], "z".into()).validate(1).is_err());
    }

    #[test]
    fn test_hash_zero_sign() {
        let a = Gate::PhasedXz(0, 0.5, 0.0, 0.0);
        let b = Gate::PhasedXz(0, 0.5, -0.0, 0.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_on_retarget() {
        let gate = TwoQubitGate::default().gate(0, 1);
        assert_eq!(gate.on(&[4, 5]).unwrap().qubits(), vec![4, 5]);
        assert!(gate.on(&[4]).is_err());
    }
}
