//! Core types for QEcho
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Provides fundamental type aliases and validated wrapper types
//! used throughout the QEcho system.

use crate::error::{QechoError, QechoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Gate exponent (half turns, as in `PhasedXZ(x, z, a)`)
/// Gantree: Exponent // pub type Exponent = f64
pub type Exponent = f64;

/// Rotation angle in radians
pub type Angle = f64;

// ============================================================================
// Float Identity
// ============================================================================

/// Bit pattern used to compare and hash finite floats.
///
/// `-0.0` and `0.0` map to the same pattern. Callers are responsible for
/// rejecting NaN before relying on `Eq`/`Hash` built on top of this.
#[inline]
pub fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Reject NaN and infinities
pub fn ensure_finite(name: &str, value: f64) -> QechoResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QechoError::NonFiniteValue {
            name: name.to_string(),
            value,
        })
    }
}

// ============================================================================
// GridQubit
// ============================================================================

/// Qubit on a two-dimensional grid, ordered by (row, col)
/// Gantree: GridQubit // 그리드 좌표
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridQubit {
    /// Row coordinate
    pub row: i32,
    /// Column coordinate
    pub col: i32,
}

impl GridQubit {
    /// Create a grid qubit
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Grid neighbours (up, left, right, down)
    pub fn neighbors(&self) -> [GridQubit; 4] {
        [
            GridQubit::new(self.row - 1, self.col),
            GridQubit::new(self.row, self.col - 1),
            GridQubit::new(self.row, self.col + 1),
            GridQubit::new(self.row + 1, self.col),
        ]
    }

    /// Check nearest-neighbour adjacency
    pub fn is_adjacent(&self, other: &GridQubit) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

impl fmt::Display for GridQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for GridQubit {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> QechoResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(QechoError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the probability value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty (p = 1)
    pub const ONE: Self = Self(1.0);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = QechoError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

// ============================================================================
// Bitstring
// ============================================================================

/// Bitstring for measurement results
/// Gantree: Bitstring // 비트열 타입
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitstring {
    bits: Vec<bool>,
}

impl Bitstring {
    /// Create from a vector of bools
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create from string (e.g., "0110")
    /// Gantree: parse(s) -> Self // 파싱
    pub fn parse(s: &str) -> QechoResult<Self> {
        let bits: Result<Vec<bool>, _> = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(QechoError::InvalidBitstring(s.to_string())),
            })
            .collect();
        Ok(Self { bits: bits? })
    }

    /// Create zero bitstring of given length
    pub fn zeros(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    /// Get the number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Count number of 1s (Hamming weight)
    pub fn popcount(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when every bit is 0 (survived echo)
    pub fn is_all_zero(&self) -> bool {
        self.bits.iter().all(|&b| !b)
    }

    /// Get bit at index
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

// ============================================================================
// Pauli Basis
// ============================================================================

/// Single-qubit Pauli operator
/// Gantree: Basis // X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Pauli X
    X,
    /// Pauli Y
    Y,
    /// Pauli Z
    Z,
}

impl Basis {
    /// Parse from character
    pub fn from_char(c: char) -> QechoResult<Self> {
        match c.to_ascii_uppercase() {
            'X' => Ok(Basis::X),
            'Y' => Ok(Basis::Y),
            'Z' => Ok(Basis::Z),
            _ => Err(QechoError::InvalidBasis(c.to_string())),
        }
    }

    /// Convert to character
    pub fn to_char(&self) -> char {
        match self {
            Basis::X => 'X',
            Basis::Y => 'Y',
            Basis::Z => 'Z',
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_valid() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(0.5).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
    }

    #[test]
    fn test_probability_serde_validates() {
        assert!(serde_json::from_str::<Probability>("0.25").is_ok());
        assert!(serde_json::from_str::<Probability>("1.5").is_err());
    }

    #[test]
    fn test_canonical_bits_zero() {
        assert_eq!(canonical_bits(0.0), canonical_bits(-0.0));
        assert_ne!(canonical_bits(0.25), canonical_bits(0.5));
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("x", 1.0).is_ok());
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_finite("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_grid_qubit_order() {
        let mut qubits = vec![
            GridQubit::new(1, 0),
            GridQubit::new(0, 2),
            GridQubit::new(0, -1),
        ];
        qubits.sort();
        assert_eq!(
            qubits,
            vec![
                GridQubit::new(0, -1),
                GridQubit::new(0, 2),
                GridQubit::new(1, 0)
            ]
        );
        assert!(GridQubit::new(0, 0).is_adjacent(&GridQubit::new(0, 1)));
        assert!(!GridQubit::new(0, 0).is_adjacent(&GridQubit::new(1, 1)));
    }

    #[test]
    fn test_bitstring() {
        let bs = Bitstring::parse("01101").unwrap();
        assert_eq!(bs.popcount(), 3);
        assert!(!bs.is_all_zero());
        assert!(Bitstring::zeros(4).is_all_zero());
        assert!(Bitstring::parse("012").is_err());
    }

    #[test]
    fn test_basis() {
        assert_eq!(Basis::from_char('y').unwrap(), Basis::Y);
        assert!(Basis::from_char('Q').is_err());
    }
}
