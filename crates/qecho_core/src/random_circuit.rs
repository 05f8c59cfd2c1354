//! Random rotation circuits on grid qubits
//!
//! Gantree: L1_Circuit → RandomCircuit
//!
//! Alternates layers of random single-qubit rotations with two-qubit
//! interaction layers drawn from a staggered grid pattern.

use crate::builder::CircuitBuilder;
use crate::circuit::Circuit;
use crate::constants::loschmidt::phase_exponents;
use crate::error::QechoResult;
use crate::gate::{Gate, TwoQubitGate};
use crate::types::{Exponent, GridQubit, QubitId};
use rand::Rng;
use std::collections::BTreeMap;

// ============================================================================
// Interaction Layers
// ============================================================================

/// One layer of nearest-neighbour couplings on a grid
/// Gantree: InteractionLayer // 상호작용 레이어
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionLayer {
    /// Column offset of the first coupled pair in even rows
    pub col_offset: i32,
    /// Couple along columns instead of rows
    pub vertical: bool,
    /// Shift odd rows by one column
    pub stagger: bool,
}

impl InteractionLayer {
    /// Create a layer
    pub const fn new(col_offset: i32, vertical: bool, stagger: bool) -> Self {
        Self {
            col_offset,
            vertical,
            stagger,
        }
    }

    /// Whether the pair `(a, b)` is coupled in this layer
    /// Gantree: contains(&self, a, b) -> bool // 레이어 포함 여부
    pub fn contains(&self, a: GridQubit, b: GridQubit) -> bool {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        let (a_row, a_col, b_row, b_col) = if self.vertical {
            (a.col, a.row, b.col, b.row)
        } else {
            (a.row, a.col, b.row, b.col)
        };

        if a_row != b_row || b_col != a_col + 1 {
            return false;
        }

        let parity = (
            a_row.rem_euclid(2),
            (a_col - self.col_offset).rem_euclid(2),
        );
        parity == (0, 0) || parity == (1, i32::from(self.stagger))
    }
}

/// Four-layer staggered pattern (vertical A/B, horizontal C/D)
pub const GRID_STAGGERED_PATTERN: [InteractionLayer; 4] = [
    InteractionLayer::new(0, true, true),
    InteractionLayer::new(1, true, true),
    InteractionLayer::new(1, false, true),
    InteractionLayer::new(0, false, true),
];

// ============================================================================
// Single-Qubit Gate Pool
// ============================================================================

/// `PhasedXz(x = 0.5, z, a)` parameters for every `a, z` in `{0, 1/4, ..., 7/4}`
/// Gantree: single_qubit_pool() -> Vec<(x,z,a)> // 64개 게이트
pub fn single_qubit_pool() -> Vec<(Exponent, Exponent, Exponent)> {
    let exponents = phase_exponents();
    let mut pool = Vec::with_capacity(exponents.len() * exponents.len());
    for &a in &exponents {
        for &z in &exponents {
            pool.push((0.5, z, a));
        }
    }
    pool
}

/// Nearest-neighbour pairs `(q, q + (0, 1))` and `(q, q + (1, 0))` present in `qubits`
pub fn coupled_pairs(qubits: &[GridQubit]) -> Vec<(QubitId, QubitId)> {
    let index: BTreeMap<GridQubit, QubitId> =
        qubits.iter().enumerate().map(|(i, &q)| (q, i)).collect();

    let mut pairs = Vec::new();
    for (i, q) in qubits.iter().enumerate() {
        for neighbor in [
            GridQubit::new(q.row, q.col + 1),
            GridQubit::new(q.row + 1, q.col),
        ] {
            if let Some(&j) = index.get(&neighbor) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

// ============================================================================
// Circuit Generation
// ============================================================================

/// Random rotations between grid interaction layers
/// Gantree: random_rotations_circuit(qubits, depth, gate, rng) -> Result<Circuit> // 무작위 회로
///
/// Circuit qubit `i` stands for `qubits[i]`. Each of the `depth` cycles is a
/// single-qubit layer followed by the interaction layer `pattern[cycle % 4]`;
/// a final single-qubit layer closes the circuit. A qubit never receives the
/// same pool gate in two consecutive single-qubit layers.
pub fn random_rotations_circuit<R: Rng + ?Sized>(
    qubits: &[GridQubit],
    depth: usize,
    two_qubit_gate: TwoQubitGate,
    rng: &mut R,
) -> QechoResult<Circuit> {
    let pool = single_qubit_pool();
    let pairs = coupled_pairs(qubits);
    let mut previous: Vec<Option<usize>> = vec![None; qubits.len()];
    let mut builder = CircuitBuilder::new(qubits.len());

    for cycle in 0..depth {
        builder = builder.layer(single_qubit_layer(&pool, &mut previous, rng));

        let layer = GRID_STAGGERED_PATTERN[cycle % GRID_STAGGERED_PATTERN.len()];
        builder = builder.layer(
            pairs
                .iter()
                .filter(|&&(i, j)| layer.contains(qubits[i], qubits[j]))
                .map(|&(i, j)| two_qubit_gate.gate(i, j)),
        );
    }
    builder = builder.layer(single_qubit_layer(&pool, &mut previous, rng));

    builder.build()
}

fn single_qubit_layer<R: Rng + ?Sized>(
    pool: &[(Exponent, Exponent, Exponent)],
    previous: &mut [Option<usize>],
    rng: &mut R,
) -> Vec<Gate> {
    previous
        .iter_mut()
        .enumerate()
        .map(|(qubit, last)| {
            let mut choice = rng.gen_range(0..pool.len());
            while Some(choice) == *last {
                choice = rng.gen_range(0..pool.len());
            }
            *last = Some(choice);
            let (x, z, a) = pool[choice];
            Gate::PhasedXz(qubit, x, z, a)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
