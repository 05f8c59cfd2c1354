//! Loschmidt echo circuits
//!
//! Gantree: L4_Otoc → EchoCircuit
//!
//! A random unitary `U` over the topology's qubits, followed by `U†` and a
//! readout of every qubit. Without noise every repetition returns all zeros.

use qecho_core::loschmidt::{CYCLES_PER_MACROCYCLE, MEASUREMENT_KEY};
use qecho_core::{
    random_rotations_circuit, CircuitBuilder, DiagonalRectangleTopology, FrozenCircuit,
    QechoResult, TwoQubitGate,
};
use rand::Rng;

/// Build a frozen echo circuit with `4 × macrocycle_depth` forward cycles
/// Gantree: loschmidt_echo_circuit(topology, macrocycle_depth, twoq_gate, rng) -> Result<FrozenCircuit>
///
/// Circuit qubit `i` is `topology.qubits()[i]`.
pub fn loschmidt_echo_circuit<R: Rng + ?Sized>(
    topology: &DiagonalRectangleTopology,
    macrocycle_depth: usize,
    twoq_gate: TwoQubitGate,
    rng: &mut R,
) -> QechoResult<FrozenCircuit> {
    let qubits = topology.qubits();
    let forward = random_rotations_circuit(
        &qubits,
        CYCLES_PER_MACROCYCLE * macrocycle_depth,
        twoq_gate,
        rng,
    )?;
    let reverse = forward.inverse()?;

    CircuitBuilder::with_name(qubits.len(), topology.name())
        .extend(&forward)
        .extend(&reverse)
        .measure_all(MEASUREMENT_KEY)
        .build_frozen()
}
