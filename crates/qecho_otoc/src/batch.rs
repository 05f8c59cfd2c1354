//! Diagonal-rectangle batch generation
//!
//! Gantree: L4_Otoc → Batch
//!
//! Tree layout: `{name}` → `{topology}` → `{macrocycle_depth}` → leaves
//! tagged `{instance_i}`. Circuits draw from one seeded generator in tree
//! order, so a given configuration always yields the same circuits.

use crate::config::LoschmidtConfig;
use crate::echo::loschmidt_echo_circuit;
use qecho_core::{all_diagonal_rectangles, DiagonalRectangleTopology, QechoResult};
use qecho_exec::{Info, InfoValue, Measurement, ProgramGroup, QuantumExecutable};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rectangles swept by `config`
pub fn all_diagonal_rect_topologies(config: &LoschmidtConfig) -> Vec<DiagonalRectangleTopology> {
    all_diagonal_rectangles(config.min_side, config.max_side)
}

/// Build the full sweep as a program group
/// Gantree: all_diagonal_rect_executables(config) -> Result<ProgramGroup> // 배치 생성
pub fn all_diagonal_rect_executables(config: &LoschmidtConfig) -> QechoResult<ProgramGroup> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut topology_groups = Vec::new();

    for topology in all_diagonal_rect_topologies(config) {
        let mut depth_groups = Vec::with_capacity(config.macrocycle_depths.len());

        for &depth in &config.macrocycle_depths {
            let mut instances = Vec::with_capacity(config.n_instances);
            for instance_i in 0..config.n_instances {
                let circuit =
                    loschmidt_echo_circuit(&topology, depth, config.two_qubit_gate, &mut rng)?;
                instances.push(
                    QuantumExecutable::builder()
                        .frozen_circuit(circuit)
                        .measurement(Measurement::bitstrings(config.n_repetitions))
                        .problem_topology(topology.clone())
                        .info_entry("instance_i", InfoValue::try_from(instance_i)?)
                        .build()?,
                );
            }
            depth_groups.push(ProgramGroup::new(
                Info::from_pairs([("macrocycle_depth", InfoValue::try_from(depth)?)])?,
                instances,
            ));
        }

        log::debug!(
            "{}: {} depths x {} instances",
            topology.name(),
            config.macrocycle_depths.len(),
            config.n_instances
        );
        topology_groups.push(ProgramGroup::new(
            Info::from_pairs([("topology", topology)])?,
            depth_groups,
        ));
    }

    let root = ProgramGroup::new(
        Info::from_pairs([("name", config.name.as_str())])?,
        topology_groups,
    );
    log::info!(
        "built {} executables over {} topologies",
        root.num_executables(),
        root.children().len()
    );
    Ok(root)
}
