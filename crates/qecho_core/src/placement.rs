//! Placement search for QEcho
//!
//! Gantree: L1_Circuit → Placement
//!
//! Enumerates adjacency-preserving injective maps (monomorphisms) of a small
//! graph into a big one and collapses them by the set of big nodes used.
//! The match is not induced: the image may carry edges the small graph lacks.

use crate::error::{QechoError, QechoResult};
use petgraph::graphmap::{NodeTrait, UnGraphMap};
use std::cmp::Reverse;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// One embedding of a small graph inside a big graph
/// Gantree: Placement // 배치
#[derive(Debug, Clone)]
pub struct Placement<B: NodeTrait, S: NodeTrait> {
    mapping: BTreeMap<S, B>,
    graph: UnGraphMap<B, ()>,
}

impl<B: NodeTrait, S: NodeTrait> Placement<B, S> {
    /// Small node → big node
    pub fn mapping(&self) -> &BTreeMap<S, B> {
        &self.mapping
    }

    /// Small graph relabeled into big-graph nodes
    pub fn graph(&self) -> &UnGraphMap<B, ()> {
        &self.graph
    }

    /// Big nodes occupied by this placement
    pub fn nodes(&self) -> BTreeSet<B> {
        self.mapping.values().copied().collect()
    }

    /// Image of a small node
    pub fn image(&self, node: S) -> Option<B> {
        self.mapping.get(&node).copied()
    }
}

/// Find every distinct node-set placement of `small` inside `big`
/// Gantree: find_placements(big, small) -> Result<Vec<Placement>> // 배치 탐색
///
/// The first monomorphism found for each node set is kept. Ordering follows
/// the search order and callers must not rely on it.
pub fn find_placements<B, S>(
    big: &UnGraphMap<B, ()>,
    small: &UnGraphMap<S, ()>,
) -> QechoResult<Vec<Placement<B, S>>>
where
    B: NodeTrait,
    S: NodeTrait,
{
    reject_self_loops(big, "big")?;
    reject_self_loops(small, "small")?;

    let mut by_node_set: BTreeMap<BTreeSet<B>, BTreeMap<S, B>> = BTreeMap::new();
    let mut first_seen: Vec<BTreeSet<B>> = Vec::new();
    let mut monomorphisms = 0usize;

    let mut matcher = Matcher::new(big, small);
    matcher.search(0, &mut |mapping| {
        monomorphisms += 1;
        let node_set: BTreeSet<B> = mapping.values().copied().collect();
        if let Entry::Vacant(slot) = by_node_set.entry(node_set.clone()) {
            slot.insert(mapping.clone());
            first_seen.push(node_set);
        }
    });

    log::debug!(
        "placement search: {} monomorphisms, {} distinct node sets",
        monomorphisms,
        first_seen.len()
    );

    Ok(first_seen
        .into_iter()
        .filter_map(|set| by_node_set.remove(&set))
        .map(|mapping| relabel(small, mapping))
        .collect())
}

fn reject_self_loops<N: NodeTrait>(graph: &UnGraphMap<N, ()>, which: &str) -> QechoResult<()> {
    if graph.all_edges().any(|(a, b, _)| a == b) {
        return Err(QechoError::InvalidGraph(format!(
            "{} graph contains a self-loop",
            which
        )));
    }
    Ok(())
}

fn relabel<B: NodeTrait, S: NodeTrait>(
    small: &UnGraphMap<S, ()>,
    mapping: BTreeMap<S, B>,
) -> Placement<B, S> {
    let mut graph = UnGraphMap::with_capacity(small.node_count(), small.edge_count());
    for node in mapping.values() {
        graph.add_node(*node);
    }
    for (a, b, _) in small.all_edges() {
        if let (Some(&x), Some(&y)) = (mapping.get(&a), mapping.get(&b)) {
            graph.add_edge(x, y, ());
        }
    }
    Placement { mapping, graph }
}

// ============================================================================
// Backtracking Matcher
// ============================================================================

struct Matcher<'g, B: NodeTrait, S: NodeTrait> {
    big: &'g UnGraphMap<B, ()>,
    small: &'g UnGraphMap<S, ()>,
    order: Vec<S>,
    assigned: BTreeMap<S, B>,
    used: BTreeSet<B>,
}

impl<'g, B: NodeTrait, S: NodeTrait> Matcher<'g, B, S> {
    fn new(big: &'g UnGraphMap<B, ()>, small: &'g UnGraphMap<S, ()>) -> Self {
        Self {
            big,
            small,
            order: matching_order(small),
            assigned: BTreeMap::new(),
            used: BTreeSet::new(),
        }
    }

    fn search<F: FnMut(&BTreeMap<S, B>)>(&mut self, depth: usize, found: &mut F) {
        if depth == self.order.len() {
            found(&self.assigned);
            return;
        }

        let big = self.big;
        let small = self.small;
        let node = self.order[depth];
        let degree = small.neighbors(node).count();

        // Anchor on an already-placed neighbour to keep the candidate set local.
        let anchor = small
            .neighbors(node)
            .find_map(|n| self.assigned.get(&n).copied());
        let candidates: Vec<B> = match anchor {
            Some(image) => big.neighbors(image).collect(),
            None => big.nodes().collect(),
        };

        for candidate in candidates {
            if self.used.contains(&candidate) || big.neighbors(candidate).count() < degree {
                continue;
            }
            let consistent = small.neighbors(node).all(|n| match self.assigned.get(&n) {
                Some(&image) => big.contains_edge(candidate, image),
                None => true,
            });
            if !consistent {
                continue;
            }

            self.assigned.insert(node, candidate);
            self.used.insert(candidate);
            self.search(depth + 1, found);
            self.assigned.remove(&node);
            self.used.remove(&candidate);
        }
    }
}

/// Connectivity-first node order: each next node has the most already-ordered neighbours
fn matching_order<S: NodeTrait>(small: &UnGraphMap<S, ()>) -> Vec<S> {
    let mut order = Vec::with_capacity(small.node_count());
    let mut placed = BTreeSet::new();

    while order.len() < small.node_count() {
        let next = small
            .nodes()
            .filter(|n| !placed.contains(n))
            .max_by_key(|&n| {
                let linked = small.neighbors(n).filter(|m| placed.contains(m)).count();
                (linked, small.neighbors(n).count(), Reverse(n))
            });
        match next {
            Some(node) => {
                placed.insert(node);
                order.push(node);
            }
            None => break,
        }
    }

    order
}

// ============================================================================
// Tests
// ============================================================================
