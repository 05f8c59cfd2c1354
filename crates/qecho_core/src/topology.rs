//! Problem topologies for QEcho
//!
//! Gantree: L1_Circuit → Topology
//!
//! Named graphs describing which qubit pairs interact in a problem:
//! lines over integer nodes and diagonal rectangles over grid coordinates.
//! A topology is identified by its defining parameters; the graph is
//! derived data and is rebuilt on deserialization.

use crate::circuit::Circuit;
use crate::error::{QechoError, QechoResult};
use crate::placement::find_placements;
use crate::types::{GridQubit, QubitId};
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Undirected graph keyed by node identifier
pub type TopologyGraph<N> = UnGraphMap<N, ()>;

// ============================================================================
// Line
// ============================================================================

/// Path graph over nodes `0..n`
/// Gantree: LineTopology // 선형 토폴로지
#[derive(Clone)]
pub struct LineTopology {
    n_qubits: usize,
    graph: TopologyGraph<QubitId>,
}

impl LineTopology {
    /// Create a line of `n_qubits` nodes
    /// Gantree: new(n) -> Result<Self> // 선형 체인
    ///
    /// Connectivity: 0-1-2-...-N-1
    pub fn new(n_qubits: usize) -> QechoResult<Self> {
        if n_qubits < 1 {
            return Err(QechoError::InvalidTopology(
                "a line needs at least one qubit".into(),
            ));
        }

        let mut graph = TopologyGraph::with_capacity(n_qubits, n_qubits - 1);
        for i in 0..n_qubits {
            graph.add_node(i);
        }
        for i in 1..n_qubits {
            graph.add_edge(i - 1, i, ());
        }

        Ok(Self { n_qubits, graph })
    }

    /// Number of qubits
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Topology name, e.g. `4q-line`
    pub fn name(&self) -> String {
        format!("{}q-line", self.n_qubits)
    }

    /// Underlying graph
    pub fn graph(&self) -> &TopologyGraph<QubitId> {
        &self.graph
    }

    /// Ordered node list
    pub fn qubits(&self) -> Vec<QubitId> {
        (0..self.n_qubits).collect()
    }
}

impl PartialEq for LineTopology {
    fn eq(&self, other: &Self) -> bool {
        self.n_qubits == other.n_qubits
    }
}

impl Eq for LineTopology {}

impl Hash for LineTopology {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.n_qubits.hash(state);
    }
}

impl fmt::Debug for LineTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineTopology(n_qubits={})", self.n_qubits)
    }
}

// ============================================================================
// Diagonal Rectangle
// ============================================================================

/// Rotated grid made of `width × height` unit cells
/// Gantree: DiagonalRectangleTopology // 대각 사각형
///
/// Each cell at (row, col) is centred on `(x, y) = (col - row, col + row)`
/// and couples the centre to its four grid neighbours. Adjacent cells share
/// corner nodes.
#[derive(Clone)]
pub struct DiagonalRectangleTopology {
    width: usize,
    height: usize,
    graph: TopologyGraph<GridQubit>,
}

impl DiagonalRectangleTopology {
    /// Build the rectangle
    /// Gantree: new(w, h) -> Self // 대각 사각형 생성
    ///
    /// # Panics
    ///
    /// Panics if the constructed graph does not have
    /// `2·w·h + w + h + 1` nodes, which would be a construction bug.
    pub fn new(width: usize, height: usize) -> Self {
        let mut graph = TopologyGraph::new();

        // Corner lattice: (height + 1) × (width + 1) nodes shared between cells.
        for i in 0..=height as i32 {
            for j in 0..=width as i32 {
                graph.add_node(GridQubit::new(j - i, j + i - 1));
            }
        }

        for megarow in 0..height as i32 {
            for megacol in 0..width as i32 {
                let center = GridQubit::new(megacol - megarow, megacol + megarow);
                for corner in center.neighbors() {
                    graph.add_edge(center, corner, ());
                }
            }
        }

        let expected = Self::expected_qubits(width, height);
        assert_eq!(
            graph.node_count(),
            expected,
            "diagonal rectangle {}x{} built {} nodes, expected {}",
            width,
            height,
            graph.node_count(),
            expected
        );

        Self {
            width,
            height,
            graph,
        }
    }

    /// Analytic node count `2·w·h + w + h + 1`
    pub const fn expected_qubits(width: usize, height: usize) -> usize {
        2 * width * height + width + height + 1
    }

    /// Width in unit cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in unit cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of qubits
    pub fn n_qubits(&self) -> usize {
        self.graph.node_count()
    }

    /// Topology name, e.g. `2-3-diagonal-rectangle`
    pub fn name(&self) -> String {
        format!("{}-{}-diagonal-rectangle", self.width, self.height)
    }

    /// Underlying graph
    pub fn graph(&self) -> &TopologyGraph<GridQubit> {
        &self.graph
    }

    /// Qubits sorted by (row, col)
    /// Gantree: qubits(&self) -> Vec<GridQubit> // 정렬된 큐비트
    pub fn qubits(&self) -> Vec<GridQubit> {
        let mut qubits: Vec<GridQubit> = self.graph.nodes().collect();
        qubits.sort();
        qubits
    }
}

impl PartialEq for DiagonalRectangleTopology {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Eq for DiagonalRectangleTopology {}

impl Hash for DiagonalRectangleTopology {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
    }
}

impl fmt::Debug for DiagonalRectangleTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DiagonalRectangleTopology(width={}, height={})",
            self.width, self.height
        )
    }
}

/// Every rectangle with `min_side <= width <= height <= max_side`
/// Gantree: all_diagonal_rectangles(min, max) -> Vec // 전체 사각형
pub fn all_diagonal_rectangles(
    min_side: usize,
    max_side: usize,
) -> Vec<DiagonalRectangleTopology> {
    let mut topologies = Vec::new();
    for width in min_side..=max_side {
        for height in width..=max_side {
            topologies.push(DiagonalRectangleTopology::new(width, height));
        }
    }
    topologies
}

// ============================================================================
// Device Graphs
// ============================================================================

/// Rectangular device of `rows × cols` grid qubits with nearest-neighbour couplers
pub fn device_grid(rows: usize, cols: usize) -> TopologyGraph<GridQubit> {
    let mut graph = TopologyGraph::new();
    for r in 0..rows as i32 {
        for c in 0..cols as i32 {
            let q = GridQubit::new(r, c);
            graph.add_node(q);
            if c + 1 < cols as i32 {
                graph.add_edge(q, GridQubit::new(r, c + 1), ());
            }
            if r + 1 < rows as i32 {
                graph.add_edge(q, GridQubit::new(r + 1, c), ());
            }
        }
    }
    graph
}

// ============================================================================
// ProblemTopology
// ============================================================================

/// Closed set of problem topologies
/// Gantree: ProblemTopology // 토폴로지 enum
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TopologyParams", into = "TopologyParams")]
pub enum ProblemTopology {
    /// Path graph
    Line(LineTopology),
    /// Rotated grid rectangle
    DiagonalRectangle(DiagonalRectangleTopology),
}

/// Serialized form: defining parameters only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TopologyParams {
    Line { n_qubits: usize },
    DiagonalRectangle { width: usize, height: usize },
}

impl TryFrom<TopologyParams> for ProblemTopology {
    type Error = QechoError;

    fn try_from(params: TopologyParams) -> Result<Self, Self::Error> {
        Ok(match params {
            TopologyParams::Line { n_qubits } => ProblemTopology::Line(LineTopology::new(n_qubits)?),
            TopologyParams::DiagonalRectangle { width, height } => {
                ProblemTopology::DiagonalRectangle(DiagonalRectangleTopology::new(width, height))
            }
        })
    }
}

impl From<ProblemTopology> for TopologyParams {
    fn from(topology: ProblemTopology) -> Self {
        match topology {
            ProblemTopology::Line(line) => TopologyParams::Line {
                n_qubits: line.n_qubits,
            },
            ProblemTopology::DiagonalRectangle(rect) => TopologyParams::DiagonalRectangle {
                width: rect.width,
                height: rect.height,
            },
        }
    }
}

impl From<LineTopology> for ProblemTopology {
    fn from(line: LineTopology) -> Self {
        ProblemTopology::Line(line)
    }
}

impl From<DiagonalRectangleTopology> for ProblemTopology {
    fn from(rect: DiagonalRectangleTopology) -> Self {
        ProblemTopology::DiagonalRectangle(rect)
    }
}

impl ProblemTopology {
    /// Topology name
    pub fn name(&self) -> String {
        match self {
            ProblemTopology::Line(t) => t.name(),
            ProblemTopology::DiagonalRectangle(t) => t.name(),
        }
    }

    /// Number of qubits
    pub fn n_qubits(&self) -> usize {
        match self {
            ProblemTopology::Line(t) => t.n_qubits(),
            ProblemTopology::DiagonalRectangle(t) => t.n_qubits(),
        }
    }

    /// Whether circuit qubits `a` and `b` (indices into the qubit order) interact
    pub fn is_coupled(&self, a: QubitId, b: QubitId) -> bool {
        self.coupled_in(&self.grid_order(), a, b)
    }

    /// Sorted rectangle qubits; empty for a line
    fn grid_order(&self) -> Vec<GridQubit> {
        match self {
            ProblemTopology::Line(_) => Vec::new(),
            ProblemTopology::DiagonalRectangle(t) => t.qubits(),
        }
    }

    fn coupled_in(&self, order: &[GridQubit], a: QubitId, b: QubitId) -> bool {
        match self {
            ProblemTopology::Line(t) => t.graph.contains_edge(a, b),
            ProblemTopology::DiagonalRectangle(t) => match (order.get(a), order.get(b)) {
                (Some(&qa), Some(&qb)) => t.graph.contains_edge(qa, qb),
                _ => false,
            },
        }
    }

    /// Validate a circuit laid out in this topology's qubit order
    /// Gantree: validate_circuit(&self, Circuit) -> Result // 검증
    pub fn validate_circuit(&self, circuit: &Circuit) -> QechoResult<()> {
        let n = self.n_qubits();
        if circuit.num_qubits() > n {
            return Err(QechoError::QubitOutOfRange {
                qubit: circuit.num_qubits() - 1,
                num_qubits: n,
            });
        }

        let order = self.grid_order();
        for (q1, q2) in circuit.two_qubit_pairs() {
            if !self.coupled_in(&order, q1, q2) {
                return Err(QechoError::TopologyViolation { q1, q2 });
            }
        }

        Ok(())
    }

    /// Distinct placements on a device, as device qubits in topology qubit order
    /// Gantree: placements_in(&self, device) -> Result<Vec> // 배치 후보
    pub fn placements_in(
        &self,
        device: &TopologyGraph<GridQubit>,
    ) -> QechoResult<Vec<Vec<GridQubit>>> {
        match self {
            ProblemTopology::Line(t) => {
                let placements = find_placements(device, t.graph())?;
                Ok(placements
                    .iter()
                    .map(|p| t.qubits().into_iter().filter_map(|q| p.image(q)).collect())
                    .collect())
            }
            ProblemTopology::DiagonalRectangle(t) => {
                let placements = find_placements(device, t.graph())?;
                let order = t.qubits();
                Ok(placements
                    .iter()
                    .map(|p| order.iter().filter_map(|&q| p.image(q)).collect())
                    .collect())
            }
        }
    }
}

impl fmt::Display for ProblemTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Tests
// ============================================================================
