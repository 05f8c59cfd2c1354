//! Program groups
//!
//! Gantree: L2_Executable → ProgramGroup
//!
//! Immutable tree of executables. Groups carry metadata that applies to
//! every executable beneath them.

use crate::executable::QuantumExecutable;
use crate::flatten::{flatten, Flatten};
use crate::info::{write_pairs, Info};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

// ============================================================================
// ProgramNode
// ============================================================================

/// Child of a group: an executable or a nested group
/// Gantree: ProgramNode // 트리 노드
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ProgramNode {
    /// Leaf
    Executable(QuantumExecutable),
    /// Nested group
    Group(ProgramGroup),
}

impl ProgramNode {
    /// Metadata of the node
    pub fn info(&self) -> &Info {
        match self {
            ProgramNode::Executable(e) => e.info(),
            ProgramNode::Group(g) => g.info(),
        }
    }

    /// Identifier of the node
    pub fn uuid(&self) -> Uuid {
        match self {
            ProgramNode::Executable(e) => e.uuid(),
            ProgramNode::Group(g) => g.uuid(),
        }
    }
}

impl From<QuantumExecutable> for ProgramNode {
    fn from(executable: QuantumExecutable) -> Self {
        ProgramNode::Executable(executable)
    }
}

impl From<ProgramGroup> for ProgramNode {
    fn from(group: ProgramGroup) -> Self {
        ProgramNode::Group(group)
    }
}

// ============================================================================
// ProgramGroup
// ============================================================================

/// Immutable group of programs
/// Gantree: ProgramGroup // 프로그램 그룹
///
/// Equality and hashing cover `(info, children)`, not the UUID.
///
/// ```compile_fail
/// use qecho_exec::{Info, ProgramGroup, ProgramNode};
///
/// let mut group = ProgramGroup::new(Info::new(), Vec::<ProgramNode>::new());
/// group.children = Vec::new();
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "GroupRepr")]
pub struct ProgramGroup {
    info: Info,
    children: Vec<ProgramNode>,
    uuid: Uuid,
    payload_hash: u64,
}

impl ProgramGroup {
    /// Create a group with a fresh identifier
    /// Gantree: new(info, children) -> Self // 그룹 생성
    pub fn new<C>(info: Info, children: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<ProgramNode>,
    {
        Self::with_uuid(info, children, Uuid::new_v4())
    }

    /// Create a group reusing an identifier
    pub fn with_uuid<C>(info: Info, children: C, uuid: Uuid) -> Self
    where
        C: IntoIterator,
        C::Item: Into<ProgramNode>,
    {
        let children: Vec<ProgramNode> = children.into_iter().map(Into::into).collect();

        let mut hasher = DefaultHasher::new();
        info.hash(&mut hasher);
        children.hash(&mut hasher);

        Self {
            info,
            children,
            uuid,
            payload_hash: hasher.finish(),
        }
    }

    /// Metadata
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Children in order
    pub fn children(&self) -> &[ProgramNode] {
        &self.children
    }

    /// Identifier
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Lazy depth-first walk over every executable
    pub fn flatten(&self) -> Flatten<'_> {
        flatten(self)
    }

    /// Every executable in depth-first order, without merged metadata
    pub fn executables(&self) -> Vec<&QuantumExecutable> {
        let mut out = Vec::new();
        collect_executables(self, &mut out);
        out
    }

    /// Number of executables in the subtree
    /// Gantree: num_executables(&self) -> usize // 실행 단위 수
    pub fn num_executables(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                ProgramNode::Executable(_) => 1,
                ProgramNode::Group(g) => g.num_executables(),
            })
            .sum()
    }
}

fn collect_executables<'a>(group: &'a ProgramGroup, out: &mut Vec<&'a QuantumExecutable>) {
    for child in &group.children {
        match child {
            ProgramNode::Executable(e) => out.push(e),
            ProgramNode::Group(g) => collect_executables(g, out),
        }
    }
}

impl PartialEq for ProgramGroup {
    fn eq(&self, other: &Self) -> bool {
        self.payload_hash == other.payload_hash
            && self.info == other.info
            && self.children == other.children
    }
}

impl Eq for ProgramGroup {}

impl Hash for ProgramGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.payload_hash);
    }
}

impl fmt::Display for ProgramGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramGroup(info=")?;
        write_pairs(f, self.info.iter())?;
        write!(f, ")")
    }
}

// ============================================================================
// Wire Form
// ============================================================================

#[derive(Serialize)]
struct GroupView<'a> {
    info: &'a Info,
    children: &'a [ProgramNode],
    uuid: Uuid,
}

impl Serialize for ProgramGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GroupView {
            info: &self.info,
            children: &self.children,
            uuid: self.uuid,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct GroupRepr {
    #[serde(default)]
    info: Info,
    children: Vec<ProgramNode>,
    uuid: Uuid,
}

impl From<GroupRepr> for ProgramGroup {
    fn from(repr: GroupRepr) -> Self {
        Self::with_uuid(repr.info, repr.children, repr.uuid)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;
    use qecho_core::CircuitBuilder;

    fn leaf(n: i64) -> QuantumExecutable {
        QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(2).cz(0, 1).build().unwrap())
            .measurement(Measurement::bitstrings(10))
            .info_entry("n", n)
            .build()
            .unwrap()
    }

    fn tree() -> ProgramGroup {
        ProgramGroup::new(
            Info::from_pairs([("name", "qaoa-sk")]).unwrap(),
            [ProgramGroup::new(
                Info::from_pairs([("p", 3)]).unwrap(),
                [leaf(2), leaf(10)],
            )],
        )
    }

    #[test]
    fn test_counts() {
        let group = tree();
        assert_eq!(group.num_executables(), 2);
        assert_eq!(group.executables().len(), 2);
        assert_eq!(group.children().len(), 1);
    }

    #[test]
    fn test_structural_equality() {
        let a = tree();
        let b = tree();
        assert_ne!(a.uuid(), b.uuid());
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());

        let c = ProgramGroup::new(Info::new(), [leaf(2)]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_mixed_children() {
        let group = ProgramGroup::new(
            Info::new(),
            vec![
                ProgramNode::from(leaf(1)),
                ProgramNode::from(ProgramGroup::new(Info::new(), [leaf(2), leaf(3)])),
            ],
        );
        assert_eq!(group.num_executables(), 3);
    }

    #[test]
    fn test_json_tagging() {
        let group = tree();
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["children"][0]["node"], "group");
        assert_eq!(value["children"][0]["children"][0]["node"], "executable");

        let back: ProgramGroup = serde_json::from_value(value).unwrap();
        assert_eq!(back, group);
        assert_eq!(back.uuid(), group.uuid());
    }

    #[test]
    fn test_display() {
        assert_eq!(tree().to_string(), "ProgramGroup(info={name: 'qaoa-sk'})");
    }
}
