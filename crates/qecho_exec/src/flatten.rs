//! Flattening program groups
//!
//! Gantree: L2_Executable → Flatten
//!
//! Walks a group tree depth-first, left to right, and yields every
//! executable together with the metadata merged from the root down and the
//! chain of enclosing groups. A key defined twice on one root-to-leaf path
//! is reported when the walk reaches it; the iterator then stops.

use crate::executable::QuantumExecutable;
use crate::group::{ProgramGroup, ProgramNode};
use crate::info::{write_pairs, Info, InfoValue};
use qecho_core::{QechoError, QechoResult};
use std::fmt;

/// One flattened executable
/// Gantree: FlatEntry // 평탄화 항목
#[derive(Debug, Clone)]
pub struct FlatEntry<'a> {
    /// The executable
    pub executable: &'a QuantumExecutable,
    /// Metadata from root to leaf, in that order
    pub info: Vec<(&'a str, &'a InfoValue)>,
    /// Enclosing groups, nearest parent first
    pub ancestors: Vec<&'a ProgramGroup>,
}

impl<'a> FlatEntry<'a> {
    /// Look up a merged metadata value
    pub fn get(&self, key: &str) -> Option<&'a InfoValue> {
        self.info.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Merged keys in order
    pub fn keys(&self) -> Vec<&'a str> {
        self.info.iter().map(|(k, _)| *k).collect()
    }

    /// Owned copy of the merged metadata
    pub fn to_info(&self) -> QechoResult<Info> {
        Info::from_pairs(self.info.iter().map(|(k, v)| (*k, (*v).clone())))
    }
}

impl fmt::Display for FlatEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pairs(f, self.info.iter().copied())?;
        write!(f, " -> {}", self.executable.uuid())
    }
}

struct Frame<'a> {
    group: &'a ProgramGroup,
    next_child: usize,
    info_len: usize,
}

/// Lazy depth-first iterator over a group tree
/// Gantree: Flatten<'a> // 지연 평탄화
pub struct Flatten<'a> {
    root: Option<&'a ProgramGroup>,
    stack: Vec<Frame<'a>>,
    info: Vec<(&'a str, &'a InfoValue)>,
}

/// Flatten a tree into `(executable, merged info, ancestors)` entries
/// Gantree: flatten(root) -> Flatten // 평탄화
pub fn flatten(root: &ProgramGroup) -> Flatten<'_> {
    Flatten {
        root: Some(root),
        stack: Vec::new(),
        info: Vec::new(),
    }
}

/// Collect every entry, failing on the first duplicate key
pub fn flatten_all(root: &ProgramGroup) -> QechoResult<Vec<FlatEntry<'_>>> {
    flatten(root).collect()
}

impl<'a> Flatten<'a> {
    fn merge(&mut self, info: &'a Info) -> QechoResult<()> {
        for (key, value) in info.iter() {
            if self.info.iter().any(|(k, _)| *k == key) {
                return Err(QechoError::DuplicateInfoKey(key.to_string()));
            }
            self.info.push((key, value));
        }
        Ok(())
    }

    fn enter(&mut self, group: &'a ProgramGroup) -> QechoResult<()> {
        let info_len = self.info.len();
        self.merge(group.info())?;
        self.stack.push(Frame {
            group,
            next_child: 0,
            info_len,
        });
        Ok(())
    }

    fn fail(&mut self, error: QechoError) -> Option<QechoResult<FlatEntry<'a>>> {
        self.stack.clear();
        self.info.clear();
        Some(Err(error))
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = QechoResult<FlatEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            if let Err(e) = self.enter(root) {
                return self.fail(e);
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let group = frame.group;
            let Some(child) = group.children().get(frame.next_child) else {
                let info_len = frame.info_len;
                self.stack.pop();
                self.info.truncate(info_len);
                continue;
            };
            frame.next_child += 1;

            match child {
                ProgramNode::Group(g) => {
                    if let Err(e) = self.enter(g) {
                        return self.fail(e);
                    }
                }
                ProgramNode::Executable(executable) => {
                    let base = self.info.len();
                    if let Err(e) = self.merge(executable.info()) {
                        return self.fail(e);
                    }
                    let entry = FlatEntry {
                        executable,
                        info: self.info.clone(),
                        ancestors: self.stack.iter().rev().map(|f| f.group).collect(),
                    };
                    self.info.truncate(base);
                    return Some(Ok(entry));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Flatten<'_> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;
    use qecho_core::CircuitBuilder;

    fn leaf(key: &str, value: i64) -> QuantumExecutable {
        QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(1).phased_xz(0, 0.5, 0.0, 0.0).build().unwrap())
            .measurement(Measurement::bitstrings(10))
            .info_entry(key, value)
            .build()
            .unwrap()
    }

    fn info(key: &str, value: i64) -> Info {
        Info::from_pairs([(key, value)]).unwrap()
    }

    #[test]
    fn test_merged_info_order() {
        let root = ProgramGroup::new(info("p", 3), [leaf("n", 2)]);
        let entries = flatten_all(&root).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].keys(), vec!["p", "n"]);
        assert_eq!(entries[0].get("p"), Some(&InfoValue::Int(3)));
        assert_eq!(entries[0].get("n"), Some(&InfoValue::Int(2)));
    }

    #[test]
    fn test_duplicate_key_on_path() {
        let inner = ProgramGroup::new(info("p", 4), [leaf("n", 2)]);
        let root = ProgramGroup::new(info("p", 3), [inner]);

        let result = flatten_all(&root);
        assert_eq!(
            result.unwrap_err(),
            QechoError::DuplicateInfoKey("p".into())
        );
    }

    #[test]
    fn test_duplicate_between_leaf_and_group() {
        let root = ProgramGroup::new(info("n", 1), [leaf("n", 2)]);
        let mut iter = flatten(&root);
        assert!(matches!(iter.next(), Some(Err(QechoError::DuplicateInfoKey(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_same_key_on_sibling_paths_is_fine() {
        let root = ProgramGroup::new(
            Info::new(),
            [
                ProgramGroup::new(info("p", 1), [leaf("n", 1)]),
                ProgramGroup::new(info("p", 2), [leaf("n", 2)]),
            ],
        );
        let entries = flatten_all(&root).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].get("p"), Some(&InfoValue::Int(2)));
    }

    #[test]
    fn test_depth_first_order_and_ancestors() {
        let a = ProgramGroup::new(info("g", 0), [leaf("i", 0), leaf("i", 1)]);
        let b = ProgramGroup::new(info("g", 1), [leaf("i", 2)]);
        let root = ProgramGroup::new(info("root", 0), [a, b]);

        let entries = flatten_all(&root).unwrap();
        let order: Vec<i64> = entries
            .iter()
            .filter_map(|e| e.get("i").and_then(InfoValue::as_int))
            .collect();
        assert_eq!(order, vec![0, 1, 2]);

        let last = &entries[2];
        assert_eq!(last.ancestors.len(), 2);
        assert_eq!(last.ancestors[0].info().get("g"), Some(&InfoValue::Int(1)));
        assert_eq!(last.ancestors[1].uuid(), root.uuid());
    }

    #[test]
    fn test_leaf_directly_under_root() {
        let root = ProgramGroup::new(Info::new(), [leaf("x", 1)]);
        let entries = flatten_all(&root).unwrap();
        assert_eq!(entries[0].ancestors.len(), 1);
        assert_eq!(entries[0].to_info().unwrap().len(), 1);
    }

    #[test]
    fn test_lazy_stops_at_requested_count() {
        let leaves: Vec<QuantumExecutable> = (0..5).map(|i| leaf("i", i)).collect();
        let root = ProgramGroup::new(Info::new(), leaves);
        assert_eq!(flatten(&root).take(2).count(), 2);
    }

    #[test]
    fn test_empty_group() {
        let root = ProgramGroup::new(info("p", 1), Vec::<ProgramNode>::new());
        assert!(flatten_all(&root).unwrap().is_empty());
    }
}
