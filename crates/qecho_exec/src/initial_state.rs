//! Product-state initialization
//!
//! Gantree: L2_Executable → InitialState

use qecho_core::{Basis, QechoError, QechoResult, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Single-qubit eigenstate of a Pauli operator
/// Gantree: KetState // 단일 큐비트 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KetState {
    /// |0⟩
    Zero,
    /// |1⟩
    One,
    /// |+⟩
    Plus,
    /// |-⟩
    Minus,
    /// |+i⟩
    PlusI,
    /// |-i⟩
    MinusI,
}

impl KetState {
    /// Pauli basis this state is an eigenstate of
    pub fn basis(&self) -> Basis {
        match self {
            KetState::Zero | KetState::One => Basis::Z,
            KetState::Plus | KetState::Minus => Basis::X,
            KetState::PlusI | KetState::MinusI => Basis::Y,
        }
    }

    /// Eigenvalue sign (+1 or -1)
    pub fn eigenvalue(&self) -> i8 {
        match self {
            KetState::Zero | KetState::Plus | KetState::PlusI => 1,
            KetState::One | KetState::Minus | KetState::MinusI => -1,
        }
    }
}

impl fmt::Display for KetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KetState::Zero => "|0>",
            KetState::One => "|1>",
            KetState::Plus => "|+>",
            KetState::Minus => "|->",
            KetState::PlusI => "|+i>",
            KetState::MinusI => "|-i>",
        };
        write!(f, "{}", s)
    }
}

/// Product state over a subset of qubits; unlisted qubits start in |0⟩
/// Gantree: InitialState // 초기 상태
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<(QubitId, KetState)>", into = "Vec<(QubitId, KetState)>")]
pub struct InitialState {
    states: Vec<(QubitId, KetState)>,
}

impl InitialState {
    /// Build from `(qubit, state)` pairs; each qubit at most once
    pub fn new(states: impl IntoIterator<Item = (QubitId, KetState)>) -> QechoResult<Self> {
        let states: Vec<(QubitId, KetState)> = states.into_iter().collect();
        let mut seen = BTreeSet::new();
        for (qubit, _) in &states {
            if !seen.insert(*qubit) {
                return Err(QechoError::InvalidInitialState(format!(
                    "qubit {} assigned twice",
                    qubit
                )));
            }
        }
        Ok(Self { states })
    }

    /// Every qubit in `0..n` set to `state`
    pub fn uniform(n: usize, state: KetState) -> Self {
        Self {
            states: (0..n).map(|q| (q, state)).collect(),
        }
    }

    /// Listed qubit states
    pub fn states(&self) -> &[(QubitId, KetState)] {
        &self.states
    }

    /// State of one qubit
    pub fn get(&self, qubit: QubitId) -> KetState {
        self.states
            .iter()
            .find(|(q, _)| *q == qubit)
            .map(|(_, s)| *s)
            .unwrap_or(KetState::Zero)
    }

    /// Largest listed qubit
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.states.iter().map(|(q, _)| *q).max()
    }
}

impl TryFrom<Vec<(QubitId, KetState)>> for InitialState {
    type Error = QechoError;

    fn try_from(states: Vec<(QubitId, KetState)>) -> Result<Self, Self::Error> {
        Self::new(states)
    }
}

impl From<InitialState> for Vec<(QubitId, KetState)> {
    fn from(state: InitialState) -> Self {
        state.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = InitialState::new([(0, KetState::Plus), (2, KetState::One)]).unwrap();
        assert_eq!(state.get(0), KetState::Plus);
        assert_eq!(state.get(1), KetState::Zero);
        assert_eq!(state.max_qubit(), Some(2));
        assert_eq!(KetState::Plus.basis(), Basis::X);
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let result = InitialState::new([(1, KetState::Zero), (1, KetState::One)]);
        assert!(matches!(result, Err(QechoError::InvalidInitialState(_))));
    }

    #[test]
    fn test_serde() {
        let state = InitialState::uniform(2, KetState::MinusI);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"[[0,"minus_i"],[1,"minus_i"]]"#);
        assert!(serde_json::from_str::<InitialState>(r#"[[0,"zero"],[0,"one"]]"#).is_err());
    }
}
