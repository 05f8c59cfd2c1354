//! Metadata and parameter records
//!
//! Gantree: L2_Executable → Info
//!
//! `Info` and `Params` are ordered key/value lists with unique keys.
//! Both serialize as arrays of `[key, value]` pairs so order survives a
//! round trip.

use qecho_core::types::canonical_bits;
use qecho_core::{
    DiagonalRectangleTopology, LineTopology, ProblemTopology, QechoError, QechoResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// InfoValue
// ============================================================================

/// Value stored under an info key
/// Gantree: InfoValue // 메타데이터 값
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Finite float
    Float(f64),
    /// Text
    Str(String),
    /// Problem topology
    Topology(ProblemTopology),
}

impl InfoValue {
    /// Integer view
    pub fn as_int(&self) -> Option<i64> {
        match self {
            InfoValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            InfoValue::Float(v) => Some(*v),
            InfoValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Topology view
    pub fn as_topology(&self) -> Option<&ProblemTopology> {
        match self {
            InfoValue::Topology(t) => Some(t),
            _ => None,
        }
    }

    fn validate(&self, key: &str) -> QechoResult<()> {
        if let InfoValue::Float(v) = self {
            qecho_core::types::ensure_finite(key, *v)?;
        }
        Ok(())
    }
}

impl Eq for InfoValue {}

impl Hash for InfoValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            InfoValue::Bool(v) => v.hash(state),
            InfoValue::Int(v) => v.hash(state),
            InfoValue::Float(v) => canonical_bits(*v).hash(state),
            InfoValue::Str(v) => v.hash(state),
            InfoValue::Topology(v) => v.hash(state),
        }
    }
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Bool(v) => write!(f, "{}", v),
            InfoValue::Int(v) => write!(f, "{}", v),
            InfoValue::Float(v) => write!(f, "{:?}", v),
            InfoValue::Str(v) => write!(f, "'{}'", v),
            InfoValue::Topology(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! info_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for InfoValue {
                fn from(value: $ty) -> Self {
                    InfoValue::$variant(value.into())
                }
            }
        )*
    };
}

info_value_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f64 => Float,
    String => Str,
    &str => Str,
    ProblemTopology => Topology,
    LineTopology => Topology,
    DiagonalRectangleTopology => Topology,
}

impl TryFrom<usize> for InfoValue {
    type Error = QechoError;

    fn try_from(value: usize) -> QechoResult<Self> {
        i64::try_from(value)
            .map(InfoValue::Int)
            .map_err(|_| QechoError::IntegerOutOfRange(value.to_string()))
    }
}

// ============================================================================
// Info
// ============================================================================

/// Ordered metadata with unique keys
/// Gantree: Info // 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, InfoValue)>", into = "Vec<(String, InfoValue)>")]
pub struct Info {
    entries: Vec<(String, InfoValue)>,
}

impl Info {
    /// Empty info
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs, rejecting duplicate keys and non-finite floats
    /// Gantree: from_pairs(iter) -> Result<Info> // 정규화
    pub fn from_pairs<I, K, V>(pairs: I) -> QechoResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<InfoValue>,
    {
        let mut info = Self::new();
        for (key, value) in pairs {
            info.push(key.into(), value.into())?;
        }
        Ok(info)
    }

    fn push(&mut self, key: String, value: InfoValue) -> QechoResult<()> {
        if self.contains_key(&key) {
            return Err(QechoError::DuplicateKey(key));
        }
        value.validate(&key)?;
        self.entries.push((key, value));
        Ok(())
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<(String, InfoValue)>> for Info {
    type Error = QechoError;

    fn try_from(pairs: Vec<(String, InfoValue)>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}

impl From<Info> for Vec<(String, InfoValue)> {
    fn from(info: Info) -> Self {
        info.entries
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pairs(f, self.iter())
    }
}

/// Render `{k: v, ...}`
pub(crate) fn write_pairs<'a, V: fmt::Display + 'a>(
    f: &mut fmt::Formatter<'_>,
    pairs: impl Iterator<Item = (&'a str, V)>,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in pairs.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", key, value)?;
    }
    write!(f, "}}")
}

// ============================================================================
// Params
// ============================================================================

/// Ordered circuit parameter assignment
/// Gantree: Params // 파라미터
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, f64)>", into = "Vec<(String, f64)>")]
pub struct Params {
    entries: Vec<(String, f64)>,
}

impl Params {
    /// No parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs, rejecting duplicate names and non-finite values
    pub fn from_pairs<I, K>(pairs: I) -> QechoResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut entries: Vec<(String, f64)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            if entries.iter().any(|(n, _)| *n == name) {
                return Err(QechoError::DuplicateKey(name));
            }
            let value = qecho_core::types::ensure_finite(&name, value)?;
            entries.push((name, value));
        }
        Ok(Self { entries })
    }

    /// Look up a value
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Values are finite by construction.
impl Eq for Params {}

impl Hash for Params {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        for (name, value) in &self.entries {
            name.hash(state);
            canonical_bits(*value).hash(state);
        }
    }
}

impl TryFrom<Vec<(String, f64)>> for Params {
    type Error = QechoError;

    fn try_from(pairs: Vec<(String, f64)>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}

impl From<Params> for Vec<(String, f64)> {
    fn from(params: Params) -> Self {
        params.entries
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_order_preserved() {
        let info = Info::from_pairs([("name", InfoValue::from("otoc")), ("p", InfoValue::from(3))]).unwrap();
        assert_eq!(info.keys().collect::<Vec<_>>(), vec!["name", "p"]);
        assert_eq!(info.get("p").and_then(InfoValue::as_int), Some(3));
        assert_eq!(info.to_string(), "{name: 'otoc', p: 3}");
    }

    #[test]
    fn test_info_duplicate_key() {
        let result = Info::from_pairs([("p", 1i64), ("p", 2i64)]);
        assert_eq!(result, Err(QechoError::DuplicateKey("p".into())));
    }

    #[test]
    fn test_info_rejects_nan() {
        assert!(Info::from_pairs([("x", f64::NAN)]).is_err());
    }

    #[test]
    fn test_info_json_pairs() {
        let topo = DiagonalRectangleTopology::new(1, 2);
        let info = Info::from_pairs([
            ("topology", InfoValue::from(topo)),
            ("instance_i", InfoValue::try_from(4usize).unwrap()),
            ("weight", InfoValue::from(0.5)),
            ("flag", InfoValue::from(true)),
        ])
        .unwrap();

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.starts_with(r#"[["topology",{"kind":"diagonal_rectangle""#));

        let back: Info = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
        assert_eq!(back.get("weight"), Some(&InfoValue::Float(0.5)));
        assert_eq!(back.get("instance_i"), Some(&InfoValue::Int(4)));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_usize_out_of_range() {
        assert_eq!(
            InfoValue::try_from(usize::MAX),
            Err(QechoError::IntegerOutOfRange(usize::MAX.to_string()))
        );
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(InfoValue::Float(2.0).to_string(), "2.0");
        assert_eq!(InfoValue::Int(2).to_string(), "2");
        assert_eq!(InfoValue::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_info_json_duplicate_rejected() {
        let json = r#"[["p", 1], ["p", 2]]"#;
        assert!(serde_json::from_str::<Info>(json).is_err());
    }

    #[test]
    fn test_params() {
        let params = Params::from_pairs([("theta", 0.25), ("phi", -0.0)]).unwrap();
        assert_eq!(params.get("theta"), Some(0.25));
        assert_eq!(params.len(), 2);

        assert!(Params::from_pairs([("a", 1.0), ("a", 2.0)]).is_err());
        assert!(Params::from_pairs([("a", f64::INFINITY)]).is_err());
    }
}
