use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

/// The label that every namespace carries with its own name.
pub const NAMESPACE_NAME: &str = "kubernetes.io/metadata.name";

#[derive(Clone, Debug, Eq, Default)]
pub struct Labels(Arc<Map>);

pub type Map = BTreeMap<String, String>;

pub type Expressions = Vec<Expression>;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Expression {
    key: String,
    #[serde(default)]
    operator: Operator,
    #[serde(default)]
    values: Option<BTreeSet<String>>,
}

/// A set-based selector operator.
///
/// Operators are read from arbitrary strings so that a document carrying an
/// operator we don't know still loads; such an expression never matches. A
/// missing operator is unknown.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Unknown(String),
}

/// Selects a set of labeled resources.
#[derive(Clone, Debug, Eq, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    match_labels: Option<Map>,
    match_expressions: Option<Expressions>,
}

// === Selector ===

impl Selector {
    pub fn from_expressions(exprs: Expressions) -> Self {
        Self {
            match_labels: None,
            match_expressions: Some(exprs),
        }
    }

    pub fn from_map(map: Map) -> Self {
        Self {
            match_labels: Some(map),
            match_expressions: None,
        }
    }

    /// Adds set-based expressions to a selector, so that both the label map and the expressions
    /// must match.
    pub fn with_expressions(mut self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        self.match_expressions
            .get_or_insert_with(Vec::new)
            .extend(exprs);
        self
    }

    /// Returns true if the selector has no constraints and therefore selects everything.
    pub fn selects_all(&self) -> bool {
        self.match_labels.as_ref().map_or(true, Map::is_empty)
            && self.match_expressions.as_ref().map_or(true, Vec::is_empty)
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        for expr in self.match_expressions.iter().flatten() {
            if !expr.matches(labels.as_ref()) {
                tracing::trace!(?expr, ?labels, "Expression does not match");
                return false;
            }
        }

        if let Some(match_labels) = self.match_labels.as_ref() {
            for (k, v) in match_labels.iter() {
                if labels.0.get(k) != Some(v) {
                    tracing::trace!(key = %k, value = %v, ?labels, "Label does not match");
                    return false;
                }
            }
        }

        true
    }
}

impl std::iter::FromIterator<(String, String)> for Selector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Selector {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl std::iter::FromIterator<Expression> for Selector {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        Self::from_expressions(iter.into_iter().collect())
    }
}

// === Labels ===

impl Labels {
    /// The synthetic label set of a namespace, used to evaluate namespace selectors.
    pub fn for_namespace(name: impl Into<String>) -> Self {
        Some((NAMESPACE_NAME.to_string(), name.into()))
            .into_iter()
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns a copy of these labels with `key` set to `value`.
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = (*self.0).clone();
        map.insert(key.into(), value.into());
        map.into()
    }
}

impl From<Map> for Labels {
    #[inline]
    fn from(labels: Map) -> Self {
        Self(Arc::new(labels))
    }
}

impl AsRef<Map> for Labels {
    #[inline]
    fn as_ref(&self) -> &Map {
        self.0.as_ref()
    }
}

impl<T: AsRef<Map>> std::cmp::PartialEq<T> for Labels {
    #[inline]
    fn eq(&self, t: &T) -> bool {
        self.0.as_ref().eq(t.as_ref())
    }
}

impl std::iter::FromIterator<(String, String)> for Labels {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Labels {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

// === Expression ===

impl Expression {
    pub fn new<V: Into<String>>(
        key: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            key: key.into(),
            operator,
            values: Some(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::Exists,
            values: None,
        }
    }

    pub fn does_not_exist(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::DoesNotExist,
            values: None,
        }
    }

    fn matches(&self, labels: &Map) -> bool {
        let value = labels.get(&self.key);
        let in_values = |v: &String| self.values.as_ref().is_some_and(|vs| vs.contains(v));
        match self.operator {
            Operator::In => value.is_some_and(in_values),
            Operator::NotIn => !value.is_some_and(in_values),
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
            Operator::Unknown(ref op) => {
                tracing::debug!(key = %self.key, operator = %op, "Unknown selector operator");
                false
            }
        }
    }
}

// === Operator ===

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "In" => Self::In,
            "NotIn" => Self::NotIn,
            "Exists" => Self::Exists,
            "DoesNotExist" => Self::DoesNotExist,
            _ => Self::Unknown(s),
        }
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => "In".fmt(f),
            Self::NotIn => "NotIn".fmt(f),
            Self::Exists => "Exists".fmt(f),
            Self::DoesNotExist => "DoesNotExist".fmt(f),
            Self::Unknown(op) => op.fmt(f),
        }
    }
}
