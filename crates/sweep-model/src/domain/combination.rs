use serde::{Deserialize, Serialize};

/// One resolved assignment of a value to every active flag key, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterCombination(Vec<(String, String)>);

impl ParameterCombination {
    /// The trivial combination of a batch without active keys.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a pair; used while expanding the cartesian product.
    pub fn with(&self, key: &str, value: &str) -> Self {
        let mut pairs = self.0.clone();
        pairs.push((key.to_string(), value.to_string()));
        Self(pairs)
    }
}
