//! Parameter space: which run-variable keys are active and every combination of their values.
use std::{collections::BTreeMap, path::Path};

use sweep_model::{
    PLACEHOLDER_CLOSE, PLACEHOLDER_LEN, PLACEHOLDER_OPEN, ParameterCombination, RunSpec,
};
use tracing::{debug, warn};

/// Active keys with their candidate values, in iteration order.
#[derive(Debug, Clone, Default)]
pub struct ParameterSpace {
    keys: Vec<(String, Vec<String>)>,
    /// Placeholders of the template no configured key fills.
    unfilled: Vec<String>,
    /// Configured keys the template has no placeholder for.
    unused: Vec<String>,
}

impl ParameterSpace {
    pub fn from_spec(spec: &RunSpec) -> Self {
        Self::new(spec.values(), &placeholders(spec.template()), spec.key_order())
    }

    /// Filter `values` against `placeholders` and fix the key order.
    ///
    /// Keys with no values or a blank first value are dropped. Mismatches between the template
    /// placeholders and the remaining keys are logged and never fatal.
    pub fn new(
        values: &BTreeMap<String, Vec<String>>,
        placeholders: &[String],
        key_order: &[String],
    ) -> Self {
        let populated: BTreeMap<&str, &Vec<String>> = values
            .iter()
            .filter(|(_, v)| v.first().is_some_and(|first| !first.trim().is_empty()))
            .map(|(k, v)| (k.as_str(), v))
            .collect();

        let unfilled: Vec<String> = placeholders
            .iter()
            .filter(|p| !populated.contains_key(p.as_str()))
            .cloned()
            .collect();
        let unused: Vec<String> = populated
            .keys()
            .filter(|k| !placeholders.iter().any(|p| p == *k))
            .map(|k| k.to_string())
            .collect();

        if !unfilled.is_empty() {
            warn!(target: "sweep.core.space", keys = ?unfilled, "template placeholders without values");
        }
        if !unused.is_empty() {
            warn!(target: "sweep.core.space", keys = ?unused, "values without a template placeholder; ignored");
        }

        let mut active: Vec<&str> = populated
            .keys()
            .copied()
            .filter(|k| placeholders.iter().any(|p| p == k))
            .collect();
        // Stable sort: mentioned keys first in the given order, the rest keep natural order.
        active.sort_by_key(|k| {
            key_order
                .iter()
                .position(|o| o == k)
                .unwrap_or(key_order.len())
        });

        let keys = active
            .into_iter()
            .map(|k| (k.to_string(), populated[k].clone()))
            .collect();

        Self {
            keys,
            unfilled,
            unused,
        }
    }

    /// Active keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(k, _)| k.as_str())
    }

    pub fn unfilled(&self) -> &[String] {
        &self.unfilled
    }

    pub fn unused(&self) -> &[String] {
        &self.unused
    }

    /// Number of combinations; `1` when no key is active.
    pub fn len(&self) -> usize {
        self.keys.iter().map(|(_, v)| v.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cartesian product of all active value lists; the last key varies fastest.
    ///
    /// Duplicate values are kept and yield duplicate combinations.
    pub fn combinations(&self) -> Vec<ParameterCombination> {
        let mut out = vec![ParameterCombination::empty()];
        for (key, values) in &self.keys {
            out = out
                .iter()
                .flat_map(|prefix| values.iter().map(move |v| prefix.with(key, v)))
                .collect();
        }
        debug!(target: "sweep.core.space", count = out.len(), "parameter space enumerated");
        out
    }
}

/// Placeholder tokens (`[e1]` -> `e1`) in the template file name, in order of first appearance.
pub fn placeholders(template: &Path) -> Vec<String> {
    let name = template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let chars: Vec<char> = name.chars().collect();

    let mut out: Vec<String> = Vec::new();
    let mut i = 0;
    while i + PLACEHOLDER_LEN + 1 < chars.len() {
        let close = i + PLACEHOLDER_LEN + 1;
        let inner = &chars[i + 1..close];
        if chars[i] == PLACEHOLDER_OPEN
            && chars[close] == PLACEHOLDER_CLOSE
            && !inner.contains(&PLACEHOLDER_OPEN)
        {
            let token: String = inner.iter().collect();
            if !out.contains(&token) {
                out.push(token);
            }
            i = close + 1;
        } else {
            i += 1;
        }
    }
    out
}
