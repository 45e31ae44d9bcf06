use std::fmt;

use serde::{Deserialize, Serialize};

/// One exclusive resource unit a running job may hold.
///
/// On the wire (TOML/JSON) a slot is either a bare token (`"-pu0"`) or a list of tokens
/// (`["-pu0", "-pu1"]`) that must be handed out together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
    /// A single flag token.
    Single(String),
    /// Several flag tokens injected as one contiguous block.
    Group(Vec<String>),
}

impl Slot {
    /// Flag tokens injected into the argument vector of the job holding this slot.
    pub fn tokens(&self) -> &[String] {
        match self {
            Slot::Single(token) => std::slice::from_ref(token),
            Slot::Group(tokens) => tokens,
        }
    }

    /// Human-readable label (`-pu0` or `-pu0 -pu1`).
    pub fn label(&self) -> String {
        self.tokens().join(" ")
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
