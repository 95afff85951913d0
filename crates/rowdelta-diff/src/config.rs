use serde::{Deserialize, Serialize};

/// How the backtrace reports a mismatched old/new pair that costs nothing
/// extra to replace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Emit a single `Update` carrying both elements.
    #[default]
    Pair,
    /// Emit a `Remove` of the old element immediately followed by an
    /// `Insert` of the new one. Scripts never contain `Update`.
    Split,
}

/// Configuration for the sequence diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Replacement reporting policy.
    pub updates: UpdatePolicy,
}

impl DiffConfig {
    /// A configuration that only ever emits `Insert` and `Remove`.
    pub fn insert_remove_only() -> Self {
        Self {
            updates: UpdatePolicy::Split,
        }
    }
}
