use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rowdelta_diff::DiffConfig;
use rowdelta_sections::{ApplyOptions, SectionDiffConfig};

use crate::error::RowdeltaResult;

/// Complete configuration for a [`Differ`](crate::Differ).
///
/// Every table is optional in TOML form; missing keys take their defaults.
///
/// ```toml
/// [diff]
/// updates = "split"
///
/// [sections]
/// disjoint = "replace"
///
/// [sections.items]
/// updates = "pair"
///
/// [apply]
/// compact_empty = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowdeltaConfig {
    /// Flat sequence diffs.
    pub diff: DiffConfig,
    /// Sectioned diffs.
    pub sections: SectionDiffConfig,
    /// Sectioned patch application.
    pub apply: ApplyOptions,
}

impl RowdeltaConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> RowdeltaResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> RowdeltaResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Render this configuration as TOML text.
    pub fn to_toml_string(&self) -> RowdeltaResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write this configuration to `path` as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> RowdeltaResult<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowdelta_diff::UpdatePolicy;
    use rowdelta_sections::DisjointPolicy;

    use crate::error::RowdeltaError;

    #[test]
    fn default_config() {
        let c = RowdeltaConfig::default();
        assert_eq!(c.diff.updates, UpdatePolicy::Pair);
        assert_eq!(c.sections.items.updates, UpdatePolicy::Pair);
        assert_eq!(c.sections.disjoint, DisjointPolicy::Items);
        assert!(!c.apply.compact_empty);
    }

    #[test]
    fn empty_text_is_default() {
        assert_eq!(RowdeltaConfig::from_toml_str("").unwrap(), RowdeltaConfig::default());
    }

    #[test]
    fn partial_tables_fill_defaults() {
        let c = RowdeltaConfig::from_toml_str(
            r#"
            [sections]
            disjoint = "replace"

            [apply]
            compact_empty = true
            "#,
        )
        .unwrap();
        assert_eq!(c.diff.updates, UpdatePolicy::Pair);
        assert_eq!(c.sections.disjoint, DisjointPolicy::Replace);
        assert!(c.apply.compact_empty);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = RowdeltaConfig::from_toml_str("[diff]\nupdates = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, RowdeltaError::Config(_)));
    }

    #[test]
    fn toml_round_trip() {
        let mut c = RowdeltaConfig::default();
        c.diff = DiffConfig::insert_remove_only();
        c.apply = ApplyOptions::compacting();
        let text = c.to_toml_string().unwrap();
        assert_eq!(RowdeltaConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rowdelta.toml");

        let mut c = RowdeltaConfig::default();
        c.sections.disjoint = DisjointPolicy::Replace;
        c.save(&path).unwrap();

        assert_eq!(RowdeltaConfig::load(&path).unwrap(), c);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RowdeltaConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RowdeltaError::Io(_)));
    }
}
