//! Compilation options.
//!
//! Options are plain data with defaults so they can come from code, a YAML
//! file, or CLI flags layered on top of a file.
//!
//! ```yaml
//! mangle: true
//! alias_policy: export_style   # or: unchecked
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::transpile::env::AliasPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Rename emitted identifiers to the shortest free names.
    pub mangle: bool,
    /// Which alias names must refer to declared variables.
    pub alias_policy: AliasPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mangle: true,
            alias_policy: AliasPolicy::default(),
        }
    }
}

impl Options {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&text)?)
    }

    pub fn without_mangling(self) -> Self {
        Self {
            mangle: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let opts = Options::from_yaml_str("mangle: false").unwrap();
        assert!(!opts.mangle);
        assert_eq!(opts.alias_policy, AliasPolicy::ExportStyle);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(Options::from_yaml_str("mangel: true").is_err());
    }

    #[test]
    fn test_alias_policy_spelling() {
        let opts = Options::from_yaml_str("alias_policy: unchecked").unwrap();
        assert_eq!(opts.alias_policy, AliasPolicy::Unchecked);
        assert!(opts.mangle);
    }
}
