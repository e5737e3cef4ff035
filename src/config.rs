//! Run configuration consumed by the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether unrecognized tag titles are accepted without complaint.
///
/// Either a blanket boolean or an explicit allow-list of titles. Both JSON
/// shapes (`true` / `["foo", "bar"]`) load into this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowUnknownTags {
    Bool(bool),
    List(Vec<String>),
}

impl AllowUnknownTags {
    pub fn allows(&self, title: &str) -> bool {
        match self {
            AllowUnknownTags::Bool(b) => *b,
            AllowUnknownTags::List(titles) => titles.iter().any(|t| t == title),
        }
    }
}

impl Default for AllowUnknownTags {
    fn default() -> Self {
        // unknown tags are reported unless the configuration opts out
        AllowUnknownTags::Bool(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub allow_unknown_tags: AllowUnknownTags,
    /// Named dictionary modules to load at startup, in order. Later
    /// modules may overwrite tags defined by earlier ones.
    pub dictionaries: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            allow_unknown_tags: AllowUnknownTags::default(),
            dictionaries: vec!["core".to_string()],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| crate::error::Error::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_form() {
        let config: Config = serde_json::from_str(r#"{"allow_unknown_tags": true}"#).unwrap();
        assert!(config.allow_unknown_tags.allows("anything"));
    }

    #[test]
    fn list_form() {
        let config: Config =
            serde_json::from_str(r#"{"allow_unknown_tags": ["foo", "bar"]}"#).unwrap();
        assert!(config.allow_unknown_tags.allows("foo"));
        assert!(!config.allow_unknown_tags.allows("baz"));
    }

    #[test]
    fn default_reports_unknown_tags() {
        let config = Config::default();
        assert!(!config.allow_unknown_tags.allows("madeup"));
        assert_eq!(config.dictionaries, vec!["core"]);
    }
}
