//! Short repository names to canonical root URLs.
//!
//! The mapping is injected configuration, never ambient state: callers
//! build one in code or load it from a TOML file and pass it where a
//! lookup is needed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::SvnError;

/// ```toml
/// [repositories]
/// attic-xdocs = "https://svn.apache.org/repos/asf/attic/site/xdocs"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    repositories: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SvnError> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|error| {
            SvnError::Config(format!(
                "invalid repository registry '{}': {error}",
                path.display()
            ))
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.repositories.insert(name.into(), url.into());
    }

    /// The canonical root URL for a short name.
    pub fn url(&self, name: &str) -> Option<&str> {
        self.repositories.get(name).map(String::as_str)
    }

    /// Resolve `name` or `name/relative/path` to a full location. Targets
    /// that already look like URLs or filesystem paths pass through.
    pub fn resolve(&self, target: &str) -> Result<String, SvnError> {
        if target.contains("://") || target.starts_with('/') || target.starts_with('.') {
            return Ok(target.to_string());
        }
        let (name, rest) = match target.split_once('/') {
            Some((name, rest)) => (name, Some(rest)),
            None => (target, None),
        };
        let root = self.url(name).ok_or_else(|| {
            SvnError::Config(format!("unknown repository name '{name}'"))
        })?;
        Ok(match rest {
            Some(rest) => format!("{}/{}", root.trim_end_matches('/'), rest),
            None => root.to_string(),
        })
    }
}
