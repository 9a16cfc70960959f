//
//  config.rs
//  Impact
//

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::impact::ImpactOptions;

/// Top-level impact configuration, usually `impact.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactConfig {
    #[serde(default)]
    pub follow: FollowConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Relations followed from every impacted symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    pub containment: bool,
    pub calls: bool,
    pub supertypes: bool,
    pub subtypes: bool,
}

/// How the graph is written out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// One vertex per file instead of per symbol.
    pub file_level: bool,
    /// Paths under this directory are rendered relative to it.
    pub workspace_root: Option<PathBuf>,
}

impl ImpactConfig {
    /// Load config from a TOML file, falling back to defaults when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The options value impact queries run with.
    pub fn impact_options(&self) -> ImpactOptions {
        ImpactOptions {
            follow_containment: self.follow.containment,
            follow_calls: self.follow.calls,
            follow_supertypes: self.follow.supertypes,
            follow_subtypes: self.follow.subtypes,
            file_level_only: self.output.file_level,
        }
        .normalized()
    }

    /// Resolve the workspace root relative to the config file's directory.
    pub fn resolve_workspace_root(&self, config_path: &Path) -> Option<PathBuf> {
        let root = self.output.workspace_root.as_ref()?;
        let parent = config_path.parent().unwrap_or(config_path);
        Some(parent.join(root))
    }
}
