//
//  options.rs
//  Impact
//

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::Position;

/// Which relations an impact query follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactOptions {
    /// Add the containment chain of every impacted symbol.
    pub follow_containment: bool,
    /// Add caller hierarchies of callables on the containment chain.
    pub follow_calls: bool,
    /// Add supertype hierarchies of types on the containment chain.
    pub follow_supertypes: bool,
    /// Add subtype hierarchies of types on the containment chain.
    pub follow_subtypes: bool,
    /// Collapse the result to one vertex per file.
    pub file_level_only: bool,
}

impl ImpactOptions {
    /// Call and type relations hang off the containment chain, so asking for
    /// any of them turns containment on.
    pub fn normalized(mut self) -> Self {
        if self.follow_calls || self.follow_supertypes || self.follow_subtypes {
            self.follow_containment = true;
        }
        self
    }

    pub(crate) fn follows_hierarchies(&self) -> bool {
        self.follow_calls || self.follow_supertypes || self.follow_subtypes
    }
}

/// What to compute the impact of.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpactRequest {
    /// Every symbol defined in these files.
    pub files: Vec<PathBuf>,
    /// The symbol at each position.
    pub locations: Vec<(PathBuf, Position)>,
    /// Symbols with exactly this (possibly qualified) name.
    pub names: Vec<String>,
    /// Symbols whose name fuzzily matches.
    pub fuzzy_names: Vec<String>,
}

impl ImpactRequest {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
            && self.locations.is_empty()
            && self.names.is_empty()
            && self.fuzzy_names.is_empty()
    }
}
