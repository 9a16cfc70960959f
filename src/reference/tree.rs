//
//  tree.rs
//  Impact
//

use serde::{Deserialize, Serialize};

use super::types::Reference;

/// A reference and the subtrees it owns.
///
/// Children are ordered. What "child" means depends on the query that built
/// the tree: nested declarations, usages, callers, super/subtypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTree {
    pub reference: Reference,
    pub children: Vec<ReferenceTree>,
}

impl ReferenceTree {
    pub fn new(reference: Reference, children: Vec<ReferenceTree>) -> Self {
        Self {
            reference,
            children,
        }
    }

    pub fn leaf(reference: Reference) -> Self {
        Self::new(reference, Vec::new())
    }

    /// Apply `function` to every reference, root first, then children
    /// left to right, recursively.
    pub fn visit<F: FnMut(&Reference)>(&self, mut function: F) {
        self.iter().for_each(|reference| function(reference));
    }

    /// Pre-order iterator over the references in this tree.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Pre-order traversal, see [`ReferenceTree::iter`].
pub struct PreOrder<'a> {
    stack: Vec<&'a ReferenceTree>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Reference;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(&node.reference)
    }
}

impl<'a> IntoIterator for &'a ReferenceTree {
    type Item = &'a Reference;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
