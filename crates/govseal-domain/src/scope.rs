//! Arena representation of the scope tree.
//!
//! Nodes are addressed by a crate-private index and store their parent index, so walking to
//! the root is an O(depth) loop and cycles cannot be expressed. Indices never leave the crate,
//! so every index handed to [`ScopeTree`] came from the same tree.

use crate::error::ResolveError;
use govseal_types::{ScopeSpec, ScopeType};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ScopeIdx(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeNode {
    pub id: String,
    pub scope_type: ScopeType,
    pub name: String,
    pub scope_path: String,
    pub(crate) parent: Option<ScopeIdx>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
    by_id: BTreeMap<String, ScopeIdx>,
}

impl ScopeTree {
    /// Lower a nested scope spec into the arena, validating ids and paths.
    pub fn from_spec(root: &ScopeSpec) -> Result<Self, ResolveError> {
        let mut tree = ScopeTree::default();
        let mut stack: Vec<(&ScopeSpec, Option<ScopeIdx>)> = vec![(root, None)];

        while let Some((spec, parent)) = stack.pop() {
            if spec.id.trim().is_empty() {
                return Err(invalid("scope with empty id".to_string()));
            }
            if tree.by_id.contains_key(&spec.id) {
                return Err(invalid(format!("duplicate scope id '{}'", spec.id)));
            }
            if let Some(p) = parent {
                let parent_path = &tree.node(p).scope_path;
                let extends = spec
                    .scope_path
                    .strip_prefix(parent_path.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|segment| !segment.is_empty());
                if !extends {
                    return Err(invalid(format!(
                        "scope '{}' has path '{}' which does not extend parent path '{}'",
                        spec.id, spec.scope_path, parent_path
                    )));
                }
            }

            let idx = ScopeIdx(tree.nodes.len());
            tree.nodes.push(ScopeNode {
                id: spec.id.clone(),
                scope_type: spec.scope_type,
                name: spec.name.clone(),
                scope_path: spec.scope_path.clone(),
                parent,
            });
            tree.by_id.insert(spec.id.clone(), idx);

            // Reverse so children are laid out in authored order.
            for child in spec.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        Ok(tree)
    }

    /// Node for `scope_id`, if the tree has one.
    pub fn get(&self, scope_id: &str) -> Option<&ScopeNode> {
        self.by_id.get(scope_id).map(|&idx| self.node(idx))
    }

    pub(crate) fn find(&self, scope_id: &str) -> Result<ScopeIdx, ResolveError> {
        self.by_id
            .get(scope_id)
            .copied()
            .ok_or_else(|| ResolveError::ScopeNotFound {
                scope_id: scope_id.to_string(),
            })
    }

    pub(crate) fn node(&self, idx: ScopeIdx) -> &ScopeNode {
        &self.nodes[idx.0]
    }

    /// Indices from `idx` up to the root, inclusive.
    pub(crate) fn ancestry(&self, idx: ScopeIdx) -> Vec<ScopeIdx> {
        let mut chain = vec![idx];
        let mut current = idx;
        while let Some(parent) = self.node(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn invalid(reason: String) -> ResolveError {
    ResolveError::InvalidScopeTree { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_tree, scope};

    #[test]
    fn ancestry_walks_to_root() {
        let tree = ScopeTree::from_spec(&sample_tree()).expect("tree");
        let brand = tree.find("acme-us-brand").expect("brand");
        let paths: Vec<&str> = tree
            .ancestry(brand)
            .into_iter()
            .map(|i| tree.node(i).scope_path.as_str())
            .collect();
        assert_eq!(paths, vec!["acme.na.us.brand", "acme.na.us", "acme.na", "acme"]);
    }

    #[test]
    fn unknown_scope_is_reported() {
        let tree = ScopeTree::from_spec(&sample_tree()).expect("tree");
        assert_eq!(
            tree.find("nope"),
            Err(ResolveError::ScopeNotFound {
                scope_id: "nope".to_string()
            })
        );
    }

    #[test]
    fn get_looks_up_by_id() {
        let tree = ScopeTree::from_spec(&sample_tree()).expect("tree");
        let us = tree.get("acme-us").expect("us");
        assert_eq!(us.scope_path, "acme.na.us");
        assert_eq!(us.scope_type, ScopeType::Country);
        assert!(tree.get("acme-fr").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut root = scope("acme", ScopeType::Enterprise, "acme");
        root.children.push(scope("acme", ScopeType::Region, "acme.na"));
        let err = ScopeTree::from_spec(&root).expect_err("duplicate");
        assert!(err.to_string().contains("duplicate scope id 'acme'"));
    }

    #[test]
    fn child_paths_must_extend_parent() {
        let mut root = scope("acme", ScopeType::Enterprise, "acme");
        root.children.push(scope("na", ScopeType::Region, "acmena"));
        assert!(matches!(
            ScopeTree::from_spec(&root),
            Err(ResolveError::InvalidScopeTree { .. })
        ));
    }

    #[test]
    fn children_keep_authored_order() {
        let tree = ScopeTree::from_spec(&sample_tree()).expect("tree");
        assert_eq!(tree.len(), 6);
        let na = tree.find("acme-na").expect("na");
        let eu = tree.find("acme-eu").expect("eu");
        assert!(na < eu);
    }
}
