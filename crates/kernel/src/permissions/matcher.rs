//! Menu visibility decisions.
//!
//! A [`PermissionMatcher`] is built once per permission snapshot. Building
//! it collects the active functions into an [`ActiveFunctionIndex`]; each
//! [`PermissionMatcher::is_permitted`] call then runs two passes over that
//! index:
//!
//! 1. direct: the node name (in every separator spelling) against function
//!    and action names,
//! 2. alias: the aliases configured for the node name against the same.
//!
//! A node without a route and without an alias entry is a bare category and
//! stays visible.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::normalize::{MatchMode, dedup, name_variants};
use crate::models::{AliasMap, MenuNode, PermissionTree};

/// An active function, lowercased for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFunction {
    pub function_name: String,
    pub action_name: Option<String>,
    pub module_name: String,
}

impl ActiveFunction {
    fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.function_name.as_str())
            .chain(self.action_name.as_deref())
            .filter(|key| !key.is_empty())
    }
}

/// Active functions of a permission tree.
///
/// Module-level active flags are not consulted; a function counts when its
/// own flag is set.
#[derive(Debug, Clone, Default)]
pub struct ActiveFunctionIndex {
    functions: Vec<ActiveFunction>,
    exact: HashSet<String>,
}

impl ActiveFunctionIndex {
    pub fn build(tree: &PermissionTree) -> Self {
        let functions: Vec<ActiveFunction> = tree
            .functions()
            .filter(|(_, function)| function.active)
            .map(|(module, function)| ActiveFunction {
                function_name: function.name.to_lowercase(),
                action_name: function.action_name.as_deref().map(str::to_lowercase),
                module_name: module.name.clone(),
            })
            .collect();

        let exact = functions
            .iter()
            .flat_map(|f| f.keys().map(str::to_string))
            .collect();

        Self { functions, exact }
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn functions(&self) -> &[ActiveFunction] {
        &self.functions
    }

    /// First active function matching any of the lowercased candidates.
    pub fn find_match(&self, candidates: &[String], mode: MatchMode) -> Option<&ActiveFunction> {
        if candidates.iter().any(|c| self.exact.contains(c)) {
            return self
                .functions
                .iter()
                .find(|f| f.keys().any(|key| candidates.iter().any(|c| c == key)));
        }
        if mode == MatchMode::Exact {
            return None;
        }

        self.functions.iter().find(|f| {
            f.keys().any(|key| {
                candidates
                    .iter()
                    .any(|candidate| mode.matches(key, candidate))
            })
        })
    }
}

/// Decides which menu nodes the current user may see.
#[derive(Debug, Clone)]
pub struct PermissionMatcher<'a> {
    /// `None` when permissions have not been loaded.
    index: Option<ActiveFunctionIndex>,
    aliases: &'a AliasMap,
    mode: MatchMode,
}

impl<'a> PermissionMatcher<'a> {
    pub fn new(tree: Option<&PermissionTree>, aliases: &'a AliasMap) -> Self {
        let index = tree.map(ActiveFunctionIndex::build);
        if let Some(index) = &index {
            debug!(active_functions = index.len(), "built permission matcher");
        } else {
            debug!("permission tree not loaded; matcher fails open");
        }

        Self {
            index,
            aliases,
            mode: MatchMode::default(),
        }
    }

    /// Set the comparison strictness.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether permissions were loaded.
    pub fn has_tree(&self) -> bool {
        self.index.is_some()
    }

    /// Whether `node` should be shown.
    ///
    /// - No tree: every node is permitted.
    /// - No active function: nothing is permitted.
    /// - Otherwise the direct pass, then the alias pass, then the bare
    ///   category fallback.
    pub fn is_permitted(&self, node: &MenuNode) -> bool {
        let Some(index) = &self.index else {
            return true;
        };
        if index.is_empty() {
            trace!(node = %node.name, "denied: no active functions");
            return false;
        }

        let variants = lowercase_all(&name_variants(&node.name));
        if let Some(hit) = index.find_match(&variants, self.mode) {
            trace!(
                node = %node.name,
                function = %hit.function_name,
                module = %hit.module_name,
                "permitted by name"
            );
            return true;
        }

        let aliases = self.aliases.get(&node.name);
        if let Some(aliases) = aliases {
            let aliases = lowercase_all(aliases);
            if let Some(hit) = index.find_match(&aliases, self.mode) {
                trace!(
                    node = %node.name,
                    function = %hit.function_name,
                    module = %hit.module_name,
                    "permitted by alias"
                );
                return true;
            }
        }

        if node.href.is_none() && aliases.is_none() {
            trace!(node = %node.name, "permitted as bare category");
            return true;
        }

        trace!(node = %node.name, "denied");
        false
    }
}

/// One-shot form of [`PermissionMatcher::is_permitted`].
///
/// Builds the index on every call; prefer a [`PermissionMatcher`] when
/// checking many nodes against the same tree.
pub fn is_permitted(node: &MenuNode, tree: Option<&PermissionTree>, aliases: &AliasMap) -> bool {
    PermissionMatcher::new(tree, aliases).is_permitted(node)
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    dedup(values.iter().map(|value| value.to_lowercase()).collect())
}
