//! Navigation registry - holds the static menu packages and alias table.
//!
//! The registry is loaded from TOML:
//!
//! ```toml
//! [[package]]
//! name = "Maintenance"
//!
//! [[package.item]]
//! name = "Asset"
//! href = "/maintenance/asset"
//!
//! [aliases]
//! assets = ["asset", "pms_assets"]
//! ```
//!
//! Package order and item order are significant: the sidebar renders in
//! that order and the landing route is the first accessible one.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::resolver::{ResolverOptions, RouteResolver};
use crate::error::{NavError, NavResult};
use crate::models::{AliasMap, MenuNode, Package, PermissionTree};
use crate::permissions::{MatchMode, PermissionMatcher};

/// Navigation shipped with the binary.
const DEFAULT_NAVIGATION: &str = include_str!("../../config/navigation.toml");

#[derive(Debug, Default, Deserialize)]
struct NavigationFile {
    #[serde(default, rename = "package")]
    packages: Vec<Package>,
    #[serde(default)]
    aliases: AliasMap,
}

/// Static navigation: ordered packages plus the alias table.
#[derive(Debug, Clone, Default)]
pub struct NavigationRegistry {
    packages: Vec<Package>,
    aliases: AliasMap,
}

impl NavigationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from packages and aliases, validating both.
    pub fn from_parts(packages: Vec<Package>, aliases: AliasMap) -> NavResult<Self> {
        let mut registry = Self {
            packages: Vec::with_capacity(packages.len()),
            aliases,
        };
        for package in packages {
            registry.register(package)?;
        }
        registry.log_unused_aliases();
        Ok(registry)
    }

    /// Parse a navigation TOML document.
    pub fn from_toml_str(source: &str) -> NavResult<Self> {
        let file: NavigationFile = toml::from_str(source)?;
        Self::from_parts(file.packages, file.aliases)
    }

    /// Load a navigation TOML file.
    pub fn load(path: &Path) -> NavResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| NavError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&source)?;
        debug!(
            path = %path.display(),
            packages = registry.packages.len(),
            aliases = registry.aliases.len(),
            "loaded navigation config"
        );
        Ok(registry)
    }

    /// The navigation embedded in the binary.
    pub fn embedded() -> NavResult<Self> {
        Self::from_toml_str(DEFAULT_NAVIGATION)
    }

    /// Append a package after validating it.
    pub fn register(&mut self, package: Package) -> NavResult<()> {
        if self.packages.iter().any(|p| p.name == package.name) {
            return Err(NavError::DuplicatePackage(package.name));
        }
        if has_empty_name(&package.items) {
            return Err(NavError::EmptyItemName {
                package: package.name,
            });
        }

        self.packages.push(package);
        Ok(())
    }

    /// Add aliases for a menu name.
    pub fn add_aliases<I, S>(&mut self, menu_name: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.insert(menu_name, aliases);
    }

    /// Packages in configuration order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Get a package by name.
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Every top-level item, package by package.
    pub fn items(&self) -> impl Iterator<Item = &MenuNode> {
        self.packages.iter().flat_map(|p| p.items.iter())
    }

    /// Entries with neither a route nor children, with their package name.
    ///
    /// Loading accepts them; they render as inert labels.
    pub fn dead_ends(&self) -> Vec<(&str, &MenuNode)> {
        self.packages
            .iter()
            .flat_map(|p| p.items.iter().flat_map(walk).map(move |node| (p.name.as_str(), node)))
            .filter(|(_, node)| node.is_dead_end())
            .collect()
    }

    /// Get package count.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// A matcher bound to this registry's aliases.
    pub fn matcher(&self, tree: Option<&PermissionTree>, mode: MatchMode) -> PermissionMatcher<'_> {
        PermissionMatcher::new(tree, &self.aliases).with_mode(mode)
    }

    /// The sidebar as the user should see it.
    ///
    /// Without permissions every package is returned. Otherwise denied
    /// nodes are removed at every level and packages left empty are
    /// dropped.
    pub fn filter_sidebar(&self, matcher: &PermissionMatcher<'_>) -> Vec<Package> {
        if !matcher.has_tree() {
            debug!("sidebar unfiltered: permissions not loaded");
            return self.packages.clone();
        }

        let filtered: Vec<Package> = self
            .packages
            .iter()
            .filter_map(|package| {
                let items = filter_nodes(&package.items, matcher);
                (!items.is_empty()).then(|| Package::new(package.name.clone(), items))
            })
            .collect();

        debug!(
            packages = filtered.len(),
            items = filtered.iter().map(|p| p.items.len()).sum::<usize>(),
            "filtered sidebar"
        );
        filtered
    }

    /// First route the user can reach, for the post-login redirect.
    pub fn first_accessible_route(
        &self,
        matcher: &PermissionMatcher<'_>,
        options: ResolverOptions,
    ) -> Option<&str> {
        RouteResolver::new(matcher)
            .with_options(options)
            .resolve(&self.packages)
    }

    fn log_unused_aliases(&self) {
        let names: HashSet<String> = self
            .packages
            .iter()
            .flat_map(|p| p.items.iter())
            .flat_map(walk)
            .map(|node| node.name.to_lowercase())
            .collect();

        let unused = self
            .aliases
            .keys()
            .filter(|key| !names.contains(*key))
            .count();
        if unused > 0 {
            debug!(unused, "alias keys without a matching menu item");
        }
    }
}

/// Keep permitted nodes, filtering their children the same way.
fn filter_nodes(nodes: &[MenuNode], matcher: &PermissionMatcher<'_>) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter(|node| matcher.is_permitted(node))
        .map(|node| MenuNode {
            name: node.name.clone(),
            href: node.href.clone(),
            sub_items: filter_nodes(&node.sub_items, matcher),
        })
        .collect()
}

/// Route to open when a category is clicked.
///
/// Descends into the first child that has children of its own; otherwise
/// takes the first child's route. A leaf yields its own route.
pub fn deepest_navigable_href(node: &MenuNode) -> Option<&str> {
    let Some(first) = node.sub_items.first() else {
        return node.href();
    };

    node.sub_items
        .iter()
        .filter(|sub| sub.has_sub_items())
        .find_map(deepest_navigable_href)
        .or_else(|| first.href())
}

/// Pre-order walk of a node and its descendants.
fn walk(node: &MenuNode) -> Vec<&MenuNode> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        out.push(current);
        stack.extend(current.sub_items.iter().rev());
    }
    out
}

fn has_empty_name(nodes: &[MenuNode]) -> bool {
    nodes
        .iter()
        .flat_map(walk)
        .any(|node| node.name.trim().is_empty())
}
