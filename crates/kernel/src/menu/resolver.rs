//! Landing route resolution.
//!
//! Walks packages in order, then items in order, and returns the first
//! route the matcher allows. The walk is an explicit depth-first traversal:
//!
//! - a denied node is skipped together with its subtree,
//! - at the top level, children are tried before the item's own route,
//! - below the top level, a node's own route wins over its children,
//! - the deepest level (`max_depth - 1`) is not permission-checked unless
//!   [`ResolverOptions::check_deepest_level`] is set, and is not descended.

use tracing::debug;

use crate::models::{AliasMap, MenuNode, Package, PermissionTree};
use crate::permissions::PermissionMatcher;

/// Default traversal depth: item, sub-item, nested sub-item.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Traversal limits for [`RouteResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Number of menu levels visited, counting the top level. At least 1.
    pub max_depth: usize,
    /// Also permission-check nodes on the deepest level.
    pub check_deepest_level: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            check_deepest_level: false,
        }
    }
}

enum Step<'n> {
    Visit(&'n MenuNode, usize),
    /// A top-level item's own route, tried after its children.
    OwnRoute(&'n MenuNode),
}

/// Finds the first accessible route for a permission snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RouteResolver<'m, 'a> {
    matcher: &'m PermissionMatcher<'a>,
    options: ResolverOptions,
}

impl<'m, 'a> RouteResolver<'m, 'a> {
    pub fn new(matcher: &'m PermissionMatcher<'a>) -> Self {
        Self {
            matcher,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = ResolverOptions {
            max_depth: options.max_depth.max(1),
            ..options
        };
        self
    }

    /// First accessible route, or `None`.
    ///
    /// Returns `None` without walking when the matcher has no permission
    /// tree; the caller picks the fallback page.
    pub fn resolve<'n>(&self, packages: &'n [Package]) -> Option<&'n str> {
        if !self.matcher.has_tree() {
            debug!("no permission tree; landing route not resolved");
            return None;
        }

        for package in packages {
            for item in &package.items {
                if let Some(route) = self.resolve_item(item) {
                    debug!(package = %package.name, item = %item.name, route, "resolved landing route");
                    return Some(route);
                }
            }
        }

        debug!("no accessible route");
        None
    }

    /// First accessible route under one top-level item.
    pub fn resolve_item<'n>(&self, item: &'n MenuNode) -> Option<&'n str> {
        let deepest = self.options.max_depth - 1;
        let mut stack = vec![Step::Visit(item, 0)];

        while let Some(step) = stack.pop() {
            let (node, depth) = match step {
                Step::OwnRoute(node) => {
                    if let Some(href) = node.href() {
                        return Some(href);
                    }
                    continue;
                }
                Step::Visit(node, depth) => (node, depth),
            };

            let checked = depth == 0 || depth < deepest || self.options.check_deepest_level;
            if checked && !self.matcher.is_permitted(node) {
                continue;
            }

            if depth == 0 {
                stack.push(Step::OwnRoute(node));
            } else if let Some(href) = node.href() {
                return Some(href);
            }

            if depth < deepest {
                stack.extend(
                    node.sub_items
                        .iter()
                        .rev()
                        .map(|child| Step::Visit(child, depth + 1)),
                );
            }
        }

        None
    }
}

/// One-shot landing route resolution with default options.
pub fn find_first_accessible_route<'n>(
    packages: &'n [Package],
    tree: Option<&PermissionTree>,
    aliases: &AliasMap,
) -> Option<&'n str> {
    let matcher = PermissionMatcher::new(tree, aliases);
    RouteResolver::new(&matcher).resolve(packages)
}
