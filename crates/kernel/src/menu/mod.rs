//! Navigation menus.
//!
//! The registry holds the static packages and alias table and provides:
//! - Permission-filtered sidebar packages
//! - The post-login landing route
//! - The route opened when a category is clicked

mod registry;
mod resolver;

pub use registry::{NavigationRegistry, deepest_navigable_href};
pub use resolver::{
    DEFAULT_MAX_DEPTH, ResolverOptions, RouteResolver, find_first_accessible_route,
};
