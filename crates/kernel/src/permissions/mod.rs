//! Permission checks for navigation and in-page features.

pub mod lookup;
mod matcher;
mod normalize;

pub use matcher::{ActiveFunction, ActiveFunctionIndex, PermissionMatcher, is_permitted};
pub use normalize::{MatchMode, compact, name_variants};
