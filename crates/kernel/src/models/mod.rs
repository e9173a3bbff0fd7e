//! Permission and navigation models.

pub mod menu;
pub mod permission;

pub use menu::{AliasMap, MenuNode, Package};
pub use permission::{Function, Module, PermissionTree, SubFunction, UserRoleResponse};
