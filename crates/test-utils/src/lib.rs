//! navgate test utilities.
//!
//! Helpers for integration testing: permission tree builders, role payload
//! fixtures, menu node shorthands, and assertion utilities.

use navgate_kernel::models::{Function, MenuNode, Module, Package, PermissionTree};

/// Create a test permission tree from module builders.
pub fn test_tree(modules: Vec<TestModule>) -> PermissionTree {
    PermissionTree::new(modules.into_iter().map(TestModule::build).collect())
}

/// Create an active test module with no functions.
pub fn test_module(name: &str) -> TestModule {
    TestModule {
        name: name.to_string(),
        active: true,
        functions: Vec::new(),
    }
}

/// A test module builder.
#[derive(Debug, Clone)]
pub struct TestModule {
    pub name: String,
    pub active: bool,
    pub functions: Vec<Function>,
}

impl TestModule {
    /// Set the module-level flag off.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Add an active function.
    pub fn with_function(mut self, name: &str, action: Option<&str>) -> Self {
        self.functions.push(Function::new(name, action, true));
        self
    }

    /// Add an inactive function.
    pub fn with_inactive_function(mut self, name: &str, action: Option<&str>) -> Self {
        self.functions.push(Function::new(name, action, false));
        self
    }

    /// Build the module.
    pub fn build(self) -> Module {
        Module {
            name: self.name,
            active: self.active,
            functions: self.functions,
        }
    }
}

/// A navigable menu entry.
pub fn node(name: &str, href: &str) -> MenuNode {
    MenuNode::link(name, href)
}

/// A menu entry without a route.
pub fn category(name: &str, sub_items: Vec<MenuNode>) -> MenuNode {
    MenuNode::category(name, sub_items)
}

/// A single package holding `items`.
pub fn single_package(items: Vec<MenuNode>) -> Vec<Package> {
    vec![Package::new("Main", items)]
}

/// Role payload builders, shaped like the permission service response.
pub mod payloads {
    use serde_json::{Value, json};

    /// A successful role payload with the given `lock_modules`.
    pub fn role(lock_modules: Vec<Value>) -> Value {
        json!({
            "success": true,
            "role_name": "test_role",
            "role_id": 1,
            "display_name": "Test Role",
            "active": 1,
            "lock_modules": lock_modules
        })
    }

    /// One `lock_modules` entry.
    pub fn lock_module(name: &str, active: bool, functions: Vec<Value>) -> Value {
        json!({
            "module_id": 1,
            "module_name": name,
            "module_active": i64::from(active),
            "lock_functions": functions
        })
    }

    /// One `lock_functions` entry.
    pub fn lock_function(name: &str, action: &str, active: bool) -> Value {
        json!({
            "function_id": 1,
            "function_name": name,
            "action_name": action,
            "function_active": i64::from(active),
            "sub_functions": []
        })
    }
}

/// Assertion helpers.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_builder() {
        let tree = test_tree(vec![
            test_module("Maintenance")
                .inactive()
                .with_function("Asset", Some("index"))
                .with_inactive_function("AMC", None),
        ]);

        assert_eq!(tree.modules.len(), 1);
        assert!(!tree.modules[0].active);
        assert!(tree.modules[0].functions[0].active);
        assert!(!tree.modules[0].functions[1].active);
    }

    #[test]
    fn test_payload_parses() {
        let payload = payloads::role(vec![payloads::lock_module(
            "Maintenance",
            false,
            vec![payloads::lock_function("Asset", "index", true)],
        )]);
        assert::has_key(&payload, "lock_modules");

        let tree = PermissionTree::from_role_json(&payload.to_string()).unwrap();
        assert_eq!(tree.modules[0].functions[0].action_name.as_deref(), Some("index"));
        assert!(!tree.modules[0].active);
    }

    #[test]
    fn test_menu_shorthands() {
        let packages = single_package(vec![category("Audit", vec![node("Vendor", "/v")])]);
        assert_eq!(packages[0].items[0].sub_items[0].href(), Some("/v"));
    }
}
