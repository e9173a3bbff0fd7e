//! Permission tree model.
//!
//! The permission service answers `GET /pms/users/get_user_role.json` with a
//! role payload (`UserRoleResponse`). That payload is translated once into a
//! [`PermissionTree`], which is the only shape the matcher and resolver see.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{NavError, NavResult};

/// Snapshot of the modules and functions granted to the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTree {
    /// Modules in payload order.
    pub modules: Vec<Module>,
}

/// A permission module (e.g. "Maintenance").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,

    /// Module-level flag. The navigation matcher ignores it; only the
    /// module lookups in `permissions::lookup` consult it.
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub functions: Vec<Function>,
}

/// A function inside a module (e.g. "Asset" with action "index").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,

    #[serde(default)]
    pub action_name: Option<String>,

    pub active: bool,

    #[serde(default)]
    pub sub_functions: Vec<SubFunction>,
}

/// A sub-function toggle inside a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFunction {
    pub name: String,

    /// Display label from the role editor.
    #[serde(default)]
    pub display_name: Option<String>,

    pub active: bool,

    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl PermissionTree {
    /// Build a tree from already-translated modules.
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Parse a role payload (JSON) and translate it.
    pub fn from_role_json(json: &str) -> NavResult<Self> {
        let response: UserRoleResponse = serde_json::from_str(json)?;
        Self::try_from(response)
    }

    /// Iterate every function of every module, regardless of module status.
    pub fn functions(&self) -> impl Iterator<Item = (&Module, &Function)> {
        self.modules
            .iter()
            .flat_map(|module| module.functions.iter().map(move |function| (module, function)))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
            functions: Vec::new(),
        }
    }
}

impl Function {
    pub fn new(name: impl Into<String>, action_name: Option<&str>, active: bool) -> Self {
        Self {
            name: name.into(),
            action_name: action_name.map(str::to_string),
            active,
            sub_functions: Vec::new(),
        }
    }
}

// -------------------------------------------------------------------------
// Wire payload
// -------------------------------------------------------------------------

/// Role payload returned by the permission service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRoleResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub role_name: String,

    #[serde(default)]
    pub role_id: i64,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub active: i64,

    #[serde(default)]
    pub lock_modules: Option<Vec<LockModule>>,

    /// Flattened form some deployments send instead of `lock_modules`.
    #[serde(default, rename = "activeFunctions")]
    pub active_functions: Option<Vec<ActiveFunctionEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockModule {
    #[serde(default)]
    pub module_id: i64,
    pub module_name: String,
    #[serde(default)]
    pub module_active: i64,
    #[serde(default)]
    pub lock_functions: Vec<LockFunction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockFunction {
    #[serde(default)]
    pub function_id: i64,
    pub function_name: String,
    #[serde(default)]
    pub action_name: Option<String>,
    #[serde(default)]
    pub function_active: i64,
    #[serde(default)]
    pub sub_functions: Vec<LockSubFunction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockSubFunction {
    #[serde(default)]
    pub sub_function_id: i64,
    pub sub_function_name: String,
    #[serde(default)]
    pub sub_function_display_name: Option<String>,
    #[serde(default)]
    pub sub_function_active: i64,
    #[serde(default)]
    pub enabled: bool,
}

/// One entry of the flattened `activeFunctions` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveFunctionEntry {
    #[serde(rename = "functionName")]
    pub function_name: String,
    #[serde(default, rename = "actionName")]
    pub action_name: Option<String>,
}

/// Module name given to entries from the flattened `activeFunctions` list.
pub const FLATTENED_MODULE_NAME: &str = "active functions";

impl TryFrom<UserRoleResponse> for PermissionTree {
    type Error = NavError;

    fn try_from(response: UserRoleResponse) -> NavResult<Self> {
        if !response.success {
            warn!(role = %response.role_name, "role payload reported success = false");
            return Err(NavError::RoleUnavailable(response.role_name));
        }

        let mut modules: Vec<Module> = response
            .lock_modules
            .unwrap_or_default()
            .into_iter()
            .map(Module::from)
            .collect();

        // The flattened list carries no module; every entry is active.
        if let Some(entries) = response.active_functions
            && !entries.is_empty()
        {
            let mut flattened = Module::new(FLATTENED_MODULE_NAME, true);
            flattened.functions = entries
                .into_iter()
                .map(|entry| Function {
                    name: entry.function_name,
                    action_name: entry.action_name.filter(|a| !a.is_empty()),
                    active: true,
                    sub_functions: Vec::new(),
                })
                .collect();
            modules.push(flattened);
        }

        Ok(Self { modules })
    }
}

impl From<LockModule> for Module {
    fn from(module: LockModule) -> Self {
        Self {
            name: module.module_name,
            active: module.module_active == 1,
            functions: module.lock_functions.into_iter().map(Function::from).collect(),
        }
    }
}

impl From<LockFunction> for Function {
    fn from(function: LockFunction) -> Self {
        Self {
            name: function.function_name,
            action_name: function.action_name.filter(|a| !a.is_empty()),
            active: function.function_active == 1,
            sub_functions: function
                .sub_functions
                .into_iter()
                .map(|sub| SubFunction {
                    name: sub.sub_function_name,
                    display_name: sub.sub_function_display_name,
                    active: sub.sub_function_active == 1,
                    enabled: sub.enabled,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "success": true,
        "role_name": "Facility Manager",
        "role_id": 7,
        "display_name": "FM",
        "active": 1,
        "lock_modules": [
            {
                "module_id": 1,
                "module_name": "Maintenance",
                "module_active": 0,
                "lock_functions": [
                    {
                        "function_id": 10,
                        "function_name": "Asset",
                        "action_name": "index",
                        "function_active": 1,
                        "sub_functions": [
                            {
                                "sub_function_id": 100,
                                "sub_function_name": "asset_create",
                                "sub_function_display_name": "Create",
                                "sub_function_active": 1,
                                "enabled": true
                            }
                        ]
                    },
                    {
                        "function_id": 11,
                        "function_name": "AMC",
                        "action_name": "",
                        "function_active": 0,
                        "sub_functions": []
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn translates_lock_modules() {
        let tree = PermissionTree::from_role_json(PAYLOAD).unwrap();
        assert_eq!(tree.modules.len(), 1);

        let module = &tree.modules[0];
        assert_eq!(module.name, "Maintenance");
        assert!(!module.active);

        let asset = &module.functions[0];
        assert_eq!(asset.name, "Asset");
        assert_eq!(asset.action_name.as_deref(), Some("index"));
        assert!(asset.active);
        assert_eq!(asset.sub_functions[0].name, "asset_create");
        assert!(asset.sub_functions[0].enabled);

        // Empty action names are dropped.
        assert_eq!(module.functions[1].action_name, None);
        assert!(!module.functions[1].active);
    }

    #[test]
    fn unsuccessful_payload_is_rejected() {
        let err = PermissionTree::from_role_json(r#"{"success": false, "role_name": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, NavError::RoleUnavailable(name) if name == "x"));
    }

    #[test]
    fn flattened_active_functions() {
        let json = r#"{
            "success": true,
            "activeFunctions": [
                {"functionName": "Tickets", "actionName": "pms_complaints"},
                {"functionName": "Visitors"}
            ]
        }"#;
        let tree = PermissionTree::from_role_json(json).unwrap();
        assert_eq!(tree.modules.len(), 1);
        assert_eq!(tree.modules[0].name, FLATTENED_MODULE_NAME);
        assert!(tree.modules[0].functions.iter().all(|f| f.active));
        assert_eq!(tree.functions().count(), 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PermissionTree::from_role_json("{not json"),
            Err(NavError::Json(_))
        ));
    }
}
