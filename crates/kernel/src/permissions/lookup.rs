//! Module, function and sub-function queries over a permission tree.
//!
//! These back feature toggles inside pages (e.g. whether the "create"
//! button of the asset list is shown). Unlike the menu matcher they fail
//! closed when the tree is absent, except
//! [`is_sub_function_enabled_anywhere`].

use tracing::debug;

use super::normalize::compact;
use crate::models::{Function, Module, PermissionTree, SubFunction};

/// Path sections whose module name differs from the first path segment.
///
/// Every known section currently maps to itself; unknown sections fall back
/// to the segment too.
const PATH_MODULES: &[(&str, &[&str])] = &[
    ("safety", &["safety"]),
    ("maintenance", &["maintenance"]),
    ("security", &["security"]),
    ("finance", &["finance"]),
    ("utility", &["utility"]),
    ("crm", &["crm"]),
];

fn fuzzy_eq(a: &str, b: &str) -> bool {
    let (a, b) = (compact(a), compact(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

fn find_module<'t>(tree: &'t PermissionTree, module_name: &str) -> Option<&'t Module> {
    tree.modules
        .iter()
        .find(|m| m.name.to_lowercase() == module_name.to_lowercase())
}

fn find_active_module<'t>(tree: Option<&'t PermissionTree>, module_name: &str) -> Option<&'t Module> {
    find_module(tree?, module_name).filter(|m| m.active)
}

/// First function whose name or action name fuzzily matches `name`.
///
/// Both sides are compared with separators stripped and case folded;
/// equality or containment in either direction counts.
pub fn find_matching_function<'f>(functions: &'f [Function], name: &str) -> Option<&'f Function> {
    functions.iter().find(|f| {
        fuzzy_eq(&f.name, name)
            || f.action_name
                .as_deref()
                .is_some_and(|action| fuzzy_eq(action, name))
    })
}

fn find_matching_sub_function<'f>(function: &'f Function, name: &str) -> Option<&'f SubFunction> {
    function
        .sub_functions
        .iter()
        .find(|sub| fuzzy_eq(&sub.name, name))
}

/// Whether the module exists and its own flag is active.
pub fn is_module_enabled(tree: Option<&PermissionTree>, module_name: &str) -> bool {
    find_active_module(tree, module_name).is_some()
}

/// Modules whose own flag is active.
pub fn enabled_modules(tree: Option<&PermissionTree>) -> Vec<&Module> {
    tree.map(|t| t.modules.iter().filter(|m| m.active).collect())
        .unwrap_or_default()
}

/// Whether `function_name` is active inside an active `module_name`.
pub fn is_function_enabled(
    tree: Option<&PermissionTree>,
    module_name: &str,
    function_name: &str,
) -> bool {
    find_active_module(tree, module_name)
        .and_then(|m| find_matching_function(&m.functions, function_name))
        .is_some_and(|f| f.active)
}

/// Whether `function_name` is active in any module, ignoring module flags.
pub fn is_function_enabled_anywhere(tree: Option<&PermissionTree>, function_name: &str) -> bool {
    let Some(tree) = tree else {
        return false;
    };

    for module in &tree.modules {
        if let Some(function) = find_matching_function(&module.functions, function_name)
            && function.active
        {
            debug!(
                function = function_name,
                module = %module.name,
                module_active = module.active,
                "function active"
            );
            return true;
        }
    }

    debug!(function = function_name, "function not found or not active");
    false
}

/// Whether a sub-function is enabled inside an active function of an
/// active module.
pub fn is_sub_function_enabled(
    tree: Option<&PermissionTree>,
    module_name: &str,
    function_name: &str,
    sub_function_name: &str,
) -> bool {
    find_active_module(tree, module_name)
        .and_then(|m| find_matching_function(&m.functions, function_name))
        .filter(|f| f.active)
        .and_then(|f| find_matching_sub_function(f, sub_function_name))
        .is_some_and(|sub| sub.enabled)
}

/// Whether a sub-function is active, searching every module.
///
/// Returns `true` when the tree is absent or no active function carries a
/// matching sub-function; only an explicit inactive sub-function hides it.
pub fn is_sub_function_enabled_anywhere(
    tree: Option<&PermissionTree>,
    function_name: &str,
    sub_function_name: &str,
) -> bool {
    let Some(tree) = tree else {
        return true;
    };

    for module in &tree.modules {
        let Some(function) = find_matching_function(&module.functions, function_name) else {
            continue;
        };
        if !function.active {
            continue;
        }
        if let Some(sub) = find_matching_sub_function(function, sub_function_name) {
            debug!(
                function = function_name,
                sub_function = sub_function_name,
                active = sub.active,
                "sub-function found"
            );
            return sub.active;
        }
    }

    debug!(
        sub_function = sub_function_name,
        "sub-function not found; showing by default"
    );
    true
}

/// Active functions of an active module.
pub fn enabled_functions<'t>(tree: Option<&'t PermissionTree>, module_name: &str) -> Vec<&'t Function> {
    find_active_module(tree, module_name)
        .map(|m| m.functions.iter().filter(|f| f.active).collect())
        .unwrap_or_default()
}

/// Enabled sub-functions of an active function of an active module.
pub fn enabled_sub_functions<'t>(
    tree: Option<&'t PermissionTree>,
    module_name: &str,
    function_name: &str,
) -> Vec<&'t SubFunction> {
    find_active_module(tree, module_name)
        .and_then(|m| find_matching_function(&m.functions, function_name))
        .filter(|f| f.active)
        .map(|f| f.sub_functions.iter().filter(|sub| sub.enabled).collect())
        .unwrap_or_default()
}

/// Whether any module behind the first segment of `path` is enabled.
///
/// The root path is always allowed once permissions are loaded.
pub fn has_permission_for_path(tree: Option<&PermissionTree>, path: &str) -> bool {
    if tree.is_none() {
        return false;
    }

    let path = path.to_lowercase();
    let Some(section) = path.split('/').find(|segment| !segment.is_empty()) else {
        return true;
    };

    match PATH_MODULES.iter().find(|(name, _)| *name == section) {
        Some((_, modules)) => modules.iter().any(|m| is_module_enabled(tree, m)),
        None => is_module_enabled(tree, section),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sub(name: &str, active: bool, enabled: bool) -> SubFunction {
        SubFunction {
            name: name.to_string(),
            display_name: None,
            active,
            enabled,
        }
    }

    fn sample() -> PermissionTree {
        let mut asset = Function::new("pms_assets", Some("Asset"), true);
        asset.sub_functions = vec![sub("asset_create", true, true), sub("asset_export", false, false)];

        let mut maintenance = Module::new("Maintenance", true);
        maintenance.functions = vec![asset, Function::new("AMC", None, false)];

        let mut security = Module::new("Security", false);
        security.functions = vec![Function::new("Visitors", Some("pms_visitors"), true)];

        PermissionTree::new(vec![maintenance, security])
    }

    #[test]
    fn module_flags() {
        let tree = sample();
        assert!(is_module_enabled(Some(&tree), "maintenance"));
        assert!(!is_module_enabled(Some(&tree), "Security"));
        assert!(!is_module_enabled(Some(&tree), "Finance"));
        assert!(!is_module_enabled(None, "Maintenance"));

        let names: Vec<&str> = enabled_modules(Some(&tree)).into_iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Maintenance"]);
    }

    #[test]
    fn fuzzy_function_matching() {
        let tree = sample();
        let functions = &tree.modules[0].functions;
        assert_eq!(find_matching_function(functions, "PMS Assets").unwrap().name, "pms_assets");
        // Action name match.
        assert_eq!(find_matching_function(functions, "asset").unwrap().name, "pms_assets");
        assert!(find_matching_function(functions, "").is_none());
        assert!(find_matching_function(functions, "Visitors").is_none());
    }

    #[test]
    fn function_enabled_respects_module_flag() {
        let tree = sample();
        assert!(is_function_enabled(Some(&tree), "Maintenance", "assets"));
        assert!(!is_function_enabled(Some(&tree), "Maintenance", "amc"));
        assert!(!is_function_enabled(Some(&tree), "Security", "visitors"));
    }

    #[test]
    fn function_enabled_anywhere_ignores_module_flag() {
        let tree = sample();
        assert!(is_function_enabled_anywhere(Some(&tree), "visitors"));
        assert!(!is_function_enabled_anywhere(Some(&tree), "amc"));
        assert!(!is_function_enabled_anywhere(None, "visitors"));
    }

    #[test]
    fn sub_function_checks() {
        let tree = sample();
        assert!(is_sub_function_enabled(Some(&tree), "Maintenance", "assets", "asset-create"));
        assert!(!is_sub_function_enabled(Some(&tree), "Maintenance", "assets", "asset export"));
        assert!(!is_sub_function_enabled(Some(&tree), "Maintenance", "assets", "asset_delete"));

        let enabled = enabled_sub_functions(Some(&tree), "Maintenance", "assets");
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "asset_create");
    }

    #[test]
    fn sub_function_anywhere_fails_open() {
        let tree = sample();
        assert!(is_sub_function_enabled_anywhere(Some(&tree), "assets", "asset_create"));
        assert!(!is_sub_function_enabled_anywhere(Some(&tree), "assets", "asset_export"));
        // Unknown sub-function and missing tree both show.
        assert!(is_sub_function_enabled_anywhere(Some(&tree), "assets", "asset_delete"));
        assert!(is_sub_function_enabled_anywhere(None, "assets", "asset_export"));
    }

    #[test]
    fn enabled_functions_of_module() {
        let tree = sample();
        let names: Vec<&str> = enabled_functions(Some(&tree), "Maintenance")
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["pms_assets"]);
        assert!(enabled_functions(Some(&tree), "Security").is_empty());
    }

    #[test]
    fn path_permissions() {
        let tree = sample();
        assert!(has_permission_for_path(Some(&tree), "/maintenance/assets"));
        assert!(!has_permission_for_path(Some(&tree), "/security/visitors"));
        assert!(!has_permission_for_path(Some(&tree), "/reports"));
        assert!(has_permission_for_path(Some(&tree), "/"));
        assert!(!has_permission_for_path(None, "/"));
    }
}
