//! Navigation menu model.
//!
//! Packages group top-level menu items (e.g. "Maintenance", "Safety"). Each
//! item may carry a route and nested sub-items. The [`AliasMap`] lists the
//! backend function names a menu item should also match.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry in the navigation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Display label, also the permission matching key.
    pub name: String,

    /// Route for navigable entries; absent for pure categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Children in display order.
    #[serde(
        default,
        rename = "sub_item",
        alias = "subItems",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sub_items: Vec<MenuNode>,
}

impl MenuNode {
    /// A navigable leaf.
    pub fn link(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: Some(href.into()),
            sub_items: Vec::new(),
        }
    }

    /// A category with no route of its own.
    pub fn category(name: impl Into<String>, sub_items: Vec<MenuNode>) -> Self {
        Self {
            name: name.into(),
            href: None,
            sub_items,
        }
    }

    /// Attach children to this node.
    pub fn with_sub_items(mut self, sub_items: Vec<MenuNode>) -> Self {
        self.sub_items = sub_items;
        self
    }

    pub fn has_sub_items(&self) -> bool {
        !self.sub_items.is_empty()
    }

    /// A node with neither a route nor children leads nowhere.
    pub fn is_dead_end(&self) -> bool {
        self.href.is_none() && self.sub_items.is_empty()
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

/// A named group of top-level menu items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,

    #[serde(default, rename = "item")]
    pub items: Vec<MenuNode>,
}

impl Package {
    pub fn new(name: impl Into<String>, items: Vec<MenuNode>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Lowercase menu name -> alternate backend permission names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>")]
pub struct AliasMap {
    entries: HashMap<String, Vec<String>>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add aliases for a menu name. Existing aliases for the name are kept.
    pub fn insert<I, S>(&mut self, menu_name: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.entries.entry(menu_name.to_lowercase()).or_default();
        for alias in aliases {
            let alias = alias.into();
            if !entry.contains(&alias) {
                entry.push(alias);
            }
        }
    }

    /// Aliases for a menu name, looked up by its lowercase form.
    pub fn get(&self, menu_name: &str) -> Option<&[String]> {
        self.entries
            .get(&menu_name.to_lowercase())
            .map(Vec::as_slice)
    }

    pub fn contains(&self, menu_name: &str) -> bool {
        self.entries.contains_key(&menu_name.to_lowercase())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for AliasMap {
    fn from(raw: HashMap<String, Vec<String>>) -> Self {
        let mut map = Self::new();
        for (name, aliases) in raw {
            map.insert(&name, aliases);
        }
        map
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn alias_lookup_is_case_insensitive() {
        let mut aliases = AliasMap::new();
        aliases.insert("FM User", ["user & roles", "pms_user_roles"]);

        assert_eq!(aliases.get("fm user").unwrap().len(), 2);
        assert!(aliases.contains("FM USER"));
        assert!(aliases.get("fm-user").is_none());
    }

    #[test]
    fn alias_insert_merges_without_duplicates() {
        let mut aliases = AliasMap::new();
        aliases.insert("ticket", ["tickets", "pms_complaints"]);
        aliases.insert("Ticket", ["pms_complaints", "ticket"]);

        assert_eq!(
            aliases.get("ticket").unwrap(),
            ["tickets", "pms_complaints", "ticket"]
        );
        assert_eq!(aliases.len(), 1);
    }

    #[test]
    fn node_shapes() {
        let leaf = MenuNode::link("Asset", "/assets");
        assert!(!leaf.is_dead_end());
        assert_eq!(leaf.href(), Some("/assets"));

        let bare = MenuNode::category("Reports", vec![]);
        assert!(bare.is_dead_end());

        let parent = MenuNode::category("Audit", vec![leaf]);
        assert!(parent.has_sub_items());
        assert!(!parent.is_dead_end());
    }

    #[test]
    fn node_accepts_camel_case_children() {
        let node: MenuNode = serde_json::from_str(
            r#"{"name": "User Master", "subItems": [{"name": "FM Users", "href": "/fm"}]}"#,
        )
        .unwrap();
        assert_eq!(node.sub_items.len(), 1);
        assert_eq!(node.sub_items[0].href(), Some("/fm"));
    }
}
