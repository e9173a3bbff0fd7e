//! Name normalization shared by the matcher and the lookups.

use std::fmt;
use std::str::FromStr;

use crate::error::NavError;

const SEPARATOR_SWAPS: [(char, char); 6] = [
    (' ', '_'),
    ('_', ' '),
    (' ', '-'),
    ('-', ' '),
    ('_', '-'),
    ('-', '_'),
];

/// How two normalized names are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Equal, or either side contains the other.
    ///
    /// Loose on purpose: a short function name such as "amc" matches every
    /// menu name containing it.
    #[default]
    Substring,
    /// Equal only.
    Exact,
}

impl MatchMode {
    /// Compare two already-lowercased names.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            MatchMode::Exact => a == b,
            MatchMode::Substring => a == b || a.contains(b) || b.contains(a),
        }
    }
}

impl FromStr for MatchMode {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "exact" => Ok(MatchMode::Exact),
            other => Err(NavError::InvalidSetting {
                key: "match mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => f.write_str("substring"),
            MatchMode::Exact => f.write_str("exact"),
        }
    }
}

/// Spellings of a menu name that count as the same name.
///
/// Returns the raw name, its lowercase form, and the lowercase form with
/// each separator pair swapped (space/underscore, space/hyphen,
/// underscore/hyphen). Duplicates are removed, first occurrence wins.
pub fn name_variants(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let mut variants = vec![name.to_string(), lower.clone()];

    for (from, to) in SEPARATOR_SWAPS {
        if lower.contains(from) {
            variants.push(lower.replace(from, &to.to_string()));
        }
    }

    dedup(variants)
}

/// Lowercase with every space, hyphen and underscore removed.
pub fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| !(c.is_whitespace() || *c == '-' || *c == '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drop repeated values, keeping the first occurrence.
pub(super) fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn variants_of_spaced_name() {
        let variants = name_variants("FM User");
        assert_eq!(variants, vec!["FM User", "fm user", "fm_user", "fm-user"]);
    }

    #[test]
    fn variants_of_mixed_separators() {
        let variants = name_variants("pms_asset-groups");
        assert!(variants.contains(&"pms asset-groups".to_string()));
        assert!(variants.contains(&"pms-asset-groups".to_string()));
        assert!(variants.contains(&"pms_asset groups".to_string()));
        assert!(variants.contains(&"pms_asset_groups".to_string()));
    }

    #[test]
    fn variants_swap_one_separator_pair_at_a_time() {
        let variants = name_variants("fm user_role");
        assert!(variants.contains(&"fm_user_role".to_string()));
        assert!(variants.contains(&"fm-user_role".to_string()));
        assert!(variants.contains(&"fm user role".to_string()));
        // Mixed separators are never rewritten to a single one everywhere.
        assert!(!variants.contains(&"fm-user-role".to_string()));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let values = ["b", "a", "b", "c", "a"].map(String::from).to_vec();
        assert_eq!(dedup(values), vec!["b", "a", "c"]);
    }

    #[test]
    fn variants_of_plain_lowercase_name_collapse() {
        assert_eq!(name_variants("asset"), vec!["asset"]);
    }

    #[test]
    fn compact_strips_separators() {
        assert_eq!(compact("Line_Manager-Check"), "linemanagercheck");
        assert_eq!(compact("M Safe"), "msafe");
        assert_eq!(compact(""), "");
    }

    #[test]
    fn match_modes() {
        assert!(MatchMode::Substring.matches("amc", "amc setup"));
        assert!(MatchMode::Substring.matches("pms_assets", "assets"));
        assert!(!MatchMode::Substring.matches("visitor", "ticket"));
        assert!(!MatchMode::Exact.matches("amc", "amc setup"));
        assert!(MatchMode::Exact.matches("amc", "amc"));
    }

    #[test]
    fn match_mode_parsing() {
        assert_eq!("Exact".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert_eq!(" substring ".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert!("fuzzy".parse::<MatchMode>().is_err());
        assert_eq!(MatchMode::Exact.to_string(), "exact");
    }
}
