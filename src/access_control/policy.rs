//! Board allow-list policy
//!
//! The policy is loaded once at process start and read-only afterwards; no
//! synchronization is needed. Membership is checked against canonical board
//! identifiers only; normalization happens before the check.

use crate::config::{AccessControlConfig, PolicyProvenance};
use std::collections::HashSet;

/// The configured board allow-list plus its provenance.
///
/// An empty set means unrestricted access, not "deny everything".
#[derive(Debug, Clone)]
pub struct BoardPolicy {
    allowed: HashSet<String>,
    provenance: PolicyProvenance,
}

impl BoardPolicy {
    /// Build the policy from loaded configuration
    pub fn from_config(config: &AccessControlConfig) -> Self {
        Self {
            allowed: config.allowed_boards.iter().cloned().collect(),
            provenance: config
                .provenance
                .clone()
                .unwrap_or_else(|| PolicyProvenance {
                    path: None,
                    key: "access_control.allowed_boards".to_string(),
                }),
        }
    }

    /// An unrestricted policy (no allow-list configured)
    pub fn open() -> Self {
        Self::from_config(&AccessControlConfig::default())
    }

    /// A policy restricted to the given canonical board identifiers
    pub fn restricted<I, S>(boards: I, provenance: PolicyProvenance) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: boards.into_iter().map(Into::into).collect(),
            provenance,
        }
    }

    /// True when no allow-list is configured
    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Whether the given canonical board identifier is authorized
    pub fn permits(&self, canonical_board_id: &str) -> bool {
        self.is_unrestricted() || self.allowed.contains(canonical_board_id)
    }

    /// Where the allow-list came from, for denial messages
    pub fn provenance(&self) -> &PolicyProvenance {
        &self.provenance
    }

    /// The full allow-list, sorted, for denial diagnostics
    pub fn boards_sorted(&self) -> Vec<&str> {
        let mut boards: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        boards.sort_unstable();
        boards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_policy_permits_anything() {
        let policy = BoardPolicy::open();
        assert!(policy.is_unrestricted());
        assert!(policy.permits("B1"));
        assert!(policy.permits("literally-anything"));
    }

    #[test]
    fn test_restricted_policy_membership() {
        let policy =
            BoardPolicy::restricted(["B1", "B2"], PolicyProvenance::from_env());
        assert!(!policy.is_unrestricted());
        assert!(policy.permits("B1"));
        assert!(policy.permits("B2"));
        assert!(!policy.permits("B3"));
    }

    #[test]
    fn test_from_config_carries_provenance() {
        let config = AccessControlConfig {
            allowed_boards: vec!["B1".into()],
            provenance: Some(PolicyProvenance::from_file("trello-mcp.toml")),
        };
        let policy = BoardPolicy::from_config(&config);
        assert_eq!(policy.provenance().key, "access_control.allowed_boards");
        assert_eq!(policy.provenance().path.as_deref(), Some("trello-mcp.toml"));
    }

    #[test]
    fn test_boards_sorted_stable() {
        let policy =
            BoardPolicy::restricted(["B2", "B1"], PolicyProvenance::from_env());
        assert_eq!(policy.boards_sorted(), vec!["B1", "B2"]);
    }
}
