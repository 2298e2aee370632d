//! Permission gate deciding which groups are handled automatically.

use std::collections::HashSet;

use tracing::warn;

use crate::config::DivideGroupConfig;

/// How the control list is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMethod {
    /// Every group except those listed.
    #[default]
    Blacklist,
    /// Only the groups listed.
    Whitelist,
}

impl BlockMethod {
    /// Parse a configured value. Unknown values fall back to blacklist.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "whitelist" => Self::Whitelist,
            "blacklist" | "" => Self::Blacklist,
            other => {
                warn!("Unknown block_method {:?}, using blacklist", other);
                Self::Blacklist
            }
        }
    }
}

/// Decides whether a group's join requests are in scope.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    method: BlockMethod,
    control_list: HashSet<String>,
}

impl PermissionGate {
    pub fn new<I, T>(method: BlockMethod, control_list: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            method,
            control_list: control_list.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &DivideGroupConfig) -> Self {
        Self::new(
            BlockMethod::parse(&config.block_method),
            config.control_list.iter().cloned(),
        )
    }

    pub fn method(&self) -> BlockMethod {
        self.method
    }

    /// Check whether requests for `group_id` are handled.
    pub fn is_allowed(&self, group_id: &str) -> bool {
        let listed = self.control_list.contains(group_id);
        match self.method {
            BlockMethod::Whitelist => listed,
            BlockMethod::Blacklist => !listed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist() {
        let gate = PermissionGate::new(BlockMethod::Blacklist, ["100"]);
        assert!(!gate.is_allowed("100"));
        assert!(gate.is_allowed("200"));
    }

    #[test]
    fn test_whitelist() {
        let gate = PermissionGate::new(BlockMethod::Whitelist, ["100"]);
        assert!(gate.is_allowed("100"));
        assert!(!gate.is_allowed("200"));
    }

    #[test]
    fn test_parse_block_method() {
        assert_eq!(BlockMethod::parse("whitelist"), BlockMethod::Whitelist);
        assert_eq!(BlockMethod::parse(" Whitelist "), BlockMethod::Whitelist);
        assert_eq!(BlockMethod::parse("blacklist"), BlockMethod::Blacklist);
        assert_eq!(BlockMethod::parse("greylist"), BlockMethod::Blacklist);
    }

    #[test]
    fn test_from_config_defaults_to_blacklist() {
        let gate = PermissionGate::from_config(&DivideGroupConfig::default());
        assert_eq!(gate.method(), BlockMethod::Blacklist);
        assert!(gate.is_allowed("anything"));
    }
}
