//! Compiled form of the configuration used while handling events.

use std::collections::HashSet;
use std::time::Duration;

use indexmap::IndexSet;
use join_core::SessionId;

use crate::classifier::Classifier;
use crate::config::JoinManagerConfig;
use crate::notice::resolve_targets;
use crate::permission::PermissionGate;
use crate::rules::RuleStore;

/// Rules, gate and pacing built from one [`JoinManagerConfig`].
///
/// Immutable; a reload builds a new value and swaps it in.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    rules: RuleStore,
    gate: PermissionGate,
    classifier: Classifier,
    disabled_statistics: HashSet<String>,
    accept_notice: Vec<String>,
    reject_notice: Vec<String>,
    send_interval: Duration,
    debounce: Duration,
}

impl Settings {
    pub fn from_config(config: &JoinManagerConfig) -> Self {
        let group = &config.divide_group;
        let rules = RuleStore::from_config(group);
        let classifier = Classifier::new(rules.reject_rules(), rules.accept_rules());

        Self {
            gate: PermissionGate::from_config(group),
            classifier,
            rules,
            disabled_statistics: group.disabled_statistics.iter().cloned().collect(),
            accept_notice: group.accept_notice.clone(),
            reject_notice: group.reject_notice.clone(),
            send_interval: config.send_interval(),
            debounce: config.debounce_interval(),
        }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Whether a source chart is drawn for `group_id`.
    pub fn statistics_enabled(&self, group_id: &str) -> bool {
        !self.disabled_statistics.contains(group_id)
    }

    /// Sessions notified of an approval in the session `origin`.
    pub fn accept_targets(&self, origin: &SessionId) -> IndexSet<SessionId> {
        resolve_targets(&self.accept_notice, origin)
    }

    /// Sessions notified of a rejection in the session `origin`.
    pub fn reject_targets(&self, origin: &SessionId) -> IndexSet<SessionId> {
        resolve_targets(&self.reject_notice, origin)
    }

    pub fn send_interval(&self) -> Duration {
        self.send_interval
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;

    const CONFIG: &str = r#"
        delay = 1.0
        debounce = 0.0

        [divide_group]
        block_method = "whitelist"
        control_list = [1001]
        accept_categories = ["粉丝:老粉"]
        reject = ["广告"]
        disabled_statistics = ["1001"]
        accept_notice = ["origin", "aiocqhttp:GroupMessage:9"]
        reject_notice = []
    "#;

    #[test]
    fn test_from_config() {
        let config = JoinManagerConfig::from_toml_str(CONFIG).unwrap();
        let settings = Settings::from_config(&config);

        assert!(settings.gate().is_allowed("1001"));
        assert!(!settings.gate().is_allowed("1002"));
        assert_eq!(
            settings.classifier().classify("广告老粉"),
            Classification::Reject {
                keyword: "广告".to_string()
            }
        );
        assert!(!settings.statistics_enabled("1001"));
        assert!(settings.statistics_enabled("1002"));
        assert_eq!(settings.send_interval(), Duration::from_secs(1));
        assert_eq!(settings.debounce(), Duration::ZERO);
    }

    #[test]
    fn test_targets() {
        let config = JoinManagerConfig::from_toml_str(CONFIG).unwrap();
        let settings = Settings::from_config(&config);
        let origin = SessionId::group("aiocqhttp", "1001");

        let accept: Vec<_> = settings.accept_targets(&origin).into_iter().collect();
        assert_eq!(
            accept,
            vec![origin.clone(), SessionId::new("aiocqhttp:GroupMessage:9")]
        );
        assert!(settings.reject_targets(&origin).is_empty());
    }
}
