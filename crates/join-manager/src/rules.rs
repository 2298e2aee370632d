//! Rule store: accept categories, reject keywords and message templates.
//!
//! Raw entries come from configuration as `key:value` strings. A full-width
//! colon (`：`) is accepted as the separator and, in keyword lists, a
//! full-width comma (`，`) as the keyword separator. Malformed entries are
//! dropped with a warning; parsing never fails.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::config::DivideGroupConfig;

/// Key for the template used when a group has none of its own.
pub const DEFAULT_KEY: &str = "default";

/// Welcome text used when no `default` welcome entry is configured.
pub const DEFAULT_WELCOME: &str = "欢迎新成员！通过自动审核";

/// Reject reason used when neither the group nor `default` has a template.
pub const FALLBACK_REJECT_REASON: &str = "自动拒绝: 命中黑名单关键词";

const USER_NAME_PLACEHOLDER: &str = "%user_name%";

/// Replace `%name%` placeholders in one left-to-right pass.
///
/// Inserted values are never scanned again, so a value that itself looks
/// like a placeholder is kept verbatim.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        match values.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Split `key:value` at the first half- or full-width colon.
fn split_entry(entry: &str) -> Option<(&str, &str)> {
    let (idx, sep) = entry.char_indices().find(|(_, c)| *c == ':' || *c == '：')?;
    Some((&entry[..idx], &entry[idx + sep.len_utf8()..]))
}

/// Parse `category:kw1,kw2,...` entries.
///
/// Categories keep the order of their first appearance; a repeated category
/// replaces the earlier keyword list.
pub fn load_accept_rules(raw: &[String]) -> IndexMap<String, Vec<String>> {
    let mut rules = IndexMap::new();

    for item in raw {
        let Some((category, keywords)) = split_entry(item) else {
            warn!("Accept rule is missing a colon, skipped: {}", item);
            continue;
        };

        let category = category.trim();
        if category.is_empty() {
            warn!("Accept rule has an empty category, skipped: {}", item);
            continue;
        }

        let keywords: Vec<String> = keywords
            .replace('，', ",")
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if keywords.is_empty() {
            warn!("Accept rule has no keywords, skipped: {}", item);
            continue;
        }

        rules.insert(category.to_string(), keywords);
    }

    rules
}

/// Reject keywords, in configured order. Blank entries are dropped.
pub fn load_reject_rules(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `key:text` entries shared by reject reasons and welcome messages.
fn load_templates(raw: &[String], kind: &str) -> HashMap<String, String> {
    let mut templates = HashMap::new();

    for item in raw {
        let Some((key, text)) = split_entry(item) else {
            warn!("{} entry is missing a colon, skipped: {}", kind, item);
            continue;
        };

        let (key, text) = (key.trim(), text.trim());
        if key.is_empty() || text.is_empty() {
            warn!("{} entry has an empty key or text, skipped: {}", kind, item);
            continue;
        }

        templates.insert(key.to_string(), text.to_string());
    }

    templates
}

/// Parse `group_id:template` reject reason entries.
pub fn load_reject_reason(raw: &[String]) -> HashMap<String, String> {
    load_templates(raw, "Reject reason")
}

/// Parse `group_id:message` welcome entries. Always contains `default`.
pub fn load_welcome_config(raw: &[String]) -> HashMap<String, String> {
    let mut welcome = load_templates(raw, "Welcome message");
    welcome
        .entry(DEFAULT_KEY.to_string())
        .or_insert_with(|| DEFAULT_WELCOME.to_string());
    welcome
}

/// Parsed rules and templates.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    accept: IndexMap<String, Vec<String>>,
    reject: Vec<String>,
    reject_reason: HashMap<String, String>,
    welcome: HashMap<String, String>,
}

impl RuleStore {
    /// Parse every rule list of the given configuration.
    pub fn from_config(config: &DivideGroupConfig) -> Self {
        Self {
            accept: load_accept_rules(&config.accept_categories),
            reject: load_reject_rules(&config.reject),
            reject_reason: load_reject_reason(&config.reject_reason),
            welcome: load_welcome_config(&config.welcome_msg),
        }
    }

    /// Category -> keywords, in scan order.
    pub fn accept_rules(&self) -> &IndexMap<String, Vec<String>> {
        &self.accept
    }

    /// Reject keywords, in scan order.
    pub fn reject_rules(&self) -> &[String] {
        &self.reject
    }

    /// Build the rejection reason for a request.
    ///
    /// Uses the group's template, then `default`, then
    /// [`FALLBACK_REJECT_REASON`], and fills in `%group_id%`, `%user_id%`,
    /// `%user_name%` and `%key%`.
    pub fn resolve_reason(
        &self,
        group_id: &str,
        user_id: &str,
        user_name: &str,
        keyword: &str,
    ) -> String {
        fill_placeholders(
            self.reject_template(group_id),
            &[
                ("%group_id%", group_id),
                ("%user_id%", user_id),
                (USER_NAME_PLACEHOLDER, user_name),
                ("%key%", keyword),
            ],
        )
    }

    /// Whether the group's reject reason mentions the requester's name.
    pub fn reason_needs_user_name(&self, group_id: &str) -> bool {
        self.reject_template(group_id).contains(USER_NAME_PLACEHOLDER)
    }

    fn reject_template(&self, group_id: &str) -> &str {
        self.reject_reason
            .get(group_id)
            .or_else(|| self.reject_reason.get(DEFAULT_KEY))
            .map(String::as_str)
            .unwrap_or(FALLBACK_REJECT_REASON)
    }

    /// Welcome text for a group, falling back to `default`.
    pub fn welcome_message(&self, group_id: &str) -> &str {
        self.welcome
            .get(group_id)
            .or_else(|| self.welcome.get(DEFAULT_KEY))
            .map(String::as_str)
            .unwrap_or(DEFAULT_WELCOME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accept_rules_basic() {
        let rules = load_accept_rules(&strings(&["粉丝:直播,老粉,关注,up"]));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules["粉丝"], vec!["直播", "老粉", "关注", "up"]);
    }

    #[test]
    fn test_accept_rules_full_width_separators() {
        let rules = load_accept_rules(&strings(&["同学：同校，校友, 学长 "]));
        assert_eq!(rules["同学"], vec!["同校", "校友", "学长"]);
    }

    #[test]
    fn test_accept_rules_drop_malformed() {
        let rules = load_accept_rules(&strings(&[
            "no separator",
            ":kw1,kw2",
            "empty:",
            "blank: , ,",
            "ok:kw",
        ]));
        assert_eq!(rules.len(), 1);
        assert!(rules.contains_key("ok"));
    }

    #[test]
    fn test_accept_rules_duplicate_last_wins() {
        let rules = load_accept_rules(&strings(&["a:1", "b:2", "a:3,4"]));
        let order: Vec<_> = rules.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert_eq!(rules["a"], vec!["3", "4"]);
    }

    #[test]
    fn test_reject_rules_passthrough() {
        let rules = load_reject_rules(&strings(&["广告", " ", "兼职"]));
        assert_eq!(rules, vec!["广告", "兼职"]);
    }

    #[test]
    fn test_reject_reason_skips_malformed() {
        let reasons = load_reject_reason(&strings(&["default:bye %key%", "broken", "1001：群内专用"]));
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons["1001"], "群内专用");
    }

    #[test]
    fn test_template_keeps_colons_in_text() {
        let welcome = load_welcome_config(&strings(&["1001:提示：请看群公告"]));
        assert_eq!(welcome["1001"], "提示：请看群公告");
    }

    #[test]
    fn test_welcome_always_has_default() {
        let welcome = load_welcome_config(&[]);
        assert_eq!(welcome[DEFAULT_KEY], DEFAULT_WELCOME);

        let welcome = load_welcome_config(&strings(&["default:你好"]));
        assert_eq!(welcome[DEFAULT_KEY], "你好");
    }

    #[test]
    fn test_resolve_reason_substitutes_placeholders() {
        let config = DivideGroupConfig {
            reject_reason: strings(&["default:%user_id% said %key% in %group_id%"]),
            ..Default::default()
        };
        let store = RuleStore::from_config(&config);
        assert_eq!(store.resolve_reason("g1", "42", "Alice", "kw"), "42 said kw in g1");
    }

    #[test]
    fn test_resolve_reason_fallbacks() {
        let config = DivideGroupConfig {
            reject_reason: strings(&["1001:%user_name% 不符合要求"]),
            ..Default::default()
        };
        let store = RuleStore::from_config(&config);
        assert_eq!(store.resolve_reason("1001", "42", "Alice", "kw"), "Alice 不符合要求");
        assert_eq!(store.resolve_reason("2002", "42", "Alice", "kw"), FALLBACK_REJECT_REASON);
    }

    #[test]
    fn test_resolve_reason_keeps_inserted_placeholders() {
        let config = DivideGroupConfig {
            reject_reason: strings(&["default:%user_name% hit %key%"]),
            ..Default::default()
        };
        let store = RuleStore::from_config(&config);
        assert_eq!(
            store.resolve_reason("1001", "42", "%key%%group_id%", "广告"),
            "%key%%group_id% hit 广告"
        );
    }

    #[test]
    fn test_fill_placeholders_leaves_unknown_percent_signs() {
        let filled = fill_placeholders("100% %nope% %key%%", &[("%key%", "kw")]);
        assert_eq!(filled, "100% %nope% kw%");
    }

    #[test]
    fn test_reason_needs_user_name() {
        let config = DivideGroupConfig {
            reject_reason: strings(&["1001:%user_name% 不符合要求", "default:命中【%key%】"]),
            ..Default::default()
        };
        let store = RuleStore::from_config(&config);
        assert!(store.reason_needs_user_name("1001"));
        assert!(!store.reason_needs_user_name("2002"));
        assert!(!RuleStore::default().reason_needs_user_name("1001"));
    }

    #[test]
    fn test_welcome_message_lookup() {
        let config = DivideGroupConfig {
            welcome_msg: strings(&["default:欢迎", "1001:欢迎来到一号群"]),
            ..Default::default()
        };
        let store = RuleStore::from_config(&config);
        assert_eq!(store.welcome_message("1001"), "欢迎来到一号群");
        assert_eq!(store.welcome_message("2002"), "欢迎");
    }
}
