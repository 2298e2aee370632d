//! Persisted record types.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Format of [`JoinRecord::accept_time`].
pub const ACCEPT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Category used for stored records that lack one.
pub const UNKNOWN_CATEGORY: &str = "未知";

/// Acceptance record of one user in one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRecord {
    /// When the request was approved (`YYYY-MM-DD HH:MM:SS`).
    #[serde(default)]
    pub accept_time: String,
    /// Human-readable reason, e.g. `匹配关键词: 老粉`.
    #[serde(default)]
    pub accept_reason: String,
    /// Accept category the comment matched.
    #[serde(default = "unknown_category")]
    pub category: String,
}

fn unknown_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

impl JoinRecord {
    /// Build the record for a request approved on `keyword`.
    pub fn accepted(category: &str, keyword: &str, accepted_at: NaiveDateTime) -> Self {
        Self {
            accept_time: accepted_at.format(ACCEPT_TIME_FORMAT).to_string(),
            accept_reason: format!("匹配关键词: {}", keyword),
            category: category.to_string(),
        }
    }
}

/// user_id -> record, in insertion order.
pub type GroupRecords = IndexMap<String, JoinRecord>;

/// group_id -> user_id -> record.
pub type RecordMap = IndexMap<String, GroupRecords>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_accepted_record() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 3, 9)
            .unwrap();
        let record = JoinRecord::accepted("粉丝", "老粉", at);
        assert_eq!(record.accept_time, "2024-05-01 08:03:09");
        assert_eq!(record.accept_reason, "匹配关键词: 老粉");
        assert_eq!(record.category, "粉丝");
    }

    #[test]
    fn test_missing_category_defaults() {
        let record: JoinRecord =
            serde_json::from_str(r#"{"accept_time": "2024-05-01 08:03:09"}"#).unwrap();
        assert_eq!(record.category, UNKNOWN_CATEGORY);
        assert!(record.accept_reason.is_empty());
    }
}
