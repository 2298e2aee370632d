//! Helpers for identifiers that may arrive as numbers or strings.
//!
//! Chat platforms send group and user ids as JSON numbers while
//! configuration files often carry them as strings. Everything inside the
//! manager compares ids as strings.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Int(i64),
    Uint(u64),
    Str(String),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Str(v) => v.trim().to_string(),
        }
    }
}

/// Deserialize a single id from a number or a string.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdValue::deserialize(deserializer).map(IdValue::into_string)
}

/// Deserialize a list of ids, each a number or a string.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<IdValue>::deserialize(deserializer)?;
    Ok(values.into_iter().map(IdValue::into_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(deserialize_with = "deserialize_id_list")]
        list: Vec<String>,
    }

    #[test]
    fn test_mixed_ids() {
        let sample: Sample =
            serde_json::from_str(r#"{"id": 123456, "list": [100, "200", " 300 "]}"#).unwrap();
        assert_eq!(sample.id, "123456");
        assert_eq!(sample.list, vec!["100", "200", "300"]);
    }

    #[test]
    fn test_rejects_non_id() {
        let result = serde_json::from_str::<Sample>(r#"{"id": true, "list": []}"#);
        assert!(result.is_err());
    }
}
