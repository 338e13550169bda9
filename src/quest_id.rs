use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of an FTB quest.
///
/// Current chapter files store ids as 16-digit hex strings; older exports use
/// plain integers. Both are kept as text so they can be compared and used as
/// map keys the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct QuestId(String);

impl QuestId {
    pub fn new(id: impl Into<String>) -> Self {
        QuestId(id.into())
    }

    /// Read an id from a parsed SNBT value. Empty strings are not ids.
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) if !s.is_empty() => Some(QuestId(s.clone())),
            Value::Number(n) => Some(QuestId(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::QuestId;
    use serde_json::json;

    #[test]
    fn questid_from_hex_string() {
        let qid = QuestId::from_value(&json!("0F2B4C6D8E1A3C5E")).expect("id");
        assert_eq!(qid.as_str(), "0F2B4C6D8E1A3C5E");
        assert_eq!(qid.to_string(), "0F2B4C6D8E1A3C5E");
    }

    #[test]
    fn questid_from_legacy_number() {
        let qid = QuestId::from_value(&json!(1234)).expect("id");
        assert_eq!(qid, QuestId::new("1234"));
    }

    #[test]
    fn questid_rejects_empty_and_structures() {
        assert!(QuestId::from_value(&json!("")).is_none());
        assert!(QuestId::from_value(&json!(null)).is_none());
        assert!(QuestId::from_value(&json!({"id": "x"})).is_none());
        assert!(QuestId::from_value(&json!(["x"])).is_none());
    }
}
