// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use serde::Deserialize;

/// Attribute values arrive typed in JSON; the core stores them as PBS would
/// print them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Null(()),
}

impl ResourceValue {
    /// Text form of the value; `None` for JSON `null`.
    pub fn into_text(self) -> Option<String> {
        match self {
            ResourceValue::Text(v) => Some(v),
            ResourceValue::Integer(v) => Some(v.to_string()),
            ResourceValue::Float(v) => Some(v.to_string()),
            ResourceValue::Flag(true) => Some("True".to_string()),
            ResourceValue::Flag(false) => Some("False".to_string()),
            ResourceValue::Null(()) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn renders_each_json_type() {
        let raw = r#"{"a": "XT", "b": 24, "c": 1.5, "d": true, "e": false, "f": null}"#;
        let values: BTreeMap<String, ResourceValue> = serde_json::from_str(raw).unwrap();
        let text: BTreeMap<_, _> = values
            .into_iter()
            .map(|(k, v)| (k, v.into_text()))
            .collect();
        assert_eq!(text["a"].as_deref(), Some("XT"));
        assert_eq!(text["b"].as_deref(), Some("24"));
        assert_eq!(text["c"].as_deref(), Some("1.5"));
        assert_eq!(text["d"].as_deref(), Some("True"));
        assert_eq!(text["e"].as_deref(), Some("False"));
        assert_eq!(text["f"], None);
    }
}
