// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adapters::value::ResourceValue;
use crate::app::types::Vnode;

#[derive(Debug, Deserialize)]
struct ListedVnode {
    name: String,
    #[serde(default)]
    resources_available: BTreeMap<String, ResourceValue>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeAttributes {
    #[serde(default)]
    resources_available: BTreeMap<String, ResourceValue>,
}

/// Parse a JSON vnode listing, keeping listing order.
///
/// Two shapes are accepted: an array of `{"name", "resources_available"}`
/// and the object printed by `pbsnodes -av -F json`, whose `nodes` map is
/// keyed by vnode name. Attribute values may be strings, numbers or flags.
pub fn parse_json_listing(raw: &str) -> Result<Vec<Vnode>, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(mut listing) => {
            let nodes = match listing.remove("nodes") {
                Some(Value::Object(nodes)) => nodes,
                Some(other) => return Err(invalid(&other, "an object of vnodes")),
                None => Map::new(),
            };
            nodes
                .into_iter()
                .map(|(name, attributes)| {
                    let attributes: NodeAttributes = serde_json::from_value(attributes)?;
                    Ok(vnode(name, attributes.resources_available))
                })
                .collect()
        }
        other => {
            let listed: Vec<ListedVnode> = serde_json::from_value(other)?;
            Ok(listed
                .into_iter()
                .map(|entry| vnode(entry.name, entry.resources_available))
                .collect())
        }
    }
}

fn vnode(name: String, resources: BTreeMap<String, ResourceValue>) -> Vnode {
    let mut vnode = Vnode::new(name);
    for (key, value) in resources {
        if let Some(text) = value.into_text() {
            vnode.resources_available.insert(key, text);
        }
    }
    vnode
}

fn invalid(value: &Value, expected: &str) -> serde_json::Error {
    use serde::de::Error;
    serde_json::Error::custom(format!("invalid `nodes` value {value}, expected {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_attributes_are_kept_as_text() {
        let raw = r#"[
            {"name": "nid5", "resources_available": {"PBScraynid": 5, "ncpus": 24, "vntype": "cray_compute"}}
        ]"#;
        let vnodes = parse_json_listing(raw).unwrap();
        assert_eq!(vnodes[0].get("PBScraynid"), Some("5"));
        assert_eq!(vnodes[0].get("ncpus"), Some("24"));
        assert_eq!(vnodes[0].get("vntype"), Some("cray_compute"));
    }

    #[test]
    fn null_attributes_are_dropped() {
        let raw = r#"[{"name": "n1", "resources_available": {"PBScrayhost": null}}]"#;
        let vnodes = parse_json_listing(raw).unwrap();
        assert!(!vnodes[0].has("PBScrayhost"));
    }

    #[test]
    fn pbsnodes_object_keeps_listing_order() {
        let raw = r#"{
            "timestamp": 1700000000,
            "pbs_version": "2022.1",
            "nodes": {
                "nid00012": {
                    "Mom": "nid00012",
                    "state": "free",
                    "resources_available": {"PBScraynid": 12, "PBScrayhost": "crayXT", "ncpus": 24}
                },
                "login1": {"Mom": "login1"},
                "nid00003": {"resources_available": {"PBScraynid": "3"}}
            }
        }"#;
        let vnodes = parse_json_listing(raw).unwrap();
        let names: Vec<&str> = vnodes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["nid00012", "login1", "nid00003"]);
        assert_eq!(vnodes[0].get("PBScraynid"), Some("12"));
        assert!(!vnodes[0].has("state"));
        assert!(vnodes[1].resources_available.is_empty());
    }

    #[test]
    fn malformed_nodes_value_is_an_error() {
        let err = parse_json_listing(r#"{"nodes": [1, 2]}"#).unwrap_err();
        assert!(err.to_string().contains("`nodes`"));
    }
}
