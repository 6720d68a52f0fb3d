// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::HashMap;

use crate::app::errors::TranslateError;
use crate::app::types::{MatchKeys, Vnode};

/// Vnodes matched for an `mppnodes` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Vnode names in requested-token order, then inventory order.
    pub matched: Vec<String>,
    /// Requested node ids that matched no vnode. Consecutive unmatched ids of
    /// one range are collapsed to `lower-upper`.
    pub unmatched: Vec<String>,
}

impl Resolution {
    pub fn node_set(&self) -> String {
        self.matched.join(",")
    }
}

/// One comma-separated item of an `mppnodes` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeItem {
    Id(String),
    /// Inclusive, `lower < upper`.
    Range { lower: i64, upper: i64 },
}

/// A parsed `mppnodes` expression. Ranges stay as bounds until iterated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeList {
    expr: String,
    items: Vec<NodeItem>,
}

impl NodeList {
    /// Parse an expression such as `5-7,9`.
    ///
    /// Tokens are trimmed and empty ones skipped. A token holding `-` is an
    /// inclusive range split on its first `-`; a range whose upper bound is
    /// not above its lower bound fails the whole expression.
    pub fn parse(expr: &str) -> Result<Self, TranslateError> {
        let items = expr
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            expr: expr.to_string(),
            items,
        })
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn items(&self) -> &[NodeItem] {
        &self.items
    }

    /// Number of node ids the expression expands to, saturating.
    pub fn id_count(&self) -> u64 {
        self.items.iter().fold(0u64, |total, item| {
            let span = match item {
                NodeItem::Id(_) => 1,
                NodeItem::Range { lower, upper } => upper.abs_diff(*lower).saturating_add(1),
            };
            total.saturating_add(span)
        })
    }

    /// Expanded node ids in expression order, produced lazily.
    pub fn ids(&self) -> impl Iterator<Item = String> + '_ {
        self.items.iter().flat_map(|item| {
            let (single, range) = match item {
                NodeItem::Id(id) => (Some(id.clone()), None),
                NodeItem::Range { lower, upper } => (None, Some(*lower..=*upper)),
            };
            single
                .into_iter()
                .chain(range.into_iter().flatten().map(|n| n.to_string()))
        })
    }
}

fn parse_item(token: &str) -> Result<NodeItem, TranslateError> {
    let Some((lower, upper)) = token.split_once('-') else {
        return Ok(NodeItem::Id(token.to_string()));
    };
    let bound = |raw: &str| {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| TranslateError::InvalidRangeBound {
                token: token.to_string(),
            })
    };
    let lower = bound(lower)?;
    let upper = bound(upper)?;
    if upper <= lower {
        return Err(TranslateError::BadRange {
            token: token.to_string(),
            lower,
            upper,
        });
    }
    Ok(NodeItem::Range { lower, upper })
}

/// Inventory lookup built once per resolution.
struct NidIndex<'a> {
    /// nid -> vnodes carrying it, in inventory order
    by_nid: HashMap<&'a str, Vec<&'a Vnode>>,
    /// nids in plain decimal form, ascending; ranges are answered from here
    numeric: Vec<(i64, &'a str)>,
    host_filter: Option<&'a str>,
    host_key: &'a str,
}

impl<'a> NidIndex<'a> {
    fn new(inventory: &'a [Vnode], keys: &'a MatchKeys, host_filter: Option<&'a str>) -> Self {
        let mut by_nid: HashMap<&str, Vec<&Vnode>> = HashMap::new();
        for vnode in inventory {
            if let Some(nid) = vnode.get(&keys.nid) {
                by_nid.entry(nid).or_default().push(vnode);
            }
        }
        let mut numeric: Vec<(i64, &str)> = by_nid
            .keys()
            .filter_map(|nid| {
                nid.parse::<i64>()
                    .ok()
                    .filter(|value| value.to_string() == *nid)
                    .map(|value| (value, *nid))
            })
            .collect();
        numeric.sort_unstable();
        Self {
            by_nid,
            numeric,
            host_filter,
            host_key: &keys.host,
        }
    }

    /// Push the names of vnodes carrying `nid`; true when any matched.
    fn push_matches(&self, nid: &str, matched: &mut Vec<String>) -> bool {
        let before = matched.len();
        for vnode in self.by_nid.get(nid).into_iter().flatten() {
            let host_ok = match self.host_filter {
                Some(host) => vnode.get(self.host_key) == Some(host),
                None => true,
            };
            if host_ok {
                matched.push(vnode.name.clone());
            }
        }
        matched.len() > before
    }

    /// Match every id of `lower..=upper` without walking ids no vnode carries.
    fn push_range(&self, lower: i64, upper: i64, resolution: &mut Resolution) {
        let start = self.numeric.partition_point(|(value, _)| *value < lower);
        // first id of the range not yet accounted for; None past i64::MAX
        let mut next = Some(lower);
        for (value, nid) in self.numeric[start..]
            .iter()
            .take_while(|(value, _)| *value <= upper)
        {
            if !self.push_matches(nid, &mut resolution.matched) {
                continue;
            }
            if let Some(from) = next {
                if from < *value {
                    push_gap(&mut resolution.unmatched, from, value - 1);
                }
            }
            next = value.checked_add(1);
        }
        if let Some(from) = next {
            if from <= upper {
                push_gap(&mut resolution.unmatched, from, upper);
            }
        }
    }
}

fn push_gap(unmatched: &mut Vec<String>, from: i64, to: i64) {
    if from == to {
        unmatched.push(from.to_string());
    } else {
        unmatched.push(format!("{from}-{to}"));
    }
}

/// Resolve a parsed `mppnodes` expression against the vnode inventory.
///
/// A vnode matches a requested id when its `keys.nid` attribute equals the id
/// and, with `host_filter` set, its `keys.host` attribute equals the filter.
/// One id may match several vnodes and the same vnode may be listed more than
/// once. Fails when nothing at all matched.
pub fn resolve(
    list: &NodeList,
    host_filter: Option<&str>,
    inventory: &[Vnode],
    keys: &MatchKeys,
) -> Result<Resolution, TranslateError> {
    let index = NidIndex::new(inventory, keys, host_filter);

    let mut resolution = Resolution::default();
    for item in list.items() {
        match item {
            NodeItem::Id(id) => {
                if !index.push_matches(id, &mut resolution.matched) {
                    resolution.unmatched.push(id.clone());
                }
            }
            NodeItem::Range { lower, upper } => index.push_range(*lower, *upper, &mut resolution),
        }
    }

    if resolution.matched.is_empty() {
        return Err(TranslateError::NoMatch {
            node_list: list.expr().to_string(),
        });
    }
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, nid: &str) -> Vnode {
        Vnode::new(name).with("PBScraynid", nid)
    }

    fn node_on(name: &str, nid: &str, host: &str) -> Vnode {
        node(name, nid).with("PBScrayhost", host)
    }

    fn expand(expr: &str) -> Result<Vec<String>, TranslateError> {
        Ok(NodeList::parse(expr)?.ids().collect())
    }

    fn resolve_expr(
        expr: &str,
        host_filter: Option<&str>,
        inventory: &[Vnode],
    ) -> Result<Resolution, TranslateError> {
        resolve(
            &NodeList::parse(expr)?,
            host_filter,
            inventory,
            &MatchKeys::default(),
        )
    }

    #[test]
    fn expands_ranges_in_place() {
        assert_eq!(expand("5-7,9").unwrap(), vec!["5", "6", "7", "9"]);
        assert_eq!(expand("12,3-4,1").unwrap(), vec!["12", "3", "4", "1"]);
    }

    #[test]
    fn blank_tokens_are_skipped() {
        assert_eq!(expand(" 5 ,, 7 ").unwrap(), vec!["5", "7"]);
    }

    #[test]
    fn reversed_range_fails() {
        assert_eq!(
            expand("1,7-5").unwrap_err(),
            TranslateError::BadRange {
                token: "7-5".to_string(),
                lower: 7,
                upper: 5,
            }
        );
    }

    #[test]
    fn single_element_range_fails() {
        assert!(matches!(
            expand("4-4"),
            Err(TranslateError::BadRange { lower: 4, upper: 4, .. })
        ));
    }

    #[test]
    fn non_numeric_range_fails() {
        assert_eq!(
            expand("a-3").unwrap_err(),
            TranslateError::InvalidRangeBound {
                token: "a-3".to_string()
            }
        );
        assert!(matches!(
            expand("1-2-3"),
            Err(TranslateError::InvalidRangeBound { .. })
        ));
    }

    #[test]
    fn huge_range_parses_without_expanding() {
        let list = NodeList::parse("1-4000000000,9").unwrap();
        assert_eq!(list.id_count(), 4_000_000_001);
        assert_eq!(
            list.items(),
            &[
                NodeItem::Range {
                    lower: 1,
                    upper: 4_000_000_000
                },
                NodeItem::Id("9".to_string()),
            ]
        );
        assert_eq!(
            list.ids().take(3).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );
    }

    #[test]
    fn id_count_saturates() {
        let max = i64::MAX;
        let list = NodeList::parse(&format!("0-{max},0-{max},0-{max}")).unwrap();
        assert_eq!(list.id_count(), u64::MAX);
    }

    #[test]
    fn bad_range_fails_before_matching() {
        let inventory = vec![node("n7", "7")];
        assert!(matches!(
            resolve_expr("7,7-5", None, &inventory),
            Err(TranslateError::BadRange { .. })
        ));
    }

    #[test]
    fn preserves_requested_order() {
        let inventory = vec![node("n1", "1"), node("n2", "2"), node("n3", "3")];
        let res = resolve_expr("3,1,2", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["n3", "n1", "n2"]);
        assert_eq!(res.node_set(), "n3,n1,n2");
        assert!(res.unmatched.is_empty());
    }

    #[test]
    fn range_matches_in_ascending_id_order() {
        let inventory = vec![node("n9", "9"), node("n7", "7"), node("n8", "8")];
        let res = resolve_expr("7-9,7", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["n7", "n8", "n9", "n7"]);
    }

    #[test]
    fn one_id_can_match_several_vnodes() {
        let inventory = vec![node("a0", "5"), node("b", "6"), node("a1", "5")];
        let res = resolve_expr("5,6,5", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["a0", "a1", "b", "a0", "a1"]);
        let res = resolve_expr("5-6", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["a0", "a1", "b"]);
    }

    #[test]
    fn partial_match_reports_unmatched() {
        let inventory = vec![node("n5", "5"), node("n7", "7")];
        let res = resolve_expr("5-8", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["n5", "n7"]);
        assert_eq!(res.unmatched, vec!["6", "8"]);
    }

    #[test]
    fn huge_range_collapses_unmatched_gaps() {
        let inventory = vec![node("n5", "5"), node("n7", "7")];
        let res = resolve_expr("1-4000000000,x", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["n5", "n7"]);
        assert_eq!(res.unmatched, vec!["1-4", "6", "8-4000000000", "x"]);
    }

    #[test]
    fn huge_range_without_hits_is_no_match() {
        let inventory = vec![node("n0", "0"), Vnode::new("bare")];
        assert_eq!(
            resolve_expr("1-4000000000", None, &inventory).unwrap_err(),
            TranslateError::NoMatch {
                node_list: "1-4000000000".to_string()
            }
        );
    }

    #[test]
    fn range_reaching_i64_max() {
        let inventory = vec![node("top", &i64::MAX.to_string())];
        let res = resolve_expr(&format!("{}-{}", i64::MAX - 2, i64::MAX), None, &inventory)
            .unwrap();
        assert_eq!(res.matched, vec!["top"]);
        assert_eq!(
            res.unmatched,
            vec![format!("{}-{}", i64::MAX - 2, i64::MAX - 1)]
        );
    }

    #[test]
    fn ranges_only_match_plain_decimal_ids() {
        let inventory = vec![node("padded", "05"), node("plain", "5")];
        let res = resolve_expr("4-6", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["plain"]);
        let res = resolve_expr("05", None, &inventory).unwrap();
        assert_eq!(res.matched, vec!["padded"]);
    }

    #[test]
    fn host_filter_requires_matching_host() {
        let inventory = vec![
            node_on("x5", "5", "crayA"),
            node_on("y5", "5", "crayB"),
            node("z5", "5"),
        ];
        let res = resolve_expr("5", Some("crayB"), &inventory).unwrap();
        assert_eq!(res.matched, vec!["y5"]);
        let res = resolve_expr("4-6", Some("crayB"), &inventory).unwrap();
        assert_eq!(res.matched, vec!["y5"]);
        assert_eq!(res.unmatched, vec!["4", "6"]);
    }

    #[test]
    fn nothing_matched_is_an_error() {
        let inventory = vec![node("n1", "1"), Vnode::new("bare")];
        assert_eq!(
            resolve_expr("40-42", None, &inventory).unwrap_err(),
            TranslateError::NoMatch {
                node_list: "40-42".to_string()
            }
        );
    }

    #[test]
    fn custom_match_keys() {
        let keys = MatchKeys {
            nid: "nid".to_string(),
            host: "cluster".to_string(),
        };
        let inventory = vec![
            Vnode::new("c1").with("nid", "1").with("cluster", "east"),
            Vnode::new("c2").with("PBScraynid", "1"),
        ];
        let list = NodeList::parse("1").unwrap();
        let res = resolve(&list, Some("east"), &inventory, &keys).unwrap();
        assert_eq!(res.matched, vec!["c1"]);
    }
}
