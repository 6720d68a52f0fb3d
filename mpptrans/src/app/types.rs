// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Scheduler event that invoked the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A job is being queued (new submission or `qmove`).
    QueueJob,
    /// A reservation is being submitted.
    ResvSub,
    /// Any other event; the hook accepts it untouched.
    #[serde(other)]
    Other,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::QueueJob => "queuejob",
            EventKind::ResvSub => "resvsub",
            EventKind::Other => "other",
        }
    }
}

/// Whether a value came from the user or was filled in by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    UserSupplied,
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    pub fn or_default(value: Option<T>, default: T) -> Self {
        match value {
            Some(value) => Self {
                value,
                provenance: Provenance::UserSupplied,
            },
            None => Self {
                value: default,
                provenance: Provenance::Defaulted,
            },
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.provenance == Provenance::Defaulted
    }
}

/// Snapshot of the legacy resources on a job or reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyRequest {
    pub width: Option<NonZeroU32>,
    pub depth: Option<NonZeroU32>,
    pub units_per_node: Option<NonZeroU32>,
    pub arch: Option<String>,
    pub host: Option<String>,
    pub mem: Option<String>,
    pub labels: Vec<String>,
    pub node_list: Option<String>,
    pub pinned_vnode: Option<String>,
    pub pinned_host: Option<String>,
}

impl LegacyRequest {
    /// True when at least one `mpp*` resource is set. Pins alone do not count.
    pub fn has_legacy(&self) -> bool {
        self.width.is_some()
            || self.depth.is_some()
            || self.units_per_node.is_some()
            || self.arch.is_some()
            || self.host.is_some()
            || self.mem.is_some()
            || !self.labels.is_empty()
            || self.node_list.is_some()
    }
}

/// One `name=value` term inside a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub value: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A chunk group: an optional chunk count followed by the per-chunk resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkGroup {
    pub count: Option<u64>,
    pub resources: Vec<Resource>,
}

impl ChunkGroup {
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.resources.push(Resource::new(name, value));
    }
}

impl fmt::Display for ChunkGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if let Some(count) = self.count {
            write!(f, "{count}")?;
            first = false;
        }
        for res in &self.resources {
            if !first {
                f.write_str(":")?;
            }
            write!(f, "{res}")?;
            first = false;
        }
        Ok(())
    }
}

/// Structured `select` value. Rendered to the wire form only via `Display`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectSpec {
    pub chunks: Vec<ChunkGroup>,
}

impl fmt::Display for SelectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, chunk) in self.chunks.iter().enumerate() {
            if idx > 0 {
                f.write_str("+")?;
            }
            write!(f, "{chunk}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Scatter,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Scatter => "scatter",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the select builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub select: SelectSpec,
    pub place: Option<Placement>,
    pub units_per_node: Sourced<NonZeroU32>,
    pub depth: Sourced<NonZeroU32>,
    /// Pin resources folded into the leading chunk; cleared from the entity.
    pub consumed_pins: Vec<&'static str>,
}

/// A vnode as reported by the server inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vnode {
    pub name: String,
    pub resources_available: BTreeMap<String, String>,
}

impl Vnode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources_available: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.resources_available.insert(key.into(), value.into());
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.resources_available.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.resources_available.get(key).map(|s| s.as_str())
    }
}

/// Vnode attributes consulted while resolving `mppnodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKeys {
    pub nid: String,
    pub host: String,
}

impl Default for MatchKeys {
    fn default() -> Self {
        Self {
            nid: crate::app::resources::DEFAULT_NID_ATTRIBUTE.to_string(),
            host: crate::app::resources::DEFAULT_HOST_ATTRIBUTE.to_string(),
        }
    }
}

/// Outcome handed back to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject { reason: String },
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}
