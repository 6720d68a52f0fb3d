// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adapters::value::ResourceValue;
use crate::app::errors::{AppError, AppResult};
use crate::app::ports::EntityPort;
use crate::app::types::EventKind;

/// A write made through [`EntityPort`], in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    SetResource { name: String, value: String },
    ClearResource { name: String },
    SetNodeSet { value: String },
}

/// In-memory job or reservation built from a snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotEntity {
    #[serde(rename = "existing_ref", skip_serializing_if = "Option::is_none")]
    existing_ref: Option<String>,
    #[serde(rename = "Resource_List")]
    resources: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_set: Option<String>,
    #[serde(skip)]
    changes: Vec<Change>,
}

impl SnapshotEntity {
    pub fn new(existing_ref: Option<String>) -> Self {
        Self {
            existing_ref,
            ..Default::default()
        }
    }

    /// Seed a resource without recording a change.
    pub fn insert_resource(&mut self, name: &str, value: &str) {
        self.resources.insert(name.to_string(), value.to_string());
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }
}

impl EntityPort for SnapshotEntity {
    fn existing_ref(&self) -> Option<&str> {
        self.existing_ref.as_deref()
    }

    fn resource(&self, name: &str) -> Option<&str> {
        self.resources.get(name).map(|s| s.as_str())
    }

    fn set_resource(&mut self, name: &str, value: String) {
        self.changes.push(Change::SetResource {
            name: name.to_string(),
            value: value.clone(),
        });
        self.resources.insert(name.to_string(), value);
    }

    fn clear_resource(&mut self, name: &str) {
        self.changes.push(Change::ClearResource {
            name: name.to_string(),
        });
        self.resources.remove(name);
    }

    fn node_set(&self) -> Option<&str> {
        self.node_set.as_deref()
    }

    fn set_node_set(&mut self, value: String) {
        self.changes.push(Change::SetNodeSet {
            value: value.clone(),
        });
        self.node_set = Some(value);
    }
}

/// Scheduler event as captured by the host, e.g.
///
/// ```json
/// {"type": "queuejob", "job": {"id": null, "Resource_List": {"mppwidth": 16}}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub job: Option<JobRecord>,
    #[serde(default)]
    pub resv: Option<ResvRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "Resource_List", alias = "resource_list")]
    pub resource_list: BTreeMap<String, ResourceValue>,
    #[serde(default)]
    pub node_set: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResvRecord {
    #[serde(default)]
    pub qmove: Option<String>,
    #[serde(default, rename = "Resource_List", alias = "resource_list")]
    pub resource_list: BTreeMap<String, ResourceValue>,
}

impl SnapshotEvent {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|err| AppError::snapshot(format!("invalid event snapshot: {err}")))
    }

    /// Split into the event kind and the entity it concerns, if any.
    ///
    /// The existing reference is the job id for `queuejob` and the
    /// reservation's `qmove` for `resvsub`.
    pub fn into_parts(self) -> (EventKind, Option<SnapshotEntity>) {
        let entity = match self.kind {
            EventKind::QueueJob => self.job.map(|job| job_entity(job, true)),
            EventKind::ResvSub => self.resv.map(|resv| resv_entity(resv, true)),
            EventKind::Other => match (self.job, self.resv) {
                (Some(job), _) => Some(job_entity(job, false)),
                (None, Some(resv)) => Some(resv_entity(resv, false)),
                (None, None) => None,
            },
        };
        (self.kind, entity)
    }
}

fn job_entity(job: JobRecord, keep_ref: bool) -> SnapshotEntity {
    let mut entity = SnapshotEntity::new(job.id.filter(|_| keep_ref));
    fill(&mut entity, job.resource_list);
    entity.node_set = job.node_set;
    entity
}

fn resv_entity(resv: ResvRecord, keep_ref: bool) -> SnapshotEntity {
    let mut entity = SnapshotEntity::new(resv.qmove.filter(|_| keep_ref));
    fill(&mut entity, resv.resource_list);
    entity
}

fn fill(entity: &mut SnapshotEntity, resources: BTreeMap<String, ResourceValue>) {
    for (name, value) in resources {
        if let Some(text) = value.into_text() {
            entity.resources.insert(name, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_queuejob_with_typed_values() {
        let raw = r#"{
            "type": "queuejob",
            "job": {
                "id": null,
                "Resource_List": {"mppwidth": 16, "mpparch": "XT", "select": null}
            }
        }"#;
        let (kind, entity) = SnapshotEvent::from_json(raw).unwrap().into_parts();
        assert_eq!(kind, EventKind::QueueJob);
        let entity = entity.unwrap();
        assert_eq!(entity.existing_ref(), None);
        assert_eq!(entity.resource("mppwidth"), Some("16"));
        assert_eq!(entity.resource("mpparch"), Some("XT"));
        assert_eq!(entity.resource("select"), None);
        assert!(entity.changes().is_empty());
    }

    #[test]
    fn reservation_uses_qmove_as_existing_ref() {
        let raw = r#"{"type": "resvsub", "resv": {"qmove": "R12.server", "resource_list": {}}}"#;
        let (kind, entity) = SnapshotEvent::from_json(raw).unwrap().into_parts();
        assert_eq!(kind, EventKind::ResvSub);
        assert_eq!(entity.unwrap().existing_ref(), Some("R12.server"));
    }

    #[test]
    fn queuejob_without_job_has_no_entity() {
        let raw = r#"{"type": "queuejob", "resv": {"qmove": "R1"}}"#;
        let (_, entity) = SnapshotEvent::from_json(raw).unwrap().into_parts();
        assert!(entity.is_none());
    }

    #[test]
    fn unknown_event_type_maps_to_other() {
        let raw = r#"{"type": "runjob", "job": {"id": "3.server"}}"#;
        let (kind, entity) = SnapshotEvent::from_json(raw).unwrap().into_parts();
        assert_eq!(kind, EventKind::Other);
        assert_eq!(entity.unwrap().existing_ref(), None);
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let err = SnapshotEvent::from_json("{\"job\": {}}").unwrap_err();
        assert_eq!(err.code(), crate::app::errors::codes::SNAPSHOT_ERROR);
    }

    #[test]
    fn writes_are_logged_in_order() {
        let mut entity = SnapshotEntity::new(None);
        entity.insert_resource("vnode", "n1");
        entity.clear_resource("vnode");
        entity.set_resource("select", "1:ncpus=1".to_string());
        entity.set_node_set("n1,n2".to_string());
        assert_eq!(
            entity.changes(),
            &[
                Change::ClearResource {
                    name: "vnode".to_string()
                },
                Change::SetResource {
                    name: "select".to_string(),
                    value: "1:ncpus=1".to_string()
                },
                Change::SetNodeSet {
                    value: "n1,n2".to_string()
                },
            ]
        );
        assert_eq!(entity.resource("vnode"), None);
        assert_eq!(entity.node_set(), Some("n1,n2"));
    }
}
