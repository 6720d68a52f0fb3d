// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::num::NonZeroU32;

use crate::app::errors::TranslateError;
use crate::app::ports::EntityPort;
use crate::app::resources::{
    HOST, MPPARCH, MPPDEPTH, MPPHOST, MPPLABELS, MPPMEM, MPPNODES, MPPNPPN, MPPWIDTH, VNODE,
};
use crate::app::types::LegacyRequest;

/// Read the legacy resources and pins off an entity.
///
/// Blank values count as unset. Counts must be positive integers.
pub fn read_legacy_request(entity: &dyn EntityPort) -> Result<LegacyRequest, TranslateError> {
    Ok(LegacyRequest {
        width: read_count(entity, MPPWIDTH)?,
        depth: read_count(entity, MPPDEPTH)?,
        units_per_node: read_count(entity, MPPNPPN)?,
        arch: read_text(entity, MPPARCH),
        host: read_text(entity, MPPHOST),
        mem: read_text(entity, MPPMEM),
        labels: read_text(entity, MPPLABELS)
            .map(|raw| parse_labels(&raw))
            .unwrap_or_default(),
        node_list: read_text(entity, MPPNODES),
        pinned_vnode: read_text(entity, VNODE),
        pinned_host: read_text(entity, HOST),
    })
}

pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_count(resource: &'static str, raw: &str) -> Result<NonZeroU32, TranslateError> {
    raw.trim()
        .parse::<NonZeroU32>()
        .map_err(|_| TranslateError::InvalidValue {
            resource,
            value: raw.to_string(),
        })
}

fn read_text(entity: &dyn EntityPort, name: &str) -> Option<String> {
    entity
        .resource(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn read_count(
    entity: &dyn EntityPort,
    resource: &'static str,
) -> Result<Option<NonZeroU32>, TranslateError> {
    match read_text(entity, resource) {
        Some(raw) => parse_count(resource, &raw).map(Some),
        None => Ok(None),
    }
}
