// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::errors::TranslateError;
use crate::app::types::LegacyRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No `mpp*` resource set; accept without touching the entity.
    NoOp,
    Proceed,
    Reject(TranslateError),
}

/// Decide whether a request needs translating.
///
/// A fresh entity carrying both `mpp*` resources and `select`/`place` is
/// rejected. When `reprocessing` is set the entity went through this hook
/// before, so the `select`/`place` it carries are ours and get overwritten.
pub fn decide(
    legacy: &LegacyRequest,
    existing_select: Option<&str>,
    existing_place: Option<&str>,
    reprocessing: bool,
) -> Decision {
    if !legacy.has_legacy() {
        return Decision::NoOp;
    }
    let has_modern = is_set(existing_select) || is_set(existing_place);
    if has_modern && !reprocessing {
        return Decision::Reject(TranslateError::Conflict);
    }
    Decision::Proceed
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
