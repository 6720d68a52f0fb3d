// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;

use crate::app::errors::{AppResult, TranslateError};
use crate::app::ports::{DiagnosticsPort, EntityPort, InventoryPort, Severity};
use crate::app::resources::{PLACE, SELECT};
use crate::app::services::guard::{self, Decision};
use crate::app::services::nodes::{self, NodeList};
use crate::app::services::{legacy, select};
use crate::app::types::{EventKind, LegacyRequest, MatchKeys, Verdict};

#[derive(Clone)]
pub struct UseCases {
    pub(crate) inventory: Arc<dyn InventoryPort>,
    pub(crate) diagnostics: Arc<dyn DiagnosticsPort>,
    pub(crate) keys: MatchKeys,
}

impl UseCases {
    pub fn new(
        inventory: Arc<dyn InventoryPort>,
        diagnostics: Arc<dyn DiagnosticsPort>,
        keys: MatchKeys,
    ) -> Self {
        Self {
            inventory,
            diagnostics,
            keys,
        }
    }

    /// Run the translation for one scheduler event.
    ///
    /// Writes go to `entity` as they are decided: `select`, pin clears,
    /// `place`, then `node_set`. A reject raised while resolving `mppnodes`
    /// leaves the earlier writes in place.
    pub fn handle_event(
        &self,
        kind: EventKind,
        entity: Option<&mut dyn EntityPort>,
    ) -> AppResult<Verdict> {
        let _span = tracing::debug_span!("translate_mpp", event = kind.as_str()).entered();
        if kind == EventKind::Other {
            tracing::debug!("event not handled; accepting");
            return Ok(Verdict::Accept);
        }
        let Some(entity) = entity else {
            return Ok(reject(TranslateError::MissingEntity));
        };
        match self.translate(entity) {
            Ok(()) => Ok(Verdict::Accept),
            Err(Step::Reject(err)) => Ok(reject(err)),
            Err(Step::Fail(err)) => Err(err),
        }
    }

    fn translate(&self, entity: &mut dyn EntityPort) -> Result<(), Step> {
        let request = legacy::read_legacy_request(entity)?;
        let reprocessing = entity.existing_ref().is_some_and(|r| !r.trim().is_empty());

        match guard::decide(
            &request,
            entity.resource(SELECT),
            entity.resource(PLACE),
            reprocessing,
        ) {
            Decision::NoOp => {
                tracing::debug!("no mpp resources requested");
                return Ok(());
            }
            Decision::Reject(err) => return Err(err.into()),
            Decision::Proceed => {}
        }

        let translation = select::build(&request);
        for pin in &translation.consumed_pins {
            entity.clear_resource(pin);
        }
        let select = translation.select.to_string();
        tracing::debug!(select = %select, reprocessing, "translated mpp resources");
        entity.set_resource(SELECT, select);
        if let Some(place) = translation.place {
            entity.set_resource(PLACE, place.to_string());
        }

        if request.node_list.is_some() {
            self.apply_node_set(&request, entity)?;
        }
        Ok(())
    }

    fn apply_node_set(
        &self,
        request: &LegacyRequest,
        entity: &mut dyn EntityPort,
    ) -> Result<(), Step> {
        let Some(expr) = request.node_list.as_deref() else {
            return Ok(());
        };
        self.diagnostics.record(
            Severity::Debug,
            &format!("translate mpp:  requested mppnodes are = '{expr}'"),
        );

        // A malformed range is reported before the inventory is consulted.
        let list = match NodeList::parse(expr) {
            Ok(list) => list,
            Err(err) => {
                self.log_resolve_error(&err);
                return Err(err.into());
            }
        };

        let inventory = self.inventory.vnodes().map_err(Step::Fail)?;
        let resolution = match nodes::resolve(&list, request.host.as_deref(), &inventory, &self.keys)
        {
            Ok(resolution) => resolution,
            Err(err) => {
                self.log_resolve_error(&err);
                return Err(err.into());
            }
        };

        if !resolution.unmatched.is_empty() {
            self.diagnostics.record(
                Severity::Debug,
                &format!(
                    "translate mpp: could not find matching vnodes for these given mppnodes {:?}",
                    resolution.unmatched
                ),
            );
        }
        let node_set = resolution.node_set();
        self.diagnostics.record(
            Severity::Debug,
            &format!("translate mpp:  vnode name list= '{node_set}'"),
        );
        entity.set_node_set(node_set);
        Ok(())
    }

    fn log_resolve_error(&self, err: &TranslateError) {
        let message = match err {
            TranslateError::BadRange {
                token,
                lower,
                upper,
            } => format!(
                "translate mpp: ERROR: bad range '{token}', the first number ({lower}) must be less than the second number ({upper})"
            ),
            TranslateError::NoMatch { node_list } => format!(
                "translate mpp: ERROR: could not find matching vnodes for the given mppnodes {node_list}"
            ),
            other => format!("translate mpp: ERROR: {other}"),
        };
        self.diagnostics.record(Severity::Error, &message);
    }
}

enum Step {
    Reject(TranslateError),
    Fail(crate::app::errors::AppError),
}

impl From<TranslateError> for Step {
    fn from(err: TranslateError) -> Self {
        Step::Reject(err)
    }
}

fn reject(err: TranslateError) -> Verdict {
    tracing::info!(reason = %err, "rejecting event");
    Verdict::Reject {
        reason: err.reject_reason(),
    }
}
