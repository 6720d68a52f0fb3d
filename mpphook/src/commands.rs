// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use mpptrans::adapters::diagnostics::TracingDiagnostics;
use mpptrans::adapters::inventory::{EmptyInventory, FileInventory};
use mpptrans::adapters::snapshot::{Change, SnapshotEntity, SnapshotEvent};
use mpptrans::app::errors::{AppError, AppResult};
use mpptrans::app::ports::{EntityPort, InventoryPort};
use mpptrans::app::resources::{
    HOST, MPPARCH, MPPDEPTH, MPPHOST, MPPLABELS, MPPMEM, MPPNPPN, MPPWIDTH, VNODE,
};
use mpptrans::app::services::nodes::NodeList;
use mpptrans::app::services::{legacy, select};
use mpptrans::app::types::{EventKind, Verdict};
use mpptrans::app::usecases::UseCases;

use crate::args::{Cmd, SelectArgs};
use crate::config::Config;

pub const EXIT_ACCEPT: u8 = 0;
pub const EXIT_REJECT: u8 = 1;

const MAX_EXPANDED_IDS: u64 = 1_000_000;

#[derive(Debug)]
pub enum CommandResult {
    Translate {
        event: EventKind,
        verdict: Verdict,
        changes: Vec<Change>,
        entity: Option<SnapshotEntity>,
    },
    Select {
        select: String,
        place: Option<String>,
    },
    Expand {
        tokens: Vec<String>,
    },
}

impl CommandResult {
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandResult::Translate { verdict, .. } if !verdict.is_accept() => EXIT_REJECT,
            _ => EXIT_ACCEPT,
        }
    }
}

pub fn dispatch(cmd: &Cmd, config: &Config) -> AppResult<CommandResult> {
    match cmd {
        Cmd::Translate(args) => translate(&args.event, config),
        Cmd::Select(args) => select_only(args),
        Cmd::Expand(args) => expand(&args.mppnodes),
    }
}

fn translate(event: &Path, config: &Config) -> AppResult<CommandResult> {
    let raw = read_event(event)?;
    let (kind, mut entity) = SnapshotEvent::from_json(&raw)?.into_parts();

    let inventory: Arc<dyn InventoryPort> = match &config.inventory_path {
        Some(path) => Arc::new(FileInventory::new(path.clone(), config.inventory_format)),
        None => Arc::new(EmptyInventory),
    };
    let usecases = UseCases::new(
        inventory,
        Arc::new(TracingDiagnostics::new()),
        config.match_keys.clone(),
    );

    let verdict = usecases.handle_event(
        kind,
        entity.as_mut().map(|entity| entity as &mut dyn EntityPort),
    )?;
    let changes = entity
        .as_ref()
        .map(|entity| entity.changes().to_vec())
        .unwrap_or_default();
    Ok(CommandResult::Translate {
        event: kind,
        verdict,
        changes,
        entity,
    })
}

fn read_event(path: &Path) -> AppResult<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| AppError::local(format!("failed to read event from stdin: {err}")))?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).map_err(|err| {
        let error = if err.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found("event snapshot not found")
        } else {
            AppError::local(format!("failed to read event snapshot: {err}"))
        };
        error.with_context(path.display().to_string())
    })
}

fn select_only(args: &SelectArgs) -> AppResult<CommandResult> {
    let mut entity = SnapshotEntity::new(None);
    let counts = [
        (MPPWIDTH, args.mppwidth),
        (MPPDEPTH, args.mppdepth),
        (MPPNPPN, args.mppnppn),
    ];
    for (name, value) in counts {
        if let Some(value) = value {
            entity.insert_resource(name, &value.to_string());
        }
    }
    let texts = [
        (MPPARCH, &args.mpparch),
        (MPPHOST, &args.mpphost),
        (MPPMEM, &args.mppmem),
        (MPPLABELS, &args.mpplabels),
        (VNODE, &args.vnode),
        (HOST, &args.host),
    ];
    for (name, value) in texts {
        if let Some(value) = value {
            entity.insert_resource(name, value);
        }
    }

    let request = legacy::read_legacy_request(&entity)
        .map_err(|err| AppError::invalid_argument(err.to_string()))?;
    if !request.has_legacy() {
        return Err(AppError::invalid_argument(
            "no mpp resources given; nothing to translate",
        ));
    }
    let translation = select::build(&request);
    Ok(CommandResult::Select {
        select: translation.select.to_string(),
        place: translation.place.map(|place| place.to_string()),
    })
}

fn expand(expr: &str) -> AppResult<CommandResult> {
    let list = NodeList::parse(expr)
        .map_err(|err| AppError::invalid_argument(err.to_string()).with_context(expr))?;
    let count = list.id_count();
    if count > MAX_EXPANDED_IDS {
        return Err(AppError::invalid_argument(format!(
            "expression expands to {count} node ids; at most {MAX_EXPANDED_IDS} can be listed"
        ))
        .with_context(expr));
    }
    Ok(CommandResult::Expand {
        tokens: list.ids().collect(),
    })
}
