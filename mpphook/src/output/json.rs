// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use serde_json::{Value, json};

use mpptrans::app::errors::{AppError, AppResult};

use super::OutputPort;
use crate::commands::CommandResult;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputPort for JsonOutput {
    fn render(&self, result: &CommandResult) -> AppResult<()> {
        let payload = json!({
            "ok": true,
            "result": result_to_json(result)?,
        });
        println!("{}", to_pretty(&payload)?);
        Ok(())
    }

    fn render_error(&self, error: &AppError) -> AppResult<()> {
        eprintln!("{}", to_pretty(&error_to_json(error))?);
        Ok(())
    }
}

fn to_pretty(value: &Value) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::internal(err.to_string()))
}

fn to_value<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|err| AppError::internal(err.to_string()))
}

fn result_to_json(result: &CommandResult) -> AppResult<Value> {
    Ok(match result {
        CommandResult::Translate {
            event,
            verdict,
            changes,
            entity,
        } => {
            // {"verdict": "accept"} or {"verdict": "reject", "reason": ..}
            let mut value = to_value(verdict)?;
            value["event"] = to_value(event)?;
            value["changes"] = to_value(changes)?;
            value["entity"] = match entity {
                Some(entity) => to_value(entity)?,
                None => Value::Null,
            };
            value
        }
        CommandResult::Select { select, place } => json!({
            "select": select,
            "place": place,
        }),
        CommandResult::Expand { tokens } => json!({ "tokens": tokens }),
    })
}

fn error_to_json(error: &AppError) -> Value {
    let mut payload = json!({
        "ok": false,
        "errorType": error.kind().as_str(),
        "code": error.code(),
        "reason": error.message(),
    });
    if let Some(context) = error.context() {
        payload["context"] = Value::String(context.to_string());
    }
    payload
}
