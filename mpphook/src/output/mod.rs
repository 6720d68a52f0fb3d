// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

mod json;
mod terminal;

use mpptrans::app::errors::{AppError, AppResult};

use crate::commands::CommandResult;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Where command results and errors are shown.
pub trait OutputPort {
    fn render(&self, result: &CommandResult) -> AppResult<()>;
    fn render_error(&self, error: &AppError) -> AppResult<()>;
}

pub fn for_mode(json: bool) -> Box<dyn OutputPort> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TerminalOutput::new())
    }
}
