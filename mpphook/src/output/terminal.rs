// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::io::{IsTerminal, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use mpptrans::adapters::snapshot::Change;
use mpptrans::app::errors::{AppError, AppResult};
use mpptrans::app::types::Verdict;

use super::OutputPort;
use crate::commands::CommandResult;

const CHECK: char = '✓';
const CROSS: char = '✗';

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputPort for TerminalOutput {
    fn render(&self, result: &CommandResult) -> AppResult<()> {
        write_marked(&mut std::io::stdout(), &format_result(result))
    }

    fn render_error(&self, error: &AppError) -> AppResult<()> {
        write_marked(&mut std::io::stderr(), &format!("{CROSS} error: {error}\n"))
    }
}

fn format_result(result: &CommandResult) -> String {
    match result {
        CommandResult::Translate {
            event,
            verdict,
            changes,
            ..
        } => {
            let mut out = match verdict {
                Verdict::Accept => format!("{CHECK} {} accepted\n", event.as_str()),
                Verdict::Reject { reason } => {
                    format!("{CROSS} {} rejected\n{reason}\n", event.as_str())
                }
            };
            if changes.is_empty() {
                out.push_str("  no changes\n");
            }
            for change in changes {
                out.push_str("  ");
                out.push_str(&format_change(change));
                out.push('\n');
            }
            out
        }
        CommandResult::Select { select, place } => {
            let mut out = format!("select={select}\n");
            if let Some(place) = place {
                out.push_str(&format!("place={place}\n"));
            }
            out
        }
        CommandResult::Expand { tokens } => format!("{}\n", tokens.join(" ")),
    }
}

fn format_change(change: &Change) -> String {
    match change {
        Change::SetResource { name, value } => format!("set {name}={value}"),
        Change::ClearResource { name } => format!("clear {name}"),
        Change::SetNodeSet { value } => format!("node_set={value}"),
    }
}

/// Write `text`, coloring leading check and cross markers when `w` is a terminal.
fn write_marked<W: Write + IsTerminal>(w: &mut W, text: &str) -> AppResult<()> {
    write_text(w, text).map_err(|err| AppError::local(format!("failed to write output: {err}")))
}

fn write_text<W: Write + IsTerminal>(w: &mut W, text: &str) -> std::io::Result<()> {
    if !w.is_terminal() {
        w.write_all(text.as_bytes())?;
        return w.flush();
    }
    for line in text.split_inclusive('\n') {
        let marker = line
            .chars()
            .next()
            .filter(|c| *c == CHECK || *c == CROSS);
        match marker {
            Some(marker) => {
                let color = if marker == CHECK {
                    Color::Green
                } else {
                    Color::Red
                };
                queue!(
                    w,
                    SetForegroundColor(color),
                    Print(marker),
                    ResetColor,
                    Print(&line[marker.len_utf8()..])
                )?;
            }
            None => w.write_all(line.as_bytes())?,
        }
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpptrans::app::types::EventKind;

    #[test]
    fn accepted_translation_lists_changes() {
        let result = CommandResult::Translate {
            event: EventKind::QueueJob,
            verdict: Verdict::Accept,
            changes: vec![
                Change::ClearResource {
                    name: "vnode".to_string(),
                },
                Change::SetResource {
                    name: "select".to_string(),
                    value: "1:ncpus=1:vnode=n1+vntype=cray_compute".to_string(),
                },
            ],
            entity: None,
        };
        assert_eq!(
            format_result(&result),
            "✓ queuejob accepted\n  clear vnode\n  set select=1:ncpus=1:vnode=n1+vntype=cray_compute\n"
        );
    }

    #[test]
    fn rejected_translation_shows_reason() {
        let result = CommandResult::Translate {
            event: EventKind::ResvSub,
            verdict: Verdict::Reject {
                reason: "Event Job or Resv parameter is not set".to_string(),
            },
            changes: Vec::new(),
            entity: None,
        };
        assert_eq!(
            format_result(&result),
            "✗ resvsub rejected\nEvent Job or Resv parameter is not set\n  no changes\n"
        );
    }

    #[test]
    fn select_without_place() {
        let result = CommandResult::Select {
            select: "4:vntype=cray_compute".to_string(),
            place: None,
        };
        assert_eq!(format_result(&result), "select=4:vntype=cray_compute\n");
    }

    #[test]
    fn expand_joins_tokens() {
        let result = CommandResult::Expand {
            tokens: vec!["5".to_string(), "6".to_string()],
        };
        assert_eq!(format_result(&result), "5 6\n");
    }
}
