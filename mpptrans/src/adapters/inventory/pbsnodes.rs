// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::types::Vnode;

const RESOURCES_AVAILABLE: &str = "resources_available.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: attribute before any vnode name")]
    AttributeWithoutVnode { line: usize },
}

/// Parse the output of `pbsnodes -av` into vnodes, keeping listing order.
///
/// A vnode starts with an unindented line holding its name and is followed by
/// indented `key = value` lines. Only `resources_available.*` keys are kept,
/// with the prefix stripped. Only the first `=` splits key and value, so
/// values like `resources_available.mem = 4gb=x` survive.
pub fn parse_pbsnodes(input: &str) -> Result<Vec<Vnode>, ParseError> {
    let mut vnodes: Vec<Vnode> = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let indented = raw.starts_with(char::is_whitespace);
        if !indented {
            vnodes.push(Vnode::new(raw.trim()));
            continue;
        }
        let current = vnodes
            .last_mut()
            .ok_or(ParseError::AttributeWithoutVnode { line: idx + 1 })?;
        let Some((key, value)) = raw.trim().split_once('=') else {
            continue;
        };
        if let Some(name) = key.trim().strip_prefix(RESOURCES_AVAILABLE) {
            current
                .resources_available
                .insert(name.to_string(), value.trim().to_string());
        }
    }

    Ok(vnodes)
}
